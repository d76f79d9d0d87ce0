// ============================================================
// Layer 4 — Source Loader
// ============================================================
// File-backed LineSource plus the helpers that run before any
// merging starts:
//
//   discover_sources  — list the input files of a directory
//   check_sources     — open every source, report its first
//                       line and line count, never abort early
//   next_line         — the line reader shared with the merger
//
// Lines are read as raw bytes so records pass through exactly
// as they are, whatever their encoding. Both "\n" and "\r\n"
// terminators are recognised and stripped.
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use serde::Serialize;
use std::{
    fs::{self, File},
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use crate::domain::traits::LineSource;

/// A source file on disk, named by its file name.
#[derive(Debug, Clone)]
pub struct FileSource {
    name: String,
    path: PathBuf,
}

impl FileSource {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self { name: name.into(), path: path.into() }
    }

    /// Source `name` inside `dir`
    pub fn in_dir(dir: &Path, name: &str) -> Self {
        Self::new(name, dir.join(name))
    }
}

impl LineSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&self) -> io::Result<Box<dyn BufRead + '_>> {
        let file = File::open(&self.path)?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Read the next line into `buf` without its terminator.
/// Returns Ok(false) at end of input.
pub fn next_line(reader: &mut dyn BufRead, buf: &mut Vec<u8>) -> io::Result<bool> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(false);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    Ok(true)
}

/// List regular files in `dir` with the given extension, sorted by name.
/// An empty extension selects files that have none.
pub fn discover_sources(dir: &Path, extension: &str) -> Result<Vec<String>> {
    let mut names = Vec::new();

    for entry in fs::read_dir(dir)
        .with_context(|| format!("Cannot read input directory '{}'", dir.display()))?
    {
        let entry = entry?;
        let path  = entry.path();

        if !path.is_file() {
            continue;
        }

        let matches = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => ext == extension,
            None      => extension.is_empty(),
        };
        if !matches {
            continue;
        }

        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.push(name.to_string());
        } else {
            tracing::warn!("Skipping non UTF-8 file name '{}'", path.display());
        }
    }

    names.sort();
    tracing::debug!("Discovered {} sources in '{}'", names.len(), dir.display());
    Ok(names)
}

/// Result of inspecting one source before a run.
#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub name:       String,
    pub first_line: Option<String>,
    pub line_count: usize,
    pub error:      Option<String>,
}

impl SourceReport {
    pub fn is_readable(&self) -> bool {
        self.error.is_none()
    }

    /// True when the source has no lines past its header
    pub fn is_header_only(&self, header_length: usize) -> bool {
        self.is_readable() && self.line_count <= header_length
    }
}

/// Open and scan every source. A failure on one source is recorded
/// in its report and the remaining sources are still inspected.
pub fn check_sources<S: LineSource>(sources: &[S], header_length: usize) -> Vec<SourceReport> {
    sources
        .iter()
        .map(|source| {
            let report = inspect(source);
            match &report.error {
                Some(e) => tracing::warn!("Cannot read '{}': {}", report.name, e),
                None if report.line_count < header_length => tracing::warn!(
                    "'{}' has {} lines, fewer than the {}-line header",
                    report.name,
                    report.line_count,
                    header_length
                ),
                None => tracing::debug!(
                    "'{}' ok: {} lines, first line {:?}",
                    report.name,
                    report.line_count,
                    report.first_line
                ),
            }
            report
        })
        .collect()
}

fn inspect<S: LineSource + ?Sized>(source: &S) -> SourceReport {
    let mut report = SourceReport {
        name:       source.name().to_string(),
        first_line: None,
        line_count: 0,
        error:      None,
    };

    let mut reader = match source.open() {
        Ok(r)  => r,
        Err(e) => {
            report.error = Some(e.to_string());
            return report;
        }
    };

    let mut buf = Vec::new();
    loop {
        match next_line(&mut *reader, &mut buf) {
            Ok(true) => {
                if report.first_line.is_none() {
                    report.first_line = Some(String::from_utf8_lossy(&buf).into_owned());
                }
                report.line_count += 1;
            }
            Ok(false) => break,
            Err(e) => {
                report.error = Some(e.to_string());
                break;
            }
        }
    }
    report
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::{MemorySource, MissingSource};
    use std::io::Cursor;

    #[test]
    fn test_next_line_strips_both_terminators() {
        let mut reader = Cursor::new(b"a\r\nb\nc".to_vec());
        let mut buf    = Vec::new();
        let mut lines  = Vec::new();
        while next_line(&mut reader, &mut buf).unwrap() {
            lines.push(String::from_utf8(buf.clone()).unwrap());
        }
        assert_eq!(lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_next_line_keeps_empty_lines() {
        let mut reader = Cursor::new(b"\n\nx\n".to_vec());
        let mut buf    = Vec::new();
        let mut count  = 0;
        while next_line(&mut reader, &mut buf).unwrap() {
            count += 1;
        }
        assert_eq!(count, 3);
    }

    #[test]
    fn test_file_source_reads_from_disk() {
        let dir  = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Monday.arff"), "@relation m\n1,2\n").unwrap();

        let source = FileSource::in_dir(dir.path(), "Monday.arff");
        let mut reader = source.open().unwrap();
        let mut buf    = Vec::new();
        assert!(next_line(&mut *reader, &mut buf).unwrap());
        assert_eq!(buf, b"@relation m");
        assert_eq!(source.name(), "Monday.arff");
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.arff"), "").unwrap();
        fs::write(dir.path().join("a.arff"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("c.arff")).unwrap();

        let names = discover_sources(dir.path(), "arff").unwrap();
        assert_eq!(names, vec!["a.arff", "b.arff"]);
    }

    #[test]
    fn test_discover_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_sources(&dir.path().join("nope"), "arff").is_err());
    }

    #[test]
    fn test_check_continues_past_bad_source() {
        let good = MemorySource::arff("A", 2, 3);
        let reports = check_sources(&[good], 2);
        assert_eq!(reports[0].line_count, 5);
        assert_eq!(reports[0].first_line.as_deref(), Some("h1"));
        assert!(reports[0].is_readable());

        let missing = vec![MissingSource("x".into()), MissingSource("y".into())];
        let reports = check_sources(&missing, 2);
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| !r.is_readable()));
    }

    #[test]
    fn test_header_only_detection() {
        let short   = MemorySource::new("short", &["h1", "h2"]);
        let reports = check_sources(&[short], 2);
        assert!(reports[0].is_header_only(2));
        assert!(!reports[0].is_header_only(1));
    }
}
