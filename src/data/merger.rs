// ============================================================
// Layer 4 — Line Merger
// ============================================================
// Streams sources into sinks while keeping the header once.
//
// Every source starts with `header_length` header lines followed
// by data lines. When several sources are merged into one sink:
//
//   source 0:  h1 h2 d1 d2 d3     → all five lines written
//   source 1:  h1 h2 d1 d2 d3     → only d1 d2 d3 written
//   source 2:  h1 h2 d1 d2 d3     → only d1 d2 d3 written
//
// A sink's HeaderState flips to "written" as soon as one source
// has emitted at least one line into it. An empty source
// therefore never consumes the header.
//
// The held-out variant routes one source verbatim to a separate
// test sink. That source neither reads nor changes the training
// sink's HeaderState.
//
// Nothing is buffered beyond one line, nothing is reordered and
// data lines are never deduplicated. On error the merge stops
// immediately; lines already written stay in the sink.

use crate::data::loader::next_line;
use crate::domain::errors::PrepError;
use crate::domain::plan::{MergePlan, Role};
use crate::domain::sink::{MergeStats, Sink};
use crate::domain::traits::{LineSource, ProgressReporter};

/// Per-sink "header already written" flag.
#[derive(Debug, Default)]
struct HeaderState {
    written: bool,
}

pub struct LineMerger<'r> {
    header_length: usize,
    reporter:      &'r dyn ProgressReporter,
}

impl<'r> LineMerger<'r> {
    pub fn new(header_length: usize, reporter: &'r dyn ProgressReporter) -> Self {
        Self { header_length, reporter }
    }

    pub fn reporter(&self) -> &'r dyn ProgressReporter {
        self.reporter
    }

    /// Merge every source, in order, into `sink` keeping one header.
    /// The sink is left open; the caller closes it.
    pub fn merge<S: LineSource>(&self, sources: &[S], sink: &mut Sink) -> Result<MergeStats, PrepError> {
        let mut header = HeaderState::default();
        let mut stats  = MergeStats::new(sink.name());

        for source in sources {
            self.reporter.source_started(source.name(), sink.target(), sink.name());
            self.copy(source, sink, Some(&mut header), &mut stats)?;
        }

        tracing::debug!(
            "Merged {} sources into '{}': {} lines, {} header lines skipped",
            stats.sources,
            stats.sink,
            stats.lines_written,
            stats.header_lines_skipped,
        );
        Ok(stats)
    }

    /// Merge according to `plan`: pooled sources go to `train` under the
    /// header rule, the held-out source goes to `test` unmodified.
    /// Returns (train stats, test stats).
    pub fn merge_with_holdout<S: LineSource>(
        &self,
        sources: &[S],
        plan:    &MergePlan,
        train:   &mut Sink,
        test:    &mut Sink,
    ) -> Result<(MergeStats, MergeStats), PrepError> {
        if plan.source_count() != sources.len() {
            return Err(PrepError::InvalidConfig(format!(
                "plan {} covers {} sources but {} were given",
                plan.index(),
                plan.source_count(),
                sources.len()
            )));
        }

        let mut header      = HeaderState::default();
        let mut train_stats = MergeStats::new(train.name());
        let mut test_stats  = MergeStats::new(test.name());

        for (index, role) in plan.assignments() {
            let source = &sources[index];
            match role {
                Role::HeldOut => {
                    self.reporter.source_started(source.name(), test.target(), test.name());
                    self.copy(source, test, None, &mut test_stats)?;
                }
                Role::Pooled => {
                    self.reporter.source_started(source.name(), train.target(), train.name());
                    self.copy(source, train, Some(&mut header), &mut train_stats)?;
                }
            }
        }

        Ok((train_stats, test_stats))
    }

    /// Copy one source into `sink`. With a HeaderState the header is
    /// skipped once it has been written; without one every line passes.
    fn copy<S: LineSource + ?Sized>(
        &self,
        source: &S,
        sink:   &mut Sink,
        header: Option<&mut HeaderState>,
        stats:  &mut MergeStats,
    ) -> Result<(), PrepError> {
        let mut reader = source
            .open()
            .map_err(|e| PrepError::source_unavailable(source.name(), e))?;

        let skip_header = header.as_ref().map_or(false, |h| h.written);
        let mut buf     = Vec::new();
        let mut line_no = 0usize;
        let mut emitted = 0usize;

        while next_line(&mut *reader, &mut buf)
            .map_err(|e| PrepError::source_unavailable(source.name(), e))?
        {
            line_no += 1;
            if skip_header && line_no <= self.header_length {
                stats.header_lines_skipped += 1;
                continue;
            }
            sink.write_line(&buf)?;
            emitted += 1;
        }

        if let Some(h) = header {
            if emitted > 0 {
                h.written = true;
            }
        }
        stats.sources       += 1;
        stats.lines_written += emitted;
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::{MemorySinks, MemorySource, MissingSource, SharedBuffer};
    use crate::domain::sink::SinkTarget;
    use crate::domain::traits::SinkFactory;
    use crate::infra::reporter::SilentReporter;
    use std::cell::RefCell;
    use std::io::{self, BufRead};

    fn sources(tags: &[&str], header: usize, data: usize) -> Vec<MemorySource> {
        tags.iter().map(|t| MemorySource::arff(t, header, data)).collect()
    }

    fn merge_all(srcs: &[MemorySource], header: usize) -> (Vec<String>, MergeStats) {
        let reporter = SilentReporter;
        let merger   = LineMerger::new(header, &reporter);
        let mut sinks = MemorySinks::new();
        let mut sink  = sinks.create(SinkTarget::All).unwrap();
        let stats     = merger.merge(srcs, &mut sink).unwrap();
        sink.close().unwrap();
        (sinks.lines(SinkTarget::All), stats)
    }

    #[test]
    fn test_header_kept_once() {
        let srcs = sources(&["A", "B", "C"], 2, 3);
        let (lines, stats) = merge_all(&srcs, 2);

        assert_eq!(lines.len(), 2 + 3 * 3);
        assert_eq!(&lines[..2], &["h1", "h2"]);
        assert_eq!(
            &lines[2..],
            &["d1-A", "d2-A", "d3-A", "d1-B", "d2-B", "d3-B", "d1-C", "d2-C", "d3-C"]
        );
        assert_eq!(stats.sources, 3);
        assert_eq!(stats.lines_written, 11);
        assert_eq!(stats.header_lines_skipped, 4);
    }

    #[test]
    fn test_line_count_property_over_shapes() {
        for m in 1..5 {
            for h in 0..4 {
                for d in 0..4 {
                    let tags: Vec<String> = (0..m).map(|i| format!("S{i}")).collect();
                    let refs: Vec<&str>   = tags.iter().map(String::as_str).collect();
                    let srcs = sources(&refs, h, d);
                    let (lines, _) = merge_all(&srcs, h);

                    if d == 0 && h > 0 {
                        // Header-only sources each still supply lines only once
                        assert_eq!(lines.len(), h, "m={m} h={h} d={d}");
                    } else {
                        assert_eq!(lines.len(), h + m * d, "m={m} h={h} d={d}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_single_source_is_reproduced() {
        let src = MemorySource::arff("A", 3, 4);
        let expected = src.lines();
        let (lines, _) = merge_all(&[src], 3);
        assert_eq!(lines, expected);
    }

    #[test]
    fn test_zero_header_concatenates_everything() {
        let srcs = vec![
            MemorySource::new("a", &["1", "2"]),
            MemorySource::new("b", &["3"]),
        ];
        let (lines, stats) = merge_all(&srcs, 0);
        assert_eq!(lines, vec!["1", "2", "3"]);
        assert_eq!(stats.header_lines_skipped, 0);
    }

    #[test]
    fn test_empty_first_source_does_not_consume_header() {
        let srcs = vec![
            MemorySource::new("empty", &[]),
            MemorySource::arff("B", 2, 1),
            MemorySource::arff("C", 2, 1),
        ];
        let (lines, _) = merge_all(&srcs, 2);
        assert_eq!(lines, vec!["h1", "h2", "d1-B", "d1-C"]);
    }

    #[test]
    fn test_header_only_first_source_supplies_header() {
        let srcs = vec![
            MemorySource::new("hdr", &["h1", "h2"]),
            MemorySource::arff("B", 2, 2),
        ];
        let (lines, _) = merge_all(&srcs, 2);
        assert_eq!(lines, vec!["h1", "h2", "d1-B", "d2-B"]);
    }

    #[test]
    fn test_crlf_input_is_normalised() {
        struct Crlf;
        impl LineSource for Crlf {
            fn name(&self) -> &str {
                "crlf"
            }
            fn open(&self) -> io::Result<Box<dyn BufRead + '_>> {
                Ok(Box::new(io::Cursor::new(b"h\r\nx\r\n".to_vec())))
            }
        }

        let reporter = SilentReporter;
        let merger   = LineMerger::new(1, &reporter);
        let buffer   = SharedBuffer::default();
        let mut sink = Sink::new(SinkTarget::All, "out", Box::new(buffer.clone()));
        merger.merge(&[Crlf], &mut sink).unwrap();
        sink.close().unwrap();
        assert_eq!(buffer.bytes(), b"h\nx\n");
    }

    #[test]
    fn test_missing_source_aborts_but_keeps_written_lines() {
        struct Either {
            good: MemorySource,
            bad:  MissingSource,
            ok:   bool,
        }
        impl LineSource for Either {
            fn name(&self) -> &str {
                if self.ok { self.good.name() } else { self.bad.name() }
            }
            fn open(&self) -> io::Result<Box<dyn BufRead + '_>> {
                if self.ok { self.good.open() } else { self.bad.open() }
            }
        }

        let srcs = vec![
            Either { good: MemorySource::arff("A", 1, 2), bad: MissingSource("x".into()), ok: true },
            Either { good: MemorySource::arff("B", 1, 2), bad: MissingSource("gone.arff".into()), ok: false },
            Either { good: MemorySource::arff("C", 1, 2), bad: MissingSource("y".into()), ok: true },
        ];

        let reporter = SilentReporter;
        let merger   = LineMerger::new(1, &reporter);
        let buffer   = SharedBuffer::default();
        let mut sink = Sink::new(SinkTarget::All, "All.arff", Box::new(buffer.clone()));

        let err = merger.merge(&srcs, &mut sink).unwrap_err();
        match err {
            PrepError::SourceUnavailable { name, .. } => assert_eq!(name, "gone.arff"),
            other => panic!("unexpected error: {other:?}"),
        }
        drop(sink);
        assert_eq!(buffer.lines(), vec!["h1", "d1-A", "d2-A"]);
    }

    #[test]
    fn test_holdout_routes_verbatim_and_leaves_header_alone() {
        let srcs = sources(&["A", "B", "C"], 2, 3);
        let reporter = SilentReporter;
        let merger   = LineMerger::new(2, &reporter);
        let mut sinks = MemorySinks::new();

        // Held-out source first: training header must still come from B
        let plan      = MergePlan::new(0, 0, 3);
        let mut train = sinks.create(SinkTarget::Train(0)).unwrap();
        let mut test  = sinks.create(SinkTarget::Test(0)).unwrap();
        let (tr, te)  = merger.merge_with_holdout(&srcs, &plan, &mut train, &mut test).unwrap();
        train.close().unwrap();
        test.close().unwrap();

        assert_eq!(sinks.lines(SinkTarget::Test(0)), srcs[0].lines());
        assert_eq!(
            sinks.lines(SinkTarget::Train(0)),
            vec!["h1", "h2", "d1-B", "d2-B", "d3-B", "d1-C", "d2-C", "d3-C"]
        );
        assert_eq!(te.lines_written, 5);
        assert_eq!(te.header_lines_skipped, 0);
        assert_eq!(tr.lines_written, 8);
        assert_eq!(tr.sources, 2);
    }

    #[derive(Default)]
    struct Recorder(RefCell<Vec<(String, SinkTarget, String)>>);

    impl ProgressReporter for Recorder {
        fn source_started(&self, source: &str, target: SinkTarget, sink: &str) {
            self.0.borrow_mut().push((source.into(), target, sink.into()));
        }
    }

    #[test]
    fn test_reporter_sees_the_target_of_each_source() {
        let srcs     = sources(&["A", "B"], 1, 1);
        let recorder = Recorder::default();
        let merger   = LineMerger::new(1, &recorder);
        let mut sinks = MemorySinks::new();

        let mut all = sinks.create(SinkTarget::All).unwrap();
        merger.merge(&srcs[..1], &mut all).unwrap();

        let mut train = sinks.create(SinkTarget::Train(0)).unwrap();
        let mut test  = sinks.create(SinkTarget::Test(0)).unwrap();
        merger
            .merge_with_holdout(&srcs, &MergePlan::new(0, 1, 2), &mut train, &mut test)
            .unwrap();

        let seen = recorder.0.into_inner();
        assert_eq!(
            seen,
            vec![
                ("A".to_string(), SinkTarget::All, "All.arff".to_string()),
                ("A".to_string(), SinkTarget::Train(0), "Train0.arff".to_string()),
                ("B".to_string(), SinkTarget::Test(0), "Test0.arff".to_string()),
            ]
        );
    }

    #[test]
    fn test_plan_for_other_source_count_is_rejected() {
        let srcs     = sources(&["A", "B"], 1, 1);
        let reporter = SilentReporter;
        let merger   = LineMerger::new(1, &reporter);
        let mut sinks = MemorySinks::new();
        let mut train = sinks.create(SinkTarget::Train(0)).unwrap();
        let mut test  = sinks.create(SinkTarget::Test(0)).unwrap();

        let err = merger
            .merge_with_holdout(&srcs, &MergePlan::new(0, 2, 3), &mut train, &mut test)
            .unwrap_err();

        assert!(matches!(err, PrepError::InvalidConfig(_)));
        drop((train, test));
        assert!(sinks.lines(SinkTarget::Train(0)).is_empty());
        assert!(sinks.lines(SinkTarget::Test(0)).is_empty());
    }
}
