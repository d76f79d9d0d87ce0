// In-memory sources and sinks for unit tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, BufRead, Cursor, Write};
use std::rc::Rc;

use crate::domain::errors::PrepError;
use crate::domain::naming::OutputNaming;
use crate::domain::sink::{Sink, SinkTarget};
use crate::domain::traits::{LineSource, SinkFactory};

pub struct MemorySource {
    name: String,
    text: String,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, lines: &[&str]) -> Self {
        let mut text = String::new();
        for line in lines {
            text.push_str(line);
            text.push('\n');
        }
        Self { name: name.into(), text }
    }

    /// ARFF-shaped source named `tag`: "h1".."hH" then "d1-{tag}".."dD-{tag}"
    pub fn arff(tag: &str, header: usize, data: usize) -> Self {
        let mut lines: Vec<String> = (1..=header).map(|i| format!("h{i}")).collect();
        lines.extend((1..=data).map(|i| format!("d{i}-{tag}")));
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        Self::new(tag, &refs)
    }

    pub fn lines(&self) -> Vec<String> {
        self.text.lines().map(str::to_string).collect()
    }
}

impl LineSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn open(&self) -> io::Result<Box<dyn BufRead + '_>> {
        Ok(Box::new(Cursor::new(self.text.as_bytes())))
    }
}

/// A source that cannot be opened.
pub struct MissingSource(pub String);

impl LineSource for MissingSource {
    fn name(&self) -> &str {
        &self.0
    }

    fn open(&self) -> io::Result<Box<dyn BufRead + '_>> {
        Err(io::Error::new(io::ErrorKind::NotFound, "no such source"))
    }
}

#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.borrow())
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.0.borrow().clone()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Hands out one shared buffer per target; creating a target again
/// starts it empty. Targets listed in `refuse` fail to open.
#[derive(Default)]
pub struct MemorySinks {
    naming:  OutputNaming,
    buffers: HashMap<SinkTarget, SharedBuffer>,
    pub refuse:  Vec<SinkTarget>,
    pub created: Vec<SinkTarget>,
}

impl MemorySinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self, target: SinkTarget) -> Vec<String> {
        self.buffers
            .get(&target)
            .map(SharedBuffer::lines)
            .unwrap_or_default()
    }
}

impl SinkFactory for MemorySinks {
    fn locate(&self, target: SinkTarget) -> String {
        self.naming.file_name(target)
    }

    fn create(&mut self, target: SinkTarget) -> Result<Sink, PrepError> {
        let name = self.locate(target);
        if self.refuse.contains(&target) {
            return Err(PrepError::sink_unwritable(
                name,
                io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
            ));
        }
        let buffer = SharedBuffer::default();
        self.buffers.insert(target, buffer.clone());
        self.created.push(target);
        Ok(Sink::new(target, name, Box::new(buffer)))
    }
}
