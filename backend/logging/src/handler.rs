//! Output sinks, each with its own severity threshold and formatter.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::format::Formatter;
use crate::level::Severity;
use crate::record::LogRecord;
use crate::rotate::{RotatingFileWriter, RotationPolicy};

/// Role a handler plays in the logger's topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    Console,
    MainFile,
    ErrorFile,
}

/// In-memory console capture, cloneable so the owner can read what was written.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Where console handlers write.
#[derive(Debug, Clone, Default)]
pub enum ConsoleTarget {
    #[default]
    Stdout,
    Buffer(SharedBuffer),
}

#[derive(Debug)]
enum Sink {
    Stdout,
    Buffer(SharedBuffer),
    File(RotatingFileWriter),
}

impl Sink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        match self {
            Sink::Stdout => {
                let mut out = io::stdout().lock();
                writeln!(out, "{line}")?;
                out.flush()
            }
            Sink::Buffer(buffer) => writeln!(buffer, "{line}"),
            Sink::File(writer) => writer.write_line(line),
        }
    }
}

#[derive(Debug)]
pub struct Handler {
    kind: HandlerKind,
    threshold: Severity,
    formatter: Formatter,
    path: Option<PathBuf>,
    sink: Mutex<Sink>,
}

impl Handler {
    pub fn console(target: ConsoleTarget, threshold: Severity, formatter: Formatter) -> Self {
        let sink = match target {
            ConsoleTarget::Stdout => Sink::Stdout,
            ConsoleTarget::Buffer(buffer) => Sink::Buffer(buffer),
        };
        Self {
            kind: HandlerKind::Console,
            threshold,
            formatter,
            path: None,
            sink: Mutex::new(sink),
        }
    }

    /// Open a size-rotated file sink at `path`.
    pub fn file(
        kind: HandlerKind,
        path: &Path,
        policy: RotationPolicy,
        threshold: Severity,
        formatter: Formatter,
    ) -> io::Result<Self> {
        let writer = RotatingFileWriter::open(path, policy)?;
        Ok(Self {
            kind,
            threshold,
            formatter,
            path: Some(path.to_path_buf()),
            sink: Mutex::new(Sink::File(writer)),
        })
    }

    pub fn kind(&self) -> HandlerKind {
        self.kind
    }

    pub fn threshold(&self) -> Severity {
        self.threshold
    }

    pub fn formatter(&self) -> Formatter {
        self.formatter
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn accepts(&self, level: Severity) -> bool {
        level >= self.threshold
    }

    /// Write the record if it meets this handler's threshold.
    pub fn emit(&self, record: &LogRecord) -> io::Result<()> {
        if !self.accepts(record.level) {
            return Ok(());
        }
        let line = self.formatter.format(record);
        self.sink
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .write_line(&line)
    }
}
