use std::panic::Location;
use std::path::Path;

use chrono::{DateTime, Local};

use crate::level::Severity;

/// A single log event as handed to every handler.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    pub logger: String,
    pub level: Severity,
    /// Base name of the source file that emitted the record.
    pub file: String,
    pub line: u32,
    pub message: String,
}

impl LogRecord {
    /// Build a record stamped with the caller's source location.
    #[track_caller]
    pub fn new(logger: impl Into<String>, level: Severity, message: impl Into<String>) -> Self {
        let caller = Location::caller();
        Self::at(logger, level, message, caller.file(), caller.line())
    }

    /// Build a record for an explicit source location.
    pub fn at(
        logger: impl Into<String>,
        level: Severity,
        message: impl Into<String>,
        file: &str,
        line: u32,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            logger: logger.into(),
            level,
            file: base_name(file),
            line,
            message: message.into(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

fn base_name(file: &str) -> String {
    Path::new(file)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file)
        .to_string()
}
