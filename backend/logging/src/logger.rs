//! Named logger that fans records out to its handlers.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

use crate::handler::{Handler, HandlerKind};
use crate::level::Severity;
use crate::record::LogRecord;

/// Shared handle passed to the subsystems that log.
pub type LoggerHandle = Arc<Logger>;

#[derive(Debug)]
pub struct Logger {
    name: String,
    threshold: RwLock<Severity>,
    handlers: RwLock<Vec<Handler>>,
}

impl Logger {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            threshold: RwLock::new(Severity::default()),
            handlers: RwLock::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn threshold(&self) -> Severity {
        *read(&self.threshold)
    }

    pub fn set_threshold(&self, level: Severity) {
        *write(&self.threshold) = level;
    }

    pub fn is_enabled(&self, level: Severity) -> bool {
        level >= self.threshold()
    }

    pub fn has_handlers(&self) -> bool {
        !read(&self.handlers).is_empty()
    }

    pub fn handler_kinds(&self) -> Vec<HandlerKind> {
        read(&self.handlers).iter().map(Handler::kind).collect()
    }

    pub fn handler_paths(&self) -> Vec<PathBuf> {
        read(&self.handlers)
            .iter()
            .filter_map(|h| h.path().map(|p| p.to_path_buf()))
            .collect()
    }

    /// Drop every attached handler, closing their files.
    pub fn clear_handlers(&self) {
        write(&self.handlers).clear();
    }

    /// Swap the whole handler list for `handlers`.
    pub fn replace_handlers(&self, handlers: Vec<Handler>) {
        *write(&self.handlers) = handlers;
    }

    /// Attach `handlers` only when none are attached yet. Returns whether they were attached.
    pub fn add_handlers_if_empty(&self, handlers: Vec<Handler>) -> bool {
        let mut current = write(&self.handlers);
        if !current.is_empty() {
            return false;
        }
        *current = handlers;
        true
    }

    #[track_caller]
    pub fn log(&self, level: Severity, message: impl Into<String>) {
        if !self.is_enabled(level) {
            return;
        }
        let record = LogRecord::new(self.name.as_str(), level, message);
        self.dispatch(&record);
    }

    /// Emit a pre-built record, subject to this logger's threshold.
    pub fn log_record(&self, record: &LogRecord) {
        if self.is_enabled(record.level) {
            self.dispatch(record);
        }
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(Severity::Debug, message);
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.log(Severity::Info, message);
    }

    #[track_caller]
    pub fn warning(&self, message: impl Into<String>) {
        self.log(Severity::Warning, message);
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.log(Severity::Error, message);
    }

    #[track_caller]
    pub fn critical(&self, message: impl Into<String>) {
        self.log(Severity::Critical, message);
    }

    fn dispatch(&self, record: &LogRecord) {
        for handler in read(&self.handlers).iter() {
            if let Err(e) = handler.emit(record) {
                warn!(
                    logger = %self.name,
                    handler = ?handler.kind(),
                    error = %e,
                    "Failed to write log record"
                );
            }
        }
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
