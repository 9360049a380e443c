use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while setting up loggers.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to prepare log path {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unknown log level: {0:?}")]
    UnknownLevel(String),
}

impl LoggingError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, LoggingError>;
