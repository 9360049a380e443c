//! Logger registry and the two setup entry points.
//!
//! The registry is owned by the startup routine and handed to subsystems by
//! reference. A name maps to exactly one [`Logger`]; configuring a name again
//! replaces its handlers instead of stacking new ones.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::error::{LoggingError, Result};
use crate::format::{Formatter, Layout};
use crate::handler::{Handler, HandlerKind};
use crate::level::Severity;
use crate::logger::{Logger, LoggerHandle};
use crate::rotate::RotationPolicy;
use crate::settings::LoggingSettings;

/// Level used when none is given and `LOG_LEVEL` is unset.
pub const DEFAULT_LEVEL: &str = "INFO";

/// Which sinks [`LoggerRegistry::configure_with`] attaches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupOptions {
    pub level: String,
    pub log_to_file: bool,
    pub log_to_console: bool,
}

impl Default for SetupOptions {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL.to_string(),
            log_to_file: true,
            log_to_console: true,
        }
    }
}

#[derive(Debug, Default)]
pub struct LoggerRegistry {
    settings: LoggingSettings,
    loggers: Mutex<HashMap<String, LoggerHandle>>,
}

impl LoggerRegistry {
    pub fn new(settings: LoggingSettings) -> Self {
        Self {
            settings,
            loggers: Mutex::new(HashMap::new()),
        }
    }

    pub fn settings(&self) -> &LoggingSettings {
        &self.settings
    }

    /// Look up the logger for `name`, creating a bare one on first use.
    pub fn logger(&self, name: &str) -> LoggerHandle {
        let mut loggers = self.loggers.lock().unwrap_or_else(PoisonError::into_inner);
        let logger = loggers
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Logger::new(name)));
        Arc::clone(logger)
    }

    /// Names of every logger created so far, sorted.
    pub fn names(&self) -> Vec<String> {
        let loggers = self.loggers.lock().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = loggers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Configure `name` from scratch, replacing any handlers it had.
    ///
    /// Unrecognized levels degrade to `INFO`. Only directory or file setup can
    /// fail, and then the logger keeps its previous handlers and threshold.
    pub fn configure(
        &self,
        name: &str,
        level: &str,
        log_to_file: bool,
        log_to_console: bool,
    ) -> Result<LoggerHandle> {
        self.configure_with(
            name,
            &SetupOptions {
                level: level.to_string(),
                log_to_file,
                log_to_console,
            },
        )
    }

    pub fn configure_with(&self, name: &str, options: &SetupOptions) -> Result<LoggerHandle> {
        let level = Severity::parse_lenient(&options.level);
        let logger = self.logger(name);

        // Build every handler before touching the logger, so a failed setup
        // leaves the previous configuration in place.
        let mut handlers = Vec::with_capacity(3);
        if options.log_to_console {
            handlers.push(Handler::console(
                self.settings.console.clone(),
                level,
                Formatter::colored(Layout::Compact),
            ));
        }
        if options.log_to_file {
            self.ensure_log_dir()?;
            handlers.push(self.file_handler(
                HandlerKind::MainFile,
                self.settings.main_log_path(name),
                self.settings.main_rotation,
                Severity::Debug,
            )?);
            handlers.push(self.file_handler(
                HandlerKind::ErrorFile,
                self.settings.error_log_path(name),
                self.settings.error_rotation,
                Severity::Error,
            )?);
        }

        debug!(logger = name, level = %level, handlers = handlers.len(), "Configured logger");
        logger.set_threshold(level);
        logger.replace_handlers(handlers);
        Ok(logger)
    }

    /// Return `name` as is if it already has handlers, otherwise configure it
    /// with both sinks at the `LOG_LEVEL` captured in the settings.
    pub fn get_or_create(&self, name: &str) -> Result<LoggerHandle> {
        let logger = self.logger(name);
        if logger.has_handlers() {
            return Ok(logger);
        }
        let level = self.settings.env_level.as_deref().unwrap_or(DEFAULT_LEVEL);
        self.configure(name, level, true, true)
    }

    /// [`get_or_create`](Self::get_or_create) for the application's default name.
    pub fn default_logger(&self) -> Result<LoggerHandle> {
        self.get_or_create(&self.settings.default_name)
    }

    /// Create the log directory if it is missing.
    pub(crate) fn ensure_log_dir(&self) -> Result<()> {
        let dir = self.settings.log_dir();
        fs::create_dir_all(dir).map_err(|e| LoggingError::io(dir, e))
    }

    pub(crate) fn file_handler(
        &self,
        kind: HandlerKind,
        path: PathBuf,
        policy: RotationPolicy,
        threshold: Severity,
    ) -> Result<Handler> {
        Handler::file(kind, &path, policy, threshold, Formatter::plain(Layout::Detailed))
            .map_err(|e| LoggingError::io(path, e))
    }
}

/// Logger with the fixed console + main file + error file topology.
///
/// Unlike [`LoggerRegistry::configure`], the main file follows the requested
/// level, and the console line carries the logger name. Handlers are only
/// attached to a logger that has none.
#[derive(Debug, Clone)]
pub struct StandardLogger {
    logger: LoggerHandle,
}

impl StandardLogger {
    pub fn new(registry: &LoggerRegistry, name: &str, level: &str) -> Result<Self> {
        let level = Severity::parse_lenient(level);
        let logger = registry.logger(name);
        logger.set_threshold(level);

        if !logger.has_handlers() {
            let settings = registry.settings();
            registry.ensure_log_dir()?;
            let handlers = vec![
                Handler::console(
                    settings.console.clone(),
                    level,
                    Formatter::colored(Layout::Standard),
                ),
                registry.file_handler(
                    HandlerKind::MainFile,
                    settings.main_log_path(name),
                    settings.main_rotation,
                    level,
                )?,
                registry.file_handler(
                    HandlerKind::ErrorFile,
                    settings.error_log_path(name),
                    settings.error_rotation,
                    Severity::Error,
                )?,
            ];
            logger.add_handlers_if_empty(handlers);
        }

        Ok(Self { logger })
    }

    /// Default name at `INFO`.
    pub fn with_defaults(registry: &LoggerRegistry) -> Result<Self> {
        Self::new(registry, &registry.settings().default_name, DEFAULT_LEVEL)
    }

    pub fn logger(&self) -> LoggerHandle {
        Arc::clone(&self.logger)
    }
}
