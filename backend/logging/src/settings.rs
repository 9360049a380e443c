//! Logging settings, read once at startup and passed to the registry.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::handler::ConsoleTarget;
use crate::rotate::RotationPolicy;

/// Env var holding the level used by [`LoggerRegistry::get_or_create`](crate::LoggerRegistry::get_or_create).
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

pub const DEFAULT_LOGGER_NAME: &str = "eribot";

/// Log directory, relative to the working directory.
pub const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub log_dir: PathBuf,
    pub default_name: String,
    /// Raw `LOG_LEVEL` value; parsed leniently when used.
    pub env_level: Option<String>,
    pub main_rotation: RotationPolicy,
    pub error_rotation: RotationPolicy,
    #[serde(skip)]
    pub console: ConsoleTarget,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            default_name: DEFAULT_LOGGER_NAME.to_string(),
            env_level: None,
            main_rotation: RotationPolicy::MAIN,
            error_rotation: RotationPolicy::ERRORS,
            console: ConsoleTarget::Stdout,
        }
    }
}

impl LoggingSettings {
    /// Defaults plus the process environment. Only `LOG_LEVEL` is read, so
    /// unrelated variables that are not valid UTF-8 are never touched.
    pub fn from_env() -> Self {
        let mut env = HashMap::new();
        if let Some(level) = std::env::var_os(LOG_LEVEL_ENV) {
            env.insert(
                LOG_LEVEL_ENV.to_string(),
                level.to_string_lossy().into_owned(),
            );
        }
        Self::from_env_with(&env)
    }

    /// Defaults plus a provided environment map (useful for testing).
    pub fn from_env_with(env: &HashMap<String, String>) -> Self {
        Self {
            env_level: env
                .get(LOG_LEVEL_ENV)
                .filter(|v| !v.trim().is_empty())
                .cloned(),
            ..Self::default()
        }
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = dir.into();
        self
    }

    pub fn with_console(mut self, console: ConsoleTarget) -> Self {
        self.console = console;
        self
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn main_log_path(&self, name: &str) -> PathBuf {
        self.log_dir.join(format!("{name}.log"))
    }

    pub fn error_log_path(&self, name: &str) -> PathBuf {
        self.log_dir.join(format!("{name}-error.log"))
    }
}
