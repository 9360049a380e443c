use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use eribot_logging::registry::DEFAULT_LEVEL;
use eribot_logging::{
    init_tracing, report_system_info, LoggerHandle, LoggerRegistry, LoggingSettings, Severity,
};

#[derive(Parser)]
#[command(name = "eribot")]
#[command(about = "EriBot logging setup and host diagnostics")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure logging, print host info, and emit one record per level
    Run {
        /// Logger name, also used for the log file names
        #[arg(short, long)]
        name: Option<String>,
        /// Minimum level (DEBUG, INFO, WARNING, ERROR, CRITICAL)
        #[arg(short, long)]
        level: Option<String>,
        /// Skip the rotating log files
        #[arg(long)]
        no_file: bool,
        /// Skip console output
        #[arg(long)]
        no_console: bool,
    },
    /// Print host diagnostics to the console only
    Sysinfo,
    /// Show the effective logging settings as JSON
    Settings,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let registry = LoggerRegistry::new(LoggingSettings::from_env());

    match cli.command {
        Commands::Run {
            name,
            level,
            no_file,
            no_console,
        } => run(&registry, name, level, !no_file, !no_console)?,
        Commands::Sysinfo => {
            let name = registry.settings().default_name.clone();
            let logger = registry
                .configure(&name, DEFAULT_LEVEL, false, true)
                .context("Failed to configure console logger")?;
            report_system_info(&logger);
        }
        Commands::Settings => {
            println!("{}", serde_json::to_string_pretty(registry.settings())?);
        }
    }

    Ok(())
}

fn run(
    registry: &LoggerRegistry,
    name: Option<String>,
    level: Option<String>,
    log_to_file: bool,
    log_to_console: bool,
) -> Result<()> {
    let settings = registry.settings();
    let name = name.unwrap_or_else(|| settings.default_name.clone());

    let logger = setup_logger(registry, &name, level.as_deref(), log_to_file, log_to_console)
        .with_context(|| format!("Failed to configure logger {name}"))?;
    init_tracing(Arc::clone(&logger), logger.threshold().as_directive());

    report_system_info(&logger);
    info!(
        logger = %name,
        level = %logger.threshold(),
        log_dir = %settings.log_dir().display(),
        "Logging initialised"
    );

    for severity in Severity::ALL {
        logger.log(severity, format!("Sample {severity} record"));
    }

    Ok(())
}

/// An explicit `--level` always reconfigures. Without one, the default
/// topology goes through `get_or_create`, the only path that reads `LOG_LEVEL`.
fn setup_logger(
    registry: &LoggerRegistry,
    name: &str,
    level: Option<&str>,
    log_to_file: bool,
    log_to_console: bool,
) -> eribot_logging::Result<LoggerHandle> {
    match level {
        Some(level) => registry.configure(name, level, log_to_file, log_to_console),
        None if log_to_file && log_to_console => registry.get_or_create(name),
        None => registry.configure(name, DEFAULT_LEVEL, log_to_file, log_to_console),
    }
}
