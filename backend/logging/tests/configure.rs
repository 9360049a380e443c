use std::fs;
use std::path::Path;
use std::sync::Arc;

use eribot_logging::rotate::backup_path;
use eribot_logging::{
    ConsoleTarget, HandlerKind, LoggerRegistry, LoggingError, LoggingSettings, RotationPolicy,
    Severity, SetupOptions, SharedBuffer, StandardLogger,
};

fn registry_in(dir: &Path) -> (LoggerRegistry, SharedBuffer) {
    let console = SharedBuffer::new();
    let settings = LoggingSettings::default()
        .with_log_dir(dir.join("logs"))
        .with_console(ConsoleTarget::Buffer(console.clone()));
    (LoggerRegistry::new(settings), console)
}

fn read(path: impl AsRef<Path>) -> String {
    fs::read_to_string(path).unwrap_or_default()
}

#[test]
fn configuring_twice_does_not_duplicate_handlers() {
    let dir = tempfile::tempdir().unwrap();
    let (registry, _) = registry_in(dir.path());

    let first = registry.configure("eribot", "INFO", true, true).unwrap();
    let second = registry.configure("eribot", "INFO", true, true).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(
        second.handler_kinds(),
        vec![HandlerKind::Console, HandlerKind::MainFile, HandlerKind::ErrorFile]
    );
}

#[test]
fn bogus_level_degrades_to_info() {
    let dir = tempfile::tempdir().unwrap();
    let (registry, _) = registry_in(dir.path());

    let logger = registry.configure("eribot", "BOGUS", false, true).unwrap();

    assert_eq!(logger.threshold(), Severity::Info);
}

#[test]
fn records_are_routed_by_severity() {
    let dir = tempfile::tempdir().unwrap();
    let (registry, console) = registry_in(dir.path());
    let logger = registry.configure("eribot", "info", true, true).unwrap();

    logger.info("bot connected");
    logger.error("lost connection");

    let main = read(registry.settings().main_log_path("eribot"));
    let errors = read(registry.settings().error_log_path("eribot"));
    let console = console.contents();

    assert!(main.contains("INFO - configure.rs:"));
    assert!(main.contains("bot connected"));
    assert!(main.contains("lost connection"));
    assert!(errors.contains("eribot - ERROR - configure.rs:"));
    assert!(errors.contains("lost connection"));
    assert!(!errors.contains("bot connected"));
    assert!(console.contains("bot connected"));
    assert!(console.contains("\x1b[31mERROR\x1b[0m - lost connection"));
}

#[test]
fn file_handlers_use_their_own_thresholds() {
    let dir = tempfile::tempdir().unwrap();
    let (registry, console) = registry_in(dir.path());
    let logger = registry.configure("eribot", "DEBUG", true, true).unwrap();

    logger.debug("handshake bytes");
    logger.critical("out of memory");

    let main = read(registry.settings().main_log_path("eribot"));
    let errors = read(registry.settings().error_log_path("eribot"));
    assert!(main.contains("DEBUG") && main.contains("handshake bytes"));
    assert!(errors.contains("CRITICAL") && !errors.contains("handshake bytes"));
    assert_eq!(console.lines().len(), 2);
}

#[test]
fn main_log_rotates_past_size_cap() {
    let dir = tempfile::tempdir().unwrap();
    let console = SharedBuffer::new();
    let settings = LoggingSettings {
        main_rotation: RotationPolicy {
            max_bytes: 512,
            backup_count: 2,
        },
        ..LoggingSettings::default()
    }
    .with_log_dir(dir.path().join("logs"))
    .with_console(ConsoleTarget::Buffer(console));
    let registry = LoggerRegistry::new(settings);
    let logger = registry.configure("eribot", "DEBUG", true, false).unwrap();

    for i in 0..100 {
        logger.debug(format!("heartbeat {i:03}"));
    }

    let main = registry.settings().main_log_path("eribot");
    assert!(backup_path(&main, 1).exists());
    assert!(backup_path(&main, 2).exists());
    assert!(!backup_path(&main, 3).exists());
    assert!(fs::metadata(&main).unwrap().len() < 512);
    assert!(read(&main).contains("heartbeat 099"));
    assert!(!backup_path(registry.settings().error_log_path("eribot").as_path(), 1).exists());
}

#[test]
fn get_or_create_reads_level_from_settings() {
    let dir = tempfile::tempdir().unwrap();
    let settings = LoggingSettings {
        env_level: Some("warning".to_string()),
        ..LoggingSettings::default()
    }
    .with_log_dir(dir.path().join("logs"))
    .with_console(ConsoleTarget::Buffer(SharedBuffer::new()));
    let registry = LoggerRegistry::new(settings);

    let logger = registry.get_or_create("scheduler").unwrap();
    let again = registry.get_or_create("scheduler").unwrap();

    assert!(Arc::ptr_eq(&logger, &again));
    assert_eq!(logger.threshold(), Severity::Warning);
    assert_eq!(logger.handler_kinds().len(), 3);
    assert!(dir.path().join("logs/scheduler.log").exists());
    assert!(dir.path().join("logs/scheduler-error.log").exists());
}

#[test]
fn default_logger_uses_application_name() {
    let dir = tempfile::tempdir().unwrap();
    let (registry, _) = registry_in(dir.path());

    let logger = registry.default_logger().unwrap();

    assert_eq!(logger.name(), "eribot");
    assert_eq!(logger.threshold(), Severity::Info);
}

#[test]
fn standard_logger_attaches_handlers_once() {
    let dir = tempfile::tempdir().unwrap();
    let (registry, _) = registry_in(dir.path());

    StandardLogger::new(&registry, "eribot", "INFO").unwrap();
    let standard = StandardLogger::new(&registry, "eribot", "INFO").unwrap();
    let logger = standard.logger();

    assert_eq!(
        logger.handler_kinds(),
        vec![HandlerKind::Console, HandlerKind::MainFile, HandlerKind::ErrorFile]
    );

    logger.debug("below threshold");
    logger.warning("disk at 91%");
    let main = read(registry.settings().main_log_path("eribot"));
    assert!(!main.contains("below threshold"));
    assert!(main.contains("WARNING - configure.rs:"));
}

#[test]
fn configure_with_options_struct() {
    let dir = tempfile::tempdir().unwrap();
    let (registry, _) = registry_in(dir.path());

    let options = SetupOptions {
        log_to_console: false,
        ..SetupOptions::default()
    };
    let logger = registry.configure_with("worker", &options).unwrap();

    assert_eq!(
        logger.handler_kinds(),
        vec![HandlerKind::MainFile, HandlerKind::ErrorFile]
    );
    assert_eq!(
        logger.handler_paths(),
        vec![
            dir.path().join("logs/worker.log"),
            dir.path().join("logs/worker-error.log")
        ]
    );
}

#[test]
fn unusable_log_dir_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("logs");
    fs::write(&blocker, "not a directory").unwrap();
    let (registry, _) = registry_in(dir.path());

    let err = registry.configure("eribot", "INFO", true, false).unwrap_err();

    assert!(matches!(err, LoggingError::Io { ref path, .. } if path == &blocker));
}
