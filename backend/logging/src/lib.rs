//! Logging setup for EriBot.
//!
//! Wires a named logger to a colored console sink, a size-rotated main log
//! file and a size-rotated error-only file, and writes a one-shot host
//! diagnostics block. `tracing` events can be routed into the same sinks.

pub mod bridge;
pub mod error;
pub mod format;
pub mod handler;
pub mod level;
pub mod logger;
pub mod record;
pub mod registry;
pub mod rotate;
pub mod settings;
pub mod system_info;

pub use bridge::{init_tracing, LoggerLayer};
pub use error::{LoggingError, Result};
pub use format::{color_for_label, Formatter, Layout};
pub use handler::{ConsoleTarget, Handler, HandlerKind, SharedBuffer};
pub use level::Severity;
pub use logger::{Logger, LoggerHandle};
pub use record::LogRecord;
pub use registry::{LoggerRegistry, SetupOptions, StandardLogger};
pub use rotate::{RotatingFileWriter, RotationPolicy};
pub use settings::LoggingSettings;
pub use system_info::{report_system_info, report_with_probes, Probe, ProbeError};
