//! `tracing` integration.
//!
//! Routes `tracing` events from the rest of the application into a configured
//! [`Logger`](crate::Logger), so `info!` and friends reach the same console and files.

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::level::Severity;
use crate::logger::LoggerHandle;
use crate::record::LogRecord;

/// Events from this crate are never forwarded, so a handler failure that is
/// itself logged cannot loop back into the handlers.
const OWN_TARGET: &str = env!("CARGO_CRATE_NAME");

pub struct LoggerLayer {
    logger: LoggerHandle,
}

impl LoggerLayer {
    pub fn new(logger: LoggerHandle) -> Self {
        Self { logger }
    }
}

impl<S: Subscriber> Layer<S> for LoggerLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if metadata.target().starts_with(OWN_TARGET) {
            return;
        }
        let level = Severity::from(*metadata.level());
        if !self.logger.is_enabled(level) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let record = LogRecord::at(
            self.logger.name(),
            level,
            visitor.finish(),
            metadata.file().unwrap_or("<unknown>"),
            metadata.line().unwrap_or(0),
        );
        self.logger.log_record(&record);
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.message.is_empty() {
            self.fields.trim_start().to_string()
        } else {
            self.message + &self.fields
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

/// Install a global subscriber that forwards events to `logger`.
///
/// `RUST_LOG` wins over `directive` when set. Returns `false` if a global
/// subscriber was already installed.
pub fn init_tracing(logger: LoggerHandle, directive: &str) -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(LoggerLayer::new(logger))
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::format::{Formatter, Layout};
    use crate::handler::{ConsoleTarget, Handler, SharedBuffer};
    use crate::logger::Logger;

    fn capture(threshold: Severity) -> (LoggerHandle, SharedBuffer) {
        let buffer = SharedBuffer::new();
        let logger = Arc::new(Logger::new("eribot"));
        logger.set_threshold(threshold);
        logger.replace_handlers(vec![Handler::console(
            ConsoleTarget::Buffer(buffer.clone()),
            Severity::Debug,
            Formatter::plain(Layout::Detailed),
        )]);
        (logger, buffer)
    }

    #[test]
    fn test_events_reach_logger_with_fields() {
        let (logger, buffer) = capture(Severity::Debug);
        let subscriber = tracing_subscriber::registry().with(LoggerLayer::new(logger));

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(target: "eribot::quota", user = 42, "quota {} reached", "daily");
        });

        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("eribot - WARNING - bridge.rs:"), "{}", lines[0]);
        assert!(lines[0].ends_with("quota daily reached user=42"), "{}", lines[0]);
    }

    #[test]
    fn test_logger_threshold_applies_to_events() {
        let (logger, buffer) = capture(Severity::Info);
        let subscriber = tracing_subscriber::registry().with(LoggerLayer::new(logger));

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!(target: "eribot", "too chatty");
            tracing::trace!(target: "eribot", "even more");
            tracing::error!(target: "eribot", "boom");
        });

        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("ERROR - bridge.rs:"));
    }

    #[test]
    fn test_own_events_are_skipped() {
        let (logger, buffer) = capture(Severity::Debug);
        let subscriber = tracing_subscriber::registry().with(LoggerLayer::new(logger));

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(target: "eribot_logging::rotate", "internal");
        });

        assert!(buffer.contents().is_empty());
    }
}
