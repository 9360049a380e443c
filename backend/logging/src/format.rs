//! Line rendering for log records.
//!
//! Three layouts share the `" - "` separator. The colored variant wraps only the
//! severity label in an ANSI sequence and resets right after it.

use std::borrow::Cow;

use crate::level::Severity;
use crate::record::LogRecord;

/// ANSI reset sequence, also used for labels missing from the color table.
pub const RESET: &str = "\x1b[0m";

const COLORS: [(&str, &str); 5] = [
    ("DEBUG", "\x1b[36m"),    // cyan
    ("INFO", "\x1b[32m"),     // green
    ("WARNING", "\x1b[33m"),  // yellow
    ("ERROR", "\x1b[31m"),    // red
    ("CRITICAL", "\x1b[35m"), // magenta
];

/// Look up the color for a severity label.
pub fn color_for_label(label: &str) -> &'static str {
    COLORS
        .iter()
        .find(|(name, _)| *name == label)
        .map_or(RESET, |(_, code)| *code)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `time - LEVEL - message`, time only.
    Compact,
    /// `date time - name - LEVEL - message`.
    Standard,
    /// `date time - name - LEVEL - file:line - message`.
    Detailed,
}

impl Layout {
    fn time_format(self) -> &'static str {
        match self {
            Layout::Compact => "%H:%M:%S",
            Layout::Standard | Layout::Detailed => "%Y-%m-%d %H:%M:%S",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Formatter {
    layout: Layout,
    colored: bool,
}

impl Formatter {
    pub const fn plain(layout: Layout) -> Self {
        Self {
            layout,
            colored: false,
        }
    }

    pub const fn colored(layout: Layout) -> Self {
        Self {
            layout,
            colored: true,
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn is_colored(&self) -> bool {
        self.colored
    }

    /// Render a record as one line, without a trailing newline.
    pub fn format(&self, record: &LogRecord) -> String {
        let time = record.timestamp.format(self.layout.time_format());
        let level = self.level_label(record.level);
        match self.layout {
            Layout::Compact => format!("{time} - {level} - {}", record.message),
            Layout::Standard => format!(
                "{time} - {} - {level} - {}",
                record.logger, record.message
            ),
            Layout::Detailed => format!(
                "{time} - {} - {level} - {}:{} - {}",
                record.logger, record.file, record.line, record.message
            ),
        }
    }

    fn level_label(&self, level: Severity) -> Cow<'static, str> {
        let label = level.label();
        if self.colored {
            Cow::Owned(format!("{}{label}{RESET}", color_for_label(label)))
        } else {
            Cow::Borrowed(label)
        }
    }
}
