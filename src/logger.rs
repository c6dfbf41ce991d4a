//! Session event logger
//!
//! Captures what the interaction layer did (input handled, cards picked,
//! animations staged) with a verbosity filter. Entries can go to stdout,
//! to an in-memory buffer for inspection, or both.

use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};

/// How much gets logged
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum VerbosityLevel {
    Silent,
    Minimal,
    #[default]
    Normal,
    Verbose,
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    #[default]
    Stdout,
    Memory,
    Both,
}

/// A captured log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
    /// Category, e.g. "input", "selection", "animation"
    pub category: Option<String>,
}

pub struct EventLogger {
    verbosity: VerbosityLevel,
    output_mode: OutputMode,
    buffer: RefCell<Vec<LogEntry>>,
}

impl EventLogger {
    pub fn new() -> Self {
        Self::with_verbosity(VerbosityLevel::default())
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        EventLogger {
            verbosity,
            output_mode: OutputMode::default(),
            buffer: RefCell::new(Vec::new()),
        }
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn log(&self, level: VerbosityLevel, category: Option<&str>, message: impl Into<String>) {
        if level > self.verbosity || self.verbosity == VerbosityLevel::Silent {
            return;
        }
        let message = message.into();
        if matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both) {
            match category {
                Some(category) => println!("[{category}] {message}"),
                None => println!("{message}"),
            }
        }
        if matches!(self.output_mode, OutputMode::Memory | OutputMode::Both) {
            self.buffer.borrow_mut().push(LogEntry {
                level,
                message,
                category: category.map(str::to_string),
            });
        }
    }

    pub fn minimal(&self, message: impl Into<String>) {
        self.log(VerbosityLevel::Minimal, None, message);
    }

    pub fn input(&self, message: impl Into<String>) {
        self.log(VerbosityLevel::Normal, Some("input"), message);
    }

    pub fn selection(&self, message: impl Into<String>) {
        self.log(VerbosityLevel::Normal, Some("selection"), message);
    }

    pub fn animation(&self, message: impl Into<String>) {
        self.log(VerbosityLevel::Verbose, Some("animation"), message);
    }

    /// Read-only view of the captured entries (Memory/Both modes)
    pub fn entries(&self) -> Ref<'_, Vec<LogEntry>> {
        self.buffer.borrow()
    }
}

impl Default for EventLogger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_logger(verbosity: VerbosityLevel) -> EventLogger {
        let mut logger = EventLogger::with_verbosity(verbosity);
        logger.set_output_mode(OutputMode::Memory);
        logger
    }

    #[test]
    fn test_verbosity_filters_entries() {
        let logger = memory_logger(VerbosityLevel::Normal);
        logger.input("confirm");
        logger.animation("open card 0"); // verbose: filtered out
        assert_eq!(logger.entries().len(), 1);
        assert_eq!(logger.entries()[0].category.as_deref(), Some("input"));
    }

    #[test]
    fn test_silent_drops_everything() {
        let logger = memory_logger(VerbosityLevel::Silent);
        logger.minimal("hello");
        assert!(logger.entries().is_empty());
    }

    #[test]
    fn test_verbose_keeps_everything() {
        let logger = memory_logger(VerbosityLevel::Verbose);
        logger.minimal("a");
        logger.selection("b");
        logger.animation("c");
        assert_eq!(logger.entries().len(), 3);
    }
}
