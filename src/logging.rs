// src/logging.rs

//! Scoped logging handle with server-style banners.
//!
//! Components receive a [`Logger`] at construction instead of reaching for a
//! process-wide configuration. Every record goes through the `log` facade
//! with the logger's scope as target, so the binary decides where output
//! lands (see `env_logger` in `bin/cli.rs`).

use log::Level;

/// Root target shared by all scopes.
const ROOT: &str = "pagewatch";

/// Width of banner and separator lines.
const RULE_WIDTH: usize = 60;

/// Logging handle bound to a component scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logger {
    target: String,
}

impl Logger {
    /// Create the root logger.
    pub fn new() -> Self {
        Self {
            target: ROOT.to_string(),
        }
    }

    /// Derive a child logger for a component (e.g. `pagewatch::store`).
    pub fn scoped(&self, component: &str) -> Self {
        Self {
            target: format!("{}::{}", self.target, component),
        }
    }

    /// The `log` target records are emitted under.
    pub fn target(&self) -> &str {
        &self.target
    }

    fn emit(&self, level: Level, message: &str) {
        log::log!(target: self.target.as_str(), level, "{}", message);
    }

    /// Log a debug message
    pub fn debug(&self, message: &str) {
        self.emit(Level::Debug, message);
    }

    /// Log an info message
    pub fn info(&self, message: &str) {
        self.emit(Level::Info, message);
    }

    /// Log a warning message
    pub fn warn(&self, message: &str) {
        self.emit(Level::Warn, message);
    }

    /// Log an error message
    pub fn error(&self, message: &str) {
        self.emit(Level::Error, message);
    }

    /// Log a separator line
    pub fn separator(&self) {
        self.info(&"─".repeat(RULE_WIDTH));
    }

    /// Log a header
    pub fn header(&self, title: &str) {
        let border = "═".repeat(RULE_WIDTH);
        self.info(&border);
        self.info(&format!("  {}", title));
        self.info(&border);
    }

    /// Log a sub-item (indented)
    pub fn sub_item(&self, message: &str) {
        self.info(&format!("    {}", message));
    }

    /// Log a summary section
    pub fn summary(&self, title: &str, items: &[(&str, String)]) {
        self.info(&format!("[SUMMARY] {}", title));
        for (key, value) in items {
            self.sub_item(&format!("{}: {}", key, value));
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}
