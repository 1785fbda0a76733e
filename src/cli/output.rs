//! Terminal output formatting
//!
//! Every user-visible notice goes through the formatter so `--json` and
//! `--no-color` behave consistently across commands.

use colored::Colorize;
use serde::Serialize;

/// Formats command output for the terminal or as JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputFormatter {
    json: bool,
    no_color: bool,
}

impl OutputFormatter {
    /// Create a formatter from the global CLI flags
    #[must_use]
    pub const fn new(json: bool, no_color: bool) -> Self {
        Self { json, no_color }
    }

    /// Whether JSON output was requested
    #[must_use]
    pub const fn is_json(&self) -> bool {
        self.json
    }

    /// Print a success notice
    pub fn success(&self, message: &str) {
        if self.no_color {
            println!("{message}");
        } else {
            println!("{}", message.green());
        }
    }

    /// Print an informational notice
    pub fn info(&self, message: &str) {
        println!("{message}");
    }

    /// Print a warning notice
    pub fn warning(&self, message: &str) {
        if self.no_color {
            eprintln!("{message}");
        } else {
            eprintln!("{}", message.yellow());
        }
    }

    /// Print an error notice
    pub fn error(&self, message: &str) {
        if self.no_color {
            eprintln!("Error: {message}");
        } else {
            eprintln!("{} {message}", "Error:".red().bold());
        }
    }

    /// Print a value as pretty JSON
    pub fn print_json<T: Serialize>(&self, value: &T) -> crate::error::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}
