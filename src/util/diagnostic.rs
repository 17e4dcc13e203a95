//! Error reports for the terminal.
//!
//! A failed conversion is reported as the root cause, where it was found,
//! and numbered suggestions:
//!
//! ```text
//! error: could not resolve `DMC-BIKE-...-520A-A` referenced by `SCO-1`
//!   → no file in the resource package maps to `DMC-BIKE-...-520A-A`
//!
//! help: consider:
//!   1. Add the missing data module to the resource package
//! ```

use std::fmt::{self, Write};
use std::path::PathBuf;

/// Suggestions shared by several errors.
pub mod suggestions {
    /// Suggestion when a referenced module is not in the package.
    pub const LIST_IDENTIFIERS: &str = "Run `scopack map <package>` to list the identifiers found";

    /// Suggestion when resolution fails for unclear reasons.
    pub const VERBOSE: &str = "Re-run with `--verbose` for the files being parsed";
}

/// An error report with optional location, context and suggestions.
#[derive(Debug, Clone, Default)]
pub struct Diagnostic {
    pub message: String,
    pub location: Option<PathBuf>,
    pub context: Vec<String>,
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            ..Diagnostic::default()
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Point at the file the error was found in.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Render for the terminal, with ANSI colors if `color` is set.
    pub fn format(&self, color: bool) -> String {
        let paint = |ansi: &str, text: &str| {
            if color {
                format!("\x1b[{}m{}\x1b[0m", ansi, text)
            } else {
                text.to_string()
            }
        };

        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{}: {}", paint("1;31", "error"), self.message);
        if let Some(path) = &self.location {
            let _ = writeln!(out, "  --> {}", path.display());
        }
        for line in &self.context {
            let _ = writeln!(out, "  → {}", line);
        }

        if !self.suggestions.is_empty() {
            let _ = writeln!(out, "\n{}: consider:", paint("1;32", "help"));
            for (n, suggestion) in self.suggestions.iter().enumerate() {
                let _ = writeln!(out, "  {}. {}", n + 1, suggestion);
            }
        }

        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
