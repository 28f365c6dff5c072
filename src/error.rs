//! Error and diagnostic types for the converter
//!
//! The translation core never fails: everything it cannot translate is
//! reported as a [`Diagnostic`] and processing continues. [`ConvertError`]
//! is reserved for the I/O and configuration layer around it.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Watch error: {message}")]
    Watch { message: String },
}

pub type Result<T> = std::result::Result<T, ConvertError>;

impl ConvertError {
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    pub fn watch(message: impl Into<String>) -> Self {
        Self::Watch {
            message: message.into(),
        }
    }
}

/// Advisory findings produced while converting a stylesheet
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Diagnostic {
    #[error("line {line}: unsupported selector '{selector}' ({reason}) skipped")]
    UnsupportedSelector {
        line: usize,
        selector: String,
        reason: &'static str,
    },

    #[error("line {line}: at-rule '@{name}' skipped")]
    UnsupportedAtRule { line: usize, name: String },

    #[error("line {line}: unsupported value '{value}' for '{property}' skipped")]
    UnsupportedValue {
        line: usize,
        property: String,
        value: String,
    },

    #[error("line {line}: malformed shorthand '{property}: {value}' skipped")]
    MalformedShorthand {
        line: usize,
        property: String,
        value: String,
    },

    #[error("line {line}: unresolved variable reference in '{property}: {value}'")]
    UnresolvedVariable {
        line: usize,
        property: String,
        value: String,
    },

    #[error("variable cycle detected through '--{name}'")]
    VariableCycle { name: String },

    #[error("expansion of '--{name}' stopped after too many substitutions")]
    ExpansionLimit { name: String },

    #[error("custom property '--{name}' is not a color ('{value}'), skipped")]
    NotAColor { name: String, value: String },
}

/// Collects diagnostics in emission order and logs each one as it arrives
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
        self.entries.push(diagnostic);
    }

    /// Move every entry of `other` into this sink without logging them twice
    pub fn append(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
