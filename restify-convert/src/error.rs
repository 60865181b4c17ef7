//! Error types for conversion operations

use std::fmt;

/// Errors that can occur while converting a document
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertError {
    /// Document already declares the reStructuredText content type
    ConversionNotRequired(String),
    /// Source document is missing or unreadable
    NotFound(String),
    /// Classification or rendering failed on a specific line
    Failed {
        name: String,
        line: String,
        cause: String,
    },
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::ConversionNotRequired(name) => {
                write!(f, "'{name}' is already reStructuredText")
            }
            ConvertError::NotFound(name) => write!(f, "Document '{name}' not found"),
            ConvertError::Failed { name, line, cause } => {
                write!(f, "Failed to convert '{name}': {cause} (line: {line:?})")
            }
        }
    }
}

impl std::error::Error for ConvertError {}
