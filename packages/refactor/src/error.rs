//! Error types for template refactorings

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractError>;

#[derive(Debug, Error)]
pub enum ExtractError {
    /// The selection touches no markup node, or its end precedes its start
    #[error("Cannot perform refactoring. Invalid Position")]
    InvalidPosition,

    #[error("Nothing selected")]
    EmptySelection,

    #[error("Invalid component name '{name}': {reason}")]
    InvalidComponentName { name: String, reason: String },

    #[error("Two-way binding '{binding}' exposes no input field")]
    TwoWayBindingWithoutField { binding: String },

    #[error("Cannot modify read-only file {}", path.display())]
    ReadOnly { path: PathBuf },

    #[error("Refusing to overwrite existing file {}", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
