//! Error types for tryout-core

use openapi_parser::ParseError;
use thiserror::Error;

/// Result type alias for form operations
pub type FormResult<T> = std::result::Result<T, FormError>;

/// Form error types
#[derive(Error, Debug)]
pub enum FormError {
    #[error("{0}")]
    Descriptor(#[from] ParseError),

    #[error("Form has invalid fields: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Field index {index} is out of range (form has {len} fields)")]
    FieldIndex { index: usize, len: usize },

    #[error("No server selected")]
    NoServer,

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
