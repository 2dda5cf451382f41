//! Error types for the descriptor parser

use thiserror::Error;

/// Result type alias for parser operations
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Parser error types
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid operation descriptor: {0}")]
    InvalidFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Shown as-is to users; the offending key is kept for logs
    #[error("unknown HTTP method")]
    UnknownMethod(String),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}
