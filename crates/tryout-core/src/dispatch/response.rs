//! Displayable response snapshots

use serde::Serialize;
use serde_json::Value;

/// The last received response, kept for display until the next send
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseSnapshot {
    /// HTTP status code
    pub status: u16,
    /// Pretty-printed JSON, or the raw body when it is not JSON
    pub text: String,
}

impl ResponseSnapshot {
    pub fn from_body(status: u16, body: &str) -> Self {
        let text = match serde_json::from_str::<Value>(body) {
            Ok(json) => serde_json::to_string_pretty(&json).unwrap_or_else(|_| body.to_string()),
            Err(_) => body.to_string(),
        };

        Self { status, text }
    }
}
