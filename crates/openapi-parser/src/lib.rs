//! # openapi-parser
//!
//! Operation descriptor parser for tryout.
//! Reads one OpenAPI path-item (a single path keyed by a single method) and
//! turns it into the typed descriptor the form engine derives its fields from.

mod types;
mod parser;
mod error;

pub use types::*;
pub use parser::OperationParser;
pub use error::{ParseError, ParseResult};
