//! Path-item descriptor parser

use crate::error::{ParseError, ParseResult};
use crate::types::*;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};

/// Parser for single-operation path-item documents
pub struct OperationParser;

impl OperationParser {
    /// Parse a descriptor of the shape `{ "<path>": { "<method>": { ...operation } } }`.
    ///
    /// Only the first path and the first method under it are read; any
    /// further keys are ignored.
    pub fn parse(content: &str) -> ParseResult<OperationDescriptor> {
        let paths: IndexMap<String, Value> = serde_json::from_str(content)?;

        let (path, path_item) = paths
            .into_iter()
            .next()
            .ok_or_else(|| ParseError::InvalidFormat("descriptor declares no path".to_string()))?;

        let methods = match path_item {
            Value::Object(methods) => methods,
            other => {
                return Err(ParseError::InvalidFormat(format!(
                    "path item for {} must be an object, found {}",
                    path,
                    json_kind(&other)
                )))
            }
        };

        let (method_key, operation) = methods.into_iter().next().ok_or_else(|| {
            ParseError::InvalidFormat(format!("path {} declares no operation", path))
        })?;

        let Some(method) = HttpMethod::from_key(&method_key) else {
            warn!("Unsupported method '{}' for {}", method_key, path);
            return Err(ParseError::UnknownMethod(method_key));
        };

        let raw: RawOperation = serde_json::from_value(operation)?;

        debug!(
            "Parsed {} {} with {} parameters",
            method,
            path,
            raw.parameters.len()
        );

        Ok(OperationDescriptor::from_raw(method, path, raw))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
