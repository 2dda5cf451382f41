//! Field extraction from operation descriptors

use std::collections::HashSet;

use openapi_parser::{OperationDescriptor, ParseError};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::FormResult;
use crate::field::{FieldDescriptor, FieldLocation};

/// Derives the ordered form fields for an operation
pub struct FieldExtractor;

impl FieldExtractor {
    /// Extract parameter fields followed by body fields.
    ///
    /// Pure: the same descriptor always yields the same fields in the same
    /// order. Field names are unique; a later field whose name is already
    /// taken is dropped.
    pub fn extract(operation: &OperationDescriptor) -> FormResult<Vec<FieldDescriptor>> {
        let mut fields = Self::parameter_fields(operation);
        fields.extend(Self::body_fields(operation)?);

        let mut seen = HashSet::new();
        fields.retain(|field| {
            let first = seen.insert(field.name.clone());
            if !first {
                warn!(
                    "Dropping duplicate {:?} field '{}'",
                    field.location, field.name
                );
            }
            first
        });

        debug!(
            "Extracted {} fields for {} {}",
            fields.len(),
            operation.method,
            operation.path
        );

        Ok(fields)
    }

    /// The media type body fields are read from (first declared)
    pub fn body_media_type(operation: &OperationDescriptor) -> Option<&str> {
        operation
            .request_body
            .as_ref()
            .and_then(|body| body.content.keys().next())
            .map(String::as_str)
    }

    fn parameter_fields(operation: &OperationDescriptor) -> Vec<FieldDescriptor> {
        operation
            .parameters
            .iter()
            .map(|param| {
                FieldDescriptor::new(
                    param.name.clone(),
                    param.location.into(),
                    param.required,
                    param.description.clone(),
                )
            })
            .collect()
    }

    fn body_fields(operation: &OperationDescriptor) -> FormResult<Vec<FieldDescriptor>> {
        let Some(body) = &operation.request_body else {
            return Ok(Vec::new());
        };

        // Multiple media types are not supported, only the first is read
        let (media_type, media) = body
            .content
            .first()
            .ok_or_else(|| ParseError::MissingField("requestBody.content".to_string()))?;

        let schema = media.schema.as_object().ok_or_else(|| {
            ParseError::InvalidFormat(format!("schema for {} must be an object", media_type))
        })?;

        let schema_type = schema.get("type").and_then(Value::as_str);
        if schema_type != Some("object") {
            debug!(
                "Skipping {} body with schema type {:?}",
                media_type, schema_type
            );
            return Ok(Vec::new());
        }

        let required: Vec<&str> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let properties = match schema.get("properties") {
            None => return Ok(Vec::new()),
            Some(Value::Object(properties)) => properties,
            Some(_) => {
                return Err(ParseError::InvalidFormat(format!(
                    "properties for {} must be an object",
                    media_type
                ))
                .into())
            }
        };

        Ok(properties
            .iter()
            .map(|(name, property)| {
                FieldDescriptor::new(
                    name.clone(),
                    FieldLocation::Body,
                    required.contains(&name.as_str()),
                    property
                        .get("description")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                )
            })
            .collect())
    }
}
