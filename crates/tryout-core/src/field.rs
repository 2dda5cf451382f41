//! Form field descriptors and their validators

use openapi_parser::ParameterLocation;
use serde::{Deserialize, Serialize};

/// Data type reported for every field; inputs are free text.
pub const STRING_TYPE: &str = "string";

/// Where a field's value is transmitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldLocation {
    Query,
    Header,
    Path,
    Cookie,
    Body,
}

impl From<ParameterLocation> for FieldLocation {
    fn from(location: ParameterLocation) -> Self {
        match location {
            ParameterLocation::Query => FieldLocation::Query,
            ParameterLocation::Header => FieldLocation::Header,
            ParameterLocation::Path => FieldLocation::Path,
            ParameterLocation::Cookie => FieldLocation::Cookie,
        }
    }
}

/// Validation rule attached to a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validator {
    /// Fails when the trimmed value is empty
    Required,
}

impl Validator {
    /// Check `value`, returning the error message on failure
    pub fn check(&self, name: &str, value: &str) -> Option<String> {
        match self {
            Validator::Required if value.trim().is_empty() => {
                Some(format!("{} is required", name))
            }
            Validator::Required => None,
        }
    }
}

/// One renderable input derived from an operation descriptor
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Field name, unique within a form
    pub name: String,
    /// Helper text shown under the input
    pub description: Option<String>,
    /// Declared data type
    pub data_type: String,
    /// Where the value goes in the request
    pub location: FieldLocation,
    /// Current input value
    pub value: String,
    /// Result of the last validation pass
    pub valid: bool,
    /// Message from the last failed validation
    pub error: Option<String>,
    required: bool,
    #[serde(skip)]
    validator: Option<Validator>,
}

impl FieldDescriptor {
    /// Create an empty, valid field. Required fields always get the
    /// `Required` validator; optional fields never validate.
    pub fn new(
        name: impl Into<String>,
        location: FieldLocation,
        required: bool,
        description: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description,
            data_type: STRING_TYPE.to_string(),
            location,
            value: String::new(),
            valid: true,
            error: None,
            required,
            validator: required.then_some(Validator::Required),
        }
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn validator(&self) -> Option<Validator> {
        self.validator
    }

    /// Run the field's validator against its current value
    pub fn validate(&self) -> Option<String> {
        self.validator
            .and_then(|validator| validator.check(&self.name, &self.value))
    }

    /// Whether the value is empty or whitespace-only
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}
