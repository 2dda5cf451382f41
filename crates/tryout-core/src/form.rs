//! Form state store
//!
//! Holds the live field values of one mounted form together with the
//! selected server and the last response. Every change goes through one of
//! the transitions below; sends work on an immutable [`SendTicket`] so edits
//! made while a request is in flight never leak into it.

use openapi_parser::{HttpMethod, OperationDescriptor, OperationParser};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::dispatch::ResponseSnapshot;
use crate::error::{FormError, FormResult};
use crate::extractor::FieldExtractor;
use crate::field::FieldDescriptor;

/// Form lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormPhase {
    /// Waiting for user input
    Idle,
    /// Validation gate is running
    Validating,
    /// Last send was blocked by invalid fields
    Invalid,
    /// A request is in flight
    Sending,
}

/// Everything a single send needs, captured when validation passed
#[derive(Debug, Clone)]
pub struct SendTicket {
    /// Monotonic send number within the form
    pub sequence: u64,
    pub method: HttpMethod,
    /// Path template from the descriptor
    pub path: String,
    /// Media type body fields were extracted from
    pub media_type: Option<String>,
    /// Server selected at send time
    pub server: String,
    /// Field values at send time
    pub fields: Vec<FieldDescriptor>,
}

/// State container for one rendered form
#[derive(Debug)]
pub struct FormStore {
    operation: OperationDescriptor,
    fields: Vec<FieldDescriptor>,
    selected_server: Option<String>,
    phase: FormPhase,
    response: Option<ResponseSnapshot>,
    last_error: Option<String>,
    sequence: u64,
}

impl FormStore {
    /// Seed a store from a parsed descriptor
    pub fn new(operation: OperationDescriptor) -> FormResult<Self> {
        let fields = FieldExtractor::extract(&operation)?;
        let selected_server = operation.servers.first().map(|s| s.url.clone());

        Ok(Self {
            operation,
            fields,
            selected_server,
            phase: FormPhase::Idle,
            response: None,
            last_error: None,
            sequence: 0,
        })
    }

    /// Parse a path-item JSON document and seed a store from it
    pub fn from_json(content: &str) -> FormResult<Self> {
        let operation = OperationParser::parse(content)?;
        Self::new(operation)
    }

    /// Replace the value of one field. Does not validate.
    pub fn set_field_value(
        &mut self,
        index: usize,
        value: impl Into<String>,
    ) -> FormResult<&[FieldDescriptor]> {
        let len = self.fields.len();
        let field = self
            .fields
            .get_mut(index)
            .ok_or(FormError::FieldIndex { index, len })?;
        field.value = value.into();

        if self.phase == FormPhase::Invalid {
            self.phase = FormPhase::Idle;
        }

        Ok(&self.fields)
    }

    /// Re-run every validator. Returns `true` when any field is invalid.
    ///
    /// Fields without a validator are left untouched.
    pub fn validate_all(&mut self) -> bool {
        let mut invalid = false;
        for field in &mut self.fields {
            if field.validator().is_none() {
                continue;
            }
            let message = field.validate();
            field.valid = message.is_none();
            invalid |= message.is_some();
            field.error = message;
        }
        invalid
    }

    /// Mark every field valid again
    pub fn clear_invalid(&mut self) {
        for field in &mut self.fields {
            field.valid = true;
            field.error = None;
        }
    }

    pub fn set_server(&mut self, url: impl Into<String>) {
        let url = url.into();
        debug!("Selected server {}", url);
        self.selected_server = Some(url);
    }

    pub fn set_response(&mut self, snapshot: ResponseSnapshot) {
        self.response = Some(snapshot);
    }

    /// Run the validation gate and capture a send snapshot.
    ///
    /// On invalid fields the phase becomes `Invalid` and no ticket is issued.
    pub fn begin_send(&mut self) -> FormResult<SendTicket> {
        self.phase = FormPhase::Validating;

        if self.validate_all() {
            self.phase = FormPhase::Invalid;
            let messages: Vec<String> = self
                .fields
                .iter()
                .filter_map(|field| field.error.clone())
                .collect();
            debug!("Send blocked: {}", messages.join(", "));
            return Err(FormError::Validation(messages));
        }
        self.clear_invalid();

        let Some(server) = self.selected_server.clone() else {
            self.phase = FormPhase::Idle;
            return Err(FormError::NoServer);
        };

        self.sequence += 1;
        self.phase = FormPhase::Sending;

        info!(
            "Send #{}: {} {}{}",
            self.sequence, self.operation.method, server, self.operation.path
        );

        Ok(SendTicket {
            sequence: self.sequence,
            method: self.operation.method,
            path: self.operation.path.clone(),
            media_type: FieldExtractor::body_media_type(&self.operation).map(str::to_string),
            server,
            fields: self.fields.clone(),
        })
    }

    /// Record the outcome of a send.
    ///
    /// Returns `false` when the ticket was superseded by a newer send, in
    /// which case nothing changes. Failures clear the response snapshot.
    pub fn complete_send(
        &mut self,
        ticket: &SendTicket,
        result: FormResult<ResponseSnapshot>,
    ) -> bool {
        if ticket.sequence != self.sequence {
            warn!(
                "Discarding result of send #{}, send #{} is newer",
                ticket.sequence, self.sequence
            );
            return false;
        }

        // A send blocked while this one was in flight keeps the form Invalid
        if self.phase == FormPhase::Sending {
            self.phase = FormPhase::Idle;
        }
        match result {
            Ok(snapshot) => {
                debug!("Send #{} returned status {}", ticket.sequence, snapshot.status);
                self.set_response(snapshot);
                self.last_error = None;
            }
            Err(e) => {
                error!("Send #{} failed: {}", ticket.sequence, e);
                self.response = None;
                self.last_error = Some(e.to_string());
            }
        }
        true
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&FieldDescriptor> {
        self.fields.get(index)
    }

    pub fn operation(&self) -> &OperationDescriptor {
        &self.operation
    }

    pub fn method(&self) -> HttpMethod {
        self.operation.method
    }

    pub fn path(&self) -> &str {
        &self.operation.path
    }

    pub fn description(&self) -> Option<&str> {
        self.operation.description.as_deref()
    }

    /// Server URLs offered for selection
    pub fn servers(&self) -> Vec<String> {
        self.operation.server_urls()
    }

    pub fn selected_server(&self) -> Option<&str> {
        self.selected_server.as_deref()
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn response(&self) -> Option<&ResponseSnapshot> {
        self.response.as_ref()
    }

    /// Message of the last failed send, cleared by the next success
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

/// Result of mounting a form from descriptor JSON
#[derive(Debug)]
pub enum FormMount {
    Ready(FormStore),
    /// The descriptor could not be turned into a form; only the message is shown
    Failed { message: String },
}

impl FormMount {
    pub fn store(&self) -> Option<&FormStore> {
        match self {
            FormMount::Ready(store) => Some(store),
            FormMount::Failed { .. } => None,
        }
    }

    pub fn store_mut(&mut self) -> Option<&mut FormStore> {
        match self {
            FormMount::Ready(store) => Some(store),
            FormMount::Failed { .. } => None,
        }
    }
}

/// Mount a form, converting any descriptor error into a `Failed` form
pub fn mount(content: &str) -> FormMount {
    match FormStore::from_json(content) {
        Ok(store) => {
            info!(
                "Mounted {} {} with {} fields",
                store.method(),
                store.path(),
                store.fields().len()
            );
            FormMount::Ready(store)
        }
        Err(e) => {
            error!("Failed to mount form: {}", e);
            FormMount::Failed {
                message: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldLocation;

    const SCENARIO_A: &str = r#"{
        "/x": {
            "get": {
                "parameters": [{"name": "q", "in": "query", "required": true}],
                "servers": [{"url": "https://api.example.com"}]
            }
        }
    }"#;

    const PETS: &str = r#"{
        "/pets/{petId}": {
            "patch": {
                "description": "Update a pet",
                "parameters": [
                    {"name": "petId", "in": "path", "required": true},
                    {"name": "X-Trace", "in": "header"}
                ],
                "requestBody": {"content": {"application/json": {"schema": {
                    "type": "object",
                    "properties": {"name": {}, "tag": {}},
                    "required": ["name"]
                }}}},
                "servers": [
                    {"url": "https://petstore.example.com"},
                    {"url": "https://staging.example.com"}
                ]
            }
        }
    }"#;

    fn store(json: &str) -> FormStore {
        FormStore::from_json(json).unwrap()
    }

    #[test]
    fn test_seeded_state() {
        let store = store(PETS);

        assert_eq!(store.fields().len(), 4);
        assert_eq!(store.method(), HttpMethod::Patch);
        assert_eq!(store.path(), "/pets/{petId}");
        assert_eq!(store.description(), Some("Update a pet"));
        assert_eq!(store.selected_server(), Some("https://petstore.example.com"));
        assert_eq!(store.servers().len(), 2);
        assert_eq!(store.phase(), FormPhase::Idle);
        assert!(store.response().is_none());
        assert!(store.fields().iter().all(|f| f.valid && f.value.is_empty()));
    }

    #[test]
    fn test_set_field_value_round_trip() {
        let mut store = store(PETS);
        let before = store.fields().to_vec();

        let fields = store.set_field_value(2, "Rex").unwrap();
        assert_eq!(fields[2].value, "Rex");

        for (index, field) in store.fields().iter().enumerate() {
            if index != 2 {
                assert_eq!(field.value, before[index].value);
            }
        }
    }

    #[test]
    fn test_set_field_value_out_of_range() {
        let mut store = store(SCENARIO_A);
        assert!(matches!(
            store.set_field_value(3, "x"),
            Err(FormError::FieldIndex { index: 3, len: 1 })
        ));
    }

    #[test]
    fn test_validate_all_marks_only_failing_required_fields() {
        let mut store = store(PETS);
        store.set_field_value(0, "7").unwrap();

        assert!(store.validate_all());
        let fields = store.fields();
        assert!(fields[0].valid);
        assert!(fields[1].valid);
        assert!(!fields[2].valid);
        assert_eq!(fields[2].error.as_deref(), Some("name is required"));
        assert!(fields[3].valid);

        store.set_field_value(2, "Rex").unwrap();
        assert!(!store.validate_all());
        assert!(store.fields().iter().all(|f| f.valid));
    }

    #[test]
    fn test_validate_all_rejects_whitespace() {
        let mut store = store(SCENARIO_A);
        store.set_field_value(0, "  ").unwrap();
        assert!(store.validate_all());
        store.set_field_value(0, "5").unwrap();
        assert!(!store.validate_all());
    }

    #[test]
    fn test_clear_invalid_is_idempotent() {
        let mut store = store(PETS);
        store.validate_all();

        store.clear_invalid();
        let once = store.fields().to_vec();
        store.clear_invalid();

        assert_eq!(store.fields(), once.as_slice());
        assert!(store.fields().iter().all(|f| f.valid && f.error.is_none()));
    }

    #[test]
    fn test_begin_send_blocks_empty_required() {
        let mut store = store(SCENARIO_A);

        let err = store.begin_send().unwrap_err();
        assert!(matches!(err, FormError::Validation(ref m) if m == &vec!["q is required".to_string()]));
        assert_eq!(store.phase(), FormPhase::Invalid);
        assert!(!store.fields()[0].valid);

        store.set_field_value(0, "5").unwrap();
        assert_eq!(store.phase(), FormPhase::Idle);
    }

    #[test]
    fn test_begin_send_snapshots_fields() {
        let mut store = store(SCENARIO_A);
        store.set_field_value(0, "5").unwrap();

        let ticket = store.begin_send().unwrap();
        assert_eq!(store.phase(), FormPhase::Sending);
        assert_eq!(ticket.server, "https://api.example.com");
        assert_eq!(ticket.path, "/x");
        assert_eq!(ticket.method, HttpMethod::Get);
        assert_eq!(ticket.media_type, None);

        store.set_field_value(0, "6").unwrap();
        assert_eq!(ticket.fields[0].value, "5");
        assert_eq!(ticket.fields[0].location, FieldLocation::Query);
    }

    #[test]
    fn test_begin_send_without_server() {
        let mut store = store(r#"{"/x": {"get": {}}}"#);
        assert!(matches!(store.begin_send(), Err(FormError::NoServer)));
        assert_eq!(store.phase(), FormPhase::Idle);

        store.set_server("http://localhost:8080");
        assert!(store.begin_send().is_ok());
    }

    #[test]
    fn test_complete_send_success_then_failure() {
        let mut store = store(SCENARIO_A);
        store.set_field_value(0, "5").unwrap();

        let ticket = store.begin_send().unwrap();
        assert!(store.complete_send(&ticket, Ok(ResponseSnapshot::from_body(200, "{}"))));
        assert_eq!(store.phase(), FormPhase::Idle);
        assert_eq!(store.response().map(|r| r.text.as_str()), Some("{}"));

        let ticket = store.begin_send().unwrap();
        assert!(store.complete_send(&ticket, Err(FormError::Http("connection refused".into()))));
        assert_eq!(store.phase(), FormPhase::Idle);
        assert!(store.response().is_none());
        assert_eq!(store.last_error(), Some("HTTP error: connection refused"));
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        let mut store = store(SCENARIO_A);
        store.set_field_value(0, "1").unwrap();
        let first = store.begin_send().unwrap();
        store.set_field_value(0, "2").unwrap();
        let second = store.begin_send().unwrap();

        assert!(store.complete_send(&second, Ok(ResponseSnapshot::from_body(200, "\"second\""))));
        assert!(!store.complete_send(&first, Ok(ResponseSnapshot::from_body(200, "\"first\""))));
        assert_eq!(store.response().map(|r| r.text.as_str()), Some("\"second\""));
    }

    #[test]
    fn test_completion_keeps_invalid_phase_of_blocked_send() {
        let mut store = store(SCENARIO_A);
        store.set_field_value(0, "5").unwrap();
        let ticket = store.begin_send().unwrap();
        store.set_field_value(0, "").unwrap();
        assert!(store.begin_send().is_err());
        assert_eq!(store.phase(), FormPhase::Invalid);

        assert!(store.complete_send(&ticket, Ok(ResponseSnapshot::from_body(200, "{}"))));

        assert_eq!(store.phase(), FormPhase::Invalid);
        assert!(!store.field(0).unwrap().valid);
        assert_eq!(store.response().map(|r| r.status), Some(200));

        store.set_field_value(0, "6").unwrap();
        assert_eq!(store.phase(), FormPhase::Idle);
    }

    #[test]
    fn test_set_server_replaces_selection() {
        let mut store = store(PETS);
        store.set_server("https://staging.example.com");
        assert_eq!(store.selected_server(), Some("https://staging.example.com"));
    }

    #[test]
    fn test_mount_scenarios() {
        assert!(matches!(mount(SCENARIO_A), FormMount::Ready(_)));

        match mount("{not json") {
            FormMount::Failed { message } => assert!(message.contains("JSON parse error")),
            FormMount::Ready(_) => panic!("malformed JSON must not mount"),
        }

        match mount(r#"{"/x": {"trace": {}}}"#) {
            FormMount::Failed { message } => assert!(message.starts_with("unknown HTTP method")),
            FormMount::Ready(_) => panic!("trace must not mount"),
        }
    }
}
