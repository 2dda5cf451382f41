//! Host protocol message types

use serde::{Deserialize, Serialize};
use tryout_core::{FieldDescriptor, FormMount, FormPhase, HttpMethod, ResponseSnapshot};

/// User intent sent by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormEvent {
    /// Re-render without changing anything
    View,
    /// Replace the value of the field at `index`
    EditField { index: usize, value: String },
    /// Choose the server requests go to
    SelectServer { url: String },
    /// Validate and send the request
    Send,
}

/// Whether a form could be mounted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewStatus {
    Ready,
    Failed,
}

/// Everything the presentation layer needs to render a form
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    pub status: ViewStatus,
    /// Mount failure message; the only thing shown for failed forms
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,
    /// Badge color for the method
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub servers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_server: Option<String>,
    pub fields: Vec<FieldDescriptor>,
    /// Declared response status codes
    pub response_codes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<FormPhase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseSnapshot>,
    /// Last dispatch failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Why the event this view answers was rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_error: Option<String>,
}

impl FormView {
    pub fn with_event_error(mut self, message: impl Into<String>) -> Self {
        self.event_error = Some(message.into());
        self
    }
}

impl From<&FormMount> for FormView {
    fn from(mount: &FormMount) -> Self {
        match mount {
            FormMount::Failed { message } => Self {
                status: ViewStatus::Failed,
                message: Some(message.clone()),
                method: None,
                badge: None,
                path: None,
                summary: None,
                description: None,
                servers: Vec::new(),
                selected_server: None,
                fields: Vec::new(),
                response_codes: Vec::new(),
                phase: None,
                response: None,
                error: None,
                event_error: None,
            },
            FormMount::Ready(store) => {
                let operation = store.operation();
                Self {
                    status: ViewStatus::Ready,
                    message: None,
                    method: Some(store.method()),
                    badge: Some(method_badge(store.method())),
                    path: Some(store.path().to_string()),
                    summary: operation.summary.clone(),
                    description: operation.description.clone(),
                    servers: store.servers(),
                    selected_server: store.selected_server().map(str::to_string),
                    fields: store.fields().to_vec(),
                    response_codes: operation.responses.keys().cloned().collect(),
                    phase: Some(store.phase()),
                    response: store.response().cloned(),
                    error: store.last_error().map(str::to_string),
                    event_error: None,
                }
            }
        }
    }
}

/// Badge color shown next to the method
pub fn method_badge(method: HttpMethod) -> &'static str {
    match method {
        HttpMethod::Get => "warning",
        HttpMethod::Post => "pink",
        HttpMethod::Put => "success",
        HttpMethod::Delete => "failure",
        HttpMethod::Patch => "purple",
    }
}
