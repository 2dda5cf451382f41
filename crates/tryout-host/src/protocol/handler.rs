//! Form event handler

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::types::*;
use tryout_core::{Dispatcher, FormError, FormMount};

/// Applies presentation events to one mounted form
pub struct EventHandler {
    /// Form state, shared between transports
    form: Arc<RwLock<FormMount>>,
    /// Request dispatcher
    dispatcher: Arc<Dispatcher>,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new(form: FormMount, dispatcher: Dispatcher) -> Self {
        Self {
            form: Arc::new(RwLock::new(form)),
            dispatcher: Arc::new(dispatcher),
        }
    }

    /// Handle an event and return the resulting view
    pub async fn handle(&self, event: FormEvent) -> FormView {
        debug!("Handling event: {:?}", event);

        let outcome = match event {
            FormEvent::View => Ok(()),
            FormEvent::EditField { index, value } => self.edit_field(index, value).await,
            FormEvent::SelectServer { url } => self.select_server(url).await,
            FormEvent::Send => self.send().await,
        };

        let view = self.view().await;
        match outcome {
            Ok(()) => view,
            Err(e) => view.with_event_error(e.to_string()),
        }
    }

    /// Render the current state
    pub async fn view(&self) -> FormView {
        FormView::from(&*self.form.read().await)
    }

    async fn edit_field(&self, index: usize, value: String) -> Result<(), FormError> {
        let mut form = self.form.write().await;
        let Some(store) = form.store_mut() else {
            return Ok(());
        };
        store.set_field_value(index, value)?;
        Ok(())
    }

    async fn select_server(&self, url: String) -> Result<(), FormError> {
        let mut form = self.form.write().await;
        if let Some(store) = form.store_mut() {
            store.set_server(url);
        }
        Ok(())
    }

    /// Validate, snapshot, send, and record the outcome.
    ///
    /// The form lock is released while the request is in flight so edits
    /// can keep arriving; they do not affect the captured ticket.
    async fn send(&self) -> Result<(), FormError> {
        let ticket = {
            let mut form = self.form.write().await;
            let Some(store) = form.store_mut() else {
                return Ok(());
            };
            match store.begin_send() {
                Ok(ticket) => ticket,
                // Invalid fields are reported through the field states
                Err(FormError::Validation(messages)) => {
                    info!("Send blocked by {} invalid fields", messages.len());
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
        };

        let result = self.dispatcher.send(&ticket).await;

        let mut form = self.form.write().await;
        if let Some(store) = form.store_mut() {
            store.complete_send(&ticket, result);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use axum::Router;
    use tryout_core::{mount, FormPhase, Settings};

    const SCENARIO_A: &str = r#"{
        "/x": {
            "get": {
                "parameters": [{"name": "q", "in": "query", "required": true}],
                "servers": [{"url": "https://api.example.com"}]
            }
        }
    }"#;

    fn handler(json: &str) -> EventHandler {
        EventHandler::new(mount(json), Dispatcher::new(Settings::default()).unwrap())
    }

    async fn spawn_server(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_send_with_empty_required_field_is_blocked() {
        let handler = handler(SCENARIO_A);

        let view = handler.handle(FormEvent::Send).await;

        assert_eq!(view.phase, Some(FormPhase::Invalid));
        assert!(!view.fields[0].valid);
        assert_eq!(view.fields[0].error.as_deref(), Some("q is required"));
        assert!(view.response.is_none());
        assert!(view.error.is_none());
        assert!(view.event_error.is_none());
    }

    #[tokio::test]
    async fn test_edit_select_and_send() {
        let app = Router::new().route(
            "/x",
            get(|axum::extract::RawQuery(query): axum::extract::RawQuery| async move {
                axum::Json(serde_json::json!({"query": query}))
            }),
        );
        let base = spawn_server(app).await;
        let handler = handler(SCENARIO_A);

        handler
            .handle(FormEvent::EditField {
                index: 0,
                value: "5".to_string(),
            })
            .await;
        handler
            .handle(FormEvent::SelectServer { url: base.clone() })
            .await;
        let view = handler.handle(FormEvent::Send).await;

        assert_eq!(view.selected_server.as_deref(), Some(base.as_str()));
        assert_eq!(view.phase, Some(FormPhase::Idle));
        let response = view.response.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.text, "{\n  \"query\": \"q=5\"\n}");
    }

    #[tokio::test]
    async fn test_dispatch_failure_is_recovered() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let handler = handler(r#"{"/x": {"get": {}}}"#);
        handler
            .handle(FormEvent::SelectServer {
                url: format!("http://{}", addr),
            })
            .await;
        let view = handler.handle(FormEvent::Send).await;

        assert_eq!(view.phase, Some(FormPhase::Idle));
        assert!(view.response.is_none());
        assert!(view.error.unwrap().starts_with("HTTP error"));
    }

    #[tokio::test]
    async fn test_send_without_server_reports_event_error() {
        let handler = handler(r#"{"/x": {"get": {}}}"#);

        let view = handler.handle(FormEvent::Send).await;
        assert_eq!(view.event_error.as_deref(), Some("No server selected"));
        assert_eq!(view.phase, Some(FormPhase::Idle));
    }

    #[tokio::test]
    async fn test_bad_field_index_reports_event_error() {
        let handler = handler(SCENARIO_A);

        let view = handler
            .handle(FormEvent::EditField {
                index: 9,
                value: "x".to_string(),
            })
            .await;
        assert!(view.event_error.unwrap().contains("out of range"));
        assert_eq!(view.fields[0].value, "");
    }

    #[tokio::test]
    async fn test_failed_form_ignores_events() {
        let handler = handler(r#"{"/x": {"trace": {}}}"#);

        let view = handler.handle(FormEvent::Send).await;
        assert_eq!(view.status, ViewStatus::Failed);
        assert_eq!(view.message.as_deref(), Some("unknown HTTP method"));
        assert!(view.fields.is_empty());
        assert!(view.event_error.is_none());
    }
}
