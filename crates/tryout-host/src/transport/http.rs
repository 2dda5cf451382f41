//! HTTP transport for form events

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};

use crate::protocol::{EventHandler, FormEvent, FormView};

/// HTTP transport serving one form
pub struct HttpTransport {
    handler: Arc<EventHandler>,
    port: u16,
}

impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(handler: Arc<EventHandler>, port: u16) -> Self {
        Self { handler, port }
    }

    /// Routes: `GET /form`, `POST /events`, `GET /health`
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/", get(health))
            .route("/health", get(health))
            .route("/form", get(handle_view))
            .route("/events", post(handle_event))
            .layer(cors)
            .with_state(self.handler.clone())
    }

    /// Run the HTTP server
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = format!("0.0.0.0:{}", self.port);
        info!("Serving form over HTTP on {}", addr);

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}

/// Health check endpoint
async fn health() -> &'static str {
    "OK"
}

async fn handle_view(State(handler): State<Arc<EventHandler>>) -> Json<FormView> {
    Json(handler.view().await)
}

async fn handle_event(
    State(handler): State<Arc<EventHandler>>,
    Json(event): Json<FormEvent>,
) -> Json<FormView> {
    debug!("HTTP event: {:?}", event);
    Json(handler.handle(event).await)
}
