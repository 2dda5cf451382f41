//! Host orchestration

use std::sync::Arc;
use tracing::info;

use crate::protocol::EventHandler;
use crate::transport::{HttpTransport, StdioTransport};

/// Server mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServerMode {
    /// Line-delimited JSON on stdin/stdout
    #[default]
    Stdio,
    /// JSON over HTTP
    Http { port: u16 },
}

/// Hosts one form behind a transport
pub struct HostServer {
    handler: Arc<EventHandler>,
    mode: ServerMode,
}

impl HostServer {
    /// Create a new host server
    pub fn new(handler: EventHandler) -> Self {
        Self {
            handler: Arc::new(handler),
            mode: ServerMode::default(),
        }
    }

    /// Set the server mode
    pub fn with_mode(mut self, mode: ServerMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> ServerMode {
        self.mode
    }

    /// Run the server
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self.mode {
            ServerMode::Stdio => {
                info!("Starting form host in stdio mode");
                StdioTransport::new(self.handler.clone()).run().await
            }
            ServerMode::Http { port } => {
                info!("Starting form host in HTTP mode on port {}", port);
                HttpTransport::new(self.handler.clone(), port).run().await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tryout_core::{mount, Dispatcher, Settings};

    #[test]
    fn test_default_mode_is_stdio() {
        let handler = EventHandler::new(
            mount(r#"{"/x": {"get": {}}}"#),
            Dispatcher::new(Settings::default()).unwrap(),
        );
        let server = HostServer::new(handler);
        assert_eq!(server.mode(), ServerMode::Stdio);

        let server = server.with_mode(ServerMode::Http { port: 8080 });
        assert_eq!(server.mode(), ServerMode::Http { port: 8080 });
    }
}
