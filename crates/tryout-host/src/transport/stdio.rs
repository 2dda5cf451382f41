//! stdio transport: one JSON event per line in, one JSON view per line out

use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use crate::protocol::{EventHandler, FormEvent, FormView};

/// stdio transport for form events
pub struct StdioTransport {
    handler: Arc<EventHandler>,
}

impl StdioTransport {
    /// Create a new stdio transport
    pub fn new(handler: Arc<EventHandler>) -> Self {
        Self { handler }
    }

    /// Run the stdio transport until EOF
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        info!("Serving form on stdio");

        let reader = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        self.serve(reader, &mut stdout).await
    }

    /// Answer every event line from `reader` with a view line on `writer`
    pub async fn serve<R, W>(
        &self,
        mut reader: R,
        writer: &mut W,
    ) -> Result<(), Box<dyn std::error::Error>>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();

        // Initial render so the client has something to show before any event
        let view = self.handler.view().await;
        write_view(writer, &view).await?;

        loop {
            line.clear();

            let bytes_read = reader.read_line(&mut line).await?;
            if bytes_read == 0 {
                info!("EOF received, shutting down");
                break;
            }

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            debug!("Received: {}", line);

            let view = match serde_json::from_str::<FormEvent>(line) {
                Ok(event) => self.handler.handle(event).await,
                Err(e) => {
                    error!("Failed to parse event: {}", e);
                    self.handler
                        .view()
                        .await
                        .with_event_error(format!("Invalid event: {}", e))
                }
            };

            write_view(writer, &view).await?;
        }

        Ok(())
    }
}

async fn write_view<W: AsyncWrite + Unpin>(
    out: &mut W,
    view: &FormView,
) -> Result<(), Box<dyn std::error::Error>> {
    let view_line = serde_json::to_string(view)?;
    debug!("Sending: {}", view_line);
    out.write_all(view_line.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await?;
    Ok(())
}
