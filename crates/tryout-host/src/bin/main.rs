//! tryout CLI - serve a "try it out" form for one OpenAPI operation
//!
//! The descriptor is a JSON object `{ "<path>": { "<method>": <operation> } }`.
//! Form events arrive on stdin (default) or over HTTP.

use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

use tryout_core::{mount, Dispatcher, FormMount, SettingsManager};
use tryout_host::{EventHandler, HostServer, ServerMode};

/// Interactive request form for a single API operation
#[derive(Parser, Debug)]
#[command(name = "tryout")]
#[command(version)]
#[command(about = "Fill in and send requests for one OpenAPI operation")]
struct Args {
    /// Operation descriptor JSON file
    #[arg(long, env = "TRYOUT_DESCRIPTOR")]
    descriptor: PathBuf,

    /// Run in stdio mode (default)
    #[arg(long)]
    stdio: bool,

    /// Run in HTTP mode with specified port
    #[arg(long)]
    http: bool,

    /// Port for HTTP server (default: 3000)
    #[arg(long, default_value = "3000")]
    port: u16,

    /// Settings file (userAgent, accept, requestTimeoutSecs)
    #[arg(long, env = "TRYOUT_SETTINGS")]
    settings: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mode = if args.http && !args.stdio {
        ServerMode::Http { port: args.port }
    } else {
        ServerMode::Stdio
    };

    // Logging would corrupt the stdio protocol
    if mode != ServerMode::Stdio {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive(tracing::Level::INFO.into()),
            )
            .init();
    }

    let content = std::fs::read_to_string(&args.descriptor).map_err(|e| {
        format!(
            "Failed to read descriptor {}: {}",
            args.descriptor.display(),
            e
        )
    })?;

    // A bad descriptor still serves a form that shows the failure
    let form = mount(&content);
    if let FormMount::Failed { message } = &form {
        warn!("Descriptor could not be mounted: {}", message);
    }

    let settings = match &args.settings {
        Some(path) => {
            let manager = SettingsManager::load(path)
                .map_err(|e| format!("Failed to load settings {}: {}", path.display(), e))?;
            info!("Using settings from {}", manager.path().display());
            manager.into_settings()
        }
        None => Default::default(),
    };

    let dispatcher = Dispatcher::new(settings)?;
    let server = HostServer::new(EventHandler::new(form, dispatcher)).with_mode(mode);

    if let ServerMode::Http { port } = mode {
        info!("Serving form on http://localhost:{}", port);
    }

    server.run().await?;

    Ok(())
}
