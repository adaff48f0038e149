//! Serve command - run the HTTP extraction service.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Args;
use tracing::{info, warn};

use cin_core::CardPipeline;

use super::load_config;
use crate::server;

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Bind address (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,
}

pub async fn run(args: ServeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let pipeline = CardPipeline::from_config(&config);

    // Availability checks spawn processes; keep them off the runtime
    let pipeline = tokio::task::spawn_blocking(move || {
        match pipeline.select_backend() {
            Some(backend) => info!("OCR backend: {}", backend.name()),
            None => warn!(
                "No OCR backend available (tried {}), /extract will return default records",
                pipeline.backend_names().join(", ")
            ),
        }
        pipeline
    })
    .await?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = server::router(Arc::new(pipeline), config.server.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
