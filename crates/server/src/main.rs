use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use cubby_blob::BlobStore;
use cubby_blob_memory::MemoryBlobStore;
use cubby_server::config::CubbyConfig;
use cubby_server::error::ServerError;
use cubby_state::StateStore;
use cubby_state_memory::MemoryStateStore;
use cubby_vault::VaultBuilder;

/// Cubby file-storage HTTP server.
#[derive(Parser, Debug)]
#[command(name = "cubby-server", about = "Minimal HTTP file-storage service")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "cubby.toml")]
    config: String,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber from RUST_LOG or default to info.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Load configuration from TOML file, or use defaults if the file does
    // not exist.
    let mut config: CubbyConfig = if Path::new(&cli.config).exists() {
        let contents = std::fs::read_to_string(&cli.config)?;
        toml::from_str(&contents)?
    } else {
        info!(
            path = %cli.config,
            "config file not found, using defaults"
        );
        toml::from_str("")?
    };

    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let state = build_state_store(&config)?;
    let blob = build_blob_store(&config)?;

    let vault = Arc::new(
        VaultBuilder::new()
            .state(state)
            .blob(blob)
            .session_ttl(Duration::from_secs(config.auth.session_ttl_seconds))
            .share_ttl(Duration::from_secs(config.auth.share_ttl_seconds))
            .build()?,
    );

    let app = cubby_server::api::router(vault, &config.server, &config.http)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "cubby server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Build the key-value backend named in the configuration.
fn build_state_store(config: &CubbyConfig) -> Result<Arc<dyn StateStore>, ServerError> {
    match config.state.backend.as_str() {
        "memory" => Ok(Arc::new(MemoryStateStore::new())),
        other => Err(ServerError::Config(format!(
            "unknown state backend: {other}"
        ))),
    }
}

/// Build the blob backend named in the configuration.
fn build_blob_store(config: &CubbyConfig) -> Result<Arc<dyn BlobStore>, ServerError> {
    match config.blob.backend.as_str() {
        "memory" => Ok(Arc::new(MemoryBlobStore::with_max_blob_bytes(
            config.http.max_upload_bytes,
        ))),
        other => Err(ServerError::Config(format!(
            "unknown blob backend: {other}"
        ))),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install shutdown signal handler");
    }
}
