//! Central configuration server for Movidesk desk clients.
//!
//! # Architecture Overview
//!
//! ```text
//!   desk client                         ┌──────────────────────────────────────┐
//!   ───────────                         │           CONFIG SERVER              │
//!   RemoteConfigClient ── GET ─────────▶│  /client-config ─▶ DocumentStore     │
//!                                       │                     (read verbatim)  │
//!   ConfigPublisher ──── PUT ──────────▶│  key check ─▶ lock ─▶ load           │
//!     + X-Config-Key                    │                ─▶ secure_merge       │
//!                                       │                ─▶ version + 1        │
//!                                       │                ─▶ atomic save        │
//!                                       └──────────────────────────────────────┘
//! ```

use tokio::net::TcpListener;

use movidesk_config::config::ServerSettings;
use movidesk_config::observability::{logging, metrics};
use movidesk_config::{ConfigServer, Shutdown};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init("movidesk_config=info,tower_http=info");

    tracing::info!("movidesk-config v{} starting", env!("CARGO_PKG_VERSION"));

    let settings = match ServerSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(error = %e, "Invalid server settings");
            return Err(e.into());
        }
    };

    tracing::info!(
        bind_address = %settings.bind_address,
        document = %settings.document_path.display(),
        admin_key_configured = settings.admin_key.is_some(),
        request_timeout_secs = settings.request_timeout_secs,
        "Configuration loaded"
    );

    if let Some(addr) = settings.metrics_address {
        metrics::init_metrics(addr);
    }

    let listener = TcpListener::bind(&settings.bind_address).await?;
    let shutdown = Shutdown::new();
    let server = ConfigServer::new(settings);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
