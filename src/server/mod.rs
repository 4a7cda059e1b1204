//! Central configuration server.
//!
//! # Data Flow
//! ```text
//! GET  /client-config ─► DocumentStore::read_raw ─► bytes as persisted
//! PUT  /client-config ─► config_key_middleware ─► Json<DocumentPatch>
//!                        ─► DocumentStore::apply (lock: load → merge → save)
//!                        ─► WriteSummary
//! GET  /health        ─► {"status": "ok"}
//! ```
//!
//! # Middleware (outermost first)
//! request id → trace → request id propagation → timeout → body limit
//! The key check wraps only the PUT handler, so other methods get 405.

pub mod auth;
pub mod handlers;
pub mod store;

use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerSettings;
use self::auth::config_key_middleware;
use self::handlers::{get_client_config, health, put_client_config};
pub use self::store::DocumentStore;

/// Route serving and accepting the shared document.
pub const CONFIG_PATH: &str = "/client-config";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
    pub admin_key: Option<Arc<str>>,
}

/// HTTP server for the shared configuration document.
pub struct ConfigServer {
    router: Router,
    settings: ServerSettings,
}

impl ConfigServer {
    pub fn new(settings: ServerSettings) -> Self {
        if settings.admin_key.is_none() {
            tracing::warn!("No admin key configured, all config writes will be rejected");
        }

        let state = AppState {
            store: Arc::new(DocumentStore::new(settings.document_path.clone())),
            admin_key: settings.admin_key.as_deref().map(Arc::from),
        };
        let router = Self::build_router(&settings, state);
        Self { router, settings }
    }

    #[allow(deprecated)]
    fn build_router(settings: &ServerSettings, state: AppState) -> Router {
        let guarded_put = put(put_client_config).route_layer(middleware::from_fn_with_state(
            state.clone(),
            config_key_middleware,
        ));
        Router::new()
            .route(CONFIG_PATH, get(get_client_config).merge(guarded_put))
            .route("/health", get(health))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(settings.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(
                settings.request_timeout_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// A clone of the router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn settings(&self) -> &ServerSettings {
        &self.settings
    }

    /// Serve until Ctrl+C or a shutdown broadcast.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            document = %self.settings.document_path.display(),
            "Config server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => tracing::info!("Shutdown signal received"),
                    _ = shutdown.recv() => tracing::info!("Shutdown requested"),
                }
            })
            .await?;

        tracing::info!("Config server stopped");
        Ok(())
    }
}
