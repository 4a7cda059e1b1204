//! Shared utilities for integration tests.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::net::TcpListener;

use movidesk_config::{ConfigServer, ServerSettings, Shutdown};

pub const ADMIN_KEY: &str = "test-admin-key";

/// A config server on an ephemeral port, stopped on drop.
pub struct TestServer {
    pub addr: SocketAddr,
    pub dir: TempDir,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}/client-config", self.addr)
    }

    pub fn document_path(&self) -> PathBuf {
        self.dir.path().join("client-config.json")
    }

    pub fn stop(&self) {
        self.shutdown.trigger();
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_config_server(admin_key: Option<&str>) -> TestServer {
    let dir = tempfile::tempdir().unwrap();
    let settings = ServerSettings {
        bind_address: "127.0.0.1:0".into(),
        document_path: dir.path().join("client-config.json"),
        admin_key: admin_key.map(String::from),
        ..Default::default()
    };

    let listener = TcpListener::bind(&settings.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = ConfigServer::new(settings);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer {
        addr,
        dir,
        shutdown,
    }
}

/// A request seen by a mock backend.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: Method,
    pub uri: Uri,
    pub body: Bytes,
}

pub type Captured = Arc<Mutex<Vec<CapturedRequest>>>;

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    body: &'static str,
    captured: Captured,
}

/// Start a backend that records every request and answers with a fixed
/// status and body.
pub async fn start_mock_backend(status: u16, body: &'static str) -> (SocketAddr, Captured) {
    let captured: Captured = Arc::default();
    let state = MockState {
        status: StatusCode::from_u16(status).unwrap(),
        body,
        captured: captured.clone(),
    };

    async fn respond(
        State(state): State<MockState>,
        method: Method,
        uri: Uri,
        body: Bytes,
    ) -> (StatusCode, &'static str) {
        state
            .captured
            .lock()
            .unwrap()
            .push(CapturedRequest { method, uri, body });
        (state.status, state.body)
    }

    let app = Router::new().fallback(respond).with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (addr, captured)
}

/// Write an admin key file and return a locator pointing at it.
pub fn key_locator(dir: &TempDir, key: &str) -> movidesk_config::remote::AdminKeyLocator {
    let path = dir.path().join("admin.key");
    std::fs::write(&path, key).unwrap();
    movidesk_config::remote::AdminKeyLocator::from_candidates(vec![path])
}
