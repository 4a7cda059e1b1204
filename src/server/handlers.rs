use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::document::{DocumentPatch, WriteSummary};
use crate::error::SyncError;
use crate::server::AppState;

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus { status: "ok" })
}

pub async fn get_client_config(State(state): State<AppState>) -> Response {
    match state.store.read_raw().await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "application/json")], bytes).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn put_client_config(
    State(state): State<AppState>,
    Json(patch): Json<DocumentPatch>,
) -> Response {
    match state.store.apply(&patch).await {
        Ok(doc) => Json(WriteSummary::for_document(&doc)).into_response(),
        Err(e) => error_response(e),
    }
}

fn error_response(err: SyncError) -> Response {
    tracing::error!(error = %err, "Client config store failure");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": err.to_string() })),
    )
        .into_response()
}
