//! Admin key check for writes.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::credentials::constant_time_eq;
use crate::observability::metrics;
use crate::remote::CONFIG_KEY_HEADER;
use crate::server::AppState;

/// Require `X-Config-Key` to match the configured secret. With no secret
/// configured every write is refused.
pub async fn config_key_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(CONFIG_KEY_HEADER)
        .and_then(|h| h.to_str().ok());

    let reason = match (state.admin_key.as_deref(), provided) {
        (None, _) => "not_configured",
        (Some(_), None) => "missing_key",
        (Some(expected), Some(provided)) => {
            if constant_time_eq(expected.as_bytes(), provided.as_bytes()) {
                return next.run(request).await;
            }
            "wrong_key"
        }
    };

    metrics::record_rejected_write(reason);
    tracing::warn!(
        method = %request.method(),
        path = %request.uri().path(),
        reason = reason,
        "Rejected config write"
    );
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "detail": "Unauthorized" })),
    )
        .into_response()
}
