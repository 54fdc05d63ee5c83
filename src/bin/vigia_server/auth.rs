use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;

use crate::http_error::unauthorized;
use crate::types::AppState;

/// Header carrying the pre-shared recorder key on the ingestion routes.
pub(crate) const DEVICE_KEY_HEADER: &str = "x-device-key";

pub(crate) async fn require_device_key(
    State(state): State<Arc<AppState>>,
    req: axum::extract::Request,
    next: Next,
) -> Response {
    let Some(value) = req.headers().get(DEVICE_KEY_HEADER) else {
        return unauthorized("missing device key");
    };
    let Ok(value) = value.to_str() else {
        return unauthorized("missing device key");
    };
    if value != state.config.device_key {
        return unauthorized("invalid device key");
    }
    next.run(req).await
}

/// Extract the `Bearer <token>` value from the Authorization header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
