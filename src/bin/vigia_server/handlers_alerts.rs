use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::response::Response;

use vigia::model::now_ts;

use crate::http_error::{bad_request, internal_error};
use crate::persistence::persist_alerts;
use crate::types::{AppState, PanicAlert};
use crate::validators::validate_subject;

#[derive(Debug, serde::Deserialize)]
pub(crate) struct PanicRequest {
    subject: String,
}

/// `POST /panic` — record a panic-button press.
///
/// Best-effort by design: a single POST, no delivery protocol. The recorder
/// treats any non-2xx as "alert failed" and tells the user.
pub(crate) async fn trigger_panic(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PanicRequest>,
) -> Result<Json<PanicAlert>, Response> {
    let subject = payload.subject.trim();
    validate_subject(subject).map_err(bad_request)?;

    let raised_at = now_ts();
    let id = {
        let mut hasher = blake3::Hasher::new();
        hasher.update(subject.as_bytes());
        hasher.update(b"\n");
        hasher.update(raised_at.as_bytes());
        hasher.finalize().to_hex().to_string()
    };

    let alert = PanicAlert {
        id,
        subject: subject.to_string(),
        raised_at,
    };

    {
        let mut alerts = state.alerts.write().await;
        alerts.push(alert.clone());
        persist_alerts(&state.data_dir, &alerts).map_err(internal_error)?;
    }

    Ok(Json(alert))
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct AlertsQuery {
    #[serde(default)]
    subject: Option<String>,
}

/// `GET /alerts[?subject=]` — recorded alerts, newest first.
pub(crate) async fn list_alerts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AlertsQuery>,
) -> Result<Json<Vec<PanicAlert>>, Response> {
    let alerts = state.alerts.read().await;
    let mut out: Vec<PanicAlert> = alerts
        .iter()
        .filter(|alert| {
            query
                .subject
                .as_deref()
                .map(|subject| alert.subject == subject)
                .unwrap_or(true)
        })
        .cloned()
        .collect();
    out.sort_by(|a, b| b.raised_at.cmp(&a.raised_at));
    Ok(Json(out))
}
