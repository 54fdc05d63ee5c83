use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;

use vigia::access::{self, AccessError};
use vigia::model::{TrackedPoint, today_bucket};

use crate::auth::bearer_token;
use crate::http_error::{bad_request, forbidden, internal_error, unauthorized};
use crate::types::AppState;
use crate::validators::validate_subject;

#[derive(Debug, serde::Deserialize)]
pub(crate) struct ActivateRequest {
    subject: String,
    presented_secret: String,
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct ActivateResponse {
    tracking_link: String,
    expires_at: i64,
}

/// `POST /activate-tracking` — mint a time-boxed tracking link.
pub(crate) async fn activate_tracking(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ActivateRequest>,
) -> Result<Json<ActivateResponse>, Response> {
    let activation =
        match access::activate(&payload.subject, &payload.presented_secret, &state.config) {
            Ok(activation) => activation,
            Err(err @ AccessError::InvalidActivationSecret) => {
                return Err(forbidden(&err.to_string()));
            }
            Err(err @ AccessError::MissingSubject) => {
                return Err(bad_request(anyhow::anyhow!(err)));
            }
            Err(err) => return Err(internal_error(anyhow::anyhow!(err))),
        };

    // The subject becomes a ledger path component on the read side; refuse
    // to hand out links for identifiers the ledger would reject.
    validate_subject(payload.subject.trim()).map_err(bad_request)?;

    Ok(Json(ActivateResponse {
        tracking_link: activation.tracking_link,
        expires_at: activation.expires_at,
    }))
}

/// `GET /map-data` — today's trail for the token's subject.
///
/// Stateless and uncached: every poll re-verifies the token and re-queries
/// the ledger. Viewers only ever learn "expired" vs "invalid".
pub(crate) async fn map_data(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<TrackedPoint>>, Response> {
    let Some(token) = bearer_token(&headers) else {
        return Err(unauthorized("missing tracking token"));
    };

    let subject = match access::authorize_read(token, &state.config.signing_secret) {
        Ok(subject) => subject,
        Err(err @ AccessError::TokenExpired) => return Err(forbidden(&err.to_string())),
        Err(_) => return Err(forbidden("tracking link invalid")),
    };

    let requested_day = today_bucket();
    let rows = {
        let ledger = state.ledger.read().await;
        ledger
            .query_day(&subject, &requested_day)
            .map_err(internal_error)?
    };

    Ok(Json(rows.into_iter().map(TrackedPoint::from).collect()))
}
