use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::Response;

use vigia::model::{LocationSample, TrackedPoint, day_bucket_for_ms, now_ms};

use crate::http_error::{bad_request, internal_error, not_found};
use crate::types::AppState;
use crate::validators::{validate_captured_at, validate_coordinates, validate_subject};

#[derive(Debug, serde::Deserialize)]
pub(crate) struct ReportLocationRequest {
    subject: String,
    latitude: f64,
    longitude: f64,

    /// Unix epoch milliseconds; defaults to server now when absent.
    #[serde(default)]
    captured_at: Option<i64>,
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct ReportLocationResponse {
    recorded: bool,
    day: String,
    captured_at: i64,
}

/// `POST /locations` — append a history row and upsert the latest position.
pub(crate) async fn report_location(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ReportLocationRequest>,
) -> Result<Json<ReportLocationResponse>, Response> {
    let subject = payload.subject.trim();
    validate_subject(subject).map_err(bad_request)?;
    validate_coordinates(payload.latitude, payload.longitude).map_err(bad_request)?;

    let captured_at = payload.captured_at.unwrap_or_else(now_ms);
    validate_captured_at(captured_at).map_err(bad_request)?;

    let sample = LocationSample {
        subject: subject.to_string(),
        latitude: payload.latitude,
        longitude: payload.longitude,
        captured_at,
        day: day_bucket_for_ms(captured_at),
    };

    {
        let ledger = state.ledger.write().await;
        ledger.insert_sample(&sample).map_err(internal_error)?;
        ledger.set_latest(&sample).map_err(internal_error)?;
    }

    Ok(Json(ReportLocationResponse {
        recorded: true,
        day: sample.day,
        captured_at,
    }))
}

/// `GET /locations/{subject}/latest` — most recent reported position.
pub(crate) async fn latest_position(
    State(state): State<Arc<AppState>>,
    Path(subject): Path<String>,
) -> Result<Json<TrackedPoint>, Response> {
    validate_subject(&subject).map_err(bad_request)?;

    let latest = {
        let ledger = state.ledger.read().await;
        ledger.latest(&subject).map_err(internal_error)?
    };

    match latest {
        Some(sample) => Ok(Json(TrackedPoint::from(sample))),
        None => Err(not_found()),
    }
}
