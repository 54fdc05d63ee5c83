use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::Response;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use vigia::model::now_ts;

use crate::http_error::{bad_request, internal_error};
use crate::persistence::{persist_memos, store_memo_blob};
use crate::types::{AppState, MemoRecord};
use crate::validators::validate_subject;

#[derive(Debug, serde::Deserialize)]
pub(crate) struct UploadMemoRequest {
    subject: String,

    /// Base64-encoded audio bytes, as captured by the recorder.
    audio: String,
}

/// `POST /memos` — store a voice memo.
///
/// The blob is content-addressed by its BLAKE3 digest; re-uploading the
/// same audio for a subject returns the existing record instead of
/// duplicating it.
pub(crate) async fn upload_memo(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UploadMemoRequest>,
) -> Result<Json<MemoRecord>, Response> {
    let subject = payload.subject.trim();
    validate_subject(subject).map_err(bad_request)?;

    let bytes = BASE64
        .decode(payload.audio.as_bytes())
        .map_err(|err| bad_request(anyhow::anyhow!("audio is not valid base64: {}", err)))?;
    if bytes.is_empty() {
        return Err(bad_request(anyhow::anyhow!("audio payload is empty")));
    }

    let memo_id = blake3::hash(&bytes).to_hex().to_string();
    store_memo_blob(&state.data_dir, subject, &memo_id, &bytes).map_err(internal_error)?;

    let mut memos = state.memos.write().await;

    if let Some(existing) = memos
        .get(subject)
        .and_then(|list| list.iter().find(|memo| memo.id == memo_id))
    {
        return Ok(Json(existing.clone()));
    }

    let record = MemoRecord {
        id: memo_id,
        subject: subject.to_string(),
        bytes: bytes.len() as u64,
        recorded_at: now_ts(),
    };
    memos
        .entry(subject.to_string())
        .or_default()
        .push(record.clone());
    persist_memos(&state.data_dir, &memos).map_err(internal_error)?;

    Ok(Json(record))
}

/// `GET /memos/{subject}` — memo records, newest first. Index only; the
/// audio bytes stay on disk.
pub(crate) async fn list_memos(
    State(state): State<Arc<AppState>>,
    Path(subject): Path<String>,
) -> Result<Json<Vec<MemoRecord>>, Response> {
    validate_subject(&subject).map_err(bad_request)?;

    let memos = state.memos.read().await;
    let mut out = memos.get(&subject).cloned().unwrap_or_default();
    out.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
    Ok(Json(out))
}
