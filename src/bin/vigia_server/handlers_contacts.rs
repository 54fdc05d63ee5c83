use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::Response;

use vigia::model::now_ts;

use crate::http_error::{bad_request, conflict, internal_error, not_found};
use crate::persistence::persist_contacts;
use crate::types::{AppState, Contact};
use crate::validators::{validate_contact_name, validate_contact_phone, validate_subject};

/// `GET /contacts/{subject}` — the subject's trusted contacts.
pub(crate) async fn list_contacts(
    State(state): State<Arc<AppState>>,
    Path(subject): Path<String>,
) -> Result<Json<Vec<Contact>>, Response> {
    validate_subject(&subject).map_err(bad_request)?;

    let contacts = state.contacts.read().await;
    let mut out = contacts.get(&subject).cloned().unwrap_or_default();
    out.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Json(out))
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct AddContactRequest {
    name: String,
    phone: String,
}

/// `POST /contacts/{subject}` — add a trusted contact.
pub(crate) async fn add_contact(
    State(state): State<Arc<AppState>>,
    Path(subject): Path<String>,
    Json(payload): Json<AddContactRequest>,
) -> Result<Json<Contact>, Response> {
    validate_subject(&subject).map_err(bad_request)?;
    let name = payload.name.trim().to_string();
    let phone = payload.phone.trim().to_string();
    validate_contact_name(&name).map_err(bad_request)?;
    validate_contact_phone(&phone).map_err(bad_request)?;

    let created_at = now_ts();
    let id = {
        let mut hasher = blake3::Hasher::new();
        hasher.update(subject.as_bytes());
        hasher.update(b"\n");
        hasher.update(name.as_bytes());
        hasher.update(b"\n");
        hasher.update(phone.as_bytes());
        hasher.update(b"\n");
        hasher.update(created_at.as_bytes());
        hasher.finalize().to_hex().to_string()
    };

    let contact = Contact {
        id,
        subject: subject.clone(),
        name,
        phone,
        created_at,
    };

    let mut contacts = state.contacts.write().await;

    if contacts
        .get(&subject)
        .is_some_and(|list| {
            list.iter()
                .any(|c| c.name == contact.name && c.phone == contact.phone)
        })
    {
        return Err(conflict("contact already exists"));
    }

    contacts
        .entry(subject)
        .or_default()
        .push(contact.clone());
    persist_contacts(&state.data_dir, &contacts).map_err(internal_error)?;

    Ok(Json(contact))
}

/// `DELETE /contacts/{subject}/{contact_id}` — remove a trusted contact.
pub(crate) async fn remove_contact(
    State(state): State<Arc<AppState>>,
    Path((subject, contact_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, Response> {
    validate_subject(&subject).map_err(bad_request)?;

    let mut contacts = state.contacts.write().await;
    let Some(list) = contacts.get_mut(&subject) else {
        return Err(not_found());
    };

    let before = list.len();
    list.retain(|c| c.id != contact_id);
    if list.len() == before {
        return Err(not_found());
    }

    persist_contacts(&state.data_dir, &contacts).map_err(internal_error)?;

    Ok(Json(
        serde_json::json!({"removed": true, "contact_id": contact_id}),
    ))
}
