//! Route registration for the recorder-facing (device-key gated) surface.

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::{Router, middleware};

use crate::auth::require_device_key;
use crate::handlers_alerts::{list_alerts, trigger_panic};
use crate::handlers_contacts::{add_contact, list_contacts, remove_contact};
use crate::handlers_memos::{list_memos, upload_memo};
use crate::handlers_recorder::{latest_position, report_location};
use crate::types::AppState;

pub(crate) fn recorder_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/locations", post(report_location))
        .route("/locations/:subject/latest", get(latest_position))
        .route("/panic", post(trigger_panic))
        .route("/alerts", get(list_alerts))
        .route("/memos", post(upload_memo))
        .route("/memos/:subject", get(list_memos))
        .route("/contacts/:subject", get(list_contacts).post(add_contact))
        .route("/contacts/:subject/:contact_id", delete(remove_contact))
        .layer(middleware::from_fn_with_state(state, require_device_key))
}
