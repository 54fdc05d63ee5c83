#[path = "vigia_server/types.rs"]
mod types;
#[path = "vigia_server/persistence.rs"]
mod persistence;
#[path = "vigia_server/http_error.rs"]
mod http_error;
#[path = "vigia_server/validators.rs"]
mod validators;
#[path = "vigia_server/auth.rs"]
mod auth;
#[path = "vigia_server/handlers_tracking.rs"]
mod handlers_tracking;
#[path = "vigia_server/handlers_recorder.rs"]
mod handlers_recorder;
#[path = "vigia_server/handlers_alerts.rs"]
mod handlers_alerts;
#[path = "vigia_server/handlers_memos.rs"]
mod handlers_memos;
#[path = "vigia_server/handlers_contacts.rs"]
mod handlers_contacts;
#[path = "vigia_server/routes.rs"]
mod routes;
#[path = "vigia_server/runtime.rs"]
mod runtime;

#[tokio::main]
async fn main() {
    if let Err(err) = runtime::run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
