use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Json;
use axum::Router;
use axum::routing::{get, post};
use clap::Parser;
use tokio::sync::RwLock;

use vigia::ledger::LedgerStore;
use vigia::model::AuthConfig;

use crate::handlers_tracking::{activate_tracking, map_data};
use crate::persistence::load_safety_state;
use crate::routes::recorder_router;
use crate::types::AppState;

#[derive(Parser)]
#[command(name = "vigia-server")]
#[command(about = "Vigia personal-safety backend", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Write bound address to this file (dev/test convenience)
    #[arg(long)]
    addr_file: Option<PathBuf>,

    /// Data directory
    #[arg(long, default_value = "./vigia-data")]
    data_dir: PathBuf,

    /// Override the viewer base URL embedded in tracking links
    #[arg(long)]
    viewer_url: Option<String>,
}

pub(crate) async fn run() -> Result<()> {
    let args = Args::parse();

    // Secrets are startup-mandatory; refuse to serve without them.
    let mut config = AuthConfig::from_env().context("load auth config")?;
    if let Some(viewer_url) = args.viewer_url {
        config.viewer_url = viewer_url;
    }

    std::fs::create_dir_all(&args.data_dir)
        .with_context(|| format!("create data dir {}", args.data_dir.display()))?;

    let ledger = LedgerStore::open(&args.data_dir).context("open ledger")?;
    let (contacts, alerts, memos) =
        load_safety_state(&args.data_dir).context("load safety state")?;

    let state = Arc::new(AppState {
        config,
        data_dir: args.data_dir,
        ledger: Arc::new(RwLock::new(ledger)),
        contacts: Arc::new(RwLock::new(contacts)),
        alerts: Arc::new(RwLock::new(alerts)),
        memos: Arc::new(RwLock::new(memos)),
    });

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/activate-tracking", post(activate_tracking))
        .route("/map-data", get(map_data))
        .merge(recorder_router(state.clone()))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;

    let local_addr = listener.local_addr().context("read listener local addr")?;
    eprintln!("vigia-server listening on {}", local_addr);

    if let Some(addr_file) = &args.addr_file {
        std::fs::write(addr_file, local_addr.to_string())
            .with_context(|| format!("write addr file {}", addr_file.display()))?;
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
