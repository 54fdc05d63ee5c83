use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

pub const ACTIVATION_SECRET: &str = "test-activation-secret";
#[allow(dead_code)]
pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const DEVICE_KEY: &str = "test-device-key";
#[allow(dead_code)]
pub const VIEWER_URL: &str = "http://viewer.test";

#[allow(dead_code)]
pub const DEVICE_KEY_HEADER: &str = "x-device-key";

pub struct ServerGuard {
    pub base_url: String,
    _data_dir: Option<tempfile::TempDir>,
    child: Child,
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub fn spawn_server() -> Result<ServerGuard> {
    let data_dir = tempfile::tempdir().context("create server tempdir")?;
    let mut guard = spawn_server_in(data_dir.path())?;
    guard._data_dir = Some(data_dir);
    Ok(guard)
}

/// Spawn against a caller-owned data dir (restart tests keep the dir and
/// spawn again).
#[allow(dead_code)]
pub fn spawn_server_in(data_dir: &Path) -> Result<ServerGuard> {
    let addr_file = data_dir.join("addr.txt");
    // A leftover addr file from a previous run would short-circuit the
    // handshake below.
    let _ = std::fs::remove_file(&addr_file);

    let child = Command::new(env!("CARGO_BIN_EXE_vigia-server"))
        .args([
            "--addr",
            "127.0.0.1:0",
            "--addr-file",
            addr_file.to_str().unwrap(),
            "--data-dir",
            data_dir.to_str().unwrap(),
            "--viewer-url",
            VIEWER_URL,
        ])
        .env("VIGIA_ACTIVATION_SECRET", ACTIVATION_SECRET)
        .env("VIGIA_SIGNING_SECRET", SIGNING_SECRET)
        .env("VIGIA_DEVICE_KEY", DEVICE_KEY)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("spawn vigia-server")?;

    let base_url = read_addr_file(&addr_file)?;
    wait_for_healthz(&base_url)?;

    Ok(ServerGuard {
        base_url,
        _data_dir: None,
        child,
    })
}

fn read_addr_file(addr_file: &Path) -> Result<String> {
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("addr file not written at {}", addr_file.display());
        }

        if let Ok(s) = std::fs::read_to_string(addr_file) {
            let s = s.trim();
            if !s.is_empty() {
                return Ok(format!("http://{}", s));
            }
        }
        thread::sleep(Duration::from_millis(10));
    }
}

pub fn wait_for_healthz(base_url: &str) -> Result<()> {
    let client = reqwest::blocking::Client::new();
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("server did not become healthy at {}/healthz", base_url);
        }
        match client.get(format!("{}/healthz", base_url)).send() {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            _ => {
                thread::sleep(Duration::from_millis(50));
            }
        }
    }
}

#[allow(dead_code)]
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Mint a tracking link via the activation route and return the embedded
/// token.
#[allow(dead_code)]
pub fn activate(client: &reqwest::blocking::Client, base_url: &str, subject: &str) -> Result<String> {
    let resp: serde_json::Value = client
        .post(format!("{}/activate-tracking", base_url))
        .json(&serde_json::json!({"subject": subject, "presented_secret": ACTIVATION_SECRET}))
        .send()
        .context("activate request")?
        .error_for_status()
        .context("activate status")?
        .json()
        .context("parse activate response")?;

    let link = resp
        .get("tracking_link")
        .and_then(|v| v.as_str())
        .context("tracking_link missing")?;
    let token = link
        .split("token=")
        .nth(1)
        .context("token missing from tracking link")?;
    Ok(token.to_string())
}

/// Report a sample through the recorder route.
#[allow(dead_code)]
pub fn report(
    client: &reqwest::blocking::Client,
    base_url: &str,
    subject: &str,
    latitude: f64,
    longitude: f64,
    captured_at: i64,
) -> Result<()> {
    client
        .post(format!("{}/locations", base_url))
        .header(DEVICE_KEY_HEADER, DEVICE_KEY)
        .json(&serde_json::json!({
            "subject": subject,
            "latitude": latitude,
            "longitude": longitude,
            "captured_at": captured_at,
        }))
        .send()
        .context("report request")?
        .error_for_status()
        .context("report status")?;
    Ok(())
}

#[allow(dead_code)]
pub fn now_ms() -> i64 {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch");
    now.as_millis() as i64
}
