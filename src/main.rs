use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use vigia::model::{TrackedPoint, now_ms};

#[derive(Parser)]
#[command(name = "vigia")]
#[command(about = "Vigia personal-safety client", long_about = None)]
struct Cli {
    /// Server base URL
    #[arg(long, default_value = "http://127.0.0.1:8080", global = true)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mint a shareable tracking link for a subject
    Activate {
        /// Subject (tracked user) identifier
        #[arg(long)]
        subject: String,
        /// Pre-shared activation secret
        #[arg(long)]
        secret: String,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch today's trail with a tracking token
    Trail {
        /// Tracking token (from an activation link)
        #[arg(long)]
        token: String,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Report a position sample (recorder role)
    Report {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        latitude: f64,
        #[arg(long)]
        longitude: f64,
        /// Capture time, unix epoch milliseconds (defaults to now)
        #[arg(long)]
        captured_at: Option<i64>,
        /// Recorder device key (or VIGIA_DEVICE_KEY)
        #[arg(long)]
        device_key: Option<String>,
    },

    /// Trigger the panic button for a subject
    Panic {
        #[arg(long)]
        subject: String,
        /// Recorder device key (or VIGIA_DEVICE_KEY)
        #[arg(long)]
        device_key: Option<String>,
    },

    /// Upload or list voice memos
    Memo {
        #[command(subcommand)]
        command: MemoCommands,
    },

    /// Manage trusted contacts
    Contacts {
        #[command(subcommand)]
        command: ContactCommands,
    },
}

#[derive(Subcommand)]
enum MemoCommands {
    /// Upload an audio file as a voice memo
    Send {
        #[arg(long)]
        subject: String,
        /// Audio file to upload
        #[arg(long)]
        file: PathBuf,
        /// Recorder device key (or VIGIA_DEVICE_KEY)
        #[arg(long)]
        device_key: Option<String>,
    },
    /// List recorded memos for a subject
    List {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        device_key: Option<String>,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ContactCommands {
    /// List trusted contacts
    List {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        device_key: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Add a trusted contact
    Add {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        device_key: Option<String>,
    },
    /// Remove a trusted contact by id
    Remove {
        #[arg(long)]
        subject: String,
        #[arg(long)]
        contact_id: String,
        #[arg(long)]
        device_key: Option<String>,
    },
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let server = cli.server.trim_end_matches('/').to_string();

    match cli.command {
        Commands::Activate {
            subject,
            secret,
            json,
        } => {
            let resp: serde_json::Value = http()
                .post(format!("{}/activate-tracking", server))
                .json(&serde_json::json!({"subject": subject, "presented_secret": secret}))
                .send()
                .context("activate request")?
                .error_for_status()
                .context("activate status")?
                .json()
                .context("parse activate response")?;

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&resp).context("serialize activation")?
                );
            } else {
                let link = resp
                    .get("tracking_link")
                    .and_then(|v| v.as_str())
                    .context("tracking_link missing from response")?;
                println!("{}", link);
            }
        }

        Commands::Trail { token, json } => {
            let points: Vec<TrackedPoint> = http()
                .get(format!("{}/map-data", server))
                .header(reqwest::header::AUTHORIZATION, format!("Bearer {}", token))
                .send()
                .context("trail request")?
                .error_for_status()
                .context("trail status (expired or invalid link?)")?
                .json()
                .context("parse trail response")?;

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&points).context("serialize trail")?
                );
            } else if points.is_empty() {
                println!("No data yet today");
            } else {
                for p in &points {
                    println!("{} {:.6},{:.6}", p.captured_at, p.latitude, p.longitude);
                }
            }
        }

        Commands::Report {
            subject,
            latitude,
            longitude,
            captured_at,
            device_key,
        } => {
            let key = require_device_key(device_key)?;
            let captured_at = captured_at.unwrap_or_else(now_ms);
            let resp: serde_json::Value = http()
                .post(format!("{}/locations", server))
                .header(DEVICE_KEY_HEADER, key)
                .json(&serde_json::json!({
                    "subject": subject,
                    "latitude": latitude,
                    "longitude": longitude,
                    "captured_at": captured_at,
                }))
                .send()
                .context("report request")?
                .error_for_status()
                .context("report status")?
                .json()
                .context("parse report response")?;

            let day = resp
                .get("day")
                .and_then(|v| v.as_str())
                .unwrap_or("<unknown>");
            println!("Recorded {} at {} (day {})", subject, captured_at, day);
        }

        Commands::Panic {
            subject,
            device_key,
        } => {
            let key = require_device_key(device_key)?;
            http()
                .post(format!("{}/panic", server))
                .header(DEVICE_KEY_HEADER, key)
                .json(&serde_json::json!({"subject": subject}))
                .send()
                .context("panic request")?
                .error_for_status()
                .context("panic status")?;
            println!("Panic alert raised for {}", subject);
        }

        Commands::Memo { command } => match command {
            MemoCommands::Send {
                subject,
                file,
                device_key,
            } => {
                let key = require_device_key(device_key)?;
                let bytes = std::fs::read(&file)
                    .with_context(|| format!("read {}", file.display()))?;
                let audio = {
                    use base64::Engine;
                    base64::engine::general_purpose::STANDARD.encode(&bytes)
                };

                let resp: serde_json::Value = http()
                    .post(format!("{}/memos", server))
                    .header(DEVICE_KEY_HEADER, key)
                    .json(&serde_json::json!({"subject": subject, "audio": audio}))
                    .send()
                    .context("memo upload request")?
                    .error_for_status()
                    .context("memo upload status")?
                    .json()
                    .context("parse memo response")?;

                let id = resp.get("id").and_then(|v| v.as_str()).unwrap_or("<id>");
                println!("Uploaded memo {} ({} bytes)", id, bytes.len());
            }
            MemoCommands::List {
                subject,
                device_key,
                json,
            } => {
                let key = require_device_key(device_key)?;
                let memos: serde_json::Value = http()
                    .get(format!("{}/memos/{}", server, subject))
                    .header(DEVICE_KEY_HEADER, key)
                    .send()
                    .context("memo list request")?
                    .error_for_status()
                    .context("memo list status")?
                    .json()
                    .context("parse memo list")?;

                if json {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&memos).context("serialize memos")?
                    );
                } else {
                    for memo in memos.as_array().context("memo list not an array")? {
                        println!(
                            "{} {} {}B",
                            memo.get("recorded_at").and_then(|v| v.as_str()).unwrap_or(""),
                            memo.get("id").and_then(|v| v.as_str()).unwrap_or(""),
                            memo.get("bytes").and_then(|v| v.as_u64()).unwrap_or(0),
                        );
                    }
                }
            }
        },

        Commands::Contacts { command } => match command {
            ContactCommands::List {
                subject,
                device_key,
                json,
            } => {
                let key = require_device_key(device_key)?;
                let contacts: serde_json::Value = http()
                    .get(format!("{}/contacts/{}", server, subject))
                    .header(DEVICE_KEY_HEADER, key)
                    .send()
                    .context("contacts list request")?
                    .error_for_status()
                    .context("contacts list status")?
                    .json()
                    .context("parse contacts list")?;

                if json {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&contacts).context("serialize contacts")?
                    );
                } else {
                    for contact in contacts.as_array().context("contacts list not an array")? {
                        println!(
                            "{} {} {}",
                            contact.get("id").and_then(|v| v.as_str()).unwrap_or(""),
                            contact.get("name").and_then(|v| v.as_str()).unwrap_or(""),
                            contact.get("phone").and_then(|v| v.as_str()).unwrap_or(""),
                        );
                    }
                }
            }
            ContactCommands::Add {
                subject,
                name,
                phone,
                device_key,
            } => {
                let key = require_device_key(device_key)?;
                let contact: serde_json::Value = http()
                    .post(format!("{}/contacts/{}", server, subject))
                    .header(DEVICE_KEY_HEADER, key)
                    .json(&serde_json::json!({"name": name, "phone": phone}))
                    .send()
                    .context("contact add request")?
                    .error_for_status()
                    .context("contact add status")?
                    .json()
                    .context("parse contact")?;

                let id = contact.get("id").and_then(|v| v.as_str()).unwrap_or("<id>");
                println!("Added contact {} ({})", name, id);
            }
            ContactCommands::Remove {
                subject,
                contact_id,
                device_key,
            } => {
                let key = require_device_key(device_key)?;
                http()
                    .delete(format!("{}/contacts/{}/{}", server, subject, contact_id))
                    .header(DEVICE_KEY_HEADER, key)
                    .send()
                    .context("contact remove request")?
                    .error_for_status()
                    .context("contact remove status")?;
                println!("Removed contact {}", contact_id);
            }
        },
    }

    Ok(())
}

const DEVICE_KEY_HEADER: &str = "x-device-key";

fn http() -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .user_agent("vigia")
        .build()
        .expect("reqwest client")
}

fn require_device_key(flag: Option<String>) -> Result<String> {
    if let Some(key) = flag {
        return Ok(key);
    }
    std::env::var("VIGIA_DEVICE_KEY")
        .context("no device key (pass --device-key or set VIGIA_DEVICE_KEY)")
}
