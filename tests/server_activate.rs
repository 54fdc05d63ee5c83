mod common;

use anyhow::{Context, Result};

#[test]
fn activation_returns_a_shareable_tracking_link() -> Result<()> {
    let server = common::spawn_server()?;
    let client = reqwest::blocking::Client::new();

    let resp: serde_json::Value = client
        .post(format!("{}/activate-tracking", server.base_url))
        .json(&serde_json::json!({
            "subject": "u1",
            "presented_secret": common::ACTIVATION_SECRET,
        }))
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
    assert!(
        link.starts_with(&format!("{}/map?token=", common::VIEWER_URL)),
        "unexpected link shape: {}",
        link
    );

    let token = link.split("token=").nth(1).context("token missing")?;
    assert!(!token.is_empty());

    let expires_at = resp
        .get("expires_at")
        .and_then(|v| v.as_i64())
        .context("expires_at missing")?;
    let now_secs = common::now_ms() / 1_000;
    let lifetime = expires_at - now_secs;
    // Two hours, allowing a few seconds of test slop.
    assert!(
        (7_190..=7_200).contains(&lifetime),
        "unexpected token lifetime: {}s",
        lifetime
    );

    Ok(())
}

#[test]
fn wrong_activation_secret_is_forbidden() -> Result<()> {
    let server = common::spawn_server()?;
    let client = reqwest::blocking::Client::new();

    let resp = client
        .post(format!("{}/activate-tracking", server.base_url))
        .json(&serde_json::json!({"subject": "u1", "presented_secret": "nope"}))
        .send()
        .context("activate request")?;
    assert_eq!(resp.status(), reqwest::StatusCode::FORBIDDEN);

    Ok(())
}

#[test]
fn blank_subject_is_a_bad_request() -> Result<()> {
    let server = common::spawn_server()?;
    let client = reqwest::blocking::Client::new();

    for subject in ["", "   "] {
        let resp = client
            .post(format!("{}/activate-tracking", server.base_url))
            .json(&serde_json::json!({
                "subject": subject,
                "presented_secret": common::ACTIVATION_SECRET,
            }))
            .send()
            .context("activate request")?;
        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    }

    Ok(())
}

#[test]
fn path_unsafe_subject_is_a_bad_request() -> Result<()> {
    let server = common::spawn_server()?;
    let client = reqwest::blocking::Client::new();

    let resp = client
        .post(format!("{}/activate-tracking", server.base_url))
        .json(&serde_json::json!({
            "subject": "../u1",
            "presented_secret": common::ACTIVATION_SECRET,
        }))
        .send()
        .context("activate request")?;
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);

    Ok(())
}

#[test]
fn wrong_secret_wins_over_missing_subject() -> Result<()> {
    let server = common::spawn_server()?;
    let client = reqwest::blocking::Client::new();

    // The secret is checked first so the response leaks nothing about
    // subjects.
    let resp = client
        .post(format!("{}/activate-tracking", server.base_url))
        .json(&serde_json::json!({"subject": "", "presented_secret": "nope"}))
        .send()
        .context("activate request")?;
    assert_eq!(resp.status(), reqwest::StatusCode::FORBIDDEN);

    Ok(())
}
