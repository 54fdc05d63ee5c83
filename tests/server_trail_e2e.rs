mod common;

use anyhow::{Context, Result};

/// The whole guardian flow: activate with the pre-shared secret, share the
/// link, record a morning of samples, watch the trail come back in order,
/// and get turned away once the link goes stale.
#[test]
fn guardian_activates_and_follows_a_trail() -> Result<()> {
    let server = common::spawn_server()?;
    let client = reqwest::blocking::Client::new();

    // Activate.
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
    let token = link
        .split("token=")
        .nth(1)
        .context("token missing from link")?
        .to_string();

    // Three samples at increasing timestamps.
    let base = common::now_ms();
    let times = [base - 30_000, base - 20_000, base - 10_000];
    for (i, t) in times.iter().enumerate() {
        common::report(
            &client,
            &server.base_url,
            "u1",
            -23.55 + i as f64 * 0.001,
            -46.63,
            *t,
        )?;
    }

    // The viewer polls and sees exactly those three, ascending.
    let points: Vec<serde_json::Value> = client
        .get(format!("{}/map-data", server.base_url))
        .header(reqwest::header::AUTHORIZATION, common::bearer(&token))
        .send()
        .context("map-data request")?
        .error_for_status()
        .context("map-data status")?
        .json()
        .context("parse trail")?;

    let got: Vec<i64> = points
        .iter()
        .map(|p| p.get("captured_at").and_then(|v| v.as_i64()).unwrap_or(0))
        .collect();
    assert_eq!(got, times.to_vec());

    // Two hours later (forced clock): the same read path rejects with the
    // "expired" message so the viewer can ask for a fresh link.
    #[derive(serde::Serialize)]
    struct Claims {
        sub: String,
        iat: i64,
        exp: i64,
    }
    let now = common::now_ms() / 1_000;
    let stale = jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &Claims {
            sub: "u1".to_string(),
            iat: now - 7_201,
            exp: now - 1,
        },
        &jsonwebtoken::EncodingKey::from_secret(common::SIGNING_SECRET.as_bytes()),
    )
    .context("sign stale token")?;

    let resp = client
        .get(format!("{}/map-data", server.base_url))
        .header(reqwest::header::AUTHORIZATION, common::bearer(&stale))
        .send()
        .context("map-data request")?;
    assert_eq!(resp.status(), reqwest::StatusCode::FORBIDDEN);
    let body: serde_json::Value = resp.json().context("parse error body")?;
    assert!(
        body.get("error")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .contains("expired")
    );

    Ok(())
}
