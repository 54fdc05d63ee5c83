//! Tracking-token issuance and verification.
//!
//! The token is the only record of an activation: nothing is persisted
//! server-side, so a token stays usable for unlimited reads until it
//! expires. Rotating the signing secret invalidates every outstanding
//! token at once; there is no per-token revocation.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

use crate::model::AuthConfig;

/// Fixed token lifetime: two hours, not configurable per call.
pub const TOKEN_LIFETIME_SECS: i64 = 2 * 60 * 60;

/// Claims embedded in every tracking token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingClaims {
    /// Subject — the tracked user's identifier.
    pub sub: String,
    /// Issued-at (unix timestamp, seconds).
    pub iat: i64,
    /// Expiration (unix timestamp, seconds); always `iat + 7200`.
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("invalid activation secret")]
    InvalidActivationSecret,

    #[error("subject is required")]
    MissingSubject,

    #[error("tracking token malformed")]
    TokenMalformed,

    #[error("tracking link expired")]
    TokenExpired,

    #[error("tracking token signature invalid")]
    SignatureInvalid,

    #[error("token signing failed: {0}")]
    Crypto(String),
}

/// A successful activation: the signed token plus the shareable viewer URL
/// that embeds it.
#[derive(Debug, Clone)]
pub struct Activation {
    pub token: String,
    pub tracking_link: String,
    pub expires_at: i64,
}

/// Mint a tracking token for `subject` if `presented_secret` matches the
/// pre-shared activation secret.
///
/// Neither failure mode leaks whether a subject exists: the secret is
/// checked before the subject is even looked at.
pub fn activate(
    subject: &str,
    presented_secret: &str,
    config: &AuthConfig,
) -> Result<Activation, AccessError> {
    if presented_secret != config.activation_secret {
        return Err(AccessError::InvalidActivationSecret);
    }

    let subject = subject.trim();
    if subject.is_empty() {
        return Err(AccessError::MissingSubject);
    }

    let issued_at = OffsetDateTime::now_utc().unix_timestamp();
    let claims = TrackingClaims {
        sub: subject.to_string(),
        iat: issued_at,
        exp: issued_at + TOKEN_LIFETIME_SECS,
    };
    let token = sign_claims(&claims, &config.signing_secret)?;

    Ok(Activation {
        tracking_link: tracking_link(&config.viewer_url, &token),
        token,
        expires_at: claims.exp,
    })
}

/// Verify a tracking token and return the subject it authorizes reads for.
///
/// Stateless: signature and expiry only, no storage lookup. `TokenExpired`
/// is distinguished from the other rejections so the read path can tell the
/// viewer to ask for a fresh link.
pub fn authorize_read(token: &str, signing_secret: &str) -> Result<String, AccessError> {
    let key = DecodingKey::from_secret(signing_secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["sub", "exp", "iat"]);

    jsonwebtoken::decode::<TrackingClaims>(token, &key, &validation)
        .map(|data| data.claims.sub)
        .map_err(|err| match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AccessError::TokenExpired,
            jsonwebtoken::errors::ErrorKind::InvalidSignature => AccessError::SignatureInvalid,
            _ => AccessError::TokenMalformed,
        })
}

/// Shareable URL of the form `<viewer-base>/map?token=<token>`.
pub fn tracking_link(viewer_url: &str, token: &str) -> String {
    format!("{}/map?token={}", viewer_url.trim_end_matches('/'), token)
}

fn sign_claims(claims: &TrackingClaims, signing_secret: &str) -> Result<String, AccessError> {
    let key = EncodingKey::from_secret(signing_secret.as_bytes());
    jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &key)
        .map_err(|err| AccessError::Crypto(err.to_string()))
}

#[cfg(test)]
#[path = "tests/access_tests.rs"]
mod tests;
