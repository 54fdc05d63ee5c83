use anyhow::{Context, Result};

pub const ACTIVATION_SECRET_VAR: &str = "VIGIA_ACTIVATION_SECRET";
pub const SIGNING_SECRET_VAR: &str = "VIGIA_SIGNING_SECRET";
pub const DEVICE_KEY_VAR: &str = "VIGIA_DEVICE_KEY";
pub const VIEWER_URL_VAR: &str = "VIGIA_VIEWER_URL";

const DEFAULT_VIEWER_URL: &str = "http://localhost:3000";

/// Process-wide authentication material, collected once at startup.
///
/// The issuer and the gate receive this struct explicitly; nothing reads
/// the environment after startup, so rotating a secret means restarting
/// the process (which is also the only way to invalidate outstanding
/// tracking tokens early).
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// Pre-shared secret that authorizes minting a tracking token.
    pub activation_secret: String,

    /// HS256 signing secret for tracking tokens.
    pub signing_secret: String,

    /// Pre-shared key presented by the recorder (mobile) client on the
    /// ingestion routes.
    pub device_key: String,

    /// Base URL of the map viewer embedded in tracking links.
    pub viewer_url: String,
}

impl AuthConfig {
    /// Read the configuration from the environment. Missing secrets are a
    /// startup error; the server must refuse to start without them.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            activation_secret: require_var(ACTIVATION_SECRET_VAR)?,
            signing_secret: require_var(SIGNING_SECRET_VAR)?,
            device_key: require_var(DEVICE_KEY_VAR)?,
            viewer_url: std::env::var(VIEWER_URL_VAR)
                .unwrap_or_else(|_| DEFAULT_VIEWER_URL.to_string()),
        })
    }
}

fn require_var(name: &str) -> Result<String> {
    let value = std::env::var(name)
        .with_context(|| format!("missing required environment variable {}", name))?;
    if value.trim().is_empty() {
        anyhow::bail!("environment variable {} is set but empty", name);
    }
    Ok(value)
}
