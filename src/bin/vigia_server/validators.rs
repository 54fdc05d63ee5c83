use anyhow::Result;

// Unix ms for 9999-12-31T23:59:59Z; anything later is a corrupt clock.
const MAX_CAPTURED_AT_MS: i64 = 253_402_300_799_000;

pub(crate) fn validate_subject(subject: &str) -> Result<()> {
    if subject.is_empty() {
        return Err(anyhow::anyhow!("subject is required"));
    }
    if !subject
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(anyhow::anyhow!("subject must be alphanumeric, '-' or '_'"));
    }
    Ok(())
}

pub(crate) fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(anyhow::anyhow!("latitude must be within [-90, 90]"));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(anyhow::anyhow!("longitude must be within [-180, 180]"));
    }
    Ok(())
}

pub(crate) fn validate_captured_at(captured_at: i64) -> Result<()> {
    if !(0..=MAX_CAPTURED_AT_MS).contains(&captured_at) {
        return Err(anyhow::anyhow!(
            "captured_at must be unix epoch milliseconds"
        ));
    }
    Ok(())
}

pub(crate) fn validate_contact_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(anyhow::anyhow!("contact name cannot be empty"));
    }
    if name.len() > 200 {
        return Err(anyhow::anyhow!("contact name too long"));
    }
    Ok(())
}

pub(crate) fn validate_contact_phone(phone: &str) -> Result<()> {
    if phone.is_empty() {
        return Err(anyhow::anyhow!("contact phone cannot be empty"));
    }
    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'))
    {
        return Err(anyhow::anyhow!("contact phone has invalid characters"));
    }
    Ok(())
}
