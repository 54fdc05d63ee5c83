use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One recorded position, as stored in the ledger.
///
/// `captured_at` is unix epoch milliseconds from the recorder; `day` is the
/// UTC calendar day (`YYYYMMDD`) the sample belongs to, derived from
/// `captured_at` so the write path and the read path can never disagree
/// about the bucket.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LocationSample {
    pub subject: String,
    pub latitude: f64,
    pub longitude: f64,
    pub captured_at: i64,
    pub day: String,
}

/// Wire form of a sample on the read path: the viewer gets coordinates and
/// capture time only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackedPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub captured_at: i64,
}

impl From<LocationSample> for TrackedPoint {
    fn from(sample: LocationSample) -> Self {
        Self {
            latitude: sample.latitude,
            longitude: sample.longitude,
            captured_at: sample.captured_at,
        }
    }
}

pub fn now_ms() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

pub fn now_ts() -> String {
    OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "<time>".to_string())
}

/// UTC calendar-day bucket (`YYYYMMDD`) for an epoch-milliseconds instant.
///
/// Out-of-range instants collapse to the unix epoch day rather than failing;
/// the recorder routes validate timestamps before they get here.
pub fn day_bucket_for_ms(ms: i64) -> String {
    let instant = OffsetDateTime::from_unix_timestamp_nanos(i128::from(ms) * 1_000_000)
        .unwrap_or(OffsetDateTime::UNIX_EPOCH);
    let date = instant.date();
    format!(
        "{:04}{:02}{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Today's bucket at call time. The read path keys on this.
pub fn today_bucket() -> String {
    day_bucket_for_ms(now_ms())
}

#[cfg(test)]
#[path = "../tests/model/sample_tests.rs"]
mod tests;
