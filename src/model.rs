mod config;
mod sample;

pub use self::config::AuthConfig;
pub use self::sample::{
    LocationSample, TrackedPoint, day_bucket_for_ms, now_ms, now_ts, today_bucket,
};
