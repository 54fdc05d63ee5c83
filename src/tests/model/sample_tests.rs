use time::{Date, Month, Time};

use super::*;

fn ms_for(date: Date) -> i64 {
    let instant = date.with_time(Time::MIDNIGHT).assume_utc();
    instant.unix_timestamp() * 1_000
}

#[test]
fn day_bucket_is_zero_padded_utc_calendar_day() {
    let date = Date::from_calendar_date(2026, Month::January, 5).expect("date");
    assert_eq!(day_bucket_for_ms(ms_for(date)), "20260105");

    let date = Date::from_calendar_date(2026, Month::August, 6).expect("date");
    assert_eq!(day_bucket_for_ms(ms_for(date)), "20260806");
}

#[test]
fn day_bucket_of_epoch() {
    assert_eq!(day_bucket_for_ms(0), "19700101");
}

#[test]
fn last_millisecond_stays_in_its_day() {
    let date = Date::from_calendar_date(2026, Month::August, 6).expect("date");
    let ms = ms_for(date);
    assert_eq!(day_bucket_for_ms(ms + 24 * 60 * 60 * 1_000 - 1), "20260806");
    assert_eq!(day_bucket_for_ms(ms + 24 * 60 * 60 * 1_000), "20260807");
}

#[test]
fn tracked_point_drops_storage_fields() {
    let sample = LocationSample {
        subject: "u1".to_string(),
        latitude: 1.5,
        longitude: -2.5,
        captured_at: 42,
        day: "20260806".to_string(),
    };
    let point = TrackedPoint::from(sample);
    assert_eq!(point.latitude, 1.5);
    assert_eq!(point.longitude, -2.5);
    assert_eq!(point.captured_at, 42);

    let json = serde_json::to_value(&point).expect("serialize point");
    assert!(json.get("subject").is_none());
    assert!(json.get("day").is_none());
}
