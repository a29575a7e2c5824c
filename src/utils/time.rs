// src/utils/time.rs

//! Date parsing and Pacific time localization.
//!
//! Bill histories print bare dates like `Feb 4, 2019`. They are attached to
//! midnight in Carson City, which observes US Pacific time.

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc, Weekday,
};

const PST_OFFSET_SECS: i32 = -8 * 3600;
const PDT_OFFSET_SECS: i32 = -7 * 3600;

/// Parse a `%b %d, %Y` date from the first three whitespace tokens of `text`.
pub fn parse_short_date(text: &str) -> Option<NaiveDate> {
    let tokens: Vec<&str> = text.split_whitespace().take(3).collect();
    if tokens.len() < 3 {
        return None;
    }
    NaiveDate::parse_from_str(&tokens.join(" "), "%b %d, %Y").ok()
}

/// Midnight of `date` in US Pacific time.
pub fn pacific_midnight(date: NaiveDate) -> DateTime<FixedOffset> {
    let secs = if in_daylight_time(date) {
        PDT_OFFSET_SECS
    } else {
        PST_OFFSET_SECS
    };
    let offset = FixedOffset::east_opt(secs).unwrap_or(Utc.fix());
    let naive = date.and_time(NaiveTime::MIN);
    offset
        .from_local_datetime(&naive)
        .single()
        .unwrap_or_else(|| offset.from_utc_datetime(&naive))
}

/// Whether local midnight of `date` falls inside daylight saving time.
///
/// Transitions happen at 02:00, so midnight on the start day is still
/// standard time and midnight on the end day is still daylight time.
fn in_daylight_time(date: NaiveDate) -> bool {
    let year = date.year();
    let (start, end) = if year >= 2007 {
        (
            nth_weekday(year, 3, Weekday::Sun, 2),
            nth_weekday(year, 11, Weekday::Sun, 1),
        )
    } else {
        (
            nth_weekday(year, 4, Weekday::Sun, 1),
            last_weekday(year, 10, Weekday::Sun),
        )
    };
    match (start, end) {
        (Some(start), Some(end)) => date > start && date <= end,
        _ => false,
    }
}

fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u8) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
}

fn last_weekday(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    nth_weekday(year, month, weekday, 5).or_else(|| nth_weekday(year, month, weekday, 4))
}
