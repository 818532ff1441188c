use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};

const MS_PER_MINUTE: i64 = 60_000;

/// Shown in place of a time that could not be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

/// Compact elapsed time, e.g. `(2 days 3 hrs 14 min ago)`.
pub fn relative_time(past: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff_ms = (now - past).num_milliseconds();
    if diff_ms < 0 {
        return "in the future".to_string();
    }

    let total_minutes = diff_ms / MS_PER_MINUTE;
    let total_hours = total_minutes / 60;
    let days = total_hours / 24;
    let hours = total_hours % 24;
    let minutes = total_minutes % 60;

    let mut parts = Vec::with_capacity(3);
    if days > 0 {
        parts.push(format!("{days} day{}", plural(days)));
    }
    if hours > 0 || days > 0 {
        parts.push(format!("{hours} hr{}", plural(hours)));
    }
    parts.push(format!("{minutes} min ago"));

    format!("({})", parts.join(" "))
}

fn plural(n: i64) -> &'static str {
    if n > 1 {
        "s"
    } else {
        ""
    }
}

pub fn from_unix_seconds(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

/// Local time of day, used for chart labels.
pub fn time_label<Tz>(at: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.with_timezone(tz).format("%-I:%M:%S %p").to_string()
}

/// Local date and time, used in the result text.
pub fn datetime_label<Tz>(at: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.with_timezone(tz)
        .format("%-m/%-d/%Y, %-I:%M:%S %p")
        .to_string()
}
