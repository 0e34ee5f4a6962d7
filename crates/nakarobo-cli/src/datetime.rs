/*
[INPUT]:  Timestamps from the API and the current clock
[OUTPUT]: Business day, formatted dates, countdowns, relative times
[POS]:    Presentation layer - date helpers
[UPDATE]: When the daily rollover or date display rules change
*/

use std::fmt::Display;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Timelike, Utc};
use serde_json::Value;

/// Quests and check-ins roll over at 08:00 UTC+8
const BUSINESS_OFFSET_HOURS: i64 = 8;
const ROLLOVER_HOUR: u32 = 8;

/// Current business day
pub fn business_day() -> NaiveDate {
    business_day_at(Utc::now())
}

/// Business day for `now`: the UTC+8 calendar date, minus one before 08:00
pub fn business_day_at(now: DateTime<Utc>) -> NaiveDate {
    let local = now + Duration::hours(BUSINESS_OFFSET_HOURS);
    let date = local.date_naive();
    if local.hour() < ROLLOVER_HOUR {
        date.pred_opt().unwrap_or(date)
    } else {
        date
    }
}

/// Start of the next business day, in UTC
pub fn next_rollover_at(now: DateTime<Utc>) -> DateTime<Utc> {
    let local = now + Duration::hours(BUSINESS_OFFSET_HOURS);
    let next_day = business_day_at(now).succ_opt().unwrap_or(local.date_naive());
    let start = next_day
        .and_hms_opt(ROLLOVER_HOUR, 0, 0)
        .unwrap_or_default()
        .and_utc();
    start - Duration::hours(BUSINESS_OFFSET_HOURS)
}

/// `YYYY-MM-DD`, or `YYYY-MM-DD HH:MM:SS` with `include_time`
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, include_time: bool) -> String
where
    Tz::Offset: Display,
{
    if include_time {
        date.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        date.format("%Y-%m-%d").to_string()
    }
}

/// Read an API timestamp: RFC 3339 string, or epoch milliseconds (number or string)
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| s.parse::<i64>().ok().and_then(DateTime::from_timestamp_millis)),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

/// Time left until a deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub is_expired: bool,
}

impl std::fmt::Display for Countdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_expired {
            return write!(f, "expired");
        }
        write!(
            f,
            "{}d {:02}:{:02}:{:02}",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

pub fn countdown(target: DateTime<Utc>) -> Countdown {
    countdown_at(target, Utc::now())
}

pub fn countdown_at(target: DateTime<Utc>, now: DateTime<Utc>) -> Countdown {
    let diff = target - now;
    if diff <= Duration::zero() {
        return Countdown {
            is_expired: true,
            ..Countdown::default()
        };
    }

    let total = diff.num_seconds();
    Countdown {
        days: total / 86_400,
        hours: (total % 86_400) / 3_600,
        minutes: (total % 3_600) / 60,
        seconds: total % 60,
        is_expired: false,
    }
}

pub fn format_relative_time(date: DateTime<Utc>) -> String {
    format_relative_time_at(date, Utc::now())
}

/// "3 days ago", "1 hour ago", ... "Just now"
pub fn format_relative_time_at(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now - date;
    let units = [
        (diff.num_days(), "day"),
        (diff.num_hours(), "hour"),
        (diff.num_minutes(), "minute"),
    ];
    for (count, unit) in units {
        if count > 0 {
            let plural = if count > 1 { "s" } else { "" };
            return format!("{count} {unit}{plural} ago");
        }
    }
    "Just now".to_string()
}
