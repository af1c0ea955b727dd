//! Time windows and fixed parameters of the admin analytics reports.
//!
//! All functions take "now" as an argument so a report computed twice with
//! the same clock value produces identical windows.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::lists::DEFAULT_LISTS_PER_USER;
use crate::types::Timestamp;

/// Rows returned by `logs_errors` when no limit is given.
pub const DEFAULT_ERROR_LIMIT: i64 = 10;
/// Upper bound for `logs_errors?limit=`.
pub const MAX_ERROR_LIMIT: i64 = 50;
/// Number of movies in the "top by views" ranking.
pub const TOP_MOVIES_LIMIT: i64 = 10;
/// Number of queries in the search rankings.
pub const SEARCH_STATS_LIMIT: i64 = 5;
/// Number of paths in the "top pages" ranking.
pub const TOP_PAGES_LIMIT: i64 = 10;
/// Length of the "recent" window used by user activity statistics.
pub const ACTIVITY_WINDOW_DAYS: i64 = 7;

/// Window selector for the "top movies by views" ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReportPeriod {
    #[default]
    #[serde(rename = "24h")]
    Last24Hours,
    #[serde(rename = "7d")]
    Last7Days,
}

impl ReportPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            ReportPeriod::Last24Hours => "24h",
            ReportPeriod::Last7Days => "7d",
        }
    }

    pub fn duration(self) -> Duration {
        match self {
            ReportPeriod::Last24Hours => Duration::hours(24),
            ReportPeriod::Last7Days => Duration::days(ACTIVITY_WINDOW_DAYS),
        }
    }

    /// Inclusive lower bound of the window ending at `now`.
    pub fn since(self, now: Timestamp) -> Timestamp {
        now - self.duration()
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportPeriod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "24h" => Ok(ReportPeriod::Last24Hours),
            "7d" => Ok(ReportPeriod::Last7Days),
            other => Err(CoreError::Validation(format!(
                "period must be '24h' or '7d', got '{other}'"
            ))),
        }
    }
}

/// Half-open `[start, end)` interval of UTC instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

/// The calendar day containing `now` in `now`'s own time zone:
/// `[today 00:00, tomorrow 00:00)`.
pub fn day_window<Tz: TimeZone>(now: &DateTime<Tz>) -> TimeWindow {
    let today = now.date_naive();
    let fallback = now.offset().fix();
    TimeWindow {
        start: local_midnight(&now.timezone(), today, fallback),
        end: local_midnight(&now.timezone(), next_day(today), fallback),
    }
}

/// The seven days before today plus today itself:
/// `[today 00:00 - 7 days, tomorrow 00:00)`.
///
/// Always a superset of [`day_window`] for the same `now`.
pub fn week_window<Tz: TimeZone>(now: &DateTime<Tz>) -> TimeWindow {
    let today = now.date_naive();
    let fallback = now.offset().fix();
    let week_start = today - Duration::days(ACTIVITY_WINDOW_DAYS);
    TimeWindow {
        start: local_midnight(&now.timezone(), week_start, fallback),
        end: local_midnight(&now.timezone(), next_day(today), fallback),
    }
}

/// Rolling lower bound used by "active users": `now - 7 days`.
pub fn activity_since(now: Timestamp) -> Timestamp {
    now - Duration::days(ACTIVITY_WINDOW_DAYS)
}

/// Clamp `logs_errors?limit=` to `1..=50`, defaulting to 10.
pub fn clamp_error_limit(limit: Option<i64>) -> i64 {
    crate::search::clamp_limit(limit, DEFAULT_ERROR_LIMIT, MAX_ERROR_LIMIT)
}

/// Display-only estimate of lists created by hand: every registration adds
/// the default lists, so anything above that was created by a user.
pub fn users_created_lists(lists_count: i64, users_count: i64) -> i64 {
    lists_count - users_count * DEFAULT_LISTS_PER_USER
}

fn next_day(date: NaiveDate) -> NaiveDate {
    date.succ_opt().unwrap_or(date)
}

/// Resolve local midnight of `date` to UTC.
///
/// When midnight does not exist in the zone (a DST jump at 00:00), the
/// offset that was in effect at `now` is used instead.
fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate, fallback: chrono::FixedOffset) -> Timestamp {
    let naive = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&naive).earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        None => {
            let shifted = naive - Duration::seconds(i64::from(fallback.local_minus_utc()));
            Utc.from_utc_datetime(&shifted)
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::FixedOffset;

    use super::*;

    fn at(offset_hours: i32, y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(offset_hours * 3600)
            .unwrap()
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
    }

    #[test]
    fn period_parses_known_values_only() {
        assert_eq!("24h".parse::<ReportPeriod>().unwrap(), ReportPeriod::Last24Hours);
        assert_eq!("7d".parse::<ReportPeriod>().unwrap(), ReportPeriod::Last7Days);
        assert_matches!("30d".parse::<ReportPeriod>(), Err(CoreError::Validation(_)));
        assert_matches!("".parse::<ReportPeriod>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn period_since_subtracts_window() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        assert_eq!(
            ReportPeriod::Last24Hours.since(now),
            Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap()
        );
        assert_eq!(
            ReportPeriod::Last7Days.since(now),
            Utc.with_ymd_and_hms(2026, 3, 3, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn period_serializes_as_short_code() {
        assert_eq!(serde_json::to_string(&ReportPeriod::Last7Days).unwrap(), "\"7d\"");
    }

    #[test]
    fn day_window_uses_local_midnight() {
        // 01:30 at UTC+3 is still the previous day in UTC.
        let now = at(3, 2026, 3, 10, 1, 30);
        let window = day_window(&now);
        assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 3, 9, 21, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2026, 3, 10, 21, 0, 0).unwrap());
    }

    #[test]
    fn week_window_contains_day_window() {
        let now = at(0, 2026, 1, 1, 0, 0);
        let day = day_window(&now);
        let week = week_window(&now);
        assert!(week.start <= day.start);
        assert_eq!(week.end, day.end);
        assert_eq!(week.end - week.start, Duration::days(8));
    }

    #[test]
    fn activity_since_is_rolling() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 15, 45, 0).unwrap();
        assert_eq!(activity_since(now), Utc.with_ymd_and_hms(2026, 3, 3, 15, 45, 0).unwrap());
    }

    #[test]
    fn error_limit_is_clamped() {
        assert_eq!(clamp_error_limit(None), 10);
        assert_eq!(clamp_error_limit(Some(0)), 1);
        assert_eq!(clamp_error_limit(Some(500)), 50);
    }

    #[test]
    fn users_created_lists_subtracts_defaults() {
        assert_eq!(users_created_lists(10, 3), 1);
        assert_eq!(users_created_lists(0, 2), -6);
    }
}
