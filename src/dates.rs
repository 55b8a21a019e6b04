// SPDX-License-Identifier: MIT

//! Shared helpers for calendar math and timestamp formatting.

use chrono::{DateTime, Datelike, Duration, NaiveDate, SecondsFormat, Utc};

/// Monday..Sunday bounds of the ISO week containing `date`.
///
/// Sunday belongs to the week that started the preceding Monday.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let days_from_monday = date.weekday().num_days_from_monday() as i64;
    let week_start = date - Duration::days(days_from_monday);
    (week_start, week_start + Duration::days(6))
}

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_week_bounds_midweek() {
        // 2024-01-17 is a Wednesday
        let (start, end) = week_bounds(d("2024-01-17"));
        assert_eq!(start, d("2024-01-15"));
        assert_eq!(end, d("2024-01-21"));
    }

    #[test]
    fn test_week_bounds_monday_is_its_own_start() {
        let (start, end) = week_bounds(d("2024-01-15"));
        assert_eq!(start, d("2024-01-15"));
        assert_eq!(end, d("2024-01-21"));
    }

    #[test]
    fn test_week_bounds_sunday_belongs_to_preceding_monday() {
        // 2024-01-21 is a Sunday: same week as the 15th, not the start of a new one
        let (start, end) = week_bounds(d("2024-01-21"));
        assert_eq!(start, d("2024-01-15"));
        assert_eq!(end, d("2024-01-21"));
    }

    #[test]
    fn test_week_bounds_across_month_boundary() {
        // 2024-03-01 is a Friday; its week started in February
        let (start, end) = week_bounds(d("2024-03-01"));
        assert_eq!(start, d("2024-02-26"));
        assert_eq!(end, d("2024-03-03"));
    }
}
