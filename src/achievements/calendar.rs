// ABOUTME: Calendar helpers for bucketing instants into local days and trailing windows
// ABOUTME: All windows are inclusive ranges of local calendar dates ending at a given day
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, Timelike, Utc, Weekday};

/// Local calendar date of an instant in the user's timezone
#[must_use]
pub fn local_date(instant: DateTime<Utc>, tz: FixedOffset) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Local hour of day (0-23) of an instant in the user's timezone
#[must_use]
pub fn local_hour(instant: DateTime<Utc>, tz: FixedOffset) -> u32 {
    instant.with_timezone(&tz).hour()
}

/// Inclusive range of `days` calendar dates ending at `end`
///
/// A zero-length window is treated as the single day `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    /// First date in the window
    pub start: NaiveDate,
    /// Last date in the window
    pub end: NaiveDate,
}

impl DayWindow {
    /// Trailing window of `days` dates ending at (and including) `end`
    ///
    /// Clamps to the earliest representable date.
    #[must_use]
    pub fn trailing(end: NaiveDate, days: u32) -> Self {
        let span = Days::new(u64::from(days.max(1) - 1));
        Self {
            start: end.checked_sub_days(span).unwrap_or(NaiveDate::MIN),
            end,
        }
    }

    /// Window of `days` dates starting at (and including) `start`
    ///
    /// Clamps to the latest representable date.
    #[must_use]
    pub fn starting(start: NaiveDate, days: u32) -> Self {
        let span = Days::new(u64::from(days.max(1) - 1));
        Self {
            start,
            end: start.checked_add_days(span).unwrap_or(NaiveDate::MAX),
        }
    }

    /// Whether `date` falls inside the window
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every date in the window, oldest first
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

/// Monday-to-Sunday calendar week containing `date`
#[must_use]
pub fn week_window(date: NaiveDate) -> DayWindow {
    let offset = Days::new(u64::from(date.weekday().num_days_from_monday()));
    DayWindow::starting(date.checked_sub_days(offset).unwrap_or(NaiveDate::MIN), 7)
}

/// Parse a short weekday token such as `mon`, `Tue` or `wednesday`
#[must_use]
pub fn parse_weekday(token: &str) -> Option<Weekday> {
    token.trim().parse::<Weekday>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_local_date_respects_offset() {
        // 23:30 UTC on March 1st is already March 2nd in UTC+2
        let instant = Utc.with_ymd_and_hms(2025, 3, 1, 23, 30, 0).unwrap();
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let minus_five = FixedOffset::west_opt(5 * 3600).unwrap();

        assert_eq!(local_date(instant, plus_two), date(2025, 3, 2));
        assert_eq!(local_date(instant, minus_five), date(2025, 3, 1));
        assert_eq!(local_hour(instant, plus_two), 1);
    }

    #[test]
    fn test_trailing_window_is_inclusive() {
        let window = DayWindow::trailing(date(2025, 3, 10), 7);
        assert_eq!(window.start, date(2025, 3, 4));
        assert!(window.contains(date(2025, 3, 10)));
        assert!(window.contains(date(2025, 3, 4)));
        assert!(!window.contains(date(2025, 3, 3)));
        assert_eq!(window.dates().count(), 7);
    }

    #[test]
    fn test_oversized_windows_clamp_to_date_range() {
        let trailing = DayWindow::trailing(date(2025, 3, 10), u32::MAX);
        assert_eq!(trailing.start, NaiveDate::MIN);
        assert!(trailing.contains(date(1900, 1, 1)));

        let forward = DayWindow::starting(date(2025, 3, 10), u32::MAX);
        assert_eq!(forward.end, NaiveDate::MAX);
    }

    #[test]
    fn test_zero_day_window_is_single_day() {
        let window = DayWindow::trailing(date(2025, 3, 10), 0);
        assert_eq!(window.start, window.end);
    }

    #[test]
    fn test_week_window_starts_monday() {
        // 2025-03-13 is a Thursday
        let week = week_window(date(2025, 3, 13));
        assert_eq!(week.start, date(2025, 3, 10));
        assert_eq!(week.end, date(2025, 3, 16));
    }

    #[test]
    fn test_parse_weekday_tokens() {
        assert_eq!(parse_weekday("mon"), Some(Weekday::Mon));
        assert_eq!(parse_weekday(" Friday "), Some(Weekday::Fri));
        assert_eq!(parse_weekday("someday"), None);
    }
}
