//! Calendar windows used by budgets and the dashboard.
//!
//! All windows are UTC and run from the first instant of the period up to `now`.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

/// A reporting window `[start, end]`, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodWindow {
    /// First instant of the period.
    pub start: DateTime<Utc>,
    /// Upper bound, normally the current time.
    pub end: DateTime<Utc>,
}

impl PeriodWindow {
    /// Window from the start of the calendar month containing `now`.
    #[must_use]
    pub fn current_month(now: DateTime<Utc>) -> Self {
        Self {
            start: month_start(now),
            end: now,
        }
    }

    /// Window from the start of the calendar year containing `now`.
    #[must_use]
    pub fn current_year(now: DateTime<Utc>) -> Self {
        Self {
            start: year_start(now),
            end: now,
        }
    }
}

/// First instant of the calendar month containing `now`.
#[must_use]
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    first_instant(now.year(), now.month()).unwrap_or(now)
}

/// First instant of the calendar year containing `now`.
#[must_use]
pub fn year_start(now: DateTime<Utc>) -> DateTime<Utc> {
    first_instant(now.year(), 1).unwrap_or(now)
}

fn first_instant(year: i32, month: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
