//! Calendar-aware difference between two instants.
//!
//! Months and years are counted by stepping the civil calendar (real month
//! lengths, leap-year February), never by dividing elapsed seconds by a fixed
//! 30- or 365-day ratio.

use chrono::{
    DateTime, Datelike, LocalResult, Months, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::Serialize;

use crate::point::TimePoint;

const SECONDS_PER_DAY: i64 = 86_400;

/// Which side of "now" a target instant falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Past,
    Now,
    Future,
}

/// Decomposition of the gap between two instants.
///
/// Every calendar field is the non-negative remainder after all larger units
/// are taken out, so `months` is in `0..=11`, `hours` in `0..=23`, and
/// `minutes`/`seconds` in `0..=59`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CalendarBreakdown {
    pub years: i64,
    pub months: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    /// Whole 24-hour days in the raw elapsed span.
    pub total_days: i64,
    /// Target minus reference, in seconds. Negative means the target is in the past.
    pub signed_seconds: i64,
}

impl CalendarBreakdown {
    pub fn direction(&self) -> Direction {
        match self.signed_seconds {
            s if s < 0 => Direction::Past,
            0 => Direction::Now,
            _ => Direction::Future,
        }
    }

    /// Absolute elapsed seconds.
    pub fn elapsed_seconds(&self) -> i64 {
        self.signed_seconds.saturating_abs()
    }

    /// Years and months folded into a single month count.
    pub fn total_months(&self) -> i64 {
        self.years * 12 + self.months
    }
}

/// Calendar difference from `earlier` to `later`.
///
/// The pair is expected in chronological order; a reversed pair is swapped so
/// that every field stays non-negative. `signed_seconds` is
/// `later - earlier` as passed.
///
/// Whole months are counted on wall clocks in `earlier`'s zone. The remainder
/// after the last whole month is real elapsed time, so a DST transition inside
/// it shows up as an hour more or less rather than a collapsed wall clock.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use chrono_tz::Tz;
/// use universal_date::breakdown::diff;
/// use universal_date::point::TimePoint;
///
/// let start = TimePoint::new(Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(), Tz::UTC);
/// let end = TimePoint::new(Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap(), Tz::UTC);
///
/// let b = diff(&start, &end);
/// assert_eq!((b.months, b.days, b.hours), (1, 23, 23));
/// ```
pub fn diff(earlier: &TimePoint, later: &TimePoint) -> CalendarBreakdown {
    let signed_seconds = later.timestamp() - earlier.timestamp();
    let (earlier, later) = if signed_seconds >= 0 {
        (earlier, later)
    } else {
        (later, earlier)
    };

    let start = earlier.to_datetime();
    let end = later.instant().with_timezone(&earlier.tz());
    let (total_months, anchor) = whole_months_between(start.naive_local(), end.naive_local());
    let anchor = if total_months == 0 {
        earlier.instant()
    } else {
        resolve_local(&start, anchor)
    };
    let remainder = (later.instant() - anchor).num_seconds().max(0);

    CalendarBreakdown {
        years: total_months / 12,
        months: total_months % 12,
        days: remainder / SECONDS_PER_DAY,
        hours: remainder % SECONDS_PER_DAY / 3600,
        minutes: remainder % 3600 / 60,
        seconds: remainder % 60,
        total_days: signed_seconds.saturating_abs() / SECONDS_PER_DAY,
        signed_seconds,
    }
}

/// Breakdown of `target` relative to `now`, both read in `target`'s zone.
///
/// `signed_seconds` is negative when `target` is in the past.
pub fn between(now: &TimePoint, target: &TimePoint) -> CalendarBreakdown {
    let now = now.in_timezone(target.tz());
    diff(&now, target)
}

/// Largest number of calendar months that can be added to `start` without
/// passing `end`, and the wall clock reached by adding them.
///
/// Adding months clamps the day to the end of shorter months (Jan 31 + 1 month
/// is Feb 28 or 29), matching chrono's `checked_add_months`.
fn whole_months_between(start: NaiveDateTime, end: NaiveDateTime) -> (i64, NaiveDateTime) {
    let mut months = i64::from(end.year() - start.year()) * 12
        + i64::from(end.month())
        - i64::from(start.month());

    while months > 0 {
        match add_months(start, months) {
            Some(anchor) if anchor <= end => return (months, anchor),
            _ => months -= 1,
        }
    }

    (0, start)
}

fn add_months(start: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    start.checked_add_months(Months::new(u32::try_from(months).ok()?))
}

/// The instant showing `wall` in `start`'s zone. A repeated wall clock keeps
/// `start`'s offset when it can; one skipped by a DST gap borrows it.
fn resolve_local(start: &DateTime<Tz>, wall: NaiveDateTime) -> DateTime<Utc> {
    let offset = start.offset().fix();
    match start.timezone().from_local_datetime(&wall) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(first, second) => {
            let dt = if second.offset().fix() == offset {
                second
            } else {
                first
            };
            dt.with_timezone(&Utc)
        }
        LocalResult::None => {
            let shifted = wall - TimeDelta::seconds(i64::from(offset.local_minus_utc()));
            Utc.from_utc_datetime(&shifted)
        }
    }
}
