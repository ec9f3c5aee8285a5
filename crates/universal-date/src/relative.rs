//! "3 hours ago" / "in 2 days" rendering.
//!
//! Past instants report the largest non-zero calendar unit as-is. Future
//! instants go through a rounding table, since "in 1 hour" reads better than
//! "in 47 minutes":
//!
//! | elapsed                        | unit   | magnitude                            |
//! |--------------------------------|--------|--------------------------------------|
//! | under 60 s                     | none   | `"soon"`                             |
//! | 60 s to 44 min 30 s            | minute | nearest minute                       |
//! | 44 min 30 s to 23 h 30 min     | hour   | nearest hour                         |
//! | 23 h 30 min to 29 days 12 h    | day    | nearest day                          |
//! | 29 days 12 h to 11 months 15 d | month  | calendar months, half-month rounds up |
//! | 11 months 15 days and beyond   | year   | calendar years, half-year rounds up  |

use std::fmt;

use serde::Serialize;

use crate::breakdown::{CalendarBreakdown, Direction};

/// Future instants closer than this render as `"soon"`.
pub const SOON_THRESHOLD_SECS: i64 = 60;

pub const JUST_NOW: &str = "just now";
pub const SOON: &str = "soon";

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

const HOUR_TIER_MINUTES: i64 = 45;
const DAY_TIER_SECS: i64 = 23 * HOUR + 30 * MINUTE;
const MONTH_TIER_DAYS: i64 = 30;
const HALF_MONTH_DAYS: i64 = 15;
const HALF_YEAR_MONTHS: i64 = 6;

/// Unit a relative phrase is reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

impl Unit {
    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Minute => "minute",
            Unit::Hour => "hour",
            Unit::Day => "day",
            Unit::Month => "month",
            Unit::Year => "year",
        }
    }
}

/// A count of one unit, e.g. "2 hours". Pluralized on display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Magnitude {
    pub value: i64,
    pub unit: Unit,
}

impl Magnitude {
    fn at_least_one(value: i64, unit: Unit) -> Self {
        Self {
            value: value.max(1),
            unit,
        }
    }
}

impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = if self.value > 1 { "s" } else { "" };
        write!(f, "{} {}{}", self.value, self.unit.as_str(), suffix)
    }
}

/// Render a breakdown (target relative to now) as a short phrase.
///
/// # Examples
///
/// ```
/// use universal_date::breakdown::CalendarBreakdown;
/// use universal_date::relative::format_relative;
///
/// let past = CalendarBreakdown { hours: 2, signed_seconds: -7200, ..Default::default() };
/// assert_eq!(format_relative(&past), "2 hours ago");
///
/// let future = CalendarBreakdown { minutes: 45, signed_seconds: 2700, ..Default::default() };
/// assert_eq!(format_relative(&future), "in 1 hour");
/// ```
pub fn format_relative(breakdown: &CalendarBreakdown) -> String {
    match breakdown.direction() {
        Direction::Now => JUST_NOW.to_string(),
        Direction::Past => match largest_unit(breakdown) {
            Some(magnitude) => format!("{magnitude} ago"),
            None => JUST_NOW.to_string(),
        },
        Direction::Future => match rounded_future(breakdown) {
            Some(magnitude) => format!("in {magnitude}"),
            None => SOON.to_string(),
        },
    }
}

/// Largest non-zero unit of the unrounded breakdown, down to minutes.
pub fn largest_unit(breakdown: &CalendarBreakdown) -> Option<Magnitude> {
    [
        (breakdown.years, Unit::Year),
        (breakdown.months, Unit::Month),
        (breakdown.days, Unit::Day),
        (breakdown.hours, Unit::Hour),
        (breakdown.minutes, Unit::Minute),
    ]
    .into_iter()
    .find(|(value, _)| *value > 0)
    .map(|(value, unit)| Magnitude { value, unit })
}

/// Coarsest unit after applying the rounding table, or `None` below
/// [`SOON_THRESHOLD_SECS`].
///
/// Minutes, hours and days come from continuous elapsed time; months and
/// years come from the calendar fields. Tier boundaries are checked on the
/// rounded value, so a magnitude never reaches the next tier's threshold.
pub fn rounded_future(breakdown: &CalendarBreakdown) -> Option<Magnitude> {
    let elapsed = breakdown.elapsed_seconds();
    if elapsed < SOON_THRESHOLD_SECS {
        return None;
    }

    let minutes = round_div(elapsed, MINUTE);
    let days = round_div(elapsed, DAY);

    let magnitude = if minutes < HOUR_TIER_MINUTES {
        Magnitude::at_least_one(minutes, Unit::Minute)
    } else if elapsed < DAY_TIER_SECS {
        Magnitude::at_least_one(round_div(elapsed, HOUR), Unit::Hour)
    } else if days < MONTH_TIER_DAYS {
        Magnitude::at_least_one(days, Unit::Day)
    } else {
        let months =
            breakdown.total_months() + i64::from(breakdown.days >= HALF_MONTH_DAYS);
        if months < 12 {
            Magnitude::at_least_one(months, Unit::Month)
        } else {
            let years = months / 12 + i64::from(months % 12 >= HALF_YEAR_MONTHS);
            Magnitude::at_least_one(years, Unit::Year)
        }
    };

    Some(magnitude)
}

/// Round-half-up division for non-negative operands.
fn round_div(value: i64, unit: i64) -> i64 {
    (value + unit / 2) / unit
}
