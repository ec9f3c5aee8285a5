//! The `UniversalDate` value: construct from anything date-like, render
//! absolutely or relatively.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use chrono::format::{Item, StrftimeItems};
use chrono::DateTime;
use chrono_tz::Tz;

use crate::breakdown::{between, CalendarBreakdown};
use crate::clock::{Clock, SystemClock};
use crate::error::{DateError, Result};
use crate::point::{normalize, DateInput, TimePoint};
use crate::relative::format_relative;

/// Pattern used by [`UniversalDate::to_human`] when none is given.
/// Renders as `"January 1, 2021 at 3:30 PM"`.
pub const DEFAULT_HUMAN_FORMAT: &str = "%B %-d, %Y at %-I:%M %p";

/// A timezone-aware instant with human-facing renderings.
///
/// # Examples
///
/// ```
/// use universal_date::UniversalDate;
///
/// let date = UniversalDate::new("2021-01-01 12:00:00", Some("UTC")).unwrap();
/// assert_eq!(date.to_human(None).unwrap(), "January 1, 2021 at 12:00 PM");
///
/// let date = date.set_timezone("America/New_York").unwrap();
/// assert_eq!(date.to_human(None).unwrap(), "January 1, 2021 at 7:00 AM");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniversalDate {
    point: TimePoint,
}

impl UniversalDate {
    /// Build from any [`DateInput`]. `timezone = None` means UTC.
    ///
    /// Relative text ("tomorrow", "+2 hours") is resolved against the system
    /// clock; use [`UniversalDate::with_clock`] to pin it.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::Parse`] for unreadable text and
    /// [`DateError::InvalidTimezone`] for an unknown zone.
    pub fn new(date: impl Into<DateInput>, timezone: Option<&str>) -> Result<Self> {
        Self::with_clock(date, timezone, &SystemClock)
    }

    /// Factory form of [`UniversalDate::new`].
    pub fn make(date: impl Into<DateInput>, timezone: Option<&str>) -> Result<Self> {
        Self::new(date, timezone)
    }

    /// The current instant in `timezone`.
    pub fn now(timezone: Option<&str>) -> Result<Self> {
        Self::new(DateInput::default(), timezone)
    }

    /// Like [`UniversalDate::new`], resolving relative text against `clock`.
    pub fn with_clock<C: Clock + ?Sized>(
        date: impl Into<DateInput>,
        timezone: Option<&str>,
        clock: &C,
    ) -> Result<Self> {
        let point = normalize(date.into(), timezone, clock)?;
        Ok(Self { point })
    }

    /// Absolute rendering. `None` uses [`DEFAULT_HUMAN_FORMAT`].
    ///
    /// # Errors
    ///
    /// Returns [`DateError::InvalidFormat`] for a malformed strftime pattern.
    pub fn to_human(&self, format: Option<&str>) -> Result<String> {
        self.format(format.unwrap_or(DEFAULT_HUMAN_FORMAT))
    }

    /// Render with a chrono strftime pattern in the associated zone.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::InvalidFormat`] for a malformed pattern.
    pub fn format(&self, pattern: &str) -> Result<String> {
        render(&self.point.to_datetime(), pattern)
    }

    /// Relative rendering against the system clock: "3 hours ago", "in 2 days",
    /// "soon", "just now".
    pub fn to_time_ago(&self) -> String {
        self.to_time_ago_at(&SystemClock)
    }

    /// Relative rendering against `clock`.
    pub fn to_time_ago_at<C: Clock + ?Sized>(&self, clock: &C) -> String {
        format_relative(&self.breakdown_at(clock))
    }

    /// The calendar breakdown behind [`UniversalDate::to_time_ago_at`].
    pub fn breakdown_at<C: Clock + ?Sized>(&self, clock: &C) -> CalendarBreakdown {
        let now = TimePoint::new(clock.now(), self.point.tz());
        between(&now, &self.point)
    }

    /// The instant in the associated zone.
    pub fn date_time(&self) -> DateTime<Tz> {
        self.point.to_datetime()
    }

    /// Seconds since the Unix epoch.
    pub fn timestamp(&self) -> i64 {
        self.point.timestamp()
    }

    pub fn timezone(&self) -> &'static str {
        self.point.timezone()
    }

    pub fn time_point(&self) -> &TimePoint {
        &self.point
    }

    /// Same instant rendered in another zone.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::InvalidTimezone`] if `timezone` is not an IANA name.
    pub fn set_timezone(self, timezone: &str) -> Result<Self> {
        Ok(Self {
            point: self.point.with_timezone(timezone)?,
        })
    }
}

impl From<TimePoint> for UniversalDate {
    fn from(point: TimePoint) -> Self {
        Self { point }
    }
}

impl FromStr for UniversalDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s, None)
    }
}

impl fmt::Display for UniversalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date_time().format(DEFAULT_HUMAN_FORMAT))
    }
}

/// Format `dt` with a strftime pattern, rejecting malformed patterns instead of
/// letting chrono's `Display` fail mid-write.
fn render(dt: &DateTime<Tz>, pattern: &str) -> Result<String> {
    let items = StrftimeItems::new(pattern);
    if items.clone().any(|item| matches!(item, Item::Error)) {
        return Err(DateError::InvalidFormat(format!("'{}'", pattern)));
    }

    let mut out = String::new();
    write!(out, "{}", dt.format_with_items(items))
        .map_err(|_| DateError::InvalidFormat(format!("'{}'", pattern)))?;
    Ok(out)
}
