//! Instant + timezone pairing, and normalization of flexible date input.
//!
//! A [`TimePoint`] is an absolute instant (whole seconds since the Unix epoch)
//! labeled with the IANA zone it should be rendered in. The instant never
//! depends on the zone: [`TimePoint::with_timezone`] relabels, it does not
//! convert.

use chrono::{DateTime, SubsecRound, TimeZone, Utc};
use chrono_tz::Tz;

use crate::clock::Clock;
use crate::error::{DateError, Result};
use crate::parse::parse_datetime;

/// Zone used when the caller does not name one.
pub const DEFAULT_TIMEZONE: &str = "UTC";

// ── DateInput ───────────────────────────────────────────────────────────────

/// The three shapes of date input accepted by [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    /// An already-resolved instant. Used as-is.
    Instant(DateTime<Utc>),
    /// Seconds since the Unix epoch.
    Timestamp(i64),
    /// Free-form text ("2021-01-01 15:30:00", "tomorrow at 9am", "+2 hours").
    Text(String),
}

impl Default for DateInput {
    fn default() -> Self {
        DateInput::Text("now".to_string())
    }
}

impl<Z: TimeZone> From<DateTime<Z>> for DateInput {
    fn from(dt: DateTime<Z>) -> Self {
        DateInput::Instant(dt.with_timezone(&Utc))
    }
}

impl From<i64> for DateInput {
    fn from(timestamp: i64) -> Self {
        DateInput::Timestamp(timestamp)
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        DateInput::Text(text.to_string())
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        DateInput::Text(text)
    }
}

// ── TimePoint ───────────────────────────────────────────────────────────────

/// An absolute instant paired with the zone it is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimePoint {
    instant: DateTime<Utc>,
    timezone: Tz,
}

impl TimePoint {
    /// Pair `instant` with `timezone`. Sub-second precision is dropped.
    pub fn new(instant: DateTime<Utc>, timezone: Tz) -> Self {
        Self {
            instant: instant.trunc_subsecs(0),
            timezone,
        }
    }

    /// Build from Unix seconds. `None` when chrono cannot represent the instant.
    pub fn from_timestamp(timestamp: i64, timezone: Tz) -> Option<Self> {
        DateTime::from_timestamp(timestamp, 0).map(|instant| Self::new(instant, timezone))
    }

    /// Seconds since the Unix epoch.
    pub fn timestamp(&self) -> i64 {
        self.instant.timestamp()
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    pub fn tz(&self) -> Tz {
        self.timezone
    }

    /// IANA name of the associated zone.
    pub fn timezone(&self) -> &'static str {
        self.timezone.name()
    }

    /// The instant expressed in the associated zone.
    pub fn to_datetime(&self) -> DateTime<Tz> {
        self.instant.with_timezone(&self.timezone)
    }

    /// Same instant, different zone label.
    ///
    /// # Errors
    ///
    /// Returns [`DateError::InvalidTimezone`] if `timezone` is not an IANA name.
    pub fn with_timezone(&self, timezone: &str) -> Result<Self> {
        Ok(self.in_timezone(parse_timezone(timezone)?))
    }

    pub fn in_timezone(&self, timezone: Tz) -> Self {
        Self {
            instant: self.instant,
            timezone,
        }
    }
}

// ── normalize ───────────────────────────────────────────────────────────────

/// Turn any [`DateInput`] into a [`TimePoint`] labeled with `timezone`.
///
/// `timezone = None` means [`DEFAULT_TIMEZONE`]. Text that is a plain integer
/// is read as Unix seconds; any other text goes through the free-form parser,
/// which interprets wall-clock text in `timezone` and relative text against
/// `clock`.
///
/// # Errors
///
/// Returns [`DateError::InvalidTimezone`] for an unknown zone and
/// [`DateError::Parse`] (carrying the offending text) for input that cannot
/// be read as a date.
///
/// # Examples
///
/// ```
/// use universal_date::clock::SystemClock;
/// use universal_date::point::normalize;
///
/// let point = normalize("2021-01-01".into(), None, &SystemClock).unwrap();
/// assert_eq!(point.timestamp(), 1_609_459_200);
/// assert_eq!(point.timezone(), "UTC");
/// ```
pub fn normalize<C: Clock + ?Sized>(
    input: DateInput,
    timezone: Option<&str>,
    clock: &C,
) -> Result<TimePoint> {
    let tz = parse_timezone(timezone.unwrap_or(DEFAULT_TIMEZONE))?;

    let instant = match input {
        DateInput::Instant(instant) => instant,
        DateInput::Timestamp(timestamp) => instant_from_timestamp(timestamp)
            .ok_or_else(|| DateError::Parse(timestamp.to_string()))?,
        DateInput::Text(text) => match text.trim().parse::<i64>() {
            Ok(timestamp) => {
                instant_from_timestamp(timestamp).ok_or_else(|| DateError::Parse(text.clone()))?
            }
            Err(_) => parse_datetime(&text, tz, clock.now())?,
        },
    };

    Ok(TimePoint::new(instant, tz))
}

/// Parse an IANA timezone string into `Tz`.
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| DateError::InvalidTimezone(format!("'{}'", s)))
}

fn instant_from_timestamp(timestamp: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{FixedOffset, Timelike};

    const NEW_YEAR_2021: i64 = 1_609_459_200;

    fn clock() -> FixedClock {
        // Wednesday, February 18, 2026, 14:30:00 UTC
        FixedClock(Utc.with_ymd_and_hms(2026, 2, 18, 14, 30, 0).unwrap())
    }

    #[test]
    fn test_normalize_timestamp() {
        let point = normalize(NEW_YEAR_2021.into(), None, &clock()).unwrap();
        assert_eq!(point.timestamp(), NEW_YEAR_2021);
        assert_eq!(point.timezone(), "UTC");
    }

    #[test]
    fn test_normalize_negative_timestamp() {
        let point = normalize((-86_400_i64).into(), None, &clock()).unwrap();
        assert_eq!(point.instant().to_rfc3339(), "1969-12-31T00:00:00+00:00");
    }

    #[test]
    fn test_normalize_numeric_text_is_timestamp() {
        let point = normalize(" 1609459200 ".into(), None, &clock()).unwrap();
        assert_eq!(point.timestamp(), NEW_YEAR_2021);
    }

    #[test]
    fn test_normalize_date_string() {
        let point = normalize("2021-01-01".into(), Some("UTC"), &clock()).unwrap();
        assert_eq!(point.timestamp(), NEW_YEAR_2021);
    }

    #[test]
    fn test_normalize_instant_keeps_value() {
        let offset = FixedOffset::east_opt(5 * 3600).unwrap();
        let dt = offset.with_ymd_and_hms(2021, 1, 1, 5, 0, 0).unwrap();
        let point = normalize(dt.into(), Some("America/New_York"), &clock()).unwrap();
        assert_eq!(point.timestamp(), NEW_YEAR_2021);
        assert_eq!(point.timezone(), "America/New_York");
    }

    #[test]
    fn test_normalize_instant_drops_subseconds() {
        let dt = Utc
            .with_ymd_and_hms(2021, 1, 1, 0, 0, 0)
            .unwrap()
            .with_nanosecond(750_000_000)
            .unwrap();
        let point = normalize(dt.into(), None, &clock()).unwrap();
        assert_eq!(point.instant().nanosecond(), 0);
        assert_eq!(point.timestamp(), NEW_YEAR_2021);
    }

    #[test]
    fn test_normalize_wall_clock_text_uses_timezone() {
        let point = normalize("2021-01-01 00:00:00".into(), Some("Asia/Tokyo"), &clock()).unwrap();
        // Midnight in Tokyo (UTC+9) is 15:00 the previous day in UTC
        assert_eq!(point.timestamp(), NEW_YEAR_2021 - 9 * 3600);
    }

    #[test]
    fn test_normalize_default_is_now() {
        let point = normalize(DateInput::default(), None, &clock()).unwrap();
        assert_eq!(point.instant(), clock().0);
    }

    #[test]
    fn test_normalize_invalid_text_returns_error() {
        let err = normalize("invalid-date".into(), None, &clock()).unwrap_err();
        assert_eq!(err, DateError::Parse("invalid-date".to_string()));
        assert_eq!(err.to_string(), "Unable to parse date format: invalid-date");
    }

    #[test]
    fn test_normalize_invalid_timezone_returns_error() {
        let err = normalize("2021-01-01".into(), Some("Invalid/Zone"), &clock()).unwrap_err();
        assert!(matches!(err, DateError::InvalidTimezone(_)));
        assert!(err.to_string().contains("Invalid timezone"), "got: {err}");
    }

    #[test]
    fn test_normalize_out_of_range_timestamp_returns_error() {
        let err = normalize(i64::MAX.into(), None, &clock()).unwrap_err();
        assert!(matches!(err, DateError::Parse(_)));
    }

    #[test]
    fn test_with_timezone_keeps_instant() {
        let point = TimePoint::from_timestamp(NEW_YEAR_2021, Tz::UTC).unwrap();
        let ny = point.with_timezone("America/New_York").unwrap();
        assert_eq!(ny.timestamp(), point.timestamp());
        assert_eq!(ny.timezone(), "America/New_York");
        assert_eq!(ny.to_datetime().hour(), 19);
        assert_eq!(point.to_datetime().hour(), 0);
    }

    #[test]
    fn test_with_timezone_invalid_returns_error() {
        let point = TimePoint::from_timestamp(NEW_YEAR_2021, Tz::UTC).unwrap();
        let err = point.with_timezone("Invalid/Timezone").unwrap_err();
        assert_eq!(
            err,
            DateError::InvalidTimezone("'Invalid/Timezone'".to_string())
        );
    }
}
