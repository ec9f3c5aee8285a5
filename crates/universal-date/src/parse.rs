//! Free-form date text → instant.
//!
//! Absolute text carrying an offset (RFC 3339, RFC 2822) is taken literally.
//! Wall-clock text ("2021-01-01 15:30:00", "January 1, 2021 at 3:30 PM") is
//! read in the caller's zone. Relative text ("tomorrow at 9am", "next Friday",
//! "+1 hour 15 minutes", "3 days ago") is resolved against the supplied `now`.
//!
//! Local times that a DST transition makes ambiguous resolve to the earliest
//! mapping. Local times skipped by a DST gap move forward by the length of the
//! gap, so "tomorrow" in a zone that skips midnight is the first instant of
//! that day.

use chrono::{
    DateTime, Datelike, LocalResult, Months, NaiveDate, NaiveDateTime, NaiveTime, Offset as _,
    TimeDelta, TimeZone, Utc, Weekday,
};
use chrono_tz::Tz;

use crate::error::{DateError, Result};

/// Date-only layouts, tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
];

/// Parse `text` into an instant.
///
/// # Errors
///
/// Returns [`DateError::Parse`] carrying `text` unchanged when no layout or
/// expression matches.
pub fn parse_datetime(text: &str, tz: Tz, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let raw = text.trim();
    let normalized = normalize_text(raw);
    if normalized.is_empty() {
        return Err(DateError::Parse(text.to_string()));
    }

    let local_now = now.with_timezone(&tz);

    try_epoch_literal(&normalized)
        .or_else(|| try_rfc3339(raw))
        .or_else(|| try_rfc2822(raw))
        .or_else(|| try_wall_clock(&normalized, &tz))
        .or_else(|| try_anchor(&normalized, &local_now, &tz))
        .or_else(|| try_weekday_relative(&normalized, &local_now, &tz))
        .or_else(|| try_time_of_day(&normalized, &local_now, &tz))
        .or_else(|| try_offset(&normalized, &local_now, &tz))
        .ok_or_else(|| DateError::Parse(text.to_string()))
}

/// Lowercase and collapse runs of whitespace.
fn normalize_text(s: &str) -> String {
    s.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

fn resolve_local(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt.with_timezone(&Utc)),
        // Read the skipped wall clock with the offset in force before the gap;
        // the resulting instant lies just past the transition.
        LocalResult::None => {
            let day_before = naive.checked_sub_signed(TimeDelta::days(1))?;
            let before = tz.offset_from_local_datetime(&day_before).earliest()?;
            let shift = TimeDelta::seconds(i64::from(before.fix().local_minus_utc()));
            Some(Utc.from_utc_datetime(&naive.checked_sub_signed(shift)?))
        }
    }
}

// ── Absolute forms ──────────────────────────────────────────────────────────

/// "@1609459200"
fn try_epoch_literal(s: &str) -> Option<DateTime<Utc>> {
    let seconds = s.strip_prefix('@')?.parse::<i64>().ok()?;
    DateTime::from_timestamp(seconds, 0)
}

fn try_rfc3339(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

fn try_rfc2822(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

fn try_wall_clock(s: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    resolve_local(tz, parse_naive_datetime(s)?)
}

fn parse_naive_datetime(s: &str) -> Option<NaiveDateTime> {
    if let Some(date) = parse_date(s) {
        return Some(date.and_time(NaiveTime::MIN));
    }

    // ISO 8601 with a 'T' separator (lowercased by normalize_text)
    if let Some((date, time)) = s.split_once('t') {
        if let (Some(date), Some(time)) = (parse_date(date), parse_time(time)) {
            return Some(date.and_time(time));
        }
    }

    // A date followed by a time of day, optionally joined by "at":
    // "2021-01-01 15:30:00", "jan 1, 2021 at 3:30 pm"
    let words: Vec<&str> = s.split(' ').collect();
    for split in (1..words.len()).rev() {
        let (date_words, time_words) = words.split_at(split);
        let date_part = date_words.join(" ");
        let date_part = date_part.strip_suffix(" at").unwrap_or(&date_part);
        if let (Some(date), Some(time)) = (parse_date(date_part), parse_time(&time_words.join(" ")))
        {
            return Some(date.and_time(time));
        }
    }

    None
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
}

/// Parse a time of day: "noon", "midnight", "15:30", "15:30:00", "3pm", "3:30 pm".
fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    match s {
        "noon" => return NaiveTime::from_hms_opt(12, 0, 0),
        "midnight" => return Some(NaiveTime::MIN),
        _ => {}
    }

    for format in ["%H:%M:%S", "%H:%M"] {
        if let Ok(time) = NaiveTime::parse_from_str(s, format) {
            return Some(time);
        }
    }

    let compact = s.replace(' ', "");
    let (clock, is_pm) = if let Some(clock) = compact.strip_suffix("pm") {
        (clock, true)
    } else if let Some(clock) = compact.strip_suffix("am") {
        (clock, false)
    } else {
        return None;
    };

    let mut fields = clock.split(':').map(str::parse::<u32>);
    let hour = fields.next()?.ok()?;
    let minute = match fields.next() {
        Some(field) => field.ok()?,
        None => 0,
    };
    let second = match fields.next() {
        Some(field) => field.ok()?,
        None => 0,
    };
    if fields.next().is_some() || !(1..=12).contains(&hour) {
        return None;
    }

    let hour24 = match (hour, is_pm) {
        (12, true) => 12,
        (12, false) => 0,
        (h, true) => h + 12,
        (h, false) => h,
    };

    NaiveTime::from_hms_opt(hour24, minute, second)
}

// ── Relative forms ──────────────────────────────────────────────────────────

/// "now", "today", "tomorrow at 9am", "yesterday noon", "midnight".
fn try_anchor(s: &str, local_now: &DateTime<Tz>, tz: &Tz) -> Option<DateTime<Utc>> {
    let (anchor, time) = match s.split_once(' ') {
        Some((anchor, rest)) => (anchor, Some(parse_time(rest.strip_prefix("at ").unwrap_or(rest))?)),
        None => (s, None),
    };

    let today = local_now.date_naive();
    let date = match anchor {
        "now" if time.is_none() => return Some(local_now.with_timezone(&Utc)),
        "today" => today,
        "tomorrow" => today.succ_opt()?,
        "yesterday" => today.pred_opt()?,
        "midnight" | "noon" if time.is_none() => {
            return resolve_local(tz, today.and_time(parse_time(anchor)?));
        }
        _ => return None,
    };

    resolve_local(tz, date.and_time(time.unwrap_or(NaiveTime::MIN)))
}

/// "next monday", "last friday at 5pm", "this wednesday".
fn try_weekday_relative(s: &str, local_now: &DateTime<Tz>, tz: &Tz) -> Option<DateTime<Utc>> {
    let mut words = s.splitn(3, ' ');
    let modifier = words.next()?;
    let weekday = parse_weekday(words.next()?)?;
    let time = match words.next() {
        Some(rest) => parse_time(rest.strip_prefix("at ").unwrap_or(rest))?,
        None => NaiveTime::MIN,
    };

    let today = local_now.date_naive();
    let target = i64::from(weekday.num_days_from_monday());
    let current = i64::from(today.weekday().num_days_from_monday());

    let shift = match modifier {
        // Strictly ahead: the same weekday means a week from today
        "next" => match (target - current).rem_euclid(7) {
            0 => 7,
            ahead => ahead,
        },
        // Strictly behind
        "last" => match (current - target).rem_euclid(7) {
            0 => -7,
            back => -back,
        },
        // Within the current Monday-based week, past or future
        "this" => target - current,
        _ => return None,
    };

    let date = today.checked_add_signed(TimeDelta::try_days(shift)?)?;
    resolve_local(tz, date.and_time(time))
}

/// A bare time of day means today at that time: "3pm", "15:30".
fn try_time_of_day(s: &str, local_now: &DateTime<Tz>, tz: &Tz) -> Option<DateTime<Utc>> {
    let time = parse_time(s)?;
    resolve_local(tz, local_now.date_naive().and_time(time))
}

/// "+1 hour 15 minutes", "-2 days", "in 3 weeks", "2 hours ago",
/// "a week from now", "in 1 year and 6 months".
fn try_offset(s: &str, local_now: &DateTime<Tz>, tz: &Tz) -> Option<DateTime<Utc>> {
    let (sign, body) = if let Some(rest) = s.strip_prefix("in ") {
        (1, rest)
    } else if let Some(rest) = s.strip_suffix(" ago") {
        (-1, rest)
    } else if let Some(rest) = s.strip_suffix(" from now") {
        (1, rest)
    } else if s.starts_with(['+', '-']) {
        (1, s)
    } else {
        return None;
    };

    parse_offset(body, sign)?.apply(local_now, tz)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OffsetUnit {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

/// Accumulated offset, split by how each part is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Offset {
    /// Calendar months; the day of month clamps to the end of shorter months.
    months: i64,
    /// Calendar days; the local wall-clock time is kept across DST changes.
    days: i64,
    /// Exact elapsed seconds.
    seconds: i64,
}

impl Offset {
    fn add(&mut self, unit: OffsetUnit, amount: i64) -> Option<()> {
        let (slot, factor) = match unit {
            OffsetUnit::Second => (&mut self.seconds, 1),
            OffsetUnit::Minute => (&mut self.seconds, 60),
            OffsetUnit::Hour => (&mut self.seconds, 3600),
            OffsetUnit::Day => (&mut self.days, 1),
            OffsetUnit::Week => (&mut self.days, 7),
            OffsetUnit::Month => (&mut self.months, 1),
            OffsetUnit::Year => (&mut self.months, 12),
        };
        *slot = slot.checked_add(amount.checked_mul(factor)?)?;
        Some(())
    }

    /// Calendar parts step the local date first, then exact seconds are added.
    fn apply(&self, local_now: &DateTime<Tz>, tz: &Tz) -> Option<DateTime<Utc>> {
        let base = if self.months == 0 && self.days == 0 {
            local_now.with_timezone(&Utc)
        } else {
            let months = Months::new(u32::try_from(self.months.unsigned_abs()).ok()?);
            let naive = local_now.naive_local();
            let naive = if self.months >= 0 {
                naive.checked_add_months(months)?
            } else {
                naive.checked_sub_months(months)?
            };
            let naive = naive.checked_add_signed(TimeDelta::try_days(self.days)?)?;
            resolve_local(tz, naive)?
        };

        base.checked_add_signed(TimeDelta::try_seconds(self.seconds)?)
    }
}

/// Parse "<n> <unit> [and] <n> <unit> ...". Each term may carry its own sign;
/// unsigned terms inherit the sign of the term before them.
fn parse_offset(body: &str, default_sign: i64) -> Option<Offset> {
    let mut offset = Offset::default();
    let mut sign = default_sign;
    let mut terms = 0;

    let mut tokens = body
        .split(' ')
        .map(|token| token.trim_end_matches(','))
        .filter(|token| !token.is_empty() && *token != "and");

    while let Some(token) = tokens.next() {
        let digits = if let Some(rest) = token.strip_prefix('+') {
            sign = 1;
            rest
        } else if let Some(rest) = token.strip_prefix('-') {
            sign = -1;
            rest
        } else {
            token
        };

        let amount: i64 = match digits {
            "a" | "an" => 1,
            n => n.parse().ok()?,
        };
        let unit = parse_unit(tokens.next()?)?;
        offset.add(unit, sign.checked_mul(amount)?)?;
        terms += 1;
    }

    (terms > 0).then_some(offset)
}

fn parse_unit(s: &str) -> Option<OffsetUnit> {
    match s {
        "second" | "seconds" | "sec" | "secs" => Some(OffsetUnit::Second),
        "minute" | "minutes" | "min" | "mins" => Some(OffsetUnit::Minute),
        "hour" | "hours" | "hr" | "hrs" => Some(OffsetUnit::Hour),
        "day" | "days" => Some(OffsetUnit::Day),
        "week" | "weeks" | "wk" | "wks" => Some(OffsetUnit::Week),
        "month" | "months" => Some(OffsetUnit::Month),
        "year" | "years" | "yr" | "yrs" => Some(OffsetUnit::Year),
        _ => None,
    }
}

fn parse_weekday(s: &str) -> Option<Weekday> {
    match s {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
