use proptest::prelude::*;
use universal_date::{
    diff, normalize, Direction, FixedClock, TimePoint, UniversalDate, SOON_THRESHOLD_SECS,
};

const ZONES: &[&str] = &[
    "UTC",
    "Asia/Tokyo",
    "America/New_York",
    "Europe/London",
    "Australia/Lord_Howe",
    "Asia/Kolkata",
];

fn zone() -> impl Strategy<Value = &'static str> {
    prop::sample::select(ZONES)
}

/// 1970 through roughly 2096.
fn timestamp() -> impl Strategy<Value = i64> {
    0i64..4_000_000_000
}

/// Up to about twelve years either side.
fn offset() -> impl Strategy<Value = i64> {
    -400_000_000i64..400_000_000
}

fn relative(now: i64, delta: i64, tz: &str) -> (String, Direction) {
    let clock = FixedClock::at_timestamp(now).unwrap();
    let date = UniversalDate::with_clock(now + delta, Some(tz), &clock).unwrap();
    let breakdown = date.breakdown_at(&clock);
    (date.to_time_ago_at(&clock), breakdown.direction())
}

/// Leading number of "in 3 days" / "3 days ago", if any.
fn magnitude(phrase: &str) -> Option<(i64, &str)> {
    let body = phrase
        .strip_prefix("in ")
        .or_else(|| phrase.strip_suffix(" ago"))?;
    let (value, unit) = body.split_once(' ')?;
    Some((value.parse().ok()?, unit))
}

proptest! {
    #[test]
    fn normalize_preserves_timestamp(ts in timestamp(), tz in zone()) {
        let clock = FixedClock::at_timestamp(0).unwrap();
        let point = normalize(ts.into(), Some(tz), &clock).unwrap();
        prop_assert_eq!(point.timestamp(), ts);
        prop_assert_eq!(point.timezone(), tz);

        let from_text = normalize(ts.to_string().into(), Some(tz), &clock).unwrap();
        prop_assert_eq!(from_text.timestamp(), ts);
    }

    #[test]
    fn set_timezone_keeps_instant(ts in timestamp(), from in zone(), to in zone()) {
        let date = UniversalDate::new(ts, Some(from)).unwrap();
        let moved = date.set_timezone(to).unwrap();
        prop_assert_eq!(moved.timestamp(), ts);
        prop_assert_eq!(moved.timezone(), to);
        prop_assert_eq!(moved.date_time(), date.date_time());
    }

    #[test]
    fn direction_follows_sign(now in timestamp(), delta in offset(), tz in zone()) {
        let (_, direction) = relative(now, delta, tz);
        let expected = match delta {
            d if d > 0 => Direction::Future,
            d if d < 0 => Direction::Past,
            _ => Direction::Now,
        };
        prop_assert_eq!(direction, expected);
    }

    #[test]
    fn phrase_shape_matches_direction(now in timestamp(), delta in offset(), tz in zone()) {
        let (phrase, _) = relative(now, delta, tz);
        if delta > 0 && delta < SOON_THRESHOLD_SECS {
            prop_assert_eq!(phrase, "soon");
        } else if delta >= SOON_THRESHOLD_SECS {
            prop_assert!(phrase.starts_with("in "), "{}", phrase);
        } else if delta > -60 {
            prop_assert_eq!(phrase, "just now");
        } else {
            prop_assert!(phrase.ends_with(" ago"), "{}", phrase);
        }
    }

    #[test]
    fn magnitude_is_positive_and_pluralized(now in timestamp(), delta in offset(), tz in zone()) {
        let (phrase, _) = relative(now, delta, tz);
        if let Some((value, unit)) = magnitude(&phrase) {
            prop_assert!(value >= 1, "{}", phrase);
            prop_assert_eq!(unit.ends_with('s'), value != 1, "{}", phrase);
        }
    }

    #[test]
    fn breakdown_fields_are_bounded(now in timestamp(), delta in offset(), tz in zone()) {
        let clock = FixedClock::at_timestamp(now).unwrap();
        let date = UniversalDate::with_clock(now + delta, Some(tz), &clock).unwrap();
        let b = date.breakdown_at(&clock);

        prop_assert!(b.years >= 0);
        prop_assert!((0..12).contains(&b.months));
        // a fall-back hour inside a 30-day remainder can reach 31 days
        prop_assert!((0..=31).contains(&b.days));
        prop_assert!((0..24).contains(&b.hours));
        prop_assert!((0..60).contains(&b.minutes));
        prop_assert!((0..60).contains(&b.seconds));
        prop_assert_eq!(b.signed_seconds, delta);
        prop_assert_eq!(b.total_days, delta.abs() / 86_400);
    }

    #[test]
    fn diff_is_symmetric_in_magnitude(a in timestamp(), b in timestamp()) {
        let tz = chrono_tz::Tz::UTC;
        let p = TimePoint::from_timestamp(a, tz).unwrap();
        let q = TimePoint::from_timestamp(b, tz).unwrap();
        let forward = diff(&p, &q);
        let backward = diff(&q, &p);

        prop_assert_eq!(forward.signed_seconds, -backward.signed_seconds);
        prop_assert_eq!(
            (forward.years, forward.months, forward.days, forward.hours, forward.minutes, forward.seconds),
            (backward.years, backward.months, backward.days, backward.hours, backward.minutes, backward.seconds)
        );
    }
}
