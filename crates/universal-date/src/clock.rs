//! Source of "now".
//!
//! Everything that needs the current time takes a [`Clock`] instead of
//! calling `Utc::now()` directly, so relative rendering can be pinned to a
//! fixed anchor in tests.

use chrono::{DateTime, Utc};

/// Abstraction over the wall clock.
pub trait Clock {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the OS clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Pin the clock to `timestamp` seconds since the Unix epoch.
    ///
    /// Returns `None` when the timestamp is outside chrono's representable range.
    pub fn at_timestamp(timestamp: i64) -> Option<Self> {
        DateTime::from_timestamp(timestamp, 0).map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
