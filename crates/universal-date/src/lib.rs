//! # universal-date
//!
//! A timezone-aware date value that accepts flexible input and renders it
//! absolutely ("January 1, 2021 at 3:30 PM") or relatively ("3 hours ago",
//! "in 2 days", "soon").
//!
//! Relative rendering is calendar-aware: months and years follow real month
//! lengths and leap years, and future instants are rounded to the coarsest
//! sensible unit.
//!
//! ## Modules
//!
//! - [`date`]: [`UniversalDate`], the public value type
//! - [`point`]: [`TimePoint`] (instant + zone) and input normalization
//! - [`parse`]: Free-form date text → instant
//! - [`breakdown`]: Calendar difference between two instants
//! - [`relative`]: Threshold/rounding policy and phrase rendering
//! - [`clock`]: Injectable source of "now"
//! - [`error`]: Error types

pub mod breakdown;
pub mod clock;
pub mod date;
pub mod error;
pub mod parse;
pub mod point;
pub mod relative;

pub use breakdown::{between, diff, CalendarBreakdown, Direction};
pub use clock::{Clock, FixedClock, SystemClock};
pub use date::{UniversalDate, DEFAULT_HUMAN_FORMAT};
pub use error::{DateError, Result};
pub use parse::parse_datetime;
pub use point::{normalize, parse_timezone, DateInput, TimePoint, DEFAULT_TIMEZONE};
pub use relative::{format_relative, Magnitude, Unit, SOON_THRESHOLD_SECS};
