//! Simulation time model.
//!
//! # Design
//!
//! Scheduled time is an integer count of minutes since midnight, wrapped in
//! [`Minute`].  Event times, departures, and travel offsets are all whole
//! minutes, so calendar arithmetic is exact and comparisons are O(1).
//!
//! Passenger arrival instants come from exponential draws and are therefore
//! fractional; they stay `f64` and are bucketed into an hour of day with
//! [`hour_of`] only when statistics are recorded.
//!
//! There is no process-wide clock.  Each simulation run owns a [`SimClock`]
//! and passes it by reference to the bus and stop state machines, so any
//! number of runs may execute concurrently.

use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// Minutes in one simulated day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Hours in one simulated day (length of every per-hour series).
pub const HOURS_PER_DAY: usize = 24;

// ── Minute ───────────────────────────────────────────────────────────────────

/// An absolute simulation instant, in minutes since midnight.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Minute(pub u32);

impl Minute {
    pub const MIDNIGHT: Minute = Minute(0);
    pub const END_OF_DAY: Minute = Minute(MINUTES_PER_DAY);

    /// Build from an hour of day and a minute within that hour.
    #[inline]
    pub fn hm(hour: u32, minute: u32) -> Minute {
        Minute(hour * 60 + minute)
    }

    /// Hour of day (0–23) this instant falls into.
    #[inline]
    pub fn hour(self) -> usize {
        ((self.0 / 60) % 24) as usize
    }

    /// Minutes elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Minute) -> u32 {
        self.0.saturating_sub(earlier.0)
    }

    /// This instant as a fractional timestamp, for comparison with passenger
    /// arrival times.
    #[inline]
    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }
}

/// Saturates at `u32::MAX` minutes, which lies far past any closing time.
impl std::ops::Add<u32> for Minute {
    type Output = Minute;
    #[inline]
    fn add(self, rhs: u32) -> Minute {
        Minute(self.0.saturating_add(rhs))
    }
}

impl fmt::Display for Minute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for Minute {
    type Err = CoreError;

    /// Parse `HH:MM`.  `24:00` is accepted as the end of the day.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidTime(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        let hour: u32 = h.trim().parse().map_err(|_| invalid())?;
        let minute: u32 = m.trim().parse().map_err(|_| invalid())?;
        if minute >= 60 {
            return Err(invalid());
        }
        let t = Minute::hm(hour, minute);
        if t > Minute::END_OF_DAY {
            return Err(invalid());
        }
        Ok(t)
    }
}

/// Hour-of-day bucket for a fractional timestamp: `floor(t / 60) mod 24`.
///
/// Negative timestamps (possible for passengers generated shortly after
/// midnight by the first-bus backlog window) wrap into the previous day.
#[inline]
pub fn hour_of(t: f64) -> usize {
    ((t / 60.0).floor() as i64).rem_euclid(24) as usize
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The explicit simulation context: operating window plus the current time.
///
/// `SimClock` is cheap to copy and intentionally holds no heap data.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Opening time of the simulated day.
    pub start: Minute,
    /// Current time: advanced by [`SimClock::forward`] before each event.
    pub current: Minute,
    /// Closing time.  Events scheduled after it are never executed.
    pub end: Minute,
}

impl SimClock {
    /// Create a clock positioned at `start`.
    pub fn new(start: Minute, end: Minute) -> Self {
        Self { start, current: start, end }
    }

    /// Move the clock to an event's time.
    ///
    /// Event calendars pop in non-decreasing order, so in debug builds a
    /// backwards move is a bug in the caller.
    #[inline]
    pub fn forward(&mut self, to: Minute) {
        debug_assert!(to >= self.current, "clock moved backwards: {} -> {}", self.current, to);
        self.current = to;
    }

    /// Hour of day of the current time.
    #[inline]
    pub fn hour(&self) -> usize {
        self.current.hour()
    }

    /// `true` if `t` lies beyond the closing time.
    #[inline]
    pub fn is_after_close(&self, t: Minute) -> bool {
        t > self.end
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (window {}–{})", self.current, self.start, self.end)
    }
}
