//! Run configuration: vehicle and operating window.

use bl_core::{Minute, SimClock, SimRng};

/// Vehicle type used by every bus on the line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleConfig {
    /// Maximum passengers on board.  Must be positive.
    pub capacity: u32,
    /// Seated places.  Must not exceed `capacity`.
    pub seats: u32,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self { capacity: 80, seats: 30 }
    }
}

/// Operating window and randomness for simulation runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Opening time.  Visits scheduled earlier are skipped.
    pub start: Minute,

    /// Closing time.  Visits scheduled later are dropped.
    pub end: Minute,

    /// Master seed.  `None` seeds from OS entropy, so runs are not
    /// reproducible.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { start: Minute::MIDNIGHT, end: Minute::END_OF_DAY, seed: None }
    }
}

impl SimConfig {
    /// Construct a `SimClock` for one run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.start, self.end)
    }

    /// Construct the master random stream.
    pub fn make_rng(&self) -> SimRng {
        match self.seed {
            Some(seed) => SimRng::new(seed),
            None => SimRng::from_entropy(),
        }
    }
}
