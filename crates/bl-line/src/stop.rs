//! Static bus stop description: position on the route, hourly demand, and
//! alighting behaviour.

use std::fmt;

use bl_core::{HOURS_PER_DAY, MINUTES_PER_DAY};

use crate::{LineError, LineResult};

/// Highest accepted arrival rate, in passengers per hour.
///
/// At this rate the arrival generator still draws fewer than two thousand
/// passengers per simulated minute.
pub const MAX_RATE_PER_HOUR: f64 = 100_000.0;

/// Longest accepted travel time from the first stop, one full day.
pub const MAX_TRAVEL_MINUTES: u32 = MINUTES_PER_DAY;

// ── HourlyRates ───────────────────────────────────────────────────────────────

/// Passenger arrival rate (passengers per hour) for each hour of the day.
///
/// Hours without an entry in the input have rate 0: no passenger ever
/// arrives at the stop during that hour.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HourlyRates([f64; HOURS_PER_DAY]);

impl HourlyRates {
    /// Rates that are zero for every hour.
    pub fn none() -> Self {
        Self::default()
    }

    /// Build from `(hour, passengers_per_hour)` pairs.
    ///
    /// Rejects hours outside 0–23, negative or non-finite rates, rates above
    /// [`MAX_RATE_PER_HOUR`], and hours listed twice.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = (u32, f64)>,
    {
        let mut rates = [0.0; HOURS_PER_DAY];
        let mut seen = [false; HOURS_PER_DAY];
        for (hour, rate) in pairs {
            let h = hour as usize;
            if h >= HOURS_PER_DAY {
                return Err(format!("hour {hour} is outside 0..=23"));
            }
            if !rate.is_finite() || rate < 0.0 {
                return Err(format!("rate {rate} for hour {hour} must be a non-negative number"));
            }
            if rate > MAX_RATE_PER_HOUR {
                return Err(format!(
                    "rate {rate} for hour {hour} exceeds {MAX_RATE_PER_HOUR} passengers per hour"
                ));
            }
            if seen[h] {
                return Err(format!("hour {hour} listed more than once"));
            }
            seen[h] = true;
            rates[h] = rate;
        }
        Ok(Self(rates))
    }

    /// Passengers per hour during `hour` (0–23).
    #[inline]
    pub fn per_hour(&self, hour: usize) -> f64 {
        self.0.get(hour).copied().unwrap_or(0.0)
    }

    /// Passengers per minute during `hour`: the Poisson λ used by the
    /// arrival generator.
    #[inline]
    pub fn per_minute(&self, hour: usize) -> f64 {
        self.per_hour(hour) / 60.0
    }

    /// `true` if no hour has a positive rate.
    pub fn is_idle(&self) -> bool {
        self.0.iter().all(|&r| r == 0.0)
    }

    /// Expected passengers over the whole day.
    pub fn daily_total(&self) -> f64 {
        self.0.iter().sum()
    }
}

// ── BusStopSpec ───────────────────────────────────────────────────────────────

/// One stop on the line, as read from the bus-stop definition file.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BusStopSpec {
    /// Unique stop name.
    pub name: String,

    /// Minutes from the route's first departure to arrival at this stop.
    pub travel_minutes: u32,

    /// Hourly passenger arrival rates.
    pub arrival_rates: HourlyRates,

    /// Share of onboard passengers alighting here, in `[0, 1]`.
    pub alighting_fraction: f64,
}

impl BusStopSpec {
    /// Validate and build a stop.
    pub fn new(
        name:               impl Into<String>,
        travel_minutes:     u32,
        arrival_rates:      HourlyRates,
        alighting_fraction: f64,
    ) -> LineResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(LineError::InvalidStop {
                name,
                reason: "name must not be empty".into(),
            });
        }
        if travel_minutes > MAX_TRAVEL_MINUTES {
            return Err(LineError::InvalidStop {
                name,
                reason: format!("travel time {travel_minutes} min exceeds {MAX_TRAVEL_MINUTES}"),
            });
        }
        if !(0.0..=1.0).contains(&alighting_fraction) {
            return Err(LineError::InvalidStop {
                name,
                reason: format!("alighting fraction {alighting_fraction} is outside [0, 1]"),
            });
        }
        Ok(Self { name, travel_minutes, arrival_rates, alighting_fraction })
    }
}

impl fmt::Display for BusStopSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: +{} min", self.name, self.travel_minutes)
    }
}
