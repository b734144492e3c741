//! Per-stop counters, bucketed by hour of day.

use tracing::debug;

use crate::HourlySeries;

/// Statistics for one bus stop, or for several stops merged together.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BusStopStatistics {
    pub name: String,

    /// Passengers who arrived at the stop, by arrival hour.
    pub passengers_arrived: HourlySeries,

    /// Passengers who alighted here, by bus-visit hour.
    pub passengers_departed: HourlySeries,

    /// Passengers still waiting when a full bus left, by bus-visit hour.
    /// A passenger left behind by two buses is counted twice.
    pub passengers_left_unboarded: HourlySeries,

    /// Minutes waited by passengers who boarded, by boarding hour.
    pub time_spent_waiting: HourlySeries,
}

impl BusStopStatistics {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    // ── Recording ─────────────────────────────────────────────────────────

    #[inline]
    pub fn record_arrival(&mut self, hour: usize) {
        self.passengers_arrived.add(hour, 1.0);
    }

    #[inline]
    pub fn record_departed(&mut self, passengers: u32, hour: usize) {
        self.passengers_departed.add(hour, f64::from(passengers));
    }

    #[inline]
    pub fn record_left_unboarded(&mut self, passengers: usize, hour: usize) {
        self.passengers_left_unboarded.add(hour, passengers as f64);
    }

    #[inline]
    pub fn record_wait(&mut self, minutes: f64, hour: usize) {
        self.time_spent_waiting.add(hour, minutes);
    }

    /// Drop every recorded value, keeping the name.
    pub fn clear(&mut self) {
        let name = std::mem::take(&mut self.name);
        *self = Self::new(name);
    }

    /// Add every per-hour bucket of `other` into `self`.
    pub fn merge(&mut self, other: &BusStopStatistics) {
        self.passengers_arrived.merge(&other.passengers_arrived);
        self.passengers_departed.merge(&other.passengers_departed);
        self.passengers_left_unboarded.merge(&other.passengers_left_unboarded);
        self.time_spent_waiting.merge(&other.time_spent_waiting);
    }

    /// Multiply every per-hour bucket by `factor`.
    pub fn scale(&mut self, factor: f64) {
        self.passengers_arrived.scale(factor);
        self.passengers_departed.scale(factor);
        self.passengers_left_unboarded.scale(factor);
        self.time_spent_waiting.scale(factor);
    }

    // ── Totals ────────────────────────────────────────────────────────────

    pub fn total_passengers_arrived(&self) -> f64 {
        self.passengers_arrived.total()
    }

    pub fn total_passengers_departed(&self) -> f64 {
        self.passengers_departed.total()
    }

    pub fn total_passengers_left_unboarded(&self) -> f64 {
        self.passengers_left_unboarded.total()
    }

    pub fn total_time_spent_waiting(&self) -> f64 {
        self.time_spent_waiting.total()
    }

    // ── Derived ratios ────────────────────────────────────────────────────

    /// Mean minutes waited per arrived passenger; `0.0` if nobody arrived.
    pub fn average_wait_time(&self) -> f64 {
        let arrived = self.total_passengers_arrived();
        if arrived == 0.0 {
            debug!(stop = %self.name, "no arrivals; average wait time reported as 0");
            return 0.0;
        }
        self.total_time_spent_waiting() / arrived
    }

    /// Left-unboarded count relative to arrivals; `0.0` if nobody arrived.
    pub fn unboarded_share(&self) -> f64 {
        let arrived = self.total_passengers_arrived();
        if arrived == 0.0 {
            debug!(stop = %self.name, "no arrivals; unboarded share reported as 0");
            return 0.0;
        }
        self.total_passengers_left_unboarded() / arrived
    }

    /// Mean wait in `hour` per passenger who arrived during that hour.
    pub fn average_wait_in_hour(&self, hour: usize) -> f64 {
        let arrived = self.passengers_arrived.get(hour);
        if arrived == 0.0 { 0.0 } else { self.time_spent_waiting.get(hour) / arrived }
    }
}
