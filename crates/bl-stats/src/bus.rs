//! Per-vehicle statistics.

use bl_core::{BusNumber, StopId};

/// Load on board when a bus left one stop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopLoad {
    pub stop: StopId,
    pub load: u32,
}

/// What one bus saw over its trip.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BusStatistics {
    pub bus:      BusNumber,
    pub capacity: u32,
    pub seats:    u32,

    /// One entry per stop visit, in visit order.
    pub load_per_stop: Vec<StopLoad>,

    /// Passengers boarded over the whole trip.
    pub passengers_transported: u32,

    /// One score in `[0, 1]` per boarded passenger, plus a `0.0` for each
    /// passenger left behind at a visit.
    pub satisfactions: Vec<f64>,
}

impl BusStatistics {
    pub fn new(bus: BusNumber, capacity: u32, seats: u32) -> Self {
        Self {
            bus,
            capacity,
            seats,
            load_per_stop: Vec::new(),
            passengers_transported: 0,
            satisfactions: Vec::new(),
        }
    }

    #[inline]
    pub fn record_load(&mut self, stop: StopId, load: u32) {
        self.load_per_stop.push(StopLoad { stop, load });
    }

    /// Record one boarded passenger and the satisfaction they reported.
    #[inline]
    pub fn record_boarding(&mut self, satisfaction: f64) {
        self.passengers_transported += 1;
        self.satisfactions.push(satisfaction);
    }

    /// Record `count` passengers the bus could not take.
    pub fn record_left_behind(&mut self, count: usize) {
        self.satisfactions.extend(std::iter::repeat_n(0.0, count));
    }

    /// Satisfaction of a passenger who boarded and brought the load to `load`.
    ///
    /// Seated passengers score 1.0; standing passengers score linearly less
    /// as the bus fills, reaching 0.0 at full capacity.
    pub fn satisfaction_at(&self, load: u32) -> f64 {
        if load <= self.seats {
            return 1.0;
        }
        let standing_room = self.capacity.saturating_sub(self.seats);
        if standing_room == 0 {
            return 0.0;
        }
        let standing = (load - self.seats).min(standing_room);
        1.0 - f64::from(standing) / f64::from(standing_room)
    }

    /// Mean load over all stop visits; `0.0` for a bus with no visits.
    pub fn average_load(&self) -> f64 {
        if self.load_per_stop.is_empty() {
            return 0.0;
        }
        let sum: u64 = self.load_per_stop.iter().map(|l| u64::from(l.load)).sum();
        sum as f64 / self.load_per_stop.len() as f64
    }

    /// [`average_load`][Self::average_load] as a percentage of capacity.
    pub fn average_load_percent(&self) -> f64 {
        if self.capacity == 0 {
            return 0.0;
        }
        self.average_load() / f64::from(self.capacity) * 100.0
    }
}
