//! Runtime state of one bus stop during a simulation run.
//!
//! # State machine
//!
//! ```text
//!          bus_arrived            start_boarding            finish_boarding
//!   Idle ──────────────► BusArrived ──────────────► Boarding ───────────────► Idle
//! ```
//!
//! A stop never changes state on its own; every transition is a call from
//! the visiting [`Bus`][crate::Bus].
//!
//! # Passenger generation
//!
//! Passengers are generated lazily when boarding starts, covering the gap
//! since the previous bus left.  The rate is the stop's rate for the current
//! hour; exponential inter-arrival gaps are accumulated from the start of the
//! window and every instant strictly before "now" is a new passenger.  The
//! first generation of a run looks back at most [`FIRST_WINDOW_MINUTES`].
//!
//! Passengers a full bus could not take stay in the queue for the next bus.

use std::collections::VecDeque;

use bl_core::{Minute, SimClock, SimRng, StopId, hour_of};
use bl_line::BusStopSpec;
use bl_stats::BusStopStatistics;
use tracing::debug;

use crate::{SimError, SimResult};

/// Look-back for the first passenger generation of a run, in minutes.
pub const FIRST_WINDOW_MINUTES: f64 = 15.0;

// ── States and signals ───────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusStopState {
    Idle,
    BusArrived,
    Boarding,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopSignal {
    BusArrived,
    StartBoarding,
    FinishBoarding,
}

impl BusStopState {
    /// Transition table.  `None` means the signal is illegal in this state.
    pub fn on(self, signal: StopSignal) -> Option<BusStopState> {
        match (self, signal) {
            (BusStopState::Idle, StopSignal::BusArrived) => Some(BusStopState::BusArrived),
            (BusStopState::BusArrived, StopSignal::StartBoarding) => Some(BusStopState::Boarding),
            (BusStopState::Boarding, StopSignal::FinishBoarding) => Some(BusStopState::Idle),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BusStopState::Idle => "Idle",
            BusStopState::BusArrived => "BusArrived",
            BusStopState::Boarding => "Boarding",
        }
    }
}

impl StopSignal {
    pub fn name(self) -> &'static str {
        match self {
            StopSignal::BusArrived => "bus_arrived",
            StopSignal::StartBoarding => "start_boarding",
            StopSignal::FinishBoarding => "finish_boarding",
        }
    }
}

// ── BusStop ──────────────────────────────────────────────────────────────────

/// A stop's mutable per-run state, borrowing its immutable definition.
pub struct BusStop<'a> {
    pub id:   StopId,
    pub spec: &'a BusStopSpec,
    state:    BusStopState,

    /// Set when the previous bus finished boarding.  `None` until the first
    /// visit of the run.
    last_bus_arrival: Option<Minute>,

    /// Minutes between the two most recent bus arrivals.
    last_interval: Option<u32>,

    /// Arrival instants of waiting passengers, ascending.
    waiting: VecDeque<f64>,

    pub stats: BusStopStatistics,
}

impl<'a> BusStop<'a> {
    pub fn new(id: StopId, spec: &'a BusStopSpec) -> Self {
        Self {
            id,
            spec,
            state: BusStopState::Idle,
            last_bus_arrival: None,
            last_interval: None,
            waiting: VecDeque::new(),
            stats: BusStopStatistics::new(spec.name.clone()),
        }
    }

    #[inline]
    pub fn state(&self) -> BusStopState {
        self.state
    }

    /// Number of passengers currently waiting.
    #[inline]
    pub fn waiting(&self) -> usize {
        self.waiting.len()
    }

    /// Arrival instant of the passenger at the head of the queue.
    pub fn oldest_waiting(&self) -> Option<f64> {
        self.waiting.front().copied()
    }

    pub fn last_interval(&self) -> Option<u32> {
        self.last_interval
    }

    /// Reset to the state at the start of a run.
    pub fn clear(&mut self) {
        self.state = BusStopState::Idle;
        self.last_bus_arrival = None;
        self.last_interval = None;
        self.waiting.clear();
        self.stats.clear();
    }

    /// Consume the stop and return what it recorded.
    pub fn into_statistics(self) -> BusStopStatistics {
        self.stats
    }

    // ── Signals ───────────────────────────────────────────────────────────

    pub fn bus_arrived(&mut self, clock: &SimClock) -> SimResult<()> {
        self.transition(StopSignal::BusArrived)?;
        self.last_interval = self.last_bus_arrival.map(|last| clock.current.since(last));
        Ok(())
    }

    /// Generate the passengers who arrived since the previous bus and return
    /// how many there were.
    pub fn start_boarding(&mut self, clock: &SimClock, rng: &mut SimRng) -> SimResult<usize> {
        self.transition(StopSignal::StartBoarding)?;
        Ok(self.generate_passengers(clock, rng))
    }

    pub fn finish_boarding(&mut self, clock: &SimClock) -> SimResult<()> {
        self.transition(StopSignal::FinishBoarding)?;
        self.last_bus_arrival = Some(clock.current);
        Ok(())
    }

    /// Pop the longest-waiting passenger who arrived no later than `now`.
    /// Only valid while boarding.
    pub fn board_next(&mut self, now: Minute) -> Option<f64> {
        if self.state != BusStopState::Boarding {
            return None;
        }
        match self.waiting.front() {
            Some(&t) if t <= now.as_f64() => self.waiting.pop_front(),
            _ => None,
        }
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn transition(&mut self, signal: StopSignal) -> SimResult<()> {
        match self.state.on(signal) {
            Some(next) => {
                self.state = next;
                Ok(())
            }
            None => Err(SimError::IllegalTransition {
                entity: format!("{} ({})", self.spec.name, self.id),
                state:  self.state.name(),
                signal: signal.name(),
            }),
        }
    }

    fn generate_passengers(&mut self, clock: &SimClock, rng: &mut SimRng) -> usize {
        let rate = self.spec.arrival_rates.per_minute(clock.hour());
        if !rate.is_finite() || rate <= 0.0 {
            return 0;
        }

        let now = clock.current.as_f64();
        let mut t = match self.last_bus_arrival {
            Some(last) => last.as_f64(),
            None => now - FIRST_WINDOW_MINUTES,
        };
        let mean_gap = 1.0 / rate;

        let mut generated = 0;
        loop {
            let next = t + rng.exponential(mean_gap);
            if next <= t {
                // The gap is below the float resolution at `t`.
                debug!(stop = %self.spec.name, generated, at = t, "arrival clock stalled");
                break;
            }
            t = next;
            if t >= now {
                break;
            }
            debug_assert!(self.waiting.back().is_none_or(|&last| last <= t));
            self.waiting.push_back(t);
            self.stats.record_arrival(hour_of(t));
            generated += 1;
        }
        generated
    }
}
