//! Simulation observer trait for tracing and data collection.

use bl_core::SimClock;
use bl_stats::Statistics;
use tracing::trace;

use crate::{Bus, BusStop};

/// Callbacks invoked by [`Simulation::run_observed`][crate::Simulation::run_observed].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait SimObserver {
    /// Called once after the calendar is seeded, before any visit runs.
    fn on_run_start(&mut self, _clock: &SimClock, _buses: usize, _events: usize) {}

    /// Called after each completed stop visit.
    fn on_visit(&mut self, _clock: &SimClock, _bus: &Bus, _stop: &BusStop<'_>) {}

    /// Called once with the run's statistics.
    fn on_run_end(&mut self, _stats: &Statistics) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Logs every stop visit at `trace` level.
///
/// Enable with `RUST_LOG=bl_sim=trace` to follow a run visit by visit.
pub struct TraceObserver;

impl SimObserver for TraceObserver {
    fn on_run_start(&mut self, clock: &SimClock, buses: usize, events: usize) {
        trace!(start = %clock.start, end = %clock.end, buses, events, "run start");
    }

    fn on_visit(&mut self, clock: &SimClock, bus: &Bus, stop: &BusStop<'_>) {
        trace!(
            time = %clock.current,
            bus = %bus.number,
            stop = %stop.spec.name,
            load = bus.load(),
            waiting = stop.waiting(),
            "visit"
        );
    }

    fn on_run_end(&mut self, stats: &Statistics) {
        trace!(
            arrived = stats.total_passengers_arrived(),
            unboarded = stats.total_passengers_left_unboarded(),
            "run end"
        );
    }
}
