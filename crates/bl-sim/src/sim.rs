//! The `Simulation` struct and its event loop.

use std::sync::Arc;

use bl_core::{BusNumber, SimRng, StopId};
use bl_line::{BusStopSpec, TimeTable};
use bl_stats::{Statistics, average_statistics};
use tracing::debug;

use crate::calendar::EventCalendar;
use crate::{Bus, BusStop, NoopObserver, SimConfig, SimError, SimObserver, SimResult, VehicleConfig};

/// Calendar action: bus number `bus` (index into the run's fleet) visits
/// `stop`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct StopVisit {
    bus:  usize,
    stop: StopId,
}

/// A validated line plus run parameters.
///
/// A `Simulation` holds no per-run state.  Every call to [`run`][Self::run]
/// builds fresh stop and bus state, so one instance can be shared (it is
/// cheap to clone and `Send + Sync`) by any number of concurrent runs.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
#[derive(Clone, Debug)]
pub struct Simulation {
    pub(crate) stops:   Arc<[BusStopSpec]>,
    pub(crate) vehicle: VehicleConfig,
    pub(crate) config:  SimConfig,
}

impl Simulation {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn stops(&self) -> &[BusStopSpec] {
        &self.stops
    }

    pub fn vehicle(&self) -> VehicleConfig {
        self.vehicle
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Simulate one day of service for `timetable`, drawing every random
    /// number from `rng`.
    pub fn run(&self, timetable: &TimeTable, rng: &mut SimRng) -> SimResult<Statistics> {
        self.run_observed(timetable, rng, &mut NoopObserver)
    }

    /// Like [`run`][Self::run], reporting progress to `observer`.
    ///
    /// One bus is dispatched per departure and one visit is scheduled per
    /// stop at `departure + travel_minutes`.  Visits are executed in time
    /// order; visits before the opening time are skipped and everything
    /// after the closing time is dropped.
    pub fn run_observed<O: SimObserver>(
        &self,
        timetable: &TimeTable,
        rng:       &mut SimRng,
        observer:  &mut O,
    ) -> SimResult<Statistics> {
        let mut clock = self.config.make_clock();
        let mut stops: Vec<BusStop<'_>> = self
            .stops
            .iter()
            .enumerate()
            .map(|(i, spec)| BusStop::new(StopId(i as u16), spec))
            .collect();

        // ── Seed the calendar ─────────────────────────────────────────────
        let departures = timetable.departures();
        let mut buses: Vec<Bus> = Vec::with_capacity(departures.len());
        let mut calendar = EventCalendar::with_capacity(departures.len() * stops.len());
        let mut number = BusNumber::FIRST;
        for departure in departures {
            let bus = buses.len();
            buses.push(Bus::new(number, departure, self.vehicle));
            number = number.next();
            for stop in &stops {
                calendar.add_event(departure + stop.spec.travel_minutes, StopVisit { bus, stop: stop.id });
            }
        }
        observer.on_run_start(&clock, buses.len(), calendar.len());

        // ── Drain ─────────────────────────────────────────────────────────
        let mut executed = 0usize;
        let mut skipped = 0usize;
        while let Some(event) = calendar.next_event() {
            if clock.is_after_close(event.time) {
                // The calendar is time ordered: nothing left can run.
                skipped += 1 + calendar.len();
                break;
            }
            if event.time < clock.start {
                skipped += 1;
                continue;
            }
            clock.forward(event.time);

            let StopVisit { bus, stop } = event.action;
            let stop = &mut stops[stop.index()];
            let bus = &mut buses[bus];
            bus.run_stop_sequence(stop, &clock, rng)?;
            observer.on_visit(&clock, bus, stop);
            executed += 1;
        }

        // ── Aggregate ─────────────────────────────────────────────────────
        let bus_count = buses.len();
        let per_stop = stops.into_iter().map(BusStop::into_statistics).collect();
        let bus_stats: Vec<_> = buses.into_iter().map(Bus::into_statistics).collect();
        let stats = Statistics::from_run(self.vehicle.capacity, per_stop, &bus_stats);

        debug!(
            buses = bus_count,
            executed,
            skipped,
            arrived = stats.total_passengers_arrived(),
            unboarded = stats.total_passengers_left_unboarded(),
            "simulation run finished"
        );
        observer.on_run_end(&stats);
        Ok(stats)
    }

    /// Run `runs` independent simulations, drawing fresh numbers from `rng`
    /// for each, and return their pointwise average.
    pub fn run_multiple_then_average(
        &self,
        timetable: &TimeTable,
        rng:       &mut SimRng,
        runs:      usize,
    ) -> SimResult<Statistics> {
        let results = (0..runs)
            .map(|_| self.run(timetable, rng))
            .collect::<SimResult<Vec<_>>>()?;
        average_statistics(&results)
            .ok_or_else(|| SimError::Config("number of runs must be positive".into()))
    }
}
