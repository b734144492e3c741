//! One vehicle's trip along the route.
//!
//! # State machine
//!
//! ```text
//!             arrive               board               depart
//!   Traveling ──────► Arrived ──────────► Boarding ──────────► Traveling
//! ```
//!
//! Each pre-scheduled stop visit runs the full cycle through
//! [`Bus::run_stop_sequence`], calling the stop's transitions directly.

use bl_core::{BusNumber, Minute, SimClock, SimRng, StopId};
use bl_stats::BusStatistics;

use crate::stop::BusStop;
use crate::{SimError, SimResult, VehicleConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusState {
    Traveling,
    Arrived,
    Boarding,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusSignal {
    Arrive,
    Board,
    Depart,
}

impl BusState {
    /// Transition table.  `None` means the signal is illegal in this state.
    pub fn on(self, signal: BusSignal) -> Option<BusState> {
        match (self, signal) {
            (BusState::Traveling, BusSignal::Arrive) => Some(BusState::Arrived),
            (BusState::Arrived, BusSignal::Board) => Some(BusState::Boarding),
            (BusState::Boarding, BusSignal::Depart) => Some(BusState::Traveling),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BusState::Traveling => "Traveling",
            BusState::Arrived => "Arrived",
            BusState::Boarding => "Boarding",
        }
    }
}

impl BusSignal {
    pub fn name(self) -> &'static str {
        match self {
            BusSignal::Arrive => "arrive",
            BusSignal::Board => "board",
            BusSignal::Depart => "depart",
        }
    }
}

/// A bus dispatched at one timetable departure.
pub struct Bus {
    pub number:    BusNumber,
    pub departure: Minute,
    state:         BusState,
    load:          u32,
    current_stop:  Option<StopId>,
    pub stats:     BusStatistics,
}

impl Bus {
    pub fn new(number: BusNumber, departure: Minute, vehicle: VehicleConfig) -> Self {
        Self {
            number,
            departure,
            state: BusState::Traveling,
            load: 0,
            current_stop: None,
            stats: BusStatistics::new(number, vehicle.capacity, vehicle.seats),
        }
    }

    #[inline]
    pub fn state(&self) -> BusState {
        self.state
    }

    #[inline]
    pub fn load(&self) -> u32 {
        self.load
    }

    /// Stop most recently visited.
    pub fn current_stop(&self) -> Option<StopId> {
        self.current_stop
    }

    pub fn into_statistics(self) -> BusStatistics {
        self.stats
    }

    /// One complete stop visit: alight, board, depart.
    pub fn run_stop_sequence(
        &mut self,
        stop:  &mut BusStop<'_>,
        clock: &SimClock,
        rng:   &mut SimRng,
    ) -> SimResult<()> {
        self.arrive_at_stop(stop, clock)?;
        self.board_passengers(stop, clock, rng)?;
        self.depart_from_stop(stop, clock)
    }

    /// Signal the stop and let `round(load × alighting_fraction)` passengers
    /// off.  Returns how many alighted.
    pub fn arrive_at_stop(&mut self, stop: &mut BusStop<'_>, clock: &SimClock) -> SimResult<u32> {
        self.transition(BusSignal::Arrive)?;
        self.current_stop = Some(stop.id);
        stop.bus_arrived(clock)?;

        let alighting = (f64::from(self.load) * stop.spec.alighting_fraction).round() as u32;
        let alighting = alighting.min(self.load);
        self.load -= alighting;
        stop.stats.record_departed(alighting, clock.hour());
        Ok(alighting)
    }

    /// Board waiting passengers in arrival order until the bus is full.
    /// Returns how many boarded.
    pub fn board_passengers(
        &mut self,
        stop:  &mut BusStop<'_>,
        clock: &SimClock,
        rng:   &mut SimRng,
    ) -> SimResult<u32> {
        self.transition(BusSignal::Board)?;
        stop.start_boarding(clock, rng)?;

        let hour = clock.hour();
        let now = clock.current;
        let mut boarded = 0;
        while self.load < self.stats.capacity {
            let Some(arrived_at) = stop.board_next(now) else { break };
            self.load += 1;
            boarded += 1;
            stop.stats.record_wait(now.as_f64() - arrived_at, hour);
            let satisfaction = self.stats.satisfaction_at(self.load);
            self.stats.record_boarding(satisfaction);
        }

        let left = stop.waiting();
        stop.stats.record_left_unboarded(left, hour);
        self.stats.record_left_behind(left);
        self.stats.record_load(stop.id, self.load);
        Ok(boarded)
    }

    pub fn depart_from_stop(&mut self, stop: &mut BusStop<'_>, clock: &SimClock) -> SimResult<()> {
        self.transition(BusSignal::Depart)?;
        stop.finish_boarding(clock)
    }

    fn transition(&mut self, signal: BusSignal) -> SimResult<()> {
        match self.state.on(signal) {
            Some(next) => {
                self.state = next;
                Ok(())
            }
            None => Err(SimError::IllegalTransition {
                entity: self.number.to_string(),
                state:  self.state.name(),
                signal: signal.name(),
            }),
        }
    }
}
