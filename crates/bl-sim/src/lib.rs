//! `bl-sim`: discrete-event simulation of one bus line for one day.
//!
//! # Event loop
//!
//! ```text
//! for departure in timetable:
//!     dispatch a Bus
//!     for stop in route:
//!         calendar.add_event(departure + stop.travel_minutes, visit(bus, stop))
//!
//! while let Some(event) = calendar.next_event():
//!     if event.time > close: drop the rest
//!     clock.forward(event.time)
//!     bus.run_stop_sequence(stop)     // arrive → board → depart
//! ```
//!
//! The loop is strictly sequential: events run to completion in
//! `(time, insertion)` order.  Parallelism belongs one level up, where the
//! optimizer evaluates many independent runs.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`calendar`] | `EventCalendar`, `Event`                                 |
//! | [`stop`]     | `BusStop` runtime state machine, passenger generation    |
//! | [`bus`]      | `Bus` state machine: alighting, boarding, departure      |
//! | [`config`]   | `VehicleConfig`, `SimConfig`                             |
//! | [`builder`]  | `SimBuilder` (validates configuration)                   |
//! | [`sim`]      | `Simulation::run`, `run_multiple_then_average`           |
//! | [`observer`] | `SimObserver`, `NoopObserver`, `TraceObserver`           |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use bl_sim::SimBuilder;
//!
//! let stops = bl_line::parse_bus_stops(STOPS)?;
//! let timetable = bl_line::parse_time_table(TIMETABLE)?;
//! let sim = SimBuilder::new(stops).seed(7).build()?;
//! let stats = sim.run(&timetable, &mut sim.config().make_rng())?;
//! println!("{stats}");
//! ```

pub mod builder;
pub mod bus;
pub mod calendar;
pub mod config;
pub mod error;
pub mod observer;
pub mod sim;
pub mod stop;


pub use builder::SimBuilder;
pub use bus::{Bus, BusSignal, BusState};
pub use calendar::{Event, EventCalendar};
pub use config::{SimConfig, VehicleConfig};
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver, TraceObserver};
pub use sim::Simulation;
pub use stop::{BusStop, BusStopState, StopSignal};
