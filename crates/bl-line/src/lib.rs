//! `bl-line`: static description of a bus line and its timetable.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`stop`]      | `BusStopSpec`, `HourlyRates`                              |
//! | [`timetable`] | `TimeTable`, `TimeTableRow`, `Chromosome`                 |
//! | [`loader`]    | `parse_bus_stops`, `parse_time_table`, file/reader variants |
//! | [`error`]     | `LineError`, `LineResult<T>`                              |
//!
//! Everything here is immutable once parsed.  A single `Vec<BusStopSpec>` is
//! shared read-only by every simulation run and every optimizer individual.

pub mod error;
pub mod loader;
pub mod stop;
pub mod timetable;


pub use error::{LineError, LineResult};
pub use loader::{
    load_bus_stops, load_time_table, parse_bus_stops, parse_time_table, read_bus_stops,
    read_time_table,
};
pub use stop::{BusStopSpec, HourlyRates, MAX_RATE_PER_HOUR, MAX_TRAVEL_MINUTES};
pub use timetable::{Chromosome, MAX_DEPARTURES_PER_HOUR, TimeTable, TimeTableRow};
