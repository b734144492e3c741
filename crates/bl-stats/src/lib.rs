//! `bl-stats`: statistics gathered during a simulation run.
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`series`]  | `HourlySeries`: 24 per-hour buckets                        |
//! | [`stop`]    | `BusStopStatistics`: arrivals, alightings, left-behind, waiting |
//! | [`bus`]     | `BusStatistics`: load per stop visit, satisfaction scores  |
//! | [`summary`] | `FleetStatistics`, `Statistics`, `average_statistics`       |
//!
//! Entity statistics are recorded while the simulation runs; [`Statistics`]
//! is the immutable result of one run (or the average of several).
//!
//! # Degenerate inputs
//!
//! A stop with no traffic is valid input.  Every ratio accessor
//! (average wait, unboarded share, average load, average satisfaction)
//! returns `0.0` when its denominator is zero instead of dividing by it.

pub mod bus;
pub mod series;
pub mod stop;
pub mod summary;


pub use bus::{BusStatistics, StopLoad};
pub use series::HourlySeries;
pub use stop::BusStopStatistics;
pub use summary::{FleetStatistics, Statistics, average_statistics};
