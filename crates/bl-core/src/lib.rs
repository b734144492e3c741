//! `bl-core`: foundational types for the bus line simulator.
//!
//! This crate is a dependency of every other `bl-*` crate.  It intentionally
//! has no `bl-*` dependencies and minimal external ones (`rand`,
//! `rand_distr` and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `BusNumber`, `StopId`                                 |
//! | [`time`]        | `Minute`, `SimClock`, `hour_of`                       |
//! | [`rng`]         | `SimRng` (one stream per run / per worker)            |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{BusNumber, StopId};
pub use rng::SimRng;
pub use time::{HOURS_PER_DAY, MINUTES_PER_DAY, Minute, SimClock, hour_of};
