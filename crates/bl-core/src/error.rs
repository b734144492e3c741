//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]` where they need it.

use thiserror::Error;

/// Errors raised by `bl-core` primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid time of day {0:?}: expected HH:MM within 00:00..=24:00")]
    InvalidTime(String),
}

/// Shorthand result type for `bl-core`.
pub type CoreResult<T> = Result<T, CoreError>;
