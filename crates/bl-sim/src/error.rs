use bl_line::LineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    /// A state machine received a signal its current state does not accept.
    /// Unreachable when visits are driven by [`Simulation`][crate::Simulation].
    #[error("{entity}: signal {signal} is not valid in state {state}")]
    IllegalTransition {
        entity: String,
        state:  &'static str,
        signal: &'static str,
    },

    #[error("line definition error: {0}")]
    Line(#[from] LineError),
}

pub type SimResult<T> = Result<T, SimError>;
