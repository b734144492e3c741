use bl_sim::SimError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneticError {
    #[error("optimizer configuration error: {0}")]
    Config(String),

    #[error("invalid hour constraints: {0}")]
    Constraints(String),

    #[error("fitness evaluation failed: {0}")]
    Sim(#[from] SimError),
}

pub type GeneticResult<T> = Result<T, GeneticError>;
