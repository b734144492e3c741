use thiserror::Error;

#[derive(Debug, Error)]
pub enum LineError {
    #[error("line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("duplicate bus stop name {0:?}")]
    DuplicateStop(String),

    #[error("bus stop {name:?}: {reason}")]
    InvalidStop { name: String, reason: String },

    #[error("timetable hour {hour}: {reason}")]
    InvalidRow { hour: u32, reason: String },

    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type LineResult<T> = Result<T, LineError>;
