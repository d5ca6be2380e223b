use thiserror::Error;

#[derive(Error, Debug)]
pub enum SantaError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("At least 2 participants are required, got {count}")]
    TooFewParticipants { count: usize },

    #[error("Iteration budget must be at least 1, got {iterations}")]
    InvalidIterations { iterations: u64 },

    #[error("Participant '{name}' appears more than once")]
    DuplicateParticipant { name: String },

    #[error("Invalid arrangement: {reason}")]
    InvalidArrangement { reason: String },

    #[error("Malformed table: row {row} has {actual} columns, expected {expected}")]
    MalformedTable { row: usize, expected: usize, actual: usize },

    #[error("Table has no header row")]
    EmptyTable,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SantaResult<T> = Result<T, SantaError>;
