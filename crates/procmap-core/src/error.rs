use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcMapError {
    #[error("Invalid context: {0}")]
    InvalidContext(String),

    #[error("Id collision: label '{label}' sanitizes to '{id}', already used by '{existing}'")]
    IdCollision {
        id: String,
        label: String,
        existing: String,
    },

    #[error("Negative occurrence {occurrence} on edge #{index} ({source_event} -> {target_event})")]
    NegativeOccurrence {
        index: usize,
        source_event: String,
        target_event: String,
        occurrence: i64,
    },

    #[error("Unsupported condition: {0}")]
    UnsupportedCondition(String),

    #[error(transparent)]
    Source(#[from] anyhow::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProcMapError>;
