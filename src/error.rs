use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown activity type: {0}")]
    UnknownCategory(String),
    #[error("unknown activity status: {0}")]
    UnknownStatus(String),
    #[error("unknown time window: {0} (expected 7d, 30d or All)")]
    UnknownWindow(String),
    #[error("unknown filter key: {0}")]
    UnknownFilterKey(String),
    #[error("missing value for filter {0}")]
    MissingValue(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("activity id is empty (record {index})")]
    EmptyId { index: usize },
    #[error("duplicate activity id: {id}")]
    DuplicateId { id: String },
    #[error("activity {id} ends at {end} before it starts at {start}")]
    EndBeforeStart {
        id: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("unsupported activity file format: {0}")]
    UnsupportedFormat(String),
    #[error("failed to read activity file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid activity JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid activity CSV: {0}")]
    Csv(#[from] csv::Error),
}
