use rvs_core::TimestampError;
use thiserror::Error;

/// Rejected submission. The store is left untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("location \"{0}\" is missing or not an allowed location")]
    InvalidLocation(String),

    #[error("review body must not be empty")]
    EmptyBody,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("store has already been seeded")]
    AlreadySeeded,

    #[error("duplicate review id in seed data: {0}")]
    DuplicateId(String),
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to open seed file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: {source}")]
    Timestamp {
        row: usize,
        #[source]
        source: TimestampError,
    },

    #[error("row {row}: review body is empty")]
    EmptyBody { row: usize },
}
