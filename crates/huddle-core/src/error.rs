//! Error types shared by the huddle library crates.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for huddle-core and huddle-store.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Timestamp formatting error
    #[error("time formatting error: {0}")]
    Time(#[from] time::error::Format),

    /// The claim registry exists but is not a valid registry document.
    #[error("claim registry {} is corrupt: {source}", path.display())]
    CorruptRegistry {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Task ids are ASCII digits.
    #[error("invalid task id {0:?} (expected digits)")]
    InvalidTaskId(String),

    /// Nothing to append after trimming.
    #[error("message body is empty")]
    EmptyBody,

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for huddle library crates.
pub type Result<T> = std::result::Result<T, Error>;
