//! Error types for the Power+ service.
//!
//! Each pipeline stage has its own enum so the refresh orchestrator can
//! decide which failures degrade to the stale cache. Only [`DataError`]
//! ever reaches a client.

use thiserror::Error;

/// Umbrella error for startup, config and serving.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Data(#[from] DataError),
}

/// Failure retrieving the raw table from the upstream source.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("upstream returned HTTP {0}")]
    BadStatus(u16),

    #[error("payload is not tabular: {0}")]
    ParseFailure(String),
}

/// A required metric column could not be located in the upstream schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("no column containing '{which}' (available: {available:?})")]
    MissingColumn {
        which: &'static str,
        available: Vec<String>,
    },
}

/// Persisted cache could not be read or written.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache file is corrupt: {0}")]
    Corrupt(String),

    #[error("cache IO failure: {0}")]
    Io(#[from] std::io::Error),
}

/// Neither a fresh nor a stale dataset exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("No data available")]
    NoDataAvailable,
}
