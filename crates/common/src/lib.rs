//! Shared types, config, and error definitions for the Power+ service.

pub mod config;
pub mod error;
pub mod types;

pub use config::ServerConfig;
pub use error::{CacheError, DataError, Error, FetchError, ResolutionError};
pub use types::*;

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
