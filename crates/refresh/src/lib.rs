//! Refresh-and-cache pipeline.
//!
//! Owns the persisted snapshot and decides, per request, whether to serve
//! it, refetch it, or fall back to it.

pub mod cache;
pub mod orchestrator;

pub use cache::{CacheEntry, CacheStore, CACHE_TTL};
pub use orchestrator::{DataService, Origin, Snapshot};
