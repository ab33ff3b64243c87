//! Refresh orchestration: serve the cache, refetch, or fall back.
//!
//! At most one fetch is in flight. Callers that queue behind a running
//! refresh reuse its outcome instead of fetching again.

use chrono::{DateTime, Utc};
use common::{DataError, FetchError, PlayerRecord, ResolutionError};
use power_plus::process_table;
use savant_client::SourceFetcher;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::{CacheEntry, CacheStore};

/// Where a snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Fresh cache hit.
    Cached,
    /// Fetched and processed during this call.
    Refreshed,
    /// The refresh failed and the last known entry was served instead.
    Fallback,
}

/// A dataset handed to the query layer.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub entry: Arc<CacheEntry>,
    pub origin: Origin,
}

impl Snapshot {
    pub fn data(&self) -> &[PlayerRecord] {
        &self.entry.data
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.entry.timestamp
    }
}

/// Why a refresh attempt produced nothing usable.
#[derive(Debug, Error)]
enum RefreshFailure {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("fetch exceeded {0:?}")]
    Timeout(Duration),

    #[error("column resolution failed: {0}")]
    Resolution(#[from] ResolutionError),

    #[error("upstream returned no players")]
    Empty,
}

/// Coordinates the cache store and the upstream fetcher.
pub struct DataService {
    cache: Arc<CacheStore>,
    fetcher: Arc<dyn SourceFetcher>,
    season: u16,
    fetch_timeout: Duration,
    refresh_lock: Mutex<()>,
    /// Bumped after every completed refresh attempt.
    generation: AtomicU64,
}

impl DataService {
    pub fn new(
        cache: Arc<CacheStore>,
        fetcher: Arc<dyn SourceFetcher>,
        season: u16,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            cache,
            fetcher,
            season,
            fetch_timeout,
            refresh_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn cache(&self) -> &Arc<CacheStore> {
        &self.cache
    }

    /// Fresh cache if available, otherwise refresh (falling back to stale data).
    pub async fn get_data(&self) -> Result<Snapshot, DataError> {
        let seen = self.generation.load(Ordering::Acquire);
        if let Some(entry) = self.cache.load_if_fresh() {
            return Ok(Snapshot {
                entry,
                origin: Origin::Cached,
            });
        }
        self.refresh_after(seen).await
    }

    /// Skip the freshness check and refetch (still falling back on failure).
    pub async fn force_refresh(&self) -> Result<Snapshot, DataError> {
        let seen = self.generation.load(Ordering::Acquire);
        self.refresh_after(seen).await
    }

    async fn refresh_after(&self, seen: u64) -> Result<Snapshot, DataError> {
        let _guard = self.refresh_lock.lock().await;

        if self.generation.load(Ordering::Acquire) != seen {
            debug!("Refresh completed while waiting; reusing its result");
            return self.serve_existing();
        }

        info!("Fetching fresh leaderboard data (season {})", self.season);
        let outcome = match self.fetch_and_process().await {
            Ok(data) => {
                let entry = self.cache.save(data);
                info!("Refreshed {} players", entry.data.len());
                Ok(Snapshot {
                    entry,
                    origin: Origin::Refreshed,
                })
            }
            Err(e) => {
                warn!("Refresh failed, falling back to cached data: {}", e);
                self.fallback()
            }
        };

        self.generation.fetch_add(1, Ordering::AcqRel);
        outcome
    }

    async fn fetch_and_process(&self) -> Result<Vec<PlayerRecord>, RefreshFailure> {
        let table = tokio::time::timeout(self.fetch_timeout, self.fetcher.fetch(self.season))
            .await
            .map_err(|_| RefreshFailure::Timeout(self.fetch_timeout))??;

        if table.is_empty() {
            return Err(RefreshFailure::Empty);
        }

        let data = process_table(&table)?;
        if data.is_empty() {
            return Err(RefreshFailure::Empty);
        }
        Ok(data)
    }

    fn serve_existing(&self) -> Result<Snapshot, DataError> {
        match self.cache.load_if_fresh() {
            Some(entry) => Ok(Snapshot {
                entry,
                origin: Origin::Cached,
            }),
            None => self.fallback(),
        }
    }

    fn fallback(&self) -> Result<Snapshot, DataError> {
        match self.cache.load_regardless() {
            Some(entry) => {
                warn!("Serving stale snapshot from {}", entry.timestamp);
                Ok(Snapshot {
                    entry,
                    origin: Origin::Fallback,
                })
            }
            None => Err(DataError::NoDataAvailable),
        }
    }
}
