//! Single-slot, file-backed cache of the processed dataset.
//!
//! Readers take a cheap `Arc` clone of the current entry under a shared
//! lock; `save` swaps in a whole new entry under the exclusive lock, so a
//! reader always sees one complete snapshot. The file is replaced with a
//! temp-file rename and only read once, at open.

use chrono::{DateTime, Utc};
use common::{CacheError, Dataset};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, info, warn};

/// How long a snapshot is served without refetching.
pub const CACHE_TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// A processed dataset with the time it was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub timestamp: DateTime<Utc>,
    pub data: Dataset,
}

impl CacheEntry {
    pub fn new(data: Dataset) -> Self {
        Self {
            timestamp: Utc::now(),
            data,
        }
    }

    /// `0 <= now - timestamp < ttl`.
    ///
    /// A timestamp ahead of `now` (clock skew, hand-edited file) is stale so
    /// the next request refetches and replaces it.
    pub fn is_fresh_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let age = now.signed_duration_since(self.timestamp);
        if age < chrono::Duration::zero() {
            warn!(
                "Cached snapshot is timestamped {} in the future; treating as stale",
                self.timestamp
            );
            return false;
        }
        match chrono::Duration::from_std(ttl) {
            Ok(ttl) => age < ttl,
            Err(_) => true,
        }
    }
}

/// Owned handle to the cache slot and its backing file.
#[derive(Debug)]
pub struct CacheStore {
    path: PathBuf,
    ttl: Duration,
    slot: RwLock<Option<Arc<CacheEntry>>>,
}

impl CacheStore {
    /// Open the store, loading any persisted entry.
    ///
    /// A missing or unreadable file leaves the cache cold.
    pub fn open(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        let path = path.into();
        let entry = match read_entry(&path) {
            Ok(Some(entry)) => {
                info!(
                    "Loaded cached snapshot from {} ({} players, taken {})",
                    path.display(),
                    entry.data.len(),
                    entry.timestamp
                );
                Some(Arc::new(entry))
            }
            Ok(None) => {
                debug!("No cache file at {}", path.display());
                None
            }
            Err(e) => {
                warn!("Ignoring unreadable cache {}: {}", path.display(), e);
                None
            }
        };

        Self {
            path,
            ttl,
            slot: RwLock::new(entry),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current entry if it is still within the TTL.
    pub fn load_if_fresh(&self) -> Option<Arc<CacheEntry>> {
        self.load_if_fresh_at(Utc::now())
    }

    pub fn load_if_fresh_at(&self, now: DateTime<Utc>) -> Option<Arc<CacheEntry>> {
        self.load_regardless()
            .filter(|entry| entry.is_fresh_at(now, self.ttl))
    }

    /// Current entry, however old.
    pub fn load_regardless(&self) -> Option<Arc<CacheEntry>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the slot with `{timestamp: now, data}` and persist it.
    ///
    /// The new entry is served from memory even if the write fails; the
    /// failure is logged.
    pub fn save(&self, data: Dataset) -> Arc<CacheEntry> {
        let entry = Arc::new(CacheEntry::new(data));

        match write_entry(&self.path, &entry) {
            Ok(()) => debug!("Persisted {} players to {}", entry.data.len(), self.path.display()),
            Err(e) => warn!("Failed to persist cache to {}: {}", self.path.display(), e),
        }

        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(entry.clone());
        entry
    }
}

/// Read a persisted entry. `Ok(None)` when the file does not exist.
pub fn read_entry(path: &Path) -> Result<Option<CacheEntry>, CacheError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(CacheError::Io(e)),
    };

    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|e| CacheError::Corrupt(e.to_string()))
}

/// Write `entry` to `path` via a sibling temp file and rename.
pub fn write_entry(path: &Path, entry: &CacheEntry) -> Result<(), CacheError> {
    let json = serde_json::to_vec(entry).map_err(|e| CacheError::Corrupt(e.to_string()))?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
