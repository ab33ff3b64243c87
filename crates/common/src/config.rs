//! Server configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind the HTTP listener on.
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port (overridden by `PORT`).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path of the persisted cache snapshot.
    #[serde(default = "default_cache_file")]
    pub cache_file: PathBuf,

    /// Upstream leaderboard settings.
    #[serde(default)]
    pub source: SourceConfig,
}

/// Upstream bat-tracking leaderboard settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Leaderboard endpoint (queried with `csv=true`).
    #[serde(default = "default_source_url")]
    pub url: String,

    /// Season requested from the leaderboard.
    #[serde(default = "default_season")]
    pub season: u16,

    /// `minSwings` filter passed upstream.
    #[serde(default = "default_min_swings")]
    pub min_swings: u32,

    /// Upper bound on a single fetch, in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    5000
}
fn default_cache_file() -> PathBuf {
    PathBuf::from("data_cache.json")
}
fn default_source_url() -> String {
    "https://baseballsavant.mlb.com/leaderboard/bat-tracking".into()
}
fn default_season() -> u16 {
    2025
}
fn default_min_swings() -> u32 {
    1
}
fn default_fetch_timeout() -> u64 {
    30
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_source_url(),
            season: default_season(),
            min_swings: default_min_swings(),
            timeout_secs: default_fetch_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cache_file: default_cache_file(),
            source: SourceConfig::default(),
        }
    }
}
