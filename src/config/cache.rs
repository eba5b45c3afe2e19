//! Analytics cache configuration

use serde::Deserialize;
use std::path::PathBuf;

use crate::ports::CacheAccess;

/// Where cached analytics are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Process-local map, lost on exit. Embedding only; the CLI rejects it.
    Memory,
    /// JSON files under `directory`
    File,
    /// `analytics_cache` table in the configured database
    #[default]
    Postgres,
}

/// Analytics cache configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,

    /// Open the cache without write access (query-serving processes)
    #[serde(default)]
    pub read_only: bool,

    /// Base directory of the file backend
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
}

impl CacheConfig {
    /// Access mode for cache handles built from this configuration
    pub fn access(&self) -> CacheAccess {
        if self.read_only {
            CacheAccess::ReadOnly
        } else {
            CacheAccess::ReadWrite
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            read_only: false,
            directory: default_directory(),
        }
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from("./data/analytics_cache")
}
