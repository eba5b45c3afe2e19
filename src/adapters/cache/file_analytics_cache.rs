//! File-based Analytics Cache Adapter
//!
//! Stores each cache entry as a JSON document on disk, one directory per
//! term: `<base>/term_<id>/<key>.json`. The base directory may be shared
//! with other files; only `term_<id>` directories belong to the cache.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::domain::foundation::TermId;
use crate::ports::{AnalyticsCache, CacheAccess, CacheEntry, CacheError};

/// File-based storage for analytics results
#[derive(Debug, Clone)]
pub struct FileAnalyticsCache {
    base_path: PathBuf,
    access: CacheAccess,
}

impl FileAnalyticsCache {
    /// Create a new file cache with a base directory
    ///
    /// # Example
    /// ```ignore
    /// let cache = FileAnalyticsCache::new("./data/analytics_cache", CacheAccess::ReadWrite);
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P, access: CacheAccess) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            access,
        }
    }

    /// Get the directory for a specific term
    fn term_dir(&self, term_id: TermId) -> PathBuf {
        self.base_path.join(format!("term_{}", term_id))
    }

    /// Get the entry file path for a key
    fn entry_path(&self, term_id: TermId, key: &str) -> Result<PathBuf, CacheError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(CacheError::InvalidKey(key.to_string()));
        }
        Ok(self.term_dir(term_id).join(format!("{}.json", key)))
    }

    /// Term of a directory entry under the base path, if it is a term directory
    fn term_of_dir_name(name: &str) -> Option<TermId> {
        name.strip_prefix("term_")?.parse().ok()
    }

    /// Write `json` to a unique temp file in `dir`, then move it over `target`
    fn write_atomic(dir: &Path, target: &Path, json: &str) -> std::io::Result<()> {
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(target).map_err(|e| e.error)?;
        Ok(())
    }

    async fn remove_dir_if_present(path: &Path) -> Result<(), CacheError> {
        match fs::remove_dir_all(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Io(e.to_string())),
        }
    }
}

#[async_trait]
impl AnalyticsCache for FileAnalyticsCache {
    fn access(&self) -> CacheAccess {
        self.access
    }

    async fn get_entry(&self, term_id: TermId, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let file_path = self.entry_path(term_id, key)?;

        let json = match fs::read_to_string(&file_path).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::Io(e.to_string())),
        };

        match serde_json::from_str(&json) {
            Ok(entry) => {
                debug!(term_id = %term_id, key, "Cache hit");
                Ok(Some(entry))
            }
            Err(e) => {
                warn!(term_id = %term_id, key, error = %e, "Corrupt cache file, treating as miss");
                Ok(None)
            }
        }
    }

    async fn set(&self, term_id: TermId, key: &str, data: JsonValue) -> Result<(), CacheError> {
        self.access.ensure_writable("write")?;

        let file_path = self.entry_path(term_id, key)?;
        let dir = self.term_dir(term_id);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| CacheError::Io(e.to_string()))?;

        let json = serde_json::to_string(&CacheEntry::new(term_id, key, data))?;

        // Each write gets its own temp file; readers never observe a half-written entry.
        tokio::task::spawn_blocking(move || Self::write_atomic(&dir, &file_path, &json))
            .await
            .map_err(|e| CacheError::Io(e.to_string()))?
            .map_err(|e| CacheError::Io(e.to_string()))?;

        debug!(term_id = %term_id, key, "Cache saved");
        Ok(())
    }

    async fn clear(&self, term_id: Option<TermId>) -> Result<(), CacheError> {
        self.access.ensure_writable("clear")?;

        match term_id {
            Some(term_id) => {
                Self::remove_dir_if_present(&self.term_dir(term_id)).await?;
                info!(term_id = %term_id, "Cache cleared for term");
            }
            None => {
                let mut dir = match fs::read_dir(&self.base_path).await {
                    Ok(dir) => dir,
                    Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
                    Err(e) => return Err(CacheError::Io(e.to_string())),
                };

                let mut cleared = 0usize;
                while let Some(item) = dir
                    .next_entry()
                    .await
                    .map_err(|e| CacheError::Io(e.to_string()))?
                {
                    let is_term_dir = item
                        .file_name()
                        .to_str()
                        .and_then(Self::term_of_dir_name)
                        .is_some();
                    let is_dir = item
                        .file_type()
                        .await
                        .map_err(|e| CacheError::Io(e.to_string()))?
                        .is_dir();
                    if is_term_dir && is_dir {
                        Self::remove_dir_if_present(&item.path()).await?;
                        cleared += 1;
                    }
                }
                info!(terms = cleared, "All cache cleared");
            }
        }
        Ok(())
    }

    async fn exists(&self, term_id: TermId) -> Result<bool, CacheError> {
        let mut dir = match fs::read_dir(self.term_dir(term_id)).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(CacheError::Io(e.to_string())),
        };

        while let Some(item) = dir
            .next_entry()
            .await
            .map_err(|e| CacheError::Io(e.to_string()))?
        {
            if item.path().extension().is_some_and(|ext| ext == "json") {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
