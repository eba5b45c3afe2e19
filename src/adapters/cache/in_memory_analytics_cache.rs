//! In-Memory Analytics Cache Adapter
//!
//! Keeps cache entries in a shared map. Useful for tests, development, and
//! single-process deployments where recomputing after a restart is fine.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::foundation::TermId;
use crate::ports::{AnalyticsCache, CacheAccess, CacheEntry, CacheError};

type EntryMap = HashMap<(TermId, String), CacheEntry>;

/// In-memory storage for analytics results
#[derive(Debug, Clone)]
pub struct InMemoryAnalyticsCache {
    entries: Arc<RwLock<EntryMap>>,
    access: CacheAccess,
}

impl InMemoryAnalyticsCache {
    /// Create a new writable in-memory cache
    pub fn new() -> Self {
        Self::with_access(CacheAccess::ReadWrite)
    }

    /// Create an empty cache with the given access mode
    pub fn with_access(access: CacheAccess) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            access,
        }
    }

    /// A read-only handle over the same entries
    pub fn read_only_view(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            access: CacheAccess::ReadOnly,
        }
    }

    /// Get the number of stored entries
    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }
}

impl Default for InMemoryAnalyticsCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnalyticsCache for InMemoryAnalyticsCache {
    fn access(&self) -> CacheAccess {
        self.access
    }

    async fn get_entry(&self, term_id: TermId, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let entries = self.entries.read().await;
        let entry = entries.get(&(term_id, key.to_string())).cloned();
        if entry.is_some() {
            debug!(term_id = %term_id, key, "Cache hit");
        }
        Ok(entry)
    }

    async fn set(&self, term_id: TermId, key: &str, data: JsonValue) -> Result<(), CacheError> {
        self.access.ensure_writable("write")?;

        let mut entries = self.entries.write().await;
        entries.insert(
            (term_id, key.to_string()),
            CacheEntry::new(term_id, key, data),
        );
        debug!(term_id = %term_id, key, "Cache saved");
        Ok(())
    }

    async fn clear(&self, term_id: Option<TermId>) -> Result<(), CacheError> {
        self.access.ensure_writable("clear")?;

        let mut entries = self.entries.write().await;
        match term_id {
            Some(term_id) => {
                entries.retain(|(tid, _), _| *tid != term_id);
                info!(term_id = %term_id, "Cache cleared for term");
            }
            None => {
                entries.clear();
                info!("All cache cleared");
            }
        }
        Ok(())
    }

    async fn exists(&self, term_id: TermId) -> Result<bool, CacheError> {
        let entries = self.entries.read().await;
        Ok(entries.keys().any(|(tid, _)| *tid == term_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn term(value: i32) -> TermId {
        TermId::new(value).unwrap()
    }

    #[tokio::test]
    async fn test_memory_cache_set_and_get() {
        let cache = InMemoryAnalyticsCache::new();

        cache.set(term(10), "cohesion", json!([{"party": "A"}])).await.unwrap();

        let data = cache.get(term(10), "cohesion").await.unwrap();
        assert_eq!(data, Some(json!([{"party": "A"}])));
    }

    #[tokio::test]
    async fn test_memory_cache_get_missing() {
        let cache = InMemoryAnalyticsCache::new();
        assert_eq!(cache.get(term(10), "markov").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_cache_set_replaces_value() {
        let cache = InMemoryAnalyticsCache::new();

        cache.set(term(10), "markov", json!(1)).await.unwrap();
        let first = cache.get_entry(term(10), "markov").await.unwrap().unwrap();
        cache.set(term(10), "markov", json!(2)).await.unwrap();
        let second = cache.get_entry(term(10), "markov").await.unwrap().unwrap();

        assert_eq!(second.data, json!(2));
        assert!(!second.computed_at.is_before(&first.computed_at));
        assert_eq!(cache.entry_count().await, 1);
    }

    #[tokio::test]
    async fn test_memory_cache_clear_term() {
        let cache = InMemoryAnalyticsCache::new();

        cache.set(term(9), "markov", json!(1)).await.unwrap();
        cache.set(term(10), "markov", json!(1)).await.unwrap();
        cache.set(term(10), "cohesion", json!(1)).await.unwrap();

        cache.clear(Some(term(10))).await.unwrap();

        assert!(!cache.exists(term(10)).await.unwrap());
        assert!(cache.exists(term(9)).await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_cache_clear_all() {
        let cache = InMemoryAnalyticsCache::new();

        cache.set(term(9), "markov", json!(1)).await.unwrap();
        cache.set(term(10), "markov", json!(1)).await.unwrap();
        cache.clear(None).await.unwrap();

        assert_eq!(cache.entry_count().await, 0);
    }

    #[tokio::test]
    async fn test_memory_cache_read_only_rejects_writes() {
        let cache = InMemoryAnalyticsCache::with_access(CacheAccess::ReadOnly);

        let set = cache.set(term(10), "markov", json!(1)).await;
        assert!(matches!(set, Err(CacheError::WriteNotPermitted(_))));

        let clear = cache.clear(None).await;
        assert!(matches!(clear, Err(CacheError::WriteNotPermitted(_))));
    }

    #[tokio::test]
    async fn test_memory_cache_read_only_view_sees_writes() {
        let writer = InMemoryAnalyticsCache::new();
        let reader = writer.read_only_view();

        writer.set(term(10), "coalitions", json!([])).await.unwrap();

        assert_eq!(reader.access(), CacheAccess::ReadOnly);
        assert!(reader.exists(term(10)).await.unwrap());
        assert_eq!(reader.get(term(10), "coalitions").await.unwrap(), Some(json!([])));
    }
}
