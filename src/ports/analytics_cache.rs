//! Analytics Cache Port - Compute-once storage for per-term metrics.
//!
//! Entries are keyed by `(term_id, key)` and never expire on their own.
//! Callers clear a term after new vote data has been synced.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{TermId, Timestamp};

/// The fixed set of metrics precomputed for every term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    PowerIndices,
    Cohesion,
    Markov,
    Coalitions,
    AgreementMatrix,
}

impl MetricKey {
    /// All metrics, in precompute order.
    pub const ALL: [MetricKey; 5] = [
        MetricKey::PowerIndices,
        MetricKey::Cohesion,
        MetricKey::Markov,
        MetricKey::Coalitions,
        MetricKey::AgreementMatrix,
    ];

    /// Storage key of this metric.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKey::PowerIndices => "power_indices",
            MetricKey::Cohesion => "cohesion",
            MetricKey::Markov => "markov",
            MetricKey::Coalitions => "coalitions",
            MetricKey::AgreementMatrix => "agreement_matrix",
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown metric '{}'", s))
    }
}

/// Whether a cache handle may write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheAccess {
    /// Query serving; any number of concurrent readers.
    ReadOnly,
    /// Ingestion and precompute jobs; assumed single writer.
    #[default]
    ReadWrite,
}

impl CacheAccess {
    pub fn is_read_only(&self) -> bool {
        matches!(self, CacheAccess::ReadOnly)
    }

    /// Fails with `WriteNotPermitted` on a read-only handle.
    pub fn ensure_writable(&self, operation: &'static str) -> Result<(), CacheError> {
        if self.is_read_only() {
            return Err(CacheError::WriteNotPermitted(operation));
        }
        Ok(())
    }
}

/// One memoized metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub term_id: TermId,
    pub key: String,
    pub data: JsonValue,
    pub computed_at: Timestamp,
}

impl CacheEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(term_id: TermId, key: impl Into<String>, data: JsonValue) -> Self {
        Self {
            term_id,
            key: key.into(),
            data,
            computed_at: Timestamp::now(),
        }
    }
}

/// Errors that can occur during cache operations
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cannot {0} analytics cache opened read-only")]
    WriteNotPermitted(&'static str),

    #[error("Invalid cache key: {0}")]
    InvalidKey(String),

    #[error("Failed to serialize cache payload: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}

impl From<sqlx::Error> for CacheError {
    fn from(err: sqlx::Error) -> Self {
        CacheError::Database(err.to_string())
    }
}

/// Port for the persistent analytics cache.
///
/// Writes are upserts on `(term_id, key)`. Two writers storing the same key
/// leave whichever value landed last; the metrics are deterministic, so both
/// values are identical.
#[async_trait]
pub trait AnalyticsCache: Send + Sync {
    /// Access mode this handle was opened with.
    fn access(&self) -> CacheAccess;

    /// Read a cached payload. Never computes.
    async fn get(&self, term_id: TermId, key: &str) -> Result<Option<JsonValue>, CacheError> {
        Ok(self.get_entry(term_id, key).await?.map(|entry| entry.data))
    }

    /// Read a cached entry together with its computation time.
    async fn get_entry(&self, term_id: TermId, key: &str) -> Result<Option<CacheEntry>, CacheError>;

    /// Store a payload, replacing any previous value for the key.
    ///
    /// # Errors
    /// Returns `CacheError::WriteNotPermitted` on a read-only handle.
    async fn set(&self, term_id: TermId, key: &str, data: JsonValue) -> Result<(), CacheError>;

    /// Delete all entries of a term, or every entry when `term_id` is `None`.
    ///
    /// # Errors
    /// Returns `CacheError::WriteNotPermitted` on a read-only handle.
    async fn clear(&self, term_id: Option<TermId>) -> Result<(), CacheError>;

    /// Check whether at least one entry exists for the term.
    async fn exists(&self, term_id: TermId) -> Result<bool, CacheError>;
}
