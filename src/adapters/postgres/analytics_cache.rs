//! PostgreSQL implementation of AnalyticsCache.
//!
//! Entries live in the `analytics_cache` table with primary key
//! `(term_id, key)`; writes are upserts on that key.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::domain::foundation::{TermId, Timestamp};
use crate::ports::{AnalyticsCache, CacheAccess, CacheEntry, CacheError};

/// PostgreSQL implementation of the AnalyticsCache port.
#[derive(Clone)]
pub struct PostgresAnalyticsCache {
    pool: PgPool,
    access: CacheAccess,
}

impl PostgresAnalyticsCache {
    /// Creates a new PostgresAnalyticsCache with the given connection pool.
    pub fn new(pool: PgPool, access: CacheAccess) -> Self {
        Self { pool, access }
    }
}

/// Database row representation of a cache entry.
#[derive(Debug, sqlx::FromRow)]
struct CacheRow {
    term_id: i32,
    key: String,
    data: JsonValue,
    computed_at: DateTime<Utc>,
}

impl TryFrom<CacheRow> for CacheEntry {
    type Error = CacheError;

    fn try_from(row: CacheRow) -> Result<Self, Self::Error> {
        let term_id = TermId::new(row.term_id)
            .map_err(|e| CacheError::Database(format!("Invalid term_id: {}", e)))?;
        Ok(CacheEntry {
            term_id,
            key: row.key,
            data: row.data,
            computed_at: Timestamp::from_datetime(row.computed_at),
        })
    }
}

#[async_trait]
impl AnalyticsCache for PostgresAnalyticsCache {
    fn access(&self) -> CacheAccess {
        self.access
    }

    async fn get_entry(&self, term_id: TermId, key: &str) -> Result<Option<CacheEntry>, CacheError> {
        let row: Option<CacheRow> = sqlx::query_as(
            r#"
            SELECT term_id, key, data, computed_at
            FROM analytics_cache
            WHERE term_id = $1 AND key = $2
            "#,
        )
        .bind(term_id.value())
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        if row.is_some() {
            debug!(term_id = %term_id, key, "Cache hit");
        }
        row.map(CacheEntry::try_from).transpose()
    }

    async fn set(&self, term_id: TermId, key: &str, data: JsonValue) -> Result<(), CacheError> {
        self.access.ensure_writable("write")?;

        sqlx::query(
            r#"
            INSERT INTO analytics_cache (term_id, key, data, computed_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (term_id, key)
            DO UPDATE SET data = EXCLUDED.data, computed_at = EXCLUDED.computed_at
            "#,
        )
        .bind(term_id.value())
        .bind(key)
        .bind(data)
        .bind(*Timestamp::now().as_datetime())
        .execute(&self.pool)
        .await?;

        debug!(term_id = %term_id, key, "Cache saved");
        Ok(())
    }

    async fn clear(&self, term_id: Option<TermId>) -> Result<(), CacheError> {
        self.access.ensure_writable("clear")?;

        match term_id {
            Some(term_id) => {
                let result = sqlx::query("DELETE FROM analytics_cache WHERE term_id = $1")
                    .bind(term_id.value())
                    .execute(&self.pool)
                    .await?;
                info!(term_id = %term_id, removed = result.rows_affected(), "Cache cleared for term");
            }
            None => {
                let result = sqlx::query("DELETE FROM analytics_cache")
                    .execute(&self.pool)
                    .await?;
                info!(removed = result.rows_affected(), "All cache cleared");
            }
        }
        Ok(())
    }

    async fn exists(&self, term_id: TermId) -> Result<bool, CacheError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM analytics_cache WHERE term_id = $1)",
        )
        .bind(term_id.value())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
