//! PostgreSQL adapters - Database implementations of the analytics ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresAnalyticsCache` - Upsert-based analytics cache table
//! - `PostgresVoteDataReader` - Seat and decision queries over synced votes

mod analytics_cache;
mod vote_data_reader;

pub use analytics_cache::PostgresAnalyticsCache;
pub use vote_data_reader::PostgresVoteDataReader;
