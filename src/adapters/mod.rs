//! Adapters - Implementations of port interfaces.
//!
//! - `cache` - In-memory and file-based analytics caches
//! - `postgres` - PostgreSQL cache and vote data reader
//! - `vote_data` - In-memory vote data provider

pub mod cache;
pub mod postgres;
pub mod vote_data;

pub use cache::{FileAnalyticsCache, InMemoryAnalyticsCache};
pub use postgres::{PostgresAnalyticsCache, PostgresVoteDataReader};
pub use vote_data::InMemoryVoteData;
