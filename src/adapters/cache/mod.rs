//! Cache Adapters
//!
//! Implementations of the AnalyticsCache port.
//!
//! ## Available Adapters
//!
//! - **InMemoryAnalyticsCache** - Shared map (testing/development)
//! - **FileAnalyticsCache** - One JSON file per entry on disk
//! - **PostgresAnalyticsCache** - See `adapters::postgres`
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::cache::{FileAnalyticsCache, InMemoryAnalyticsCache};
//!
//! // Precompute job: writable file cache
//! let cache = FileAnalyticsCache::new("./data/analytics_cache", CacheAccess::ReadWrite);
//!
//! // Testing: in-memory cache with a read-only view for query code
//! let writer = InMemoryAnalyticsCache::new();
//! let reader = writer.read_only_view();
//! ```

mod file_analytics_cache;
mod in_memory_analytics_cache;

pub use file_analytics_cache::FileAnalyticsCache;
pub use in_memory_analytics_cache::InMemoryAnalyticsCache;
