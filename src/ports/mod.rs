//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Data Ports
//!
//! - `SeatProvider` - Chamber composition per term
//! - `DecisionProvider` - Party decisions and vote sequences per term
//!
//! ## Cache Ports
//!
//! - `AnalyticsCache` - Compute-once storage keyed by (term, metric)

mod analytics_cache;
mod vote_data;

pub use analytics_cache::{AnalyticsCache, CacheAccess, CacheEntry, CacheError, MetricKey};
pub use vote_data::{DecisionProvider, ProviderError, SeatProvider};
