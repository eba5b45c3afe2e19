//! Analytics handlers.
//!
//! ## Service
//! - `AnalyticsService` - compute-once access to each metric of a term
//!
//! ## Commands
//! - Precomputing every metric of a term (after a data sync)
//! - Clearing cached metrics of one term or all terms

mod analytics_service;
mod clear_analytics;
mod precompute_analytics;

pub use analytics_service::{AnalyticsError, AnalyticsService};
pub use clear_analytics::{ClearAnalyticsCommand, ClearAnalyticsHandler, ClearAnalyticsResult};
pub use precompute_analytics::{
    PrecomputeAnalyticsCommand, PrecomputeAnalyticsHandler, PrecomputeAnalyticsResult,
};
