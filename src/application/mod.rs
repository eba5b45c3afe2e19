//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates the pure analysis calculators and coordinates
//! between the vote data ports and the analytics cache.

pub mod handlers;

pub use handlers::{
    AnalyticsError, AnalyticsService, ClearAnalyticsCommand, ClearAnalyticsHandler,
    ClearAnalyticsResult, PrecomputeAnalyticsCommand, PrecomputeAnalyticsHandler,
    PrecomputeAnalyticsResult,
};
