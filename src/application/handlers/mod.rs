//! Application handlers.
//!
//! Command handlers and the metric service that memoizes calculator output.

pub mod analytics;

pub use analytics::{
    AnalyticsError, AnalyticsService, ClearAnalyticsCommand, ClearAnalyticsHandler,
    ClearAnalyticsResult, PrecomputeAnalyticsCommand, PrecomputeAnalyticsHandler,
    PrecomputeAnalyticsResult,
};
