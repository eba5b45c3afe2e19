//! PrecomputeAnalyticsHandler - Command handler for warming a term's metrics.
//!
//! Run by the ingestion job after a data sync completes. With `force` set,
//! the term is cleared first so every metric is recomputed from fresh data.

use std::sync::Arc;

use tracing::info;

use super::{AnalyticsError, AnalyticsService};
use crate::domain::foundation::{TermId, Timestamp};
use crate::ports::MetricKey;

/// Command to precompute all metrics of a term.
#[derive(Debug, Clone)]
pub struct PrecomputeAnalyticsCommand {
    pub term_id: TermId,
    /// Clear cached metrics before computing.
    pub force: bool,
}

/// Result of a successful precompute.
#[derive(Debug, Clone)]
pub struct PrecomputeAnalyticsResult {
    pub term_id: TermId,
    pub metrics: Vec<MetricKey>,
    /// Whether the term had cached entries before this command ran.
    pub was_cached: bool,
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
}

/// Handler for precomputing term analytics.
pub struct PrecomputeAnalyticsHandler {
    service: Arc<AnalyticsService>,
}

impl PrecomputeAnalyticsHandler {
    pub fn new(service: Arc<AnalyticsService>) -> Self {
        Self { service }
    }

    pub async fn handle(
        &self,
        cmd: PrecomputeAnalyticsCommand,
    ) -> Result<PrecomputeAnalyticsResult, AnalyticsError> {
        let started_at = Timestamp::now();

        // 1. Note whether anything was cached already
        let was_cached = self.service.is_cached(cmd.term_id).await?;

        // 2. Drop stale entries when asked to
        if cmd.force && was_cached {
            self.service.invalidate(cmd.term_id).await?;
        }

        // 3. Fill every metric key
        self.service.precompute_all(cmd.term_id).await?;

        let finished_at = Timestamp::now();
        info!(
            term_id = %cmd.term_id,
            force = cmd.force,
            was_cached,
            elapsed_ms = finished_at.duration_since(&started_at).num_milliseconds(),
            "Precompute finished"
        );

        Ok(PrecomputeAnalyticsResult {
            term_id: cmd.term_id,
            metrics: MetricKey::ALL.to_vec(),
            was_cached,
            started_at,
            finished_at,
        })
    }
}
