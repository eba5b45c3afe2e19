//! ClearAnalyticsHandler - Command handler for dropping cached metrics.

use std::sync::Arc;

use tracing::info;

use super::AnalyticsError;
use crate::domain::foundation::TermId;
use crate::ports::AnalyticsCache;

/// Command to clear one term, or every term when `term_id` is `None`.
#[derive(Debug, Clone, Default)]
pub struct ClearAnalyticsCommand {
    pub term_id: Option<TermId>,
}

/// Result of a successful clear.
#[derive(Debug, Clone)]
pub struct ClearAnalyticsResult {
    pub term_id: Option<TermId>,
}

/// Handler for clearing the analytics cache.
pub struct ClearAnalyticsHandler {
    cache: Arc<dyn AnalyticsCache>,
}

impl ClearAnalyticsHandler {
    pub fn new(cache: Arc<dyn AnalyticsCache>) -> Self {
        Self { cache }
    }

    pub async fn handle(
        &self,
        cmd: ClearAnalyticsCommand,
    ) -> Result<ClearAnalyticsResult, AnalyticsError> {
        self.cache.clear(cmd.term_id).await?;

        match cmd.term_id {
            Some(term_id) => info!(term_id = %term_id, "Cleared analytics cache"),
            None => info!("Cleared analytics cache for all terms"),
        }

        Ok(ClearAnalyticsResult {
            term_id: cmd.term_id,
        })
    }
}
