//! Analytics tuning configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::analysis::{
    CoalitionSearch, DEFAULT_COALITION_LIMIT, DEFAULT_MAX_COALITION_SIZE,
    DEFAULT_MIN_SEQUENCE_LENGTH,
};

/// Limits applied by the analytics calculators
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsConfig {
    /// Largest coalition the finder enumerates
    #[serde(default = "default_max_coalition_size")]
    pub max_coalition_size: usize,

    /// Coalitions kept by the finder
    #[serde(default = "default_coalition_limit")]
    pub coalition_limit: usize,

    /// Coalitions stored and served per term
    #[serde(default = "default_coalition_display_limit")]
    pub coalition_display_limit: usize,

    /// Decisions a party needs before its Markov statistics are reported
    #[serde(default = "default_min_sequence_length")]
    pub min_sequence_length: usize,
}

impl AnalyticsConfig {
    pub fn coalition_search(&self) -> CoalitionSearch {
        CoalitionSearch {
            max_size: self.max_coalition_size,
            limit: self.coalition_limit,
        }
    }

    /// Validate analytics configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_coalition_size == 0 {
            return Err(ValidationError::InvalidCoalitionSize);
        }
        if self.coalition_display_limit > self.coalition_limit {
            return Err(ValidationError::DisplayLimitTooLarge);
        }
        Ok(())
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            max_coalition_size: default_max_coalition_size(),
            coalition_limit: default_coalition_limit(),
            coalition_display_limit: default_coalition_display_limit(),
            min_sequence_length: default_min_sequence_length(),
        }
    }
}

fn default_max_coalition_size() -> usize {
    DEFAULT_MAX_COALITION_SIZE
}

fn default_coalition_limit() -> usize {
    DEFAULT_COALITION_LIMIT
}

fn default_coalition_display_limit() -> usize {
    10
}

fn default_min_sequence_length() -> usize {
    DEFAULT_MIN_SEQUENCE_LENGTH
}
