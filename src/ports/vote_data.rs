//! Vote Data Ports - Seat and decision data for a term.
//!
//! Implementations are populated by the ingestion pipeline; the analytics
//! layer only reads them and assumes the data does not change during a
//! computation pass.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::analysis::{PartyDecision, SeatMap};
use crate::domain::foundation::TermId;

/// Errors that can occur while reading vote data
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Invalid vote data: {0}")]
    InvalidData(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for ProviderError {
    fn from(err: sqlx::Error) -> Self {
        ProviderError::Database(err.to_string())
    }
}

/// Port for the chamber composition of a term.
#[async_trait]
pub trait SeatProvider: Send + Sync {
    /// Seats per party. An unknown term yields an empty map.
    async fn get_parties(&self, term_id: TermId) -> Result<SeatMap, ProviderError>;

    /// Terms with any seat data, newest first.
    async fn list_terms(&self) -> Result<Vec<TermId>, ProviderError>;
}

/// Port for per-vote party decisions of a term.
#[async_trait]
pub trait DecisionProvider: Send + Sync {
    /// One record per (vote, party) with the party's tally and majority.
    async fn get_party_decisions(&self, term_id: TermId) -> Result<Vec<PartyDecision>, ProviderError>;

    /// Each party's decisions as `"YES"`/`"NO"` tokens, ordered by vote date.
    async fn get_vote_sequences(
        &self,
        term_id: TermId,
    ) -> Result<BTreeMap<String, Vec<String>>, ProviderError>;

    /// Number of recorded votes in a term, including votes no party took part in.
    async fn count_votings(&self, term_id: TermId) -> Result<u64, ProviderError>;

    /// Terms with at least one recorded vote.
    async fn terms_with_votes(&self) -> Result<BTreeSet<TermId>, ProviderError>;
}
