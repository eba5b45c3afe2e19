//! In-Memory Vote Data Adapter
//!
//! Serves fixed seat maps, decisions and sequences per term. Useful for
//! tests, demos, and feeding data that was loaded elsewhere.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::domain::analysis::{PartyDecision, SeatMap};
use crate::domain::foundation::TermId;
use crate::ports::{DecisionProvider, ProviderError, SeatProvider};

/// In-memory seat and decision data
#[derive(Debug, Clone, Default)]
pub struct InMemoryVoteData {
    seats: HashMap<TermId, SeatMap>,
    decisions: HashMap<TermId, Vec<PartyDecision>>,
    sequences: HashMap<TermId, BTreeMap<String, Vec<String>>>,
    votings: HashMap<TermId, u64>,
    reads: Arc<AtomicUsize>,
}

impl InMemoryVoteData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the seat map of a term
    pub fn with_seats(mut self, term_id: TermId, seats: SeatMap) -> Self {
        self.seats.insert(term_id, seats);
        self
    }

    /// Sets the party decisions of a term
    pub fn with_decisions(mut self, term_id: TermId, decisions: Vec<PartyDecision>) -> Self {
        self.decisions.insert(term_id, decisions);
        self
    }

    /// Sets the chronological vote sequences of a term
    pub fn with_sequences(
        mut self,
        term_id: TermId,
        sequences: BTreeMap<String, Vec<String>>,
    ) -> Self {
        self.sequences.insert(term_id, sequences);
        self
    }

    /// Sets the number of recorded votes of a term.
    ///
    /// Without it the count is the number of distinct votes among the
    /// term's decisions.
    pub fn with_voting_count(mut self, term_id: TermId, votings: u64) -> Self {
        self.votings.insert(term_id, votings);
        self
    }

    fn votings_of(&self, term_id: TermId) -> u64 {
        if let Some(&count) = self.votings.get(&term_id) {
            return count;
        }
        self.decisions.get(&term_id).map_or(0, |decisions| {
            let ids: HashSet<&str> = decisions.iter().map(|d| d.voting_id.as_str()).collect();
            ids.len() as u64
        })
    }

    /// Number of provider calls served so far (shared between clones)
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl SeatProvider for InMemoryVoteData {
    async fn get_parties(&self, term_id: TermId) -> Result<SeatMap, ProviderError> {
        self.record_read();
        Ok(self.seats.get(&term_id).cloned().unwrap_or_default())
    }

    async fn list_terms(&self) -> Result<Vec<TermId>, ProviderError> {
        self.record_read();
        let mut terms: Vec<TermId> = self
            .seats
            .iter()
            .filter(|(_, seats)| !seats.is_empty())
            .map(|(&term_id, _)| term_id)
            .collect();
        terms.sort_unstable_by(|a, b| b.cmp(a));
        Ok(terms)
    }
}

#[async_trait]
impl DecisionProvider for InMemoryVoteData {
    async fn get_party_decisions(&self, term_id: TermId) -> Result<Vec<PartyDecision>, ProviderError> {
        self.record_read();
        Ok(self.decisions.get(&term_id).cloned().unwrap_or_default())
    }

    async fn get_vote_sequences(
        &self,
        term_id: TermId,
    ) -> Result<BTreeMap<String, Vec<String>>, ProviderError> {
        self.record_read();
        Ok(self.sequences.get(&term_id).cloned().unwrap_or_default())
    }

    async fn count_votings(&self, term_id: TermId) -> Result<u64, ProviderError> {
        self.record_read();
        Ok(self.votings_of(term_id))
    }

    async fn terms_with_votes(&self) -> Result<BTreeSet<TermId>, ProviderError> {
        self.record_read();
        let terms = self
            .decisions
            .keys()
            .chain(self.votings.keys())
            .copied()
            .filter(|&term_id| self.votings_of(term_id) > 0)
            .collect();
        Ok(terms)
    }
}
