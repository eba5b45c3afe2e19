//! Term Overview - Headline figures for one term, and the list of known terms.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::SeatMap;
use crate::domain::foundation::TermId;

/// Size of the chamber and the amount of vote data behind the analytics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermOverview {
    pub term_id: TermId,
    pub parties_count: usize,
    pub total_seats: u64,
    pub quota: Option<u64>,
    /// Every recorded vote of the term, with or without party decisions.
    pub votings_count: u64,
}

impl TermOverview {
    pub fn new(term_id: TermId, seats: &SeatMap, votings_count: u64) -> Self {
        Self {
            term_id,
            parties_count: seats.len(),
            total_seats: seats.total(),
            quota: seats.quota(),
            votings_count,
        }
    }

    /// Whether there is any seat data to analyze.
    pub fn has_seat_data(&self) -> bool {
        self.total_seats > 0
    }
}

/// One entry of the term listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermSummary {
    pub id: TermId,
    pub has_voting_data: bool,
}

/// Known terms, newest first, with the newest marked as current.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermList {
    pub items: Vec<TermSummary>,
    pub current: Option<TermId>,
}

impl TermList {
    /// Builds the listing from terms with seat data and terms with votes.
    ///
    /// # Edge Cases
    ///
    /// - Duplicates in `terms` are collapsed.
    /// - A term with votes but no seat data is not listed.
    pub fn new(terms: impl IntoIterator<Item = TermId>, with_votes: &BTreeSet<TermId>) -> Self {
        let terms: BTreeSet<TermId> = terms.into_iter().collect();
        let items: Vec<TermSummary> = terms
            .iter()
            .rev()
            .map(|&id| TermSummary {
                id,
                has_voting_data: with_votes.contains(&id),
            })
            .collect();

        Self {
            current: terms.last().copied(),
            items,
        }
    }
}
