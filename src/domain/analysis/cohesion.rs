//! Cohesion Calculator - Rice index of party voting discipline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{round_to, PartyDecision};

/// Voting discipline of one party across a term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohesionResult {
    pub party: String,
    /// Mean Rice index, 1.0 = always unanimous, 0.0 = always split evenly.
    pub rice_index: f64,
    /// Number of votes the party took part in.
    pub votings: usize,
}

/// Calculator for Rice cohesion.
pub struct CohesionCalculator;

impl CohesionCalculator {
    /// Rice index of a single vote: |yes - no| / (yes + no).
    ///
    /// Returns 0.0 when nobody voted.
    pub fn rice_index(yes: u32, no: u32) -> f64 {
        let total = u64::from(yes) + u64::from(no);
        if total == 0 {
            return 0.0;
        }
        f64::from(yes.abs_diff(no)) / total as f64
    }

    /// Arithmetic mean of the Rice index over `(yes, no)` tallies.
    ///
    /// Returns 0.0 for an empty list.
    pub fn average_rice(tallies: &[(u32, u32)]) -> f64 {
        if tallies.is_empty() {
            return 0.0;
        }
        let sum: f64 = tallies
            .iter()
            .map(|&(yes, no)| Self::rice_index(yes, no))
            .sum();
        sum / tallies.len() as f64
    }

    /// Cohesion of every party that cast a tally in `decisions`.
    ///
    /// Sorted by Rice index, most disciplined first.
    pub fn by_party(decisions: &[PartyDecision]) -> Vec<CohesionResult> {
        let mut tallies: BTreeMap<&str, Vec<(u32, u32)>> = BTreeMap::new();
        for d in decisions {
            tallies
                .entry(d.party.as_str())
                .or_default()
                .push((d.yes_count, d.no_count));
        }

        let mut results: Vec<CohesionResult> = tallies
            .into_iter()
            .map(|(party, votes)| CohesionResult {
                party: party.to_string(),
                rice_index: round_to(Self::average_rice(&votes), 3),
                votings: votes.len(),
            })
            .collect();

        results.sort_by(|a, b| {
            b.rice_index
                .total_cmp(&a.rice_index)
                .then_with(|| a.party.cmp(&b.party))
        });
        results
    }
}
