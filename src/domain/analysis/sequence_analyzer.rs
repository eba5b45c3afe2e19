//! Sequence Analyzer - First-order Markov model of a party's vote directions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{round_to, Decision};

/// Minimum number of YES/NO decisions before a party is analyzed.
pub const DEFAULT_MIN_SEQUENCE_LENGTH: usize = 10;

/// Transition probabilities between consecutive decisions.
///
/// Each "from" row sums to 1 when that state occurred as a predecessor at
/// least once, otherwise the row is all zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionMatrix {
    pub yes_to_yes: f64,
    pub yes_to_no: f64,
    pub no_to_yes: f64,
    pub no_to_no: f64,
}

impl TransitionMatrix {
    /// Builds the matrix from chronologically ordered vote tokens.
    ///
    /// Tokens other than `YES`/`NO` are dropped before pairing, so an
    /// abstention between two votes does not break the chain.
    pub fn from_sequence<S: AsRef<str>>(tokens: &[S]) -> Self {
        let decisions: Vec<Decision> = tokens
            .iter()
            .filter_map(|t| Decision::parse(t.as_ref()))
            .collect();
        Self::from_decisions(&decisions)
    }

    /// Builds the matrix from already-parsed decisions.
    pub fn from_decisions(decisions: &[Decision]) -> Self {
        if decisions.len() < 2 {
            return Self::default();
        }

        // [from][to], index 0 = YES, 1 = NO
        let mut counts = [[0u32; 2]; 2];
        for pair in decisions.windows(2) {
            counts[Self::index(pair[0])][Self::index(pair[1])] += 1;
        }

        let prob = |from: usize, to: usize| {
            let row_total = counts[from][0] + counts[from][1];
            if row_total == 0 {
                0.0
            } else {
                f64::from(counts[from][to]) / f64::from(row_total)
            }
        };

        Self {
            yes_to_yes: prob(0, 0),
            yes_to_no: prob(0, 1),
            no_to_yes: prob(1, 0),
            no_to_no: prob(1, 1),
        }
    }

    /// Tendency to repeat the previous direction.
    pub fn momentum(&self) -> f64 {
        (self.yes_to_yes + self.no_to_no) / 2.0
    }

    /// Tendency to switch direction.
    pub fn volatility(&self) -> f64 {
        (self.yes_to_no + self.no_to_yes) / 2.0
    }

    fn index(decision: Decision) -> usize {
        match decision {
            Decision::Yes => 0,
            Decision::No => 1,
        }
    }
}

/// Momentum and volatility of one party.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkovResult {
    pub party: String,
    pub momentum: f64,
    pub volatility: f64,
}

/// Markov analysis over every party's decision sequence.
pub struct SequenceAnalyzer;

impl SequenceAnalyzer {
    /// Analyzes each party with at least `min_decisions` YES/NO decisions.
    ///
    /// Parties with shorter sequences are skipped without error.
    pub fn analyze(
        sequences: &BTreeMap<String, Vec<String>>,
        min_decisions: usize,
    ) -> Vec<MarkovResult> {
        sequences
            .iter()
            .filter_map(|(party, tokens)| {
                let decisions: Vec<Decision> =
                    tokens.iter().filter_map(|t| Decision::parse(t)).collect();
                if decisions.len() < min_decisions {
                    return None;
                }
                let matrix = TransitionMatrix::from_decisions(&decisions);
                Some(MarkovResult {
                    party: party.clone(),
                    momentum: round_to(matrix.momentum(), 3),
                    volatility: round_to(matrix.volatility(), 3),
                })
            })
            .collect()
    }
}
