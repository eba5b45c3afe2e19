//! Agreement Matrix Builder - How often pairs of parties vote the same way.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::{round_to, PartyDecision};

/// Pairwise agreement rates in percent, `party -> party -> rate`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgreementMatrix(BTreeMap<String, BTreeMap<String, f64>>);

impl AgreementMatrix {
    /// Agreement rate between two parties, if both are in the matrix.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        self.0.get(a).and_then(|row| row.get(b)).copied()
    }

    /// Parties covered by the matrix.
    pub fn parties(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, BTreeMap<String, f64>> {
        self.0
    }
}

/// Builder for inter-party agreement.
pub struct AgreementMatrixBuilder;

impl AgreementMatrixBuilder {
    /// Percentage of positions where `a` and `b` agree.
    ///
    /// Returns 0.0 when the sequences are empty or of different length.
    pub fn agreement_rate(a: &[bool], b: &[bool]) -> f64 {
        if a.is_empty() || a.len() != b.len() {
            return 0.0;
        }
        let matches = a.iter().zip(b).filter(|(x, y)| x == y).count();
        matches as f64 / a.len() as f64 * 100.0
    }

    /// Builds the agreement matrix for `parties`.
    ///
    /// For each pair only votes where both parties took a decision are
    /// compared. The diagonal is 100.0 and pairs without a shared vote are
    /// 0.0. Rates are rounded to one decimal place.
    pub fn build(parties: &[String], decisions: &[PartyDecision]) -> AgreementMatrix {
        let mut by_party: HashMap<&str, HashMap<&str, bool>> = HashMap::new();
        for d in decisions {
            by_party
                .entry(d.party.as_str())
                .or_default()
                .insert(d.voting_id.as_str(), d.decision.is_yes());
        }
        let empty = HashMap::new();

        let mut matrix = BTreeMap::new();
        for p1 in parties {
            let votes1 = by_party.get(p1.as_str()).unwrap_or(&empty);
            let mut row = BTreeMap::new();

            for p2 in parties {
                if p1 == p2 {
                    row.insert(p2.clone(), 100.0);
                    continue;
                }

                let votes2 = by_party.get(p2.as_str()).unwrap_or(&empty);
                let (shared1, shared2): (Vec<bool>, Vec<bool>) = votes1
                    .iter()
                    .filter_map(|(voting, &yes1)| votes2.get(voting).map(|&yes2| (yes1, yes2)))
                    .unzip();

                let rate = if shared1.is_empty() {
                    0.0
                } else {
                    round_to(Self::agreement_rate(&shared1, &shared2), 1)
                };
                row.insert(p2.clone(), rate);
            }

            matrix.insert(p1.clone(), row);
        }

        AgreementMatrix(matrix)
    }
}
