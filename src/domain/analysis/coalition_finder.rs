//! Coalition Finder - Minimal winning coalitions of a chamber.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use super::SeatMap;

/// Largest coalition considered by default.
pub const DEFAULT_MAX_COALITION_SIZE: usize = 5;

/// Maximum number of coalitions returned by a search.
pub const DEFAULT_COALITION_LIMIT: usize = 15;

/// Tunables for a coalition search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoalitionSearch {
    pub max_size: usize,
    pub limit: usize,
}

impl Default for CoalitionSearch {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_COALITION_SIZE,
            limit: DEFAULT_COALITION_LIMIT,
        }
    }
}

/// A winning group of parties where every member is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coalition {
    pub parties: BTreeSet<String>,
    pub seats: u64,
    /// Seats above the quota.
    pub surplus: u64,
}

impl Coalition {
    pub fn size(&self) -> usize {
        self.parties.len()
    }

    pub fn contains(&self, party: &str) -> bool {
        self.parties.contains(party)
    }
}

/// Boundary representation of a coalition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoalitionRecord {
    pub parties: Vec<String>,
    pub seats: u64,
    pub surplus: u64,
}

impl From<Coalition> for CoalitionRecord {
    fn from(coalition: Coalition) -> Self {
        Self {
            parties: coalition.parties.into_iter().collect(),
            seats: coalition.seats,
            surplus: coalition.surplus,
        }
    }
}

/// Minimal winning coalition search.
pub struct CoalitionFinder;

impl CoalitionFinder {
    /// Finds minimal winning coalitions of up to `max_size` parties.
    ///
    /// Uses the default result cap of [`DEFAULT_COALITION_LIMIT`].
    pub fn min_coalitions(seats: &SeatMap, quota: u64, max_size: usize) -> Vec<Coalition> {
        Self::search(
            seats,
            quota,
            CoalitionSearch {
                max_size,
                ..CoalitionSearch::default()
            },
        )
    }

    /// Finds minimal winning coalitions.
    ///
    /// # Algorithm
    /// 1. Every combination of 1..=max_size parties whose seats reach `quota`
    ///    and where dropping any single member falls below `quota`.
    /// 2. If the largest party wins alone, the same search over the remaining
    ///    parties, so alliances against it are still listed.
    /// 3. Duplicates removed, ordered by surplus then size, capped at `limit`.
    ///
    /// # Edge Cases
    /// - Empty seat map or zero quota: Returns empty Vec
    pub fn search(seats: &SeatMap, quota: u64, search: CoalitionSearch) -> Vec<Coalition> {
        if seats.is_empty() || quota == 0 {
            return Vec::new();
        }

        let members: Vec<(&str, u64)> = seats.iter().map(|(p, s)| (p, u64::from(s))).collect();
        let mut found = Self::minimal_among(&members, quota, 1, search.max_size);

        if let Some((largest, largest_seats)) = seats.largest() {
            if u64::from(largest_seats) >= quota {
                let others: Vec<(&str, u64)> = members
                    .iter()
                    .copied()
                    .filter(|(party, _)| *party != largest)
                    .collect();
                found.extend(Self::minimal_among(&others, quota, 2, search.max_size));
            }
        }

        found.sort_by_key(|c| (c.surplus, c.size()));

        let mut seen = HashSet::new();
        found
            .into_iter()
            .filter(|c| seen.insert(c.parties.clone()))
            .take(search.limit)
            .collect()
    }

    /// Checks that a coalition wins and that every member is necessary.
    pub fn is_minimal_winning(seats: &SeatMap, parties: &BTreeSet<String>, quota: u64) -> bool {
        let member_seats: Vec<u64> = parties
            .iter()
            .map(|p| u64::from(seats.seats(p).unwrap_or(0)))
            .collect();
        let total: u64 = member_seats.iter().sum();
        total >= quota && member_seats.iter().all(|&s| total - s < quota)
    }

    fn minimal_among(
        members: &[(&str, u64)],
        quota: u64,
        min_size: usize,
        max_size: usize,
    ) -> Vec<Coalition> {
        let mut found = Vec::new();
        let upper = max_size.min(members.len());

        for size in min_size..=upper {
            for combo in Combinations::new(members.len(), size) {
                let total: u64 = combo.iter().map(|&i| members[i].1).sum();
                if total >= quota && combo.iter().all(|&i| total - members[i].1 < quota) {
                    found.push(Coalition {
                        parties: combo.iter().map(|&i| members[i].0.to_string()).collect(),
                        seats: total,
                        surplus: total - quota,
                    });
                }
            }
        }

        found
    }
}

/// Index combinations of `k` out of `n` in lexicographic order.
struct Combinations {
    n: usize,
    indices: Vec<usize>,
    started: bool,
    exhausted: bool,
}

impl Combinations {
    fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            started: false,
            exhausted: k == 0 || k > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.indices.clone());
        }

        let k = self.indices.len();
        let Some(i) = (0..k).rev().find(|&i| self.indices[i] != i + self.n - k) else {
            self.exhausted = true;
            return None;
        };
        self.indices[i] += 1;
        for j in i + 1..k {
            self.indices[j] = self.indices[j - 1] + 1;
        }
        Some(self.indices.clone())
    }
}
