//! Power Index Calculator - Shapley-Shubik and relative Banzhaf voting power.
//!
//! Both indices are computed exactly by enumeration: n! orderings for
//! Shapley-Shubik and 2^n coalitions for Banzhaf. Chambers have a small number
//! of clubs, so the exponential cost is accepted rather than approximated.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{round_to, SeatMap};

/// Voting power of one party in a term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerIndexResult {
    pub party: String,
    pub seats: u32,
    /// Share of all seats, in percent (one decimal place).
    pub seats_pct: f64,
    /// Shapley-Shubik index, a fraction summing to 1 across parties.
    pub shapley: f64,
    /// Relative Banzhaf index, a fraction summing to 1 across parties.
    pub banzhaf: f64,
}

/// Calculator for a priori voting power indices.
pub struct PowerIndexCalculator;

impl PowerIndexCalculator {
    /// Computes the Shapley-Shubik index of every party.
    ///
    /// # Algorithm
    /// For every ordering of the parties, seats are accumulated in order; the
    /// party whose seats first bring the running total to `quota` or above is
    /// pivotal for that ordering. Index = pivot count / n!.
    ///
    /// # Edge Cases
    /// - No parties: Returns empty map
    /// - Single party: Returns 1.0 for that party regardless of quota
    pub fn shapley_shubik(seats: &SeatMap, quota: u64) -> BTreeMap<String, f64> {
        let (parties, weights) = Self::split(seats);
        if let Some(trivial) = Self::trivial(&parties) {
            return trivial;
        }

        let n = parties.len();
        let mut pivots = vec![0u64; n];
        let mut orderings = 0u64;

        let mut tally = |order: &[usize]| {
            orderings += 1;
            let mut running = 0u64;
            for &idx in order {
                if running < quota && quota <= running + weights[idx] {
                    pivots[idx] += 1;
                    break;
                }
                running += weights[idx];
            }
        };

        // Heap's algorithm, iterative form.
        let mut order: Vec<usize> = (0..n).collect();
        let mut counters = vec![0usize; n];
        tally(&order);
        let mut i = 1;
        while i < n {
            if counters[i] < i {
                if i % 2 == 0 {
                    order.swap(0, i);
                } else {
                    order.swap(counters[i], i);
                }
                tally(&order);
                counters[i] += 1;
                i = 1;
            } else {
                counters[i] = 0;
                i += 1;
            }
        }

        parties
            .into_iter()
            .zip(pivots)
            .map(|(party, count)| (party, count as f64 / orderings as f64))
            .collect()
    }

    /// Computes the relative (normalized) Banzhaf index of every party.
    ///
    /// # Algorithm
    /// Over all 2^n coalitions S, a party p swings when
    /// - p ∈ S, S wins and S \ {p} loses, or
    /// - p ∉ S, S loses and S ∪ {p} wins.
    ///
    /// Swing counts are divided by the sum of all parties' swings, so the
    /// result sums to 1. This is not the absolute Banzhaf index.
    ///
    /// # Edge Cases
    /// - No parties: Returns empty map
    /// - Single party: Returns 1.0 for that party
    /// - No swings at all: Returns 0.0 for every party
    pub fn banzhaf(seats: &SeatMap, quota: u64) -> BTreeMap<String, f64> {
        let (parties, weights) = Self::split(seats);
        if let Some(trivial) = Self::trivial(&parties) {
            return trivial;
        }

        let n = parties.len();
        let mut swings = vec![0u64; n];

        for mask in 0u64..(1u64 << n) {
            let coalition_seats: u64 = (0..n)
                .filter(|&i| mask & (1 << i) != 0)
                .map(|i| weights[i])
                .sum();

            for (i, swing) in swings.iter_mut().enumerate() {
                let member = mask & (1 << i) != 0;
                let pivotal = if member {
                    coalition_seats >= quota && coalition_seats - weights[i] < quota
                } else {
                    coalition_seats < quota && quota <= coalition_seats + weights[i]
                };
                if pivotal {
                    *swing += 1;
                }
            }
        }

        let total = swings.iter().sum::<u64>().max(1) as f64;
        parties
            .into_iter()
            .zip(swings)
            .map(|(party, count)| (party, count as f64 / total))
            .collect()
    }

    /// Computes both indices for a term's seat map.
    ///
    /// Results are sorted by Shapley-Shubik index, strongest first. An empty
    /// chamber has no quota and yields an empty result.
    pub fn compute(seats: &SeatMap) -> Vec<PowerIndexResult> {
        let Some(quota) = seats.quota() else {
            return Vec::new();
        };
        let total = seats.total() as f64;

        let shapley = Self::shapley_shubik(seats, quota);
        let banzhaf = Self::banzhaf(seats, quota);

        let mut results: Vec<PowerIndexResult> = seats
            .iter()
            .map(|(party, count)| PowerIndexResult {
                party: party.to_string(),
                seats: count,
                seats_pct: round_to(f64::from(count) / total * 100.0, 1),
                shapley: shapley.get(party).copied().unwrap_or(0.0),
                banzhaf: banzhaf.get(party).copied().unwrap_or(0.0),
            })
            .collect();

        results.sort_by(|a, b| {
            b.shapley
                .total_cmp(&a.shapley)
                .then_with(|| a.party.cmp(&b.party))
        });
        results
    }

    fn split(seats: &SeatMap) -> (Vec<String>, Vec<u64>) {
        seats
            .iter()
            .map(|(party, count)| (party.to_string(), u64::from(count)))
            .unzip()
    }

    fn trivial(parties: &[String]) -> Option<BTreeMap<String, f64>> {
        match parties {
            [] => Some(BTreeMap::new()),
            [only] => Some(BTreeMap::from([(only.clone(), 1.0)])),
            _ => None,
        }
    }
}
