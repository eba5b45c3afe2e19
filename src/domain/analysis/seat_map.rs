//! Seat Map - Chamber composition for one legislative term.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::ValidationError;

/// Seats held by each party (club) in a term.
///
/// Parties are kept in lexicographic order so that every enumeration built on
/// top of a `SeatMap` visits them in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatMap(BTreeMap<String, u32>);

impl SeatMap {
    /// Creates an empty seat map.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builds a seat map from `(party, seats)` pairs.
    ///
    /// A party appearing twice keeps its last count.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut map = Self::new();
        for (party, seats) in pairs {
            map.insert(party, seats)?;
        }
        Ok(map)
    }

    /// Sets the seat count of a party.
    pub fn insert(&mut self, party: impl Into<String>, seats: u32) -> Result<(), ValidationError> {
        let party = party.into();
        if party.trim().is_empty() {
            return Err(ValidationError::empty_field("party"));
        }
        self.0.insert(party, seats);
        Ok(())
    }

    /// Seats held by `party`, if present.
    pub fn seats(&self, party: &str) -> Option<u32> {
        self.0.get(party).copied()
    }

    /// Total number of seats across all parties.
    pub fn total(&self) -> u64 {
        self.0.values().map(|&s| u64::from(s)).sum()
    }

    /// Majority threshold, `total / 2 + 1`. Undefined for an empty chamber.
    pub fn quota(&self) -> Option<u64> {
        quota_for_total(self.total())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Party names in iteration order.
    pub fn parties(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `(party, seats)` pairs in iteration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(p, &s)| (p.as_str(), s))
    }

    /// Party with the most seats; ties go to the first party in order.
    pub fn largest(&self) -> Option<(&str, u32)> {
        self.iter().fold(None, |best, (party, seats)| match best {
            Some((_, best_seats)) if best_seats >= seats => best,
            _ => Some((party, seats)),
        })
    }
}

/// Simple-majority quota for a chamber of `total` seats.
pub fn quota_for_total(total: u64) -> Option<u64> {
    if total == 0 {
        None
    } else {
        Some(total / 2 + 1)
    }
}
