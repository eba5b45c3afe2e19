//! Vote records - Party decisions as delivered by the vote data source.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction a party took on one vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Yes,
    No,
}

impl Decision {
    /// Parses a vote token. Anything other than `YES`/`NO` (abstentions,
    /// absences, unknown markers) yields `None`.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "YES" => Some(Decision::Yes),
            "NO" => Some(Decision::No),
            _ => None,
        }
    }

    /// Majority direction of a tally. A tie counts as `No`.
    pub fn from_tally(yes: u32, no: u32) -> Self {
        if yes > no {
            Decision::Yes
        } else {
            Decision::No
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Yes => "YES",
            Decision::No => "NO",
        }
    }

    pub fn is_yes(&self) -> bool {
        matches!(self, Decision::Yes)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A party's tally and majority direction on a single vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyDecision {
    pub voting_id: String,
    pub party: String,
    pub yes_count: u32,
    pub no_count: u32,
    pub decision: Decision,
}

impl PartyDecision {
    /// Creates a record whose decision is derived from the tally.
    pub fn from_tally(
        voting_id: impl Into<String>,
        party: impl Into<String>,
        yes_count: u32,
        no_count: u32,
    ) -> Self {
        Self {
            voting_id: voting_id.into(),
            party: party.into(),
            yes_count,
            no_count,
            decision: Decision::from_tally(yes_count, no_count),
        }
    }
}
