//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use super::ValidationError;

/// Identifier of a legislative term (e.g. the 10th Sejm).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct TermId(i32);

/// Errors from parsing a term number.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseTermIdError {
    #[error("Invalid term number: {0}")]
    NotANumber(#[from] ParseIntError),

    #[error(transparent)]
    OutOfRange(#[from] ValidationError),
}

impl TermId {
    /// Creates a TermId, returning error if the number is not positive.
    pub fn new(value: i32) -> Result<Self, ValidationError> {
        if value < 1 {
            return Err(ValidationError::out_of_range("term_id", 1, i32::MAX, value));
        }
        Ok(Self(value))
    }

    /// Returns the term number.
    pub fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for TermId {
    type Error = ValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TermId> for i32 {
    fn from(term_id: TermId) -> Self {
        term_id.0
    }
}

impl FromStr for TermId {
    type Err = ParseTermIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i32 = s.trim().parse()?;
        Ok(Self::new(value)?)
    }
}
