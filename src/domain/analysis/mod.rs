//! Analysis Module - Pure domain services for parliamentary analytics.
//!
//! This module contains stateless calculators over a term's seat distribution
//! and recorded votes.
//!
//! # Components
//!
//! - `SeatMap` - Chamber composition and majority quota
//! - `PowerIndexCalculator` - Shapley-Shubik and relative Banzhaf indices
//! - `CoalitionFinder` - Minimal winning coalitions
//! - `CohesionCalculator` - Rice index per party
//! - `SequenceAnalyzer` - Markov momentum/volatility of decision sequences
//! - `AgreementMatrixBuilder` - Pairwise inter-party agreement
//! - `TermOverview`, `TermList` - Headline counts for a term, known terms
//!
//! # Design Philosophy
//!
//! All functions are pure and deterministic. Missing data produces empty or
//! zero results, never an error. Persistence of results is handled by the
//! application layer through the `AnalyticsCache` port.

mod agreement_matrix;
mod coalition_finder;
mod cohesion;
mod overview;
mod power_index;
mod seat_map;
mod sequence_analyzer;
mod votes;

pub use agreement_matrix::{AgreementMatrix, AgreementMatrixBuilder};
pub use coalition_finder::{
    Coalition, CoalitionFinder, CoalitionRecord, CoalitionSearch, DEFAULT_COALITION_LIMIT,
    DEFAULT_MAX_COALITION_SIZE,
};
pub use cohesion::{CohesionCalculator, CohesionResult};
pub use overview::{TermList, TermOverview, TermSummary};
pub use power_index::{PowerIndexCalculator, PowerIndexResult};
pub use seat_map::{quota_for_total, SeatMap};
pub use sequence_analyzer::{
    MarkovResult, SequenceAnalyzer, TransitionMatrix, DEFAULT_MIN_SEQUENCE_LENGTH,
};
pub use votes::{Decision, PartyDecision};

/// Rounds half away from zero to `places` decimal places.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
