//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (term IDs, timestamps, validation errors)
//! - `analysis` - Pure calculators for power, coalitions, cohesion, momentum and agreement

pub mod analysis;
pub mod foundation;
