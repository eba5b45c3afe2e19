//! Foundation module - Shared domain primitives.
//!
//! Contains the identifiers, timestamps and validation errors used across
//! the analytics domain.

mod errors;
mod ids;
mod timestamp;

pub use errors::ValidationError;
pub use ids::{ParseTermIdError, TermId};
pub use timestamp::Timestamp;
