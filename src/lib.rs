//! Sejm Analytics - Voting power and cohesion analytics for parliamentary terms
//!
//! This crate computes Shapley-Shubik and Banzhaf power indices, minimal
//! winning coalitions, Rice cohesion, Markov vote momentum and inter-party
//! agreement for a legislative term, and memoizes each metric in a
//! compute-once analytics cache.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
