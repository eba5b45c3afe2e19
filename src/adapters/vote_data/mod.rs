//! Vote Data Adapters
//!
//! In-process implementations of the SeatProvider and DecisionProvider
//! ports. The database-backed reader lives in `adapters::postgres`.

mod in_memory_vote_data;

pub use in_memory_vote_data::InMemoryVoteData;
