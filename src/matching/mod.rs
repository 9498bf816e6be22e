//! Multi-year receipt/clearing matching, case assembly, and balances.
//!
//! The matcher is the one stateful stage of the pipeline: it owns the
//! consumed-clearing set for the duration of a run and nothing else.

mod balance;
mod case;
mod matcher;

pub use balance::*;
pub use case::*;
pub use matcher::*;
