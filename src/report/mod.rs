//! Report shaping: case rows with the full column set, rendered as
//! semicolon-separated CSV with Swedish number formatting.
//!
//! This is a boundary concern: the matcher's structured records carry
//! the contract, the CSV is one rendering of them.

mod csv;
mod rows;

pub use csv::*;
pub use rows::*;
