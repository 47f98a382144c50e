//! Guess aggregation.
//!
//! Pure functions over the loaded guesses; no I/O, no side effects.

pub mod aggregator;

pub use aggregator::*;
