//! Report rendering.
//!
//! Consumes the repository output and the aggregation engine's derived
//! fields; performs no persistence or aggregation of its own.

pub mod generator;

pub use generator::*;
