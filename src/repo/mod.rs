//! Guess persistence.
//!
//! This module owns the per-submitter shard files and the merge
//! semantics across them.

pub mod shards;

pub use shards::{GuessRepository, RepoError};
