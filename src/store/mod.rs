//! Generic key-value blob store boundary.
//!
//! The repository never talks to a concrete backend directly; it goes
//! through the [`BlobStore`] trait so that the production filesystem
//! backend and the in-memory test backend are interchangeable.

pub mod fs;
pub mod memory;

pub use fs::FsBlobStore;
pub use memory::MemoryBlobStore;

use thiserror::Error;

/// Failures at the store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested key does not exist.
    #[error("key not found: {key}")]
    NotFound { key: String },

    /// The store could not be reached or the operation failed in transit.
    #[error("store unavailable ({key}): {source}")]
    Unavailable {
        key: String,
        #[source]
        source: std::io::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A generic key-value blob store with list/get/put operations.
///
/// `put` overwrites unconditionally; there is no atomicity, versioning,
/// or conditional-put semantics, and callers must not assume any.
pub trait BlobStore {
    /// List all keys under a prefix, in a stable order.
    ///
    /// A prefix with no keys under it yields an empty list, not an error.
    fn list(&self, prefix: &str) -> StoreResult<Vec<String>>;

    /// Fetch the content stored at a key.
    fn get(&self, key: &str) -> StoreResult<Vec<u8>>;

    /// Store content at a key, overwriting any previous content.
    fn put(&self, key: &str, bytes: &[u8]) -> StoreResult<()>;
}

impl StoreError {
    /// Whether this error is a plain missing-key miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
