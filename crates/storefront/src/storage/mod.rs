//! Device-local key-value storage for the cart record.
//!
//! The cart is always read and written whole, as one string value under one
//! key, so a backend only needs `get` and `set`.
//!
//! ## Provided backends
//! - [`FileStorage`]: one JSON file per key in a directory.
//! - [`MemoryStorage`]: in-process map for tests and throwaway sessions.

mod file;
mod memory;

use async_trait::async_trait;
use thiserror::Error;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Errors a storage backend can report.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the underlying file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Whole-value key-value storage.
///
/// Implementations must be `Send + Sync`; the cart's persistence writer
/// holds one behind an `Arc` on a background task.
#[async_trait]
pub trait CartStorage: Send + Sync {
    /// Read the value stored under `key`, or `None` if nothing is stored.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
