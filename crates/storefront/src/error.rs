//! Unified error handling for the cart store.
//!
//! Cart operations themselves cannot fail: an unknown product ID is a no-op
//! and persistence happens in the background. The errors here cover using a
//! handle without a live provider and the explicit persistence paths.

use thiserror::Error;

use crate::storage::StorageError;

/// Error type for the storefront cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// A handle was used without a live `CartProvider` behind it.
    #[error("cart accessed outside of a CartProvider")]
    NoProvider,

    /// Storage backend operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart record could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
