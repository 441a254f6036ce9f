//! Integration tests for Go Marketplace.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p go-marketplace-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_session` - Provider lifecycle and operations over file storage
//! - `cart_record` - Compatibility of the on-device record format
//!
//! Each test gets its own temporary directory through [`TestContext`], so
//! tests can run in parallel without sharing a record file.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use go_marketplace_core::{Cart, Price, Product};
use go_marketplace_storefront::cart::persistence::read_record;
use go_marketplace_storefront::config::RetryPolicy;
use go_marketplace_storefront::storage::FileStorage;
use go_marketplace_storefront::{CartConfig, CartProvider};
use tempfile::TempDir;

/// A temporary storage directory plus matching configuration.
pub struct TestContext {
    dir: TempDir,
    pub config: CartConfig,
}

impl TestContext {
    /// Create a context with fast retries rooted in a fresh temp directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = CartConfig {
            storage_dir: dir.path().to_path_buf(),
            retry: RetryPolicy {
                max_attempts: 2,
                delay: Duration::from_millis(1),
            },
            ..CartConfig::default()
        };
        Self { dir, config }
    }

    /// File storage over this context's directory.
    #[must_use]
    pub fn storage(&self) -> Arc<FileStorage> {
        Arc::new(FileStorage::new(self.dir.path()))
    }

    /// Path of the cart record file.
    #[must_use]
    pub fn record_path(&self) -> PathBuf {
        self.storage().path_for(&self.config.storage_key)
    }

    /// Start a cart session, as the app does on launch.
    pub async fn open(&self) -> CartProvider {
        CartProvider::load(self.storage(), &self.config).await
    }

    /// Decode whatever is currently on disk.
    ///
    /// # Panics
    ///
    /// Panics if the record cannot be read or decoded.
    #[allow(clippy::expect_used)]
    pub async fn persisted(&self) -> Option<Cart> {
        read_record(self.storage().as_ref(), &self.config.storage_key)
            .await
            .expect("Failed to read cart record")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A catalog product fixture.
#[must_use]
pub fn product(id: &str) -> Product {
    Product::new(
        id,
        format!("Product {id}"),
        format!("https://cdn.example/{id}.png"),
        Price::from_cents(1999),
    )
}
