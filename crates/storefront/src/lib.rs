//! Go Marketplace Storefront cart library.
//!
//! Holds the shopping cart for one app session, keeps a device-local record
//! of it, and hands consumers a [`CartHandle`] to read and change it.
//!
//! # Architecture
//!
//! - [`cart::CartProvider`] owns the [`cart::CartStore`] for a session and
//!   is the only thing that can create handles
//! - Mutations apply synchronously to in-memory state and notify
//!   subscribers through a `tokio::sync::watch` channel
//! - Each change enqueues a whole-cart snapshot to a single background
//!   writer, which coalesces, retries, and logs failed writes
//! - [`storage`] backends store the record as a JSON array under one key
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use go_marketplace_core::{Price, Product};
//! use go_marketplace_storefront::{CartConfig, CartProvider, storage::MemoryStorage};
//!
//! # async fn demo() -> Result<(), go_marketplace_storefront::CartError> {
//! let provider = CartProvider::load(Arc::new(MemoryStorage::new()), &CartConfig::default()).await;
//! let cart = provider.handle();
//!
//! cart.add_to_cart(Product::new("mug", "Mug", "https://cdn.example/mug.png", Price::from_cents(1200)))?;
//! assert_eq!(cart.products()?.item_count(), 1);
//!
//! provider.shutdown().await;
//! # Ok(()) }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod error;
pub mod storage;

pub use cart::{CartHandle, CartProvider, CartStore};
pub use config::{CartConfig, ConfigError};
pub use error::{CartError, Result};
