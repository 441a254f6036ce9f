//! Session cart: store, provider scope, and background persistence.
//!
//! - [`CartProvider`] - created once per session; loads the record and owns
//!   everything below
//! - [`CartHandle`] - what consumers hold; fails fast without a provider
//! - [`CartStore`] - the in-memory cart and its three operations
//! - [`persistence`] - the single writer that keeps the record in sync

pub mod persistence;
mod provider;
mod store;

pub use persistence::PersistStats;
pub use provider::{CartHandle, CartProvider};
pub use store::CartStore;
