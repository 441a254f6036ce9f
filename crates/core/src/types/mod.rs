//! Core types for Go Marketplace.
//!
//! This module provides type-safe wrappers for the cart's domain concepts.

pub mod id;
pub mod price;
pub mod product;
pub mod quantity;

pub use id::ProductId;
pub use price::Price;
pub use product::{LineItem, Product};
pub use quantity::Quantity;
