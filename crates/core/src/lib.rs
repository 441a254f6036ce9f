//! Go Marketplace Core - Shared cart types library.
//!
//! This crate provides the types used across all Go Marketplace components:
//! - `storefront` - Cart store, persistence and provider handles
//! - `cli` - Command-line tools for inspecting and editing a device cart
//!
//! # Architecture
//!
//! The core crate contains only types and the cart reconciliation rules - no
//! I/O, no storage access, no async runtime. This keeps it lightweight and
//! allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices, and quantities,
//!   plus the product descriptor and line item records
//! - [`cart`] - The ordered cart collection and its mutation rules

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartChange, InvalidCart};
pub use types::*;
