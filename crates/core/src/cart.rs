//! The cart collection and its reconciliation rules.
//!
//! A [`Cart`] is an ordered list of [`LineItem`]s with at most one entry per
//! product ID. Insertion order is kept for display but carries no meaning.
//! All changes go through [`Cart::add`], [`Cart::increment`] and
//! [`Cart::decrement`]; each reports what it did as a [`CartChange`] so the
//! caller can skip notifying and persisting when nothing happened.
//!
//! # Example
//!
//! ```rust
//! use go_marketplace_core::{Cart, CartChange, Price, Product};
//!
//! let mut cart = Cart::new();
//! let mug = Product::new("mug", "Mug", "https://cdn.example/mug.png", Price::from_cents(1200));
//!
//! assert_eq!(cart.add(mug.clone()), CartChange::Added);
//! assert_eq!(cart.add(mug), CartChange::Incremented);
//! assert_eq!(cart.item_count(), 2);
//!
//! assert_eq!(cart.decrement(&"mug".into()), CartChange::Decremented);
//! assert_eq!(cart.decrement(&"mug".into()), CartChange::Removed);
//! assert!(cart.is_empty());
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{LineItem, Product, ProductId};

/// A list of line items that breaks the one-entry-per-product rule.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidCart {
    /// Two line items share a product ID.
    #[error("duplicate line item for product {0}")]
    DuplicateProduct(ProductId),
}

/// What a cart operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartChange {
    /// A new line item was appended with quantity one.
    Added,
    /// An existing line item's quantity went up by one.
    Incremented,
    /// An existing line item's quantity went down by one.
    Decremented,
    /// A line item at quantity one was removed.
    Removed,
    /// No line item matched; the cart is untouched.
    Unchanged,
}

impl CartChange {
    /// Whether the cart's contents differ from before the operation.
    #[must_use]
    pub const fn is_changed(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Ordered cart contents, unique by product ID.
///
/// Serializes as a bare JSON array of line items. Deserializing a list that
/// repeats a product ID fails with [`InvalidCart`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up the line item for a product.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == *id)
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart holds no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all line items, for the cart badge.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Add one unit of a product.
    ///
    /// Appends a new line item if the product is not in the cart yet,
    /// otherwise bumps the existing line item in place.
    pub fn add(&mut self, product: Product) -> CartChange {
        if let Some(item) = self.get_mut(&product.id) {
            item.quantity = item.quantity.incremented();
            return CartChange::Incremented;
        }

        self.items.push(LineItem::from_product(product));
        CartChange::Added
    }

    /// Add one unit to an existing line item.
    pub fn increment(&mut self, id: &ProductId) -> CartChange {
        match self.get_mut(id) {
            Some(item) => {
                item.quantity = item.quantity.incremented();
                CartChange::Incremented
            }
            None => CartChange::Unchanged,
        }
    }

    /// Take one unit away from a line item, removing it at the last unit.
    pub fn decrement(&mut self, id: &ProductId) -> CartChange {
        let Some((position, item)) = self
            .items
            .iter_mut()
            .enumerate()
            .find(|(_, item)| item.id == *id)
        else {
            return CartChange::Unchanged;
        };

        match item.quantity.decremented() {
            Some(quantity) => {
                item.quantity = quantity;
                CartChange::Decremented
            }
            None => {
                self.items.remove(position);
                CartChange::Removed
            }
        }
    }

    fn get_mut(&mut self, id: &ProductId) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.id == *id)
    }
}

impl TryFrom<Vec<LineItem>> for Cart {
    type Error = InvalidCart;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(&item.id) {
                return Err(InvalidCart::DuplicateProduct(item.id.clone()));
            }
        }
        Ok(Self { items })
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
