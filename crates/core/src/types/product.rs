//! Product descriptors and cart line items.
//!
//! A [`Product`] is what a catalog screen hands to the cart: it has no
//! quantity. A [`LineItem`] is what the cart stores: the same display data
//! plus a [`Quantity`]. The only way from one to the other is
//! [`LineItem::from_product`].

use serde::{Deserialize, Serialize};

use super::{Price, ProductId, Quantity};

/// A product as offered by the catalog, before it is in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Stable catalog identifier.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Product image location.
    pub image_url: String,
    /// Unit price.
    pub price: Price,
}

impl Product {
    /// Create a new product descriptor.
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: Price,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }
}

/// One product's presence in the cart.
///
/// Field names match the persisted record: `id`, `title`, `image_url`,
/// `price`, `quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Catalog identifier; unique within a cart.
    pub id: ProductId,
    /// Display name, copied from the product.
    pub title: String,
    /// Product image location, copied from the product.
    pub image_url: String,
    /// Unit price at the time the product was added.
    pub price: Price,
    /// Units of this product in the cart. Never zero.
    pub quantity: Quantity,
}

impl LineItem {
    /// Start a line item for a product with a quantity of one.
    #[must_use]
    pub fn from_product(product: Product) -> Self {
        let Product {
            id,
            title,
            image_url,
            price,
        } = product;

        Self {
            id,
            title,
            image_url,
            price,
            quantity: Quantity::ONE,
        }
    }

    /// The product descriptor this line item was made from.
    #[must_use]
    pub fn product(&self) -> Product {
        Product {
            id: self.id.clone(),
            title: self.title.clone(),
            image_url: self.image_url.clone(),
            price: self.price,
        }
    }
}

impl From<Product> for LineItem {
    fn from(product: Product) -> Self {
        Self::from_product(product)
    }
}
