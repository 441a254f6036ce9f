//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! gm-cli cart list
//! gm-cli cart add -i 42 -t "Linen Shirt" --image-url https://cdn/shirt.png -p 45.00
//! gm-cli cart increment 42
//! gm-cli cart decrement 42
//! ```
//!
//! # Environment Variables
//!
//! - `CART_STORAGE_DIR` - Directory holding the cart record
//! - `CART_STORAGE_KEY` - Key of the cart record

use std::sync::Arc;

use go_marketplace_core::{Cart, CartChange, Price, Product, ProductId};
use go_marketplace_storefront::storage::FileStorage;
use go_marketplace_storefront::{CartConfig, CartProvider, CartStore};
use thiserror::Error;

/// Errors that can occur during cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// The change was applied but could not be written to storage.
    #[error("Cart change was not saved to {0} after every retry")]
    NotSaved(String),
}

/// Open the cart stored under the configured directory and key.
async fn open(config: &CartConfig) -> CartProvider {
    let storage = Arc::new(FileStorage::new(&config.storage_dir));
    tracing::debug!(
        path = %storage.path_for(&config.storage_key).display(),
        "Opening cart record"
    );
    CartProvider::load(storage, config).await
}

/// Apply one operation, wait for it to be written, and close the session.
async fn mutate(
    config: &CartConfig,
    operation: impl FnOnce(&CartStore) -> CartChange,
) -> Result<(CartChange, Cart), CartCommandError> {
    let provider = open(config).await;

    let change = operation(provider.store());
    provider.flush().await;

    let failed = provider.store().persist_failures();
    let cart = provider.store().products();
    provider.shutdown().await;

    if failed > 0 {
        return Err(CartCommandError::NotSaved(
            config.storage_dir.display().to_string(),
        ));
    }
    Ok((change, cart))
}

/// Log every line item and the unit count.
fn log_cart(cart: &Cart) {
    if cart.is_empty() {
        tracing::info!("Cart is empty");
        return;
    }

    for item in cart {
        tracing::info!(
            "{} x{} - {} ({} each)",
            item.id,
            item.quantity,
            item.title,
            item.price
        );
    }
    tracing::info!("{} line items, {} units", cart.len(), cart.item_count());
}

/// Show the cart.
pub async fn list(config: &CartConfig) {
    let provider = open(config).await;
    log_cart(&provider.store().products());
    provider.shutdown().await;
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns `CartCommandError::NotSaved` if the cart record could not be written.
pub async fn add(
    config: &CartConfig,
    id: &str,
    title: &str,
    image_url: &str,
    price: Price,
) -> Result<(), CartCommandError> {
    let product = Product::new(id, title, image_url, price);
    let (change, cart) = mutate(config, |store| store.add_to_cart(product)).await?;

    match change {
        CartChange::Added => tracing::info!("Added {id} to the cart"),
        _ => tracing::info!("{id} was already in the cart, quantity increased"),
    }
    log_cart(&cart);
    Ok(())
}

/// Add one unit to an existing line item.
///
/// # Errors
///
/// Returns `CartCommandError::NotSaved` if the cart record could not be written.
pub async fn increment(config: &CartConfig, id: &str) -> Result<(), CartCommandError> {
    let id = ProductId::from(id);
    let (change, cart) = mutate(config, |store| store.increment(&id)).await?;

    report(change, &id);
    log_cart(&cart);
    Ok(())
}

/// Remove one unit from a line item.
///
/// # Errors
///
/// Returns `CartCommandError::NotSaved` if the cart record could not be written.
pub async fn decrement(config: &CartConfig, id: &str) -> Result<(), CartCommandError> {
    let id = ProductId::from(id);
    let (change, cart) = mutate(config, |store| store.decrement(&id)).await?;

    report(change, &id);
    log_cart(&cart);
    Ok(())
}

fn report(change: CartChange, id: &ProductId) {
    match change {
        CartChange::Unchanged => tracing::warn!("No line item for product {id}, cart unchanged"),
        CartChange::Removed => tracing::info!("Removed {id} from the cart"),
        _ => tracing::info!("Updated quantity of {id}"),
    }
}
