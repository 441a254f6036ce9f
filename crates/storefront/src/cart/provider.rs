//! Session scope for the cart and the handles consumers hold.

use std::sync::{Arc, Weak};

use go_marketplace_core::{Cart, CartChange, Product, ProductId};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use super::persistence::{PersistQueue, PersistStats, read_record};
use super::store::CartStore;
use crate::config::CartConfig;
use crate::error::{CartError, Result};
use crate::storage::CartStorage;

/// Owns the cart store and its persistence task for one app session.
///
/// Construct one per session with [`CartProvider::load`] and pass
/// [`CartHandle`]s to whatever needs the cart. Handles stop working once the
/// provider is gone.
#[derive(Debug)]
pub struct CartProvider {
    store: Arc<CartStore>,
    writer: JoinHandle<()>,
}

impl CartProvider {
    /// Load the persisted cart and start the session.
    ///
    /// The returned provider already holds the loaded cart, so no operation
    /// can run against the empty initial state. A missing record starts an
    /// empty cart; an unreadable or malformed one is logged and also starts
    /// an empty cart, which the first change then overwrites.
    #[instrument(skip_all, fields(key = %config.storage_key))]
    pub async fn load(storage: Arc<dyn CartStorage>, config: &CartConfig) -> Self {
        let initial = load_cart(storage.as_ref(), &config.storage_key).await;

        let stats = Arc::new(PersistStats::default());
        let (queue, writer) =
            PersistQueue::spawn(storage, config.storage_key.clone(), config.retry, stats.clone());

        Self {
            store: Arc::new(CartStore::new(initial, queue, stats)),
            writer,
        }
    }

    /// A handle to give to a consumer.
    #[must_use]
    pub fn handle(&self) -> CartHandle {
        CartHandle {
            store: Arc::downgrade(&self.store),
        }
    }

    /// The store itself, for code that lives as long as the provider.
    #[must_use]
    pub fn store(&self) -> &CartStore {
        &self.store
    }

    /// Wait for every change made so far to be written (or given up on).
    pub async fn flush(&self) {
        self.store.persist_queue().flush().await;
    }

    /// End the session once every change has been written (or given up on).
    ///
    /// The writer keeps running until the last reference to the store is
    /// gone, so a handle caught mid-operation still has its change saved
    /// before this returns.
    pub async fn shutdown(self) {
        let Self { store, writer } = self;
        drop(store);

        if let Err(e) = writer.await {
            warn!(error = %e, "Cart persistence task ended abnormally");
        }
        info!("Cart session closed");
    }
}

/// Read the persisted cart, falling back to an empty one.
async fn load_cart(storage: &dyn CartStorage, key: &str) -> Cart {
    match read_record(storage, key).await {
        Ok(Some(cart)) => {
            info!(items = cart.len(), units = cart.item_count(), "Loaded persisted cart");
            cart
        }
        Ok(None) => {
            debug!("No persisted cart, starting empty");
            Cart::new()
        }
        Err(e) => {
            warn!(error = %e, "Could not load persisted cart, starting empty");
            Cart::new()
        }
    }
}

/// A consumer's view of the session cart.
///
/// Cheap to clone. Holds a weak reference, so every call fails with
/// [`CartError::NoProvider`] once the provider has shut down, and a
/// [`CartHandle::detached`] handle fails from the start.
#[derive(Debug, Clone, Default)]
pub struct CartHandle {
    store: Weak<CartStore>,
}

impl CartHandle {
    /// A handle with no provider behind it.
    #[must_use]
    pub fn detached() -> Self {
        Self::default()
    }

    /// Whether the provider is still alive.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.store.strong_count() > 0
    }

    /// Snapshot of the current cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NoProvider` if the provider is gone.
    pub fn products(&self) -> Result<Cart> {
        Ok(self.store()?.products())
    }

    /// Total units in the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NoProvider` if the provider is gone.
    pub fn item_count(&self) -> Result<u64> {
        Ok(self.store()?.item_count())
    }

    /// Add one unit of `product`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NoProvider` if the provider is gone.
    pub fn add_to_cart(&self, product: Product) -> Result<CartChange> {
        Ok(self.store()?.add_to_cart(product))
    }

    /// Add one unit to the line item for `id`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NoProvider` if the provider is gone.
    pub fn increment(&self, id: &ProductId) -> Result<CartChange> {
        Ok(self.store()?.increment(id))
    }

    /// Remove one unit from the line item for `id`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NoProvider` if the provider is gone.
    pub fn decrement(&self, id: &ProductId) -> Result<CartChange> {
        Ok(self.store()?.decrement(id))
    }

    /// Watch the cart for changes.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NoProvider` if the provider is gone.
    pub fn subscribe(&self) -> Result<watch::Receiver<Cart>> {
        Ok(self.store()?.subscribe())
    }

    fn store(&self) -> Result<Arc<CartStore>> {
        self.store.upgrade().ok_or(CartError::NoProvider)
    }
}
