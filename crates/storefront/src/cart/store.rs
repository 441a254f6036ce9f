//! The session's cart state.

use std::sync::Arc;

use go_marketplace_core::{Cart, CartChange, Product, ProductId};
use tokio::sync::watch;
use tracing::{debug, instrument};

use super::persistence::{PersistQueue, PersistStats};

/// Owns the in-memory cart for one session.
///
/// Every operation is a read-modify-write on the latest state, done while
/// holding the `watch` channel's lock. Two operations issued back to back
/// therefore both take effect, and their snapshots reach the persistence
/// queue in the same order they were applied.
#[derive(Debug)]
pub struct CartStore {
    state: watch::Sender<Cart>,
    persist: PersistQueue,
    stats: Arc<PersistStats>,
}

impl CartStore {
    pub(crate) fn new(initial: Cart, persist: PersistQueue, stats: Arc<PersistStats>) -> Self {
        let (state, _) = watch::channel(initial);
        Self {
            state,
            persist,
            stats,
        }
    }

    /// Snapshot of the current cart.
    #[must_use]
    pub fn products(&self) -> Cart {
        self.state.borrow().clone()
    }

    /// Total units in the cart, for the cart badge.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.state.borrow().item_count()
    }

    /// Receiver that is marked changed whenever the cart changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.state.subscribe()
    }

    /// Add one unit of `product`, creating its line item if needed.
    #[instrument(skip_all, fields(product_id = %product.id))]
    pub fn add_to_cart(&self, product: Product) -> CartChange {
        self.apply(|cart| cart.add(product))
    }

    /// Add one unit to the line item for `id`. Unknown IDs are ignored.
    #[instrument(skip_all, fields(product_id = %id))]
    pub fn increment(&self, id: &ProductId) -> CartChange {
        self.apply(|cart| cart.increment(id))
    }

    /// Remove one unit from the line item for `id`, dropping the line item
    /// when it was the last unit. Unknown IDs are ignored.
    #[instrument(skip_all, fields(product_id = %id))]
    pub fn decrement(&self, id: &ProductId) -> CartChange {
        self.apply(|cart| cart.decrement(id))
    }

    /// Persistence counters for this session.
    #[must_use]
    pub fn persist_stats(&self) -> &PersistStats {
        &self.stats
    }

    /// Snapshots that could not be saved after every retry.
    #[must_use]
    pub fn persist_failures(&self) -> u64 {
        self.stats.failed()
    }

    pub(crate) fn persist_queue(&self) -> &PersistQueue {
        &self.persist
    }

    fn apply(&self, operation: impl FnOnce(&mut Cart) -> CartChange) -> CartChange {
        let mut change = CartChange::Unchanged;

        self.state.send_if_modified(|cart| {
            change = operation(cart);
            if change.is_changed() {
                // Enqueue under the lock so snapshot order matches apply order.
                self.persist.enqueue(cart.clone());
            }
            change.is_changed()
        });

        debug!(?change, "Cart operation applied");
        change
    }
}
