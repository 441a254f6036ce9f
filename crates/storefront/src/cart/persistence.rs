//! Background writer for the cart record.
//!
//! Every cart change enqueues a full snapshot. One task owns the queue and
//! the storage writes:
//! 1. Receive a command and drain whatever else is already queued
//! 2. Keep only the newest snapshot from that batch
//! 3. Write it, retrying per [`RetryPolicy`]
//! 4. Acknowledge any flush requests that arrived in the batch
//!
//! Because there is exactly one writer, records land in the order the
//! changes were made and never race each other. The writer only exits once
//! every [`PersistQueue`] is dropped and the queue is empty, so a snapshot
//! that was enqueued is always handled.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use go_marketplace_core::Cart;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::config::RetryPolicy;
use crate::error::CartError;
use crate::storage::CartStorage;

/// Read and decode the cart record under `key`.
///
/// # Errors
///
/// Returns `CartError::Storage` if the backend read fails, or
/// `CartError::Serialization` if the record is not a valid cart.
pub async fn read_record(storage: &dyn CartStorage, key: &str) -> Result<Option<Cart>, CartError> {
    match storage.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encode and store `cart` under `key` in a single attempt.
///
/// # Errors
///
/// Returns `CartError::Serialization` or `CartError::Storage` on failure.
pub async fn write_record(storage: &dyn CartStorage, key: &str, cart: &Cart) -> Result<(), CartError> {
    let raw = serde_json::to_string(cart)?;
    storage.set(key, &raw).await?;
    Ok(())
}

/// Counters describing the writer's work so far.
#[derive(Debug, Default)]
pub struct PersistStats {
    written: AtomicU64,
    failed: AtomicU64,
}

impl PersistStats {
    /// Snapshots successfully written.
    #[must_use]
    pub fn written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    /// Snapshots dropped after exhausting every attempt.
    #[must_use]
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

enum Command {
    Write(Cart),
    Flush(oneshot::Sender<()>),
}

/// Sending side of the writer's queue. Dropping it lets the writer finish.
#[derive(Debug)]
pub(crate) struct PersistQueue {
    tx: mpsc::UnboundedSender<Command>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Write(cart) => f.debug_tuple("Write").field(&cart.len()).finish(),
            Self::Flush(_) => f.write_str("Flush"),
        }
    }
}

impl PersistQueue {
    /// Start the writer task.
    pub(crate) fn spawn(
        storage: Arc<dyn CartStorage>,
        key: String,
        retry: RetryPolicy,
        stats: Arc<PersistStats>,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let writer = Writer {
            storage,
            key,
            retry,
            stats,
        };

        info!(key = %writer.key, "Spawning cart persistence task");
        let handle = tokio::spawn(writer.run(rx));

        (Self { tx }, handle)
    }

    /// Queue a snapshot. Never blocks.
    pub(crate) fn enqueue(&self, cart: Cart) {
        if self.tx.send(Command::Write(cart)).is_err() {
            warn!("Cart persistence task has stopped, snapshot not saved");
        }
    }

    /// Wait until every snapshot queued before this call has been handled.
    pub(crate) async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(Command::Flush(done_tx)).is_err() {
            return;
        }
        // Writer gone means there is nothing left to wait for.
        let _ = done_rx.await;
    }
}

struct Writer {
    storage: Arc<dyn CartStorage>,
    key: String,
    retry: RetryPolicy,
    stats: Arc<PersistStats>,
}

impl Writer {
    async fn run(self, mut rx: mpsc::UnboundedReceiver<Command>) {
        debug!("Cart persistence task started");

        while let Some(first) = rx.recv().await {
            let mut latest = None;
            let mut waiters = Vec::new();

            let mut next = Some(first);
            while let Some(command) = next {
                match command {
                    Command::Write(cart) => latest = Some(cart),
                    Command::Flush(done) => waiters.push(done),
                }
                next = rx.try_recv().ok();
            }

            if let Some(cart) = latest {
                self.persist(&cart).await;
            }

            for done in waiters {
                let _ = done.send(());
            }
        }

        debug!("Cart persistence task finished");
    }

    #[instrument(skip_all, fields(key = %self.key, items = cart.len()))]
    async fn persist(&self, cart: &Cart) {
        let raw = match serde_json::to_string(cart) {
            Ok(raw) => raw,
            Err(e) => {
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
                error!(error = %e, "Failed to encode cart snapshot");
                return;
            }
        };

        let max_attempts = self.retry.max_attempts.max(1);
        for attempt in 1..=max_attempts {
            match self.storage.set(&self.key, &raw).await {
                Ok(()) => {
                    self.stats.written.fetch_add(1, Ordering::Relaxed);
                    debug!(attempt, "Cart snapshot saved");
                    return;
                }
                Err(e) if attempt < max_attempts => {
                    warn!(attempt, error = %e, "Cart write failed, retrying");
                    tokio::time::sleep(self.retry.delay).await;
                }
                Err(e) => {
                    self.stats.failed.fetch_add(1, Ordering::Relaxed);
                    error!(
                        attempts = max_attempts,
                        error = %e,
                        "Giving up on cart write; device record is stale"
                    );
                }
            }
        }
    }
}
