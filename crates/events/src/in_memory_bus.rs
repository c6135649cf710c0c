//! In-memory signal bus.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, mpsc};

use thiserror::Error;

use crate::bus::{SignalBus, Subscription};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    /// Publish failed due to internal lock poisoning.
    #[error("signal bus lock poisoned")]
    Poisoned,
}

type Registry<M> = Mutex<Vec<(u64, mpsc::Sender<M>)>>;

/// In-memory pub/sub bus.
///
/// - No IO / no async
/// - Fan-out to every live subscription
/// - Subscriptions deregister themselves when dropped
#[derive(Debug)]
pub struct InMemorySignalBus<M> {
    subscribers: Arc<Registry<M>>,
    next_id: AtomicU64,
}

impl<M> InMemorySignalBus<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered observers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|subs| subs.len()).unwrap_or(0)
    }
}

impl<M> Default for InMemorySignalBus<M> {
    fn default() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(0),
        }
    }
}

impl<M> SignalBus<M> for InMemorySignalBus<M>
where
    M: Clone + Send + 'static,
{
    type Error = BusError;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        let mut subs = self.subscribers.lock().map_err(|_| BusError::Poisoned)?;

        // Drop any dead subscribers while publishing.
        subs.retain(|(_, tx)| tx.send(message.clone()).is_ok());

        tracing::trace!(subscribers = subs.len(), "signal published");
        Ok(())
    }

    fn subscribe(&self) -> Subscription<M> {
        let (tx, rx) = mpsc::channel();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        // If the lock is poisoned, we still return a subscription;
        // it just won't receive messages.
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push((id, tx));
        }

        let registry = Arc::downgrade(&self.subscribers);
        Subscription::with_release(rx, move || {
            if let Some(registry) = registry.upgrade() {
                if let Ok(mut subs) = registry.lock() {
                    subs.retain(|(sub_id, _)| *sub_id != id);
                }
            }
        })
    }
}
