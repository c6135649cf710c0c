//! Signal publishing/subscription abstraction (mechanics only).
//!
//! A bus fans each published message out to every live subscription (broadcast
//! semantics). Delivery is in-process and best-effort; observers must be idempotent,
//! since the same condition may be signalled more than once.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError};

/// A registered observer on a signal bus.
///
/// The registration lasts exactly as long as this value: dropping the subscription
/// deregisters it from the bus, so an observer owned by a longer-lived object is torn
/// down together with that object.
///
/// ## Usage Pattern
///
/// ```ignore
/// let subscription = bus.subscribe();
///
/// // on every event-loop turn
/// for signal in subscription.drain() {
///     handle(signal);
/// }
/// ```
///
/// Subscriptions are designed for single-threaded consumption.
pub struct Subscription<M> {
    receiver: Receiver<M>,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self {
            receiver,
            release: None,
        }
    }

    /// Subscription that runs `release` when dropped (deregistration hook).
    pub fn with_release(receiver: Receiver<M>, release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            receiver,
            release: Some(Box::new(release)),
        }
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Take every message published since the last call, in publish order.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

impl<M> Drop for Subscription<M> {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl<M> core::fmt::Debug for Subscription<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subscription")
            .field("deregisters_on_drop", &self.release.is_some())
            .finish()
    }
}

/// Domain-agnostic signal bus (pub/sub abstraction).
///
/// ```text
/// API client (publish) → Signal bus → Session controller (subscription)
/// ```
///
/// The trait requires `Send + Sync`: the publisher may live on any task.
pub trait SignalBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> SignalBus<M> for Arc<B>
where
    B: SignalBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
