//! `clubdesk-events` — process-wide signals (publish/subscribe mechanics).
//!
//! The only signal today is [`SessionSignal::Expired`]: the API client publishes it when
//! the server rejects a credential, and the session controller observes it.

pub mod bus;
pub mod in_memory_bus;
pub mod signal;

pub use bus::{SignalBus, Subscription};
pub use in_memory_bus::{BusError, InMemorySignalBus};
pub use signal::{SessionSignal, SessionSignals};
