use crate::InMemorySignalBus;

/// Process-wide session signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSignal {
    /// The server rejected the stored credential (HTTP 401 outside the auth endpoints).
    /// Carries no payload.
    Expired,
}

/// The bus shared by the API client (publisher) and the session controller (observer).
pub type SessionSignals = InMemorySignalBus<SessionSignal>;
