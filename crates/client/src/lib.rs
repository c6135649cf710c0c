//! `clubdesk-client`
//!
//! **Responsibility:** authenticated access to the club REST API.
//!
//! This crate provides:
//! - the credential store holding the single bearer token
//! - client configuration (environment + builder)
//! - the API client, which attaches the token to every request and turns a 401 outside
//!   the auth endpoints into a cleared credential plus a [`SessionSignal::Expired`]
//!
//! The client is a **thin shell** around the REST API: the server stays the authority
//! on every decision.
//!
//! [`SessionSignal::Expired`]: clubdesk_events::SessionSignal::Expired

pub mod client;
pub mod config;
pub mod credentials;
pub mod endpoints;
pub mod error;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use credentials::{CredentialError, CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use endpoints::auth::AuthResponse;
pub use error::{ApiError, ApiResult};
