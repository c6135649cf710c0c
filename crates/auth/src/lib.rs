//! `clubdesk-auth` — client-side authorization boundary.
//!
//! Everything here is advisory: claims are read without signature verification and
//! only drive what the front-end renders. The API re-checks every request.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod claims;
pub mod gate;
pub mod roles;

pub use claims::{Claims, read_claims};
pub use gate::{GateDecision, View, gate, required_role};
pub use roles::Role;
