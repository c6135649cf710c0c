//! `clubdesk-console` — terminal front-end for the club API.
//!
//! - [`session`]: the session controller (authentication state, navigation, expiry)
//! - [`render`]: text output for screens and records
//! - [`cli`] / [`commands`]: the `clubdesk` command line and its handlers

pub mod cli;
pub mod commands;
pub mod render;
pub mod session;

pub use commands::{Console, ConsoleError};
pub use session::{RequestTicket, Screen, Session, SessionController, Settled};
