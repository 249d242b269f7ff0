//! Player sessions for the mafia room server.
//!
//! This crate handles the connection-time side of a player:
//!
//! 1. **Identity validation**: is the claimed identity acceptable?
//!    ([`Authenticator`], [`NicknameAuthenticator`])
//! 2. **Session tracking**: who is connected right now, and over which
//!    connection ([`SessionManager`])
//!
//! A dropped player is gone for good: there is no reconnect grace period,
//! so a session lives exactly as long as its connection.
//!
//! ```text
//! Room Layer (above)     ← seats players that hold a live session
//!     ↕
//! Session Layer (this crate)
//!     ↕
//! Protocol / Transport (below)  ← PlayerIdentity, ConnectionId
//! ```

#![allow(async_fn_in_trait)]

mod auth;
mod error;
mod manager;
mod session;

pub use auth::{Authenticator, NicknameAuthenticator};
pub use error::SessionError;
pub use manager::SessionManager;
pub use session::Session;
