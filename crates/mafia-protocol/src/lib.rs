//! Wire protocol for the mafia room server.
//!
//! This crate defines everything that crosses the network boundary:
//!
//! - **Types** ([`PlayerIdentity`], [`Role`], [`Phase`], [`RoomSnapshot`]):
//!   the game vocabulary shared by server and clients.
//! - **Messages** ([`PlayerAction`], [`ServerMessage`], [`Envelope`]):
//!   what each side sends.
//! - **Results** ([`GameResult`]): the record handed to the stats service
//!   when a game ends.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): bytes in, messages out.
//!
//! It also carries two small pieces of shared client/server knowledge:
//! chat channel naming ([`chat`]) and legal action derivation ([`options`]).
//!
//! ```text
//! Transport (bytes) → Protocol (Envelope<T>) → Session / Room
//! ```

pub mod chat;
mod codec;
mod error;
mod messages;
pub mod options;
mod result;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use messages::{Envelope, PlayerAction, ServerMessage};
pub use result::{GameResult, PlayerResult};
pub use types::{
    Phase, PlayerId, PlayerIdentity, PlayerView, Role, RoomId, RoomSnapshot,
};
