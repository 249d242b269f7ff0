//! # Mafia
//!
//! A server for four-player games of mafia, played over WebSocket.
//!
//! Players connect, send a `Connect` frame with their identity, and are
//! seated in the first room with a free seat. The fourth seat starts the
//! game. Each room runs as its own task; this crate wires the rooms to the
//! network.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mafia::prelude::*;
//!
//! # async fn start() -> Result<(), MafiaError> {
//! let server = MafiaServerBuilder::new()
//!     .bind("0.0.0.0:5050")
//!     .build(NicknameAuthenticator, LogRecorder)
//!     .await?;
//! server.run().await
//! # }
//! ```

#![allow(async_fn_in_trait)]

pub mod config;
mod error;
mod handler;
pub mod logging;
mod server;
mod stats;

pub use config::ServerConfig;
pub use error::MafiaError;
pub use server::{MafiaServer, MafiaServerBuilder};
pub use stats::HttpRecorder;

pub mod prelude {
    pub use crate::{HttpRecorder, MafiaError, MafiaServer, MafiaServerBuilder, ServerConfig};
    pub use mafia_protocol::{
        Envelope, GameResult, Phase, PlayerAction, PlayerId, PlayerIdentity, Role, RoomId,
        RoomSnapshot, ServerMessage,
    };
    pub use mafia_room::{LogRecorder, MemoryRecorder, RecordError, ResultRecorder, RoomConfig};
    pub use mafia_session::{Authenticator, NicknameAuthenticator, SessionError};
}
