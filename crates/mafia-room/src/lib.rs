//! Rooms for the mafia server.
//!
//! A room is one game for four players. This crate holds the game itself
//! and the machinery that runs many of them side by side:
//!
//! - [`GameRoom`]: the state machine (membership, phases, votes, win check)
//! - [`visibility`]: what each player may see of the others' roles
//! - [`tally`] and [`tie_break`]: vote counting and fair tie breaking
//! - [`RoomHandle`]: one Tokio task per room, reached by message passing
//! - [`RoomDirectory`]: routes connecting players to rooms with free seats
//! - [`ResultRecorder`]: where finished games are delivered
//!
//! ```text
//! handler ──(directory lock)──→ RoomDirectory ──→ RoomHandle ──→ [room task]
//! handler ──────────────(vote / show)──────────→ RoomHandle ──→ [room task]
//!                                                                   │
//!                                  player outbound channels ←───────┘
//! ```

#![allow(async_fn_in_trait)]

mod config;
mod directory;
mod error;
mod game;
mod recorder;
mod roles;
mod room;
mod seat;
pub mod tally;
pub mod tie_break;
pub mod visibility;

pub use config::{ROLE_SET, RoomConfig, SEATS};
pub use directory::RoomDirectory;
pub use error::{RecordError, RoomError};
pub use game::{GameRoom, Winner};
pub use recorder::{LogRecorder, MemoryRecorder, ResultRecorder};
pub use roles::assign_roles;
pub use room::{RoomHandle, RoomInfo};
pub use seat::{PlayerSender, Seat};
