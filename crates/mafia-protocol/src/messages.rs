//! Messages exchanged between a player's client and the server.
//!
//! Both directions use internally tagged JSON (`#[serde(tag = "type")]`),
//! so a vote looks like `{ "type": "Vote", "target": 3 }`.

use serde::{Deserialize, Serialize};

use crate::{PlayerId, PlayerIdentity, RoomId, RoomSnapshot};

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Every frame on the wire is an envelope around one message.
///
/// `seq` is a per-sender counter; `timestamp` is milliseconds since the
/// sender's connection started. Neither is interpreted by the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub seq: u64,
    pub timestamp: u64,
    pub payload: T,
}

// ---------------------------------------------------------------------------
// Client → Server
// ---------------------------------------------------------------------------

/// What a player can send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerAction {
    /// First frame of every connection: who the player is.
    Connect { identity: PlayerIdentity },

    /// Vote for a player. At night this is a kill (mafia) or an
    /// investigation (sheriff); during the day it is a lynch vote.
    Vote { target: PlayerId },

    /// Sheriff only, during the day: publicly expose a player's role.
    Show { target: PlayerId },

    /// Keep-alive. Answered with [`ServerMessage::HeartbeatAck`].
    Heartbeat { client_time: u64 },

    /// Polite goodbye. Closing the stream has the same effect.
    Disconnect { reason: String },
}

// ---------------------------------------------------------------------------
// Server → Client
// ---------------------------------------------------------------------------

/// What the server pushes to a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// A text notice with no room state attached: "Incorrect command",
    /// night results, the sheriff's private investigation result.
    PlainNotice { text: String },

    /// A room event carrying the room as the receiving player may see it.
    RoomEvent {
        text: Option<String>,
        room: RoomSnapshot,
    },

    /// Sent once the player has been seated.
    Welcome {
        player_id: PlayerId,
        room_id: RoomId,
    },

    /// Reply to [`PlayerAction::Heartbeat`].
    HeartbeatAck { client_time: u64, server_time: u64 },

    /// Protocol-level failure. `code` follows HTTP conventions
    /// (400 bad request, 401 rejected identity, 409 already connected).
    Error { code: u16, message: String },
}

impl ServerMessage {
    pub fn notice(text: impl Into<String>) -> Self {
        Self::PlainNotice { text: text.into() }
    }

    pub fn error(code: u16, message: impl Into<String>) -> Self {
        Self::Error {
            code,
            message: message.into(),
        }
    }
}
