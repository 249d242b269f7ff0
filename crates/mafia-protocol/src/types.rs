//! Game vocabulary shared by the server and its clients.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A stable identifier for a player, supplied by the client on connect.
///
/// Serialized as a plain number (`#[serde(transparent)]`), so
/// `PlayerId(42)` is `42` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A unique identifier for a room (one game session).
///
/// Displayed as the bare number because players read it in notices
/// ("joined room '7'") and chat channel names are derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who a player is: an opaque id plus the nickname other players see.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerIdentity {
    pub id: PlayerId,
    pub nickname: String,
}

impl PlayerIdentity {
    pub fn new(id: u64, nickname: impl Into<String>) -> Self {
        Self {
            id: PlayerId(id),
            nickname: nickname.into(),
        }
    }

    /// Builds an identity whose id is the FNV-1a hash of the nickname.
    ///
    /// Clients without an account system use this so that the same
    /// nickname always maps to the same id.
    pub fn from_nickname(nickname: impl Into<String>) -> Self {
        let nickname = nickname.into();
        Self {
            id: PlayerId(fnv1a_64(nickname.as_bytes())),
            nickname,
        }
    }
}

fn fnv1a_64(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;

    bytes.iter().fold(OFFSET_BASIS, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(PRIME)
    })
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// A player's secret faction.
///
/// `Unknown` doubles as "not assigned yet" and "hidden from this viewer".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    Unknown,
    Civilian,
    Mafia,
    Sheriff,
}

impl Role {
    /// Returns `true` for the roles that act during the night.
    pub fn acts_at_night(self) -> bool {
        matches!(self, Self::Mafia | Self::Sheriff)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "UNKNOWN",
            Self::Civilian => "CIVILIAN",
            Self::Mafia => "MAFIA",
            Self::Sheriff => "SHERIFF",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// The stage of a room's state machine.
///
/// ```text
/// NotStarted → Night → Day → Night → … → Ended
/// ```
///
/// The room leaves `NotStarted` exactly once, when its last seat fills.
/// `Ended` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    #[default]
    NotStarted,
    Night,
    Day,
    Ended,
}

impl Phase {
    /// Returns `true` while the room still accepts new players.
    pub fn is_joinable(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    /// Returns `true` while votes are accepted.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Night | Self::Day)
    }

    /// The phase that follows a resolved vote cycle when nobody has won.
    pub fn after_votes(self) -> Self {
        match self {
            Self::Night => Self::Day,
            Self::Day => Self::Night,
            other => other,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotStarted => "NOT_STARTED",
            Self::Night => "NIGHT",
            Self::Day => "DAY",
            Self::Ended => "ENDED",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// One seat as a particular viewer is allowed to see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub identity: PlayerIdentity,
    /// The true role, or `Unknown` when hidden from this viewer.
    pub role: Role,
    pub alive: bool,
}

/// A room as seen by one viewer. Built fresh for every outbound event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub room_id: RoomId,
    pub phase: Phase,
    /// Seats in seat order.
    pub players: Vec<PlayerView>,
    /// Chat channels the viewer belongs to (see [`crate::chat`]).
    #[serde(default)]
    pub chat_channels: Vec<String>,
}

impl RoomSnapshot {
    /// Looks up a seat by player id.
    pub fn player(&self, id: PlayerId) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.identity.id == id)
    }
}
