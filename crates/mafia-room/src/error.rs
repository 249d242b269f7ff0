//! Error types for the room layer.
//!
//! Invalid game actions are not errors: the room answers them with an
//! "Incorrect command" notice. These types cover routing failures and
//! result delivery.

use mafia_protocol::{PlayerId, RoomId};

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// The player is not seated in this room.
    #[error("player {0} not in room {1}")]
    NotInRoom(PlayerId, RoomId),

    /// The player is not seated in any room.
    #[error("player {0} is not in any room")]
    NoRoom(PlayerId),

    /// The room's command channel is closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}

/// Errors from delivering a finished game to a [`ResultRecorder`](crate::ResultRecorder).
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// The stats service could not be reached.
    #[error("stats service unreachable: {0}")]
    Unreachable(String),

    /// The stats service answered with an error status.
    #[error("stats service rejected the result with status {0}")]
    Rejected(u16),

    /// The result could not be serialized.
    #[error("failed to encode result: {0}")]
    Encode(String),
}
