//! The record a finished game hands to the stats service.

use serde::{Deserialize, Serialize};

use crate::{PlayerIdentity, Role, RoomId};

/// One finished game.
///
/// Serialized in camelCase because the stats service consumes it as-is:
///
/// ```json
/// { "id": 3, "duration": 81000000000,
///   "players": [{ "identity": {..}, "role": "MAFIA", "isWinner": false }],
///   "comments": [] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub id: RoomId,
    /// Nanoseconds from game start to game end.
    pub duration: u64,
    pub players: Vec<PlayerResult>,
    #[serde(default)]
    pub comments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResult {
    pub identity: PlayerIdentity,
    pub role: Role,
    pub is_winner: bool,
}

impl GameResult {
    /// Players on the winning side.
    pub fn winners(&self) -> impl Iterator<Item = &PlayerResult> {
        self.players.iter().filter(|p| p.is_winner)
    }
}
