//! Room configuration and the fixed game constants.

use mafia_protocol::Role;
use serde::{Deserialize, Serialize};

/// Seats per room. The game starts the instant the last one fills.
pub const SEATS: usize = 4;

/// The roles dealt at game start, one per seat.
pub const ROLE_SET: [Role; SEATS] = [Role::Civilian, Role::Civilian, Role::Mafia, Role::Sheriff];

/// Tunables for room actors.
///
/// The game rules themselves are not configurable; these only size the
/// channels around a room.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Messages buffered per player before the room starts dropping
    /// pushes to that player.
    pub outbound_capacity: usize,

    /// Commands buffered per room actor before callers wait.
    pub command_capacity: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            outbound_capacity: 64,
            command_capacity: 64,
        }
    }
}
