use std::time::{Duration, Instant};

use mafia_protocol::{PlayerId, PlayerIdentity};
use mafia_transport::ConnectionId;

/// The server's record of one connected player.
#[derive(Debug, Clone)]
pub struct Session {
    pub identity: PlayerIdentity,
    /// The connection this session is bound to. Only that connection may
    /// end the session.
    pub connection_id: ConnectionId,
    pub connected_at: Instant,
}

impl Session {
    pub fn new(identity: PlayerIdentity, connection_id: ConnectionId) -> Self {
        Self {
            identity,
            connection_id,
            connected_at: Instant::now(),
        }
    }

    pub fn player_id(&self) -> PlayerId {
        self.identity.id
    }

    /// How long the player has been connected.
    pub fn uptime(&self) -> Duration {
        self.connected_at.elapsed()
    }
}
