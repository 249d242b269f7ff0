use mafia_protocol::{PlayerId, PlayerIdentity, Role, ServerMessage};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Channel sender for delivering messages to one player's writer task.
///
/// Bounded: the room pushes with `try_send` and never waits on a player.
pub type PlayerSender = mpsc::Sender<ServerMessage>;

/// One occupied seat: the room's private truth about a player.
#[derive(Debug)]
pub struct Seat {
    pub identity: PlayerIdentity,
    pub role: Role,
    pub alive: bool,
    /// Who this seat votes for in the current cycle.
    pub vote: Option<PlayerId>,
    /// Investigated by the sheriff at night. Visible to sheriffs only.
    pub revealed_by_investigation: bool,
    /// Exposed by the sheriff during the day. Visible to everyone.
    pub revealed_by_exposure: bool,
    outbound: PlayerSender,
}

impl Seat {
    pub fn new(identity: PlayerIdentity, outbound: PlayerSender) -> Self {
        Self {
            identity,
            role: Role::Unknown,
            alive: true,
            vote: None,
            revealed_by_investigation: false,
            revealed_by_exposure: false,
            outbound,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.identity.id
    }

    /// Pushes a message without waiting.
    ///
    /// A full buffer drops the message; a closed channel means the
    /// player's writer is gone and its leave is already on the way.
    pub fn push(&self, msg: ServerMessage) {
        match self.outbound.try_send(msg) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::warn!(player_id = %self.id(), "outbound buffer full, message dropped");
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(player_id = %self.id(), "outbound channel closed");
            }
        }
    }
}
