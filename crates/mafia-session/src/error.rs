//! Error types for the session layer.

use mafia_protocol::PlayerId;

/// Errors that can occur during session management.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The claimed identity was rejected by the
    /// [`Authenticator`](crate::Authenticator).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// No live session exists for the given player over that connection.
    #[error("session not found for player {0}")]
    NotFound(PlayerId),

    /// The player already has a live connection.
    /// A player can only be connected once at a time.
    #[error("player {0} already has an active session")]
    AlreadyConnected(PlayerId),
}
