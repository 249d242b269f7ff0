//! Unified error type for the mafia server.

use mafia_protocol::ProtocolError;
use mafia_room::RoomError;
use mafia_session::SessionError;
use mafia_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant generates the `From` impls, so
/// the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum MafiaError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, unexpected message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (bad nickname, duplicate connection).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A room-level error (unknown room, actor gone).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// Invalid configuration or logging setup.
    #[error("configuration error: {0}")]
    Config(String),
}
