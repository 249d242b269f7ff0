//! Transport abstraction layer for the mafia room server.
//!
//! A [`Transport`] accepts [`Connection`]s. A connection is split once into
//! a [`FrameSink`] and a [`FrameStream`] so that pushing to a player and
//! reading from that player run as independent tasks: a slow reader never
//! holds up a write and vice versa.
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket transport via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketReader, WebSocketTransport, WebSocketWriter};

use std::fmt;

/// Identifies one accepted socket. Never reused within a process, so a
/// session can tell a stale connection of a player from its current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Something that hands out player connections.
pub trait Transport: Send + Sync + 'static {
    type Connection: Connection;
    type Error: std::error::Error + Send + Sync;

    /// Waits for the next player connection.
    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;
}

/// A freshly accepted connection, not yet split.
pub trait Connection: Send + 'static {
    /// The error type shared by both halves.
    type Error: std::error::Error + Send + Sync;
    /// The write half.
    type Sink: FrameSink<Error = Self::Error>;
    /// The read half.
    type Stream: FrameStream<Error = Self::Error>;

    fn id(&self) -> ConnectionId;

    /// Splits the connection into independently owned halves.
    fn split(self) -> (Self::Sink, Self::Stream);
}

/// The write half of a connection.
pub trait FrameSink: Send + 'static {
    type Error: std::error::Error + Send + Sync;

    /// Sends one frame to the remote peer.
    async fn send(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Closes the connection from our side.
    async fn close(&mut self) -> Result<(), Self::Error>;
}

/// The read half of a connection.
pub trait FrameStream: Send + 'static {
    type Error: std::error::Error + Send + Sync;

    /// Receives the next frame from the remote peer.
    ///
    /// `Ok(None)` means the peer closed the connection.
    async fn recv(&mut self) -> Result<Option<Vec<u8>>, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_keeps_raw_value() {
        assert_eq!(ConnectionId::new(42).into_inner(), 42);
    }

    #[test]
    fn test_connection_id_display_is_prefixed() {
        assert_eq!(ConnectionId::new(7).to_string(), "conn-7");
        assert_ne!(ConnectionId::new(7), ConnectionId::new(8));
    }
}
