//! Codec trait and the JSON implementation.
//!
//! The server and the room never touch raw bytes: the connection handler
//! owns a [`Codec`] and converts every frame through it. Swapping the wire
//! format means adding another `Codec` implementation.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes values into frames and decodes frames back into values.
///
/// `Send + Sync + 'static` because one codec instance is shared by every
/// connection task of the server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into a frame.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if the value cannot be represented.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes a frame into a value.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the frame is malformed or does
    /// not match `T`.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// A [`Codec`] backed by `serde_json`.
///
/// ```rust
/// use mafia_protocol::{Codec, Envelope, JsonCodec, PlayerAction};
///
/// let codec = JsonCodec;
/// let frame = Envelope {
///     seq: 3,
///     timestamp: 120,
///     payload: PlayerAction::Heartbeat { client_time: 120 },
/// };
///
/// let bytes = codec.encode(&frame).unwrap();
/// let decoded: Envelope<PlayerAction> = codec.decode(&bytes).unwrap();
/// assert_eq!(frame, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
