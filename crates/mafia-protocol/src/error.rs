//! Error types for the protocol layer.
//!
//! A `ProtocolError` always means the bytes or the message shape were
//! wrong, never that the network or the game failed.

/// Errors that can occur while encoding, decoding, or validating messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust value into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, a missing field, or an
    /// unknown `type` tag.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message decoded fine but is not acceptable at this point of the
    /// conversation, e.g. a `Vote` sent before `Connect`.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
