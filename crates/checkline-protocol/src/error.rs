//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding peer messages.
///
/// A decode failure on an inbound message is a protocol violation by
/// the remote side; the session layer drops the message and carries on
/// rather than faulting the game.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a message into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (malformed JSON, missing fields, or an
    /// unknown message type).
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
