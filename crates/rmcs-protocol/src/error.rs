//! Error types for the protocol layer.
//!
//! Protocol errors are about bytes and shapes, never about game rules:
//! a `ProtocolError` means a frame could not be turned into a message
//! (or back), not that the request itself was refused.

/// Errors that can occur while encoding or decoding messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// The frame is not valid JSON, or not a known message shape.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The frame decoded but breaks a protocol rule (e.g. an empty frame).
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
