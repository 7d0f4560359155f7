//! Codec trait and the JSON implementation.
//!
//! The server never touches `serde_json` directly; it goes through a
//! [`Codec`] so the wire format can change without touching the handler.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Encodes messages to bytes and decodes them back.
///
/// `Send + Sync + 'static` because one codec instance is shared by every
/// connection task.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if the value cannot be represented.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` for malformed or mis-shaped input and
    /// `ProtocolError::InvalidMessage` for an empty frame.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] backed by `serde_json`.
///
/// ```rust
/// use rmcs_protocol::{Codec, Envelope, JsonCodec, Request};
///
/// let codec = JsonCodec;
/// let env = Envelope::new(1, 0, Request::Heartbeat { client_time: 5000 });
///
/// let bytes = codec.encode(&env).unwrap();
/// let decoded: Envelope<Request> = codec.decode(&bytes).unwrap();
/// assert_eq!(env, decoded);
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
        if data.iter().all(u8::is_ascii_whitespace) {
            return Err(ProtocolError::InvalidMessage("empty frame".into()));
        }
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{Envelope, Request, Response};

    #[test]
    fn test_json_codec_empty_frame_is_invalid_message() {
        let result: Result<Envelope<Request>, _> = JsonCodec.decode(b"  \n");
        assert!(matches!(result, Err(ProtocolError::InvalidMessage(_))));
    }

    #[test]
    fn test_json_codec_garbage_is_decode_error() {
        let result: Result<Envelope<Request>, _> = JsonCodec.decode(b"not json at all");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_json_codec_encodes_response_envelope() {
        let env = Envelope::new(
            3,
            120,
            Response::RoundStarted {
                room_id: "ABC234".into(),
                round: 2,
            },
        );
        let bytes = JsonCodec.encode(&env).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["seq"], 3);
        assert_eq!(json["payload"]["type"], "RoundStarted");
        assert_eq!(json["payload"]["round"], 2);
    }
}
