//! Unified error type for the server.

use rmcs_protocol::ProtocolError;
use rmcs_room::GameError;
use tokio_tungstenite::tungstenite;

/// Everything that can end a connection or stop the server.
///
/// Game rule refusals normally never get here: the handler turns a
/// [`GameError`] into an `Error` response and keeps the connection open.
/// The `Game` variant exists for callers driving the engine through the
/// server's types directly.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Could not bind the listening socket.
    #[error("bind failed: {0}")]
    Bind(#[source] std::io::Error),

    /// Accepting a TCP connection failed.
    #[error("accept failed: {0}")]
    Accept(#[source] std::io::Error),

    /// The WebSocket upgrade failed.
    #[error("websocket handshake failed: {0}")]
    Handshake(#[source] tungstenite::Error),

    #[error("send failed: {0}")]
    Send(#[source] tungstenite::Error),

    #[error("receive failed: {0}")]
    Receive(#[source] tungstenite::Error),

    /// Encoding or decoding a message failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Game(#[from] GameError),
}

#[cfg(test)]
mod tests {
    use rmcs_protocol::RoomId;

    use super::*;

    #[test]
    fn test_from_protocol_error() {
        let err: ServerError = ProtocolError::InvalidMessage("empty frame".into()).into();
        assert!(matches!(err, ServerError::Protocol(_)));
        assert!(err.to_string().contains("empty frame"));
    }

    #[test]
    fn test_from_game_error_is_transparent() {
        let err: ServerError = GameError::RoomFull(RoomId::from("QX4T7B")).into();
        assert!(matches!(err, ServerError::Game(_)));
        assert_eq!(err.to_string(), "room QX4T7B is full");
    }

    #[test]
    fn test_bind_error_message() {
        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use");
        assert_eq!(ServerError::Bind(io).to_string(), "bind failed: in use");
    }
}
