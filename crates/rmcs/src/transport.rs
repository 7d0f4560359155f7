//! WebSocket listener and connections (`tokio-tungstenite`).
//!
//! The TCP accept and the WebSocket upgrade are split: the accept loop
//! only takes sockets off the listener, and each upgrade runs inside the
//! connection's own task so a slow client cannot stall the loop.

use std::fmt;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use crate::ServerError;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies a connection in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Listening socket.
pub(crate) struct Listener {
    listener: TcpListener,
}

impl Listener {
    pub(crate) async fn bind(addr: &str) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr).await.map_err(ServerError::Bind)?;
        Ok(Self { listener })
    }

    pub(crate) fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Waits for the next TCP connection. The upgrade happens in
    /// [`Connection::upgrade`].
    pub(crate) async fn accept(&self) -> Result<(TcpStream, SocketAddr), ServerError> {
        self.listener.accept().await.map_err(ServerError::Accept)
    }
}

/// One upgraded WebSocket connection, owned by a single handler task.
pub(crate) struct Connection {
    id: ConnectionId,
    peer: SocketAddr,
    ws: WebSocketStream<TcpStream>,
}

impl Connection {
    /// Performs the WebSocket handshake on an accepted socket.
    pub(crate) async fn upgrade(stream: TcpStream, peer: SocketAddr) -> Result<Self, ServerError> {
        let ws = tokio_tungstenite::accept_async(stream)
            .await
            .map_err(ServerError::Handshake)?;
        let id = ConnectionId::next();
        tracing::debug!(%id, %peer, "websocket connection accepted");
        Ok(Self { id, peer, ws })
    }

    pub(crate) fn id(&self) -> ConnectionId {
        self.id
    }

    pub(crate) fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Next data frame, text or binary. `Ok(None)` on a clean close.
    pub(crate) async fn recv(&mut self) -> Result<Option<Vec<u8>>, ServerError> {
        loop {
            match self.ws.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Some(text.as_bytes().to_vec())),
                Some(Ok(Message::Binary(data))) => return Ok(Some(data.to_vec())),
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                // Pings are answered by tungstenite itself.
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(ServerError::Receive(e)),
            }
        }
    }

    /// Sends one text frame.
    pub(crate) async fn send_text(&mut self, text: String) -> Result<(), ServerError> {
        self.ws
            .send(Message::text(text))
            .await
            .map_err(ServerError::Send)
    }

    /// Closes the socket, ignoring a peer that is already gone.
    pub(crate) async fn close(mut self) {
        if let Err(e) = self.ws.close(None).await {
            tracing::trace!(id = %self.id, error = %e, "close after peer left");
        }
    }
}
