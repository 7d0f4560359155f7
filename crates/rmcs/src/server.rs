//! `Server` builder and accept loop.
//!
//! Ties the layers together: WebSocket transport → protocol codec →
//! room engine.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rmcs_protocol::{Codec, JsonCodec};
use rmcs_room::{Dealer, EngineConfig, GameRoomEngine, MemoryRoomStore, RandomDealer, RoomStore};

use crate::handler::handle_connection;
use crate::transport::{Connection, Listener};
use crate::ServerError;

/// Port 1908 on every interface.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:1908";

/// How long a connection may stay silent before it is closed.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// State shared by every connection task.
pub(crate) struct ServerState<S, D, C> {
    pub(crate) engine: GameRoomEngine<S, D>,
    pub(crate) codec: C,
    pub(crate) idle_timeout: Duration,
    /// Reference point for `server_time` and envelope timestamps.
    pub(crate) started: Instant,
}

impl<S, D, C> ServerState<S, D, C> {
    /// Milliseconds since the server started.
    pub(crate) fn uptime_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Builder for configuring and starting a [`Server`].
///
/// ```rust,no_run
/// # async fn demo() -> Result<(), rmcs::ServerError> {
/// let server = rmcs::Server::builder()
///     .bind("127.0.0.1:1908")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ServerBuilder {
    bind_addr: String,
    engine_config: EngineConfig,
    idle_timeout: Duration,
}

impl ServerBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            engine_config: EngineConfig::default(),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }

    /// Sets the address to listen on. Port 0 picks a free port.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    pub fn engine_config(mut self, config: EngineConfig) -> Self {
        self.engine_config = config;
        self
    }

    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Binds with an in-memory store and a random dealer (seeded from the
    /// engine config if it has a seed).
    pub async fn build(self) -> Result<Server, ServerError> {
        let dealer = RandomDealer::from_config(&self.engine_config);
        self.build_with_dealer(dealer).await
    }

    /// Binds with an in-memory store and the given dealer.
    pub async fn build_with_dealer<D: Dealer>(
        self,
        dealer: D,
    ) -> Result<Server<MemoryRoomStore, D>, ServerError> {
        let engine =
            GameRoomEngine::from_parts(MemoryRoomStore::new(), dealer, self.engine_config.clone());
        self.build_with_engine(engine).await
    }

    /// Binds around a fully assembled engine.
    pub async fn build_with_engine<S: RoomStore, D: Dealer>(
        self,
        engine: GameRoomEngine<S, D>,
    ) -> Result<Server<S, D>, ServerError> {
        let listener = Listener::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            engine,
            codec: JsonCodec,
            idle_timeout: self.idle_timeout,
            started: Instant::now(),
        });

        Ok(Server { listener, state })
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound game server. Call [`run`](Self::run) to start serving.
pub struct Server<S = MemoryRoomStore, D = RandomDealer, C = JsonCodec> {
    listener: Listener,
    state: Arc<ServerState<S, D, C>>,
}

impl Server {
    /// Creates a new builder.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }
}

impl<S, D, C> Server<S, D, C>
where
    S: RoomStore,
    D: Dealer,
    C: Codec,
{
    /// The address actually bound (useful after binding port 0).
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// The engine behind this server.
    pub fn engine(&self) -> &GameRoomEngine<S, D> {
        &self.state.engine
    }

    /// Serves until the process is terminated.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Serves until `shutdown` completes. Connections already open keep
    /// running in their own tasks.
    pub async fn run_until<F: Future>(self, shutdown: F) -> Result<(), ServerError> {
        tracing::info!(addr = ?self.local_addr().ok(), "server running");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let state = Arc::clone(&self.state);
                        tokio::spawn(async move {
                            let conn = match Connection::upgrade(stream, peer).await {
                                Ok(conn) => conn,
                                Err(e) => {
                                    tracing::debug!(%peer, error = %e, "upgrade failed");
                                    return;
                                }
                            };
                            if let Err(e) = handle_connection(conn, state).await {
                                tracing::debug!(%peer, error = %e, "connection ended with error");
                            }
                        });
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "accept failed");
                    }
                },
                _ = &mut shutdown => {
                    tracing::info!("shutdown requested, no longer accepting");
                    return Ok(());
                }
            }
        }
    }
}
