//! # rmcs
//!
//! WebSocket game server for Raja-Mantri-Chor-Sipahi.
//!
//! Clients exchange JSON [`Envelope`](rmcs_protocol::Envelope)s with the
//! server; each request runs one operation on the room engine from
//! `rmcs-room` and gets exactly one reply.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rmcs::prelude::*;
//!
//! # async fn demo() -> Result<(), ServerError> {
//! let server = Server::builder().bind("0.0.0.0:1908").build().await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;
mod transport;

pub use error::ServerError;
pub use server::{Server, ServerBuilder, DEFAULT_BIND_ADDR, DEFAULT_IDLE_TIMEOUT};

/// Everything needed to run a server or talk to one.
pub mod prelude {
    pub use crate::{Server, ServerBuilder, ServerError, DEFAULT_BIND_ADDR};
    pub use rmcs_protocol::{
        Codec, Envelope, JsonCodec, PlayerId, Request, Response, Role, RoomId, RoomStatus,
        RoomSummary,
    };
    pub use rmcs_room::{
        Dealer, EngineConfig, FixedDealer, GameError, GameRoomEngine, MemoryRoomStore,
        RandomDealer, RoomStore,
    };
}
