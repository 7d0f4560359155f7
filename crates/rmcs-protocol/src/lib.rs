//! Wire protocol for the Raja-Mantri-Chor-Sipahi server.
//!
//! This crate is the vocabulary shared by the server and its clients:
//!
//! - **Types** ([`Envelope`], [`Request`], [`Response`], [`Role`],
//!   [`RoomStatus`], ids): what travels on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those messages are
//!   turned into bytes and back.
//! - **Errors** ([`ProtocolError`]).
//!
//! It knows nothing about rooms or rules; the game engine lives in
//! `rmcs-room`.
//!
//! ```text
//! Socket (bytes) → Protocol (Envelope<Request>) → Engine (room state)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    Envelope, PlayerId, PlayerScore, Request, Response, Role, RoomId, RoomStatus,
    RoomSummary, RoundPoints, RoundResult,
};
