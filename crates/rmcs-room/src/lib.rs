//! Room engine for Raja-Mantri-Chor-Sipahi.
//!
//! Four players sit in a room, each is secretly dealt one of Raja,
//! Mantri, Chor or Sipahi, and the Mantri has one guess at who the Chor
//! is. This crate holds the rules for that round and nothing else: no
//! sockets, no serialization of requests.
//!
//! # Key types
//!
//! - [`GameRoomEngine`]: create, join, deal, look up
//!   your own role, guess, scoreboard, next round
//! - [`Room`] / [`Player`]: the state machine and its data
//! - [`RoomStore`]: where rooms live ([`MemoryRoomStore`] by default)
//! - [`Dealer`]: where role permutations come from ([`RandomDealer`],
//!   [`FixedDealer`])
//! - [`GameError`]: everything that can be refused

mod config;
mod dealer;
mod engine;
mod error;
mod ids;
mod room;
pub mod scoring;
mod store;

pub use config::EngineConfig;
pub use dealer::{Dealer, FixedDealer, RandomDealer};
pub use engine::{GameRoomEngine, JoinReceipt, MAX_NAME_CHARS};
pub use error::GameError;
pub use room::{GuessOutcome, Player, ROOM_CAPACITY, Room};
pub use store::{MemoryRoomStore, RoomStore};
