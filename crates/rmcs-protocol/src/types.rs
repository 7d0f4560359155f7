//! Core protocol types for the game server's wire format.
//!
//! Everything in this module is something that gets serialized, sent over
//! the socket, and deserialized on the other side: identifiers, the role
//! and status vocabulary, and the request/response messages.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player.
///
/// Player ids are opaque random tokens. They double as the player's
/// credential: whoever presents the id can read that player's role, so the
/// server never hands one player's id to another player.
///
/// `#[serde(transparent)]` keeps the JSON form a plain string rather than
/// `{ "0": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Returns the raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A unique identifier for a room (one game session of four players).
///
/// Room ids are short codes meant to be read aloud and typed in by the
/// other three players.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    /// Returns the raw room code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// The four secret roles dealt each round. Exactly one of each per room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The king. Always scores.
    Raja,
    /// The minister. The only role allowed to guess.
    Mantri,
    /// The thief. Scores only if the Mantri guesses wrong.
    Chor,
    /// The soldier.
    Sipahi,
}

impl Role {
    /// The full deck, in canonical order.
    pub const ALL: [Role; 4] = [Role::Raja, Role::Mantri, Role::Chor, Role::Sipahi];

    /// Face value of the role.
    pub fn points(self) -> i64 {
        match self {
            Self::Raja => 1000,
            Self::Mantri => 800,
            Self::Sipahi => 500,
            Self::Chor => 0,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raja => write!(f, "Raja"),
            Self::Mantri => write!(f, "Mantri"),
            Self::Chor => write!(f, "Chor"),
            Self::Sipahi => write!(f, "Sipahi"),
        }
    }
}

// ---------------------------------------------------------------------------
// RoomStatus
// ---------------------------------------------------------------------------

/// The round state of a room.
///
/// ```text
/// Waiting ──(assign roles)──→ Assigned ──(Mantri guesses)──→ Guessed
///    ↑                                                          │
///    └──────────────────────(next round)────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    /// Gathering players, or between rounds. Roles are not dealt.
    Waiting,
    /// Roles are dealt; waiting on the Mantri's guess.
    Assigned,
    /// The guess is in and the round is scored.
    Guessed,
}

impl RoomStatus {
    /// Returns the status that follows this one in the round cycle.
    pub fn next(self) -> Self {
        match self {
            Self::Waiting => Self::Assigned,
            Self::Assigned => Self::Guessed,
            Self::Guessed => Self::Waiting,
        }
    }

    /// Returns `true` if moving to `target` is a legal single step.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == target
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "WAITING"),
            Self::Assigned => write!(f, "ASSIGNED"),
            Self::Guessed => write!(f, "GUESSED"),
        }
    }
}

// ---------------------------------------------------------------------------
// Scoreboard types
// ---------------------------------------------------------------------------

/// One player's points for a single round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundPoints {
    pub player_id: PlayerId,
    pub delta: i64,
}

/// The scored outcome of a round, kept on the room until the next guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    /// Points awarded this round, in join order.
    pub points: Vec<RoundPoints>,
    /// Human-readable outcome, e.g. "Mantri caught the Chor".
    pub label: String,
}

impl RoundResult {
    /// Looks up the delta awarded to one player.
    pub fn delta_for(&self, player_id: &PlayerId) -> Option<i64> {
        self.points
            .iter()
            .find(|p| &p.player_id == player_id)
            .map(|p| p.delta)
    }
}

/// A player's public standing. Never carries the role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerScore {
    pub player_id: PlayerId,
    pub name: String,
    pub score: i64,
}

/// Public view of a room: who is in it and how they are doing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub room_id: RoomId,
    pub status: RoomStatus,
    /// 1-based round counter.
    pub round: u32,
    /// Players in join order.
    pub players: Vec<PlayerScore>,
    pub last_round: Option<RoundResult>,
}

// ---------------------------------------------------------------------------
// Requests and responses
// ---------------------------------------------------------------------------

/// Client → Server operations.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON:
///   `{ "type": "JoinRoom", "room_id": "QX4T7B", "player_name": "Asha" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    /// Open a new room with the sender as its first player.
    CreateRoom { player_name: String },

    /// Take one of the remaining seats in an existing room.
    JoinRoom { room_id: RoomId, player_name: String },

    /// Deal the four roles. Needs a full room.
    AssignRoles { room_id: RoomId },

    /// Reveal the caller's own role, and only theirs.
    MyRole { room_id: RoomId, player_id: PlayerId },

    /// The Mantri names the player they think is the Chor.
    SubmitGuess {
        room_id: RoomId,
        mantri_id: PlayerId,
        guess_id: PlayerId,
    },

    /// Public scoreboard for a room.
    RoomSummary { room_id: RoomId },

    /// Start another round in a scored room, keeping cumulative scores.
    NextRound { room_id: RoomId },

    /// Keep-alive.
    Heartbeat { client_time: u64 },
}

/// Server → Client replies. Each request gets exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Response {
    /// Reply to `CreateRoom` and `JoinRoom`. `players` are names in join
    /// order.
    RoomJoined {
        room_id: RoomId,
        player_id: PlayerId,
        players: Vec<String>,
    },

    /// Roles are dealt. Deliberately carries no role content.
    RolesAssigned { room_id: RoomId },

    /// The caller's role, or `null` while roles are not yet dealt.
    MyRole { role: Option<Role> },

    /// Outcome of the Mantri's guess.
    GuessResult { correct: bool, guessed_id: PlayerId },

    RoomSummary { summary: RoomSummary },

    RoundStarted { room_id: RoomId, round: u32 },

    HeartbeatAck { client_time: u64, server_time: u64 },

    /// Something went wrong. `code` follows HTTP conventions
    /// (400 bad request, 403 forbidden, 404 not found, 409 conflict,
    /// 500 internal).
    Error { code: u16, message: String },
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// The frame wrapping every message on the wire.
///
/// Responses echo the `seq` of the request they answer, so a client can
/// pipeline requests and still match replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub seq: u64,

    /// Milliseconds since the sender started.
    #[serde(default)]
    pub timestamp: u64,

    pub payload: T,
}

impl<T> Envelope<T> {
    /// Wraps a payload with the given sequence number and timestamp.
    pub fn new(seq: u64, timestamp: u64, payload: T) -> Self {
        Self {
            seq,
            timestamp,
            payload,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
