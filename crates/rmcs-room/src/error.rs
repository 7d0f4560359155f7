//! Error types for the room engine.

use rmcs_protocol::{PlayerId, RoomId};

/// Errors that can occur during room operations.
///
/// Every variant is raised before a room is touched, so an `Err` always
/// means the room is exactly as it was before the call.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// A required field is missing or malformed (e.g. a blank name).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The room does not exist.
    #[error("room {0} not found")]
    RoomNotFound(RoomId),

    /// The player is not part of this room.
    #[error("player {0} not found in room {1}")]
    PlayerNotFound(PlayerId, RoomId),

    /// All four seats are taken.
    #[error("room {0} is full")]
    RoomFull(RoomId),

    /// Wrong room status or player count for this operation.
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    /// The player is not allowed to do this (only the Mantri may guess).
    #[error("player {0} is not the Mantri of this room")]
    Forbidden(PlayerId),

    /// Internal state broke an invariant. This is a bug, not a user error.
    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),
}

impl GameError {
    /// HTTP-style status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) | Self::PreconditionFailed(_) => 400,
            Self::Forbidden(_) => 403,
            Self::RoomNotFound(_) | Self::PlayerNotFound(..) => 404,
            Self::RoomFull(_) => 409,
            Self::InvariantViolation(_) => 500,
        }
    }

    /// Returns `true` for errors that indicate a bug rather than a bad
    /// request.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::InvariantViolation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_by_kind() {
        assert_eq!(GameError::InvalidInput("x".into()).status_code(), 400);
        assert_eq!(GameError::PreconditionFailed("x".into()).status_code(), 400);
        assert_eq!(GameError::Forbidden(PlayerId::from("p")).status_code(), 403);
        assert_eq!(GameError::RoomNotFound(RoomId::from("r")).status_code(), 404);
        assert_eq!(
            GameError::PlayerNotFound(PlayerId::from("p"), RoomId::from("r")).status_code(),
            404
        );
        assert_eq!(GameError::RoomFull(RoomId::from("r")).status_code(), 409);
        assert_eq!(GameError::InvariantViolation("x".into()).status_code(), 500);
    }

    #[test]
    fn test_only_invariant_violation_is_internal() {
        assert!(GameError::InvariantViolation("no Chor".into()).is_internal());
        assert!(!GameError::RoomFull(RoomId::from("r")).is_internal());
    }

    #[test]
    fn test_display_names_the_room() {
        let err = GameError::RoomFull(RoomId::from("QX4T7B"));
        assert_eq!(err.to_string(), "room QX4T7B is full");
    }
}
