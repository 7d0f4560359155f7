//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Shortest room code the engine will generate. Six characters from a
/// 32-symbol alphabet leave about a billion codes, which keeps them unique
/// and hard to guess.
pub(crate) const MIN_ROOM_CODE_LEN: usize = 6;

/// Settings for a [`GameRoomEngine`](crate::GameRoomEngine).
///
/// Missing fields take their defaults when deserialized, so a config file
/// only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Length of generated room codes. Raised to 6 if shorter.
    pub room_code_len: usize,

    /// Seed for the role dealer. `None` seeds from the OS; a fixed seed
    /// makes every deal in the process reproducible.
    pub seed: Option<u64>,
}

impl EngineConfig {
    /// Clamps out-of-range values so the config is safe to use.
    ///
    /// Called by [`GameRoomEngine::from_parts`](crate::GameRoomEngine::from_parts).
    pub fn validated(mut self) -> Self {
        if self.room_code_len < MIN_ROOM_CODE_LEN {
            tracing::warn!(
                len = self.room_code_len,
                min = MIN_ROOM_CODE_LEN,
                "room_code_len below minimum, clamping"
            );
            self.room_code_len = MIN_ROOM_CODE_LEN;
        }
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            room_code_len: MIN_ROOM_CODE_LEN,
            seed: None,
        }
    }
}
