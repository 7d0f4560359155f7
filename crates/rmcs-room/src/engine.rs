//! The game engine: the operations callers run against rooms.

use rmcs_protocol::{PlayerId, Role, RoomId, RoomSummary};

use crate::ids::{new_player_id, new_room_id};
use crate::{
    Dealer, EngineConfig, GameError, GuessOutcome, MemoryRoomStore, Player, RandomDealer, Room,
    RoomStore,
};

/// Longest accepted player name, in characters.
pub const MAX_NAME_CHARS: usize = 32;

/// Fresh room codes tried before giving up on a create.
const MAX_CODE_ATTEMPTS: usize = 16;

/// Returned by a successful create or join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinReceipt {
    pub room_id: RoomId,
    /// The new player's id. Only ever given to that player.
    pub player_id: PlayerId,
    /// Everyone's names, in join order.
    pub players: Vec<String>,
}

/// Runs the Raja-Mantri-Chor-Sipahi rules over a set of rooms.
///
/// The engine is shared (`&self` everywhere). Each operation is one
/// [`RoomStore::update`], so it happens entirely or not at all, and two
/// operations on the same room never interleave.
pub struct GameRoomEngine<S = MemoryRoomStore, D = RandomDealer> {
    store: S,
    dealer: D,
    config: EngineConfig,
}

impl GameRoomEngine {
    /// An in-memory engine with an OS-seeded dealer.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// An in-memory engine; the dealer is seeded from `config.seed` if set.
    pub fn with_config(config: EngineConfig) -> Self {
        let dealer = RandomDealer::from_config(&config);
        Self::from_parts(MemoryRoomStore::new(), dealer, config)
    }
}

impl Default for GameRoomEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RoomStore, D: Dealer> GameRoomEngine<S, D> {
    /// Builds an engine from an explicit store and dealer.
    /// Out-of-range config values are clamped, see
    /// [`EngineConfig::validated`].
    pub fn from_parts(store: S, dealer: D, config: EngineConfig) -> Self {
        Self {
            store,
            dealer,
            config: config.validated(),
        }
    }

    /// The backing store. Rooms in it carry every player's role, so it
    /// stays inside the crate.
    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    /// Number of open rooms.
    ///
    /// This is all callers get of the store; roles only leave through
    /// [`my_role`](Self::my_role).
    ///
    /// ```compile_fail
    /// let engine = rmcs_room::GameRoomEngine::new();
    /// let _ = engine.store();
    /// ```
    pub fn room_count(&self) -> usize {
        self.store.len()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Opens a new room with `player_name` in the first seat.
    ///
    /// # Errors
    /// - [`GameError::InvalidInput`] for a blank or overlong name
    pub fn create_room(&self, player_name: &str) -> Result<JoinReceipt, GameError> {
        let name = clean_name(player_name)?;
        let founder = Player::new(new_player_id(), name);
        let player_id = founder.id().clone();
        let players = vec![founder.name().to_string()];

        for _ in 0..MAX_CODE_ATTEMPTS {
            let room = Room::new(new_room_id(self.config.room_code_len), founder.clone());
            let room_id = room.id().clone();
            match self.store.insert(room) {
                Ok(()) => {
                    tracing::info!(%room_id, %player_id, "room created");
                    return Ok(JoinReceipt {
                        room_id,
                        player_id,
                        players,
                    });
                }
                Err(_) => {
                    tracing::debug!(%room_id, "room code collision, retrying");
                }
            }
        }

        Err(GameError::InvariantViolation(format!(
            "no free room code after {MAX_CODE_ATTEMPTS} attempts"
        )))
    }

    /// Seats `player_name` in an existing room.
    ///
    /// # Errors
    /// - [`GameError::InvalidInput`] for a blank or overlong name
    /// - [`GameError::RoomNotFound`]
    /// - [`GameError::RoomFull`] if all four seats are taken (which is
    ///   always the case once a round is underway)
    pub fn join_room(&self, room_id: &RoomId, player_name: &str) -> Result<JoinReceipt, GameError> {
        let name = clean_name(player_name)?;
        let player = Player::new(new_player_id(), name);
        let player_id = player.id().clone();

        let players = self.store.update(room_id, |room| {
            room.add_player(player)?;
            Ok(room.player_names())
        })?;

        tracing::info!(
            %room_id,
            %player_id,
            players = players.len(),
            "player joined"
        );
        Ok(JoinReceipt {
            room_id: room_id.clone(),
            player_id,
            players,
        })
    }

    /// Deals one role to each of the four players.
    ///
    /// Returns nothing about who got what; players ask with
    /// [`my_role`](Self::my_role).
    ///
    /// # Errors
    /// - [`GameError::RoomNotFound`]
    /// - [`GameError::PreconditionFailed`] unless the room has 4 players
    ///   and is waiting
    pub fn assign_roles(&self, room_id: &RoomId) -> Result<(), GameError> {
        let round = self.store.update(room_id, |room| {
            room.assign_roles(self.dealer.deal())?;
            Ok(room.round())
        })?;
        tracing::info!(%room_id, round, "roles dealt");
        Ok(())
    }

    /// One player's own role, or `None` if roles are not dealt yet.
    ///
    /// # Errors
    /// - [`GameError::RoomNotFound`]
    /// - [`GameError::PlayerNotFound`] if the player is not in this room
    pub fn my_role(&self, room_id: &RoomId, player_id: &PlayerId) -> Result<Option<Role>, GameError> {
        self.store.view(room_id, |room| room.role_of(player_id))
    }

    /// The Mantri names a suspect; the round is scored for everyone.
    ///
    /// # Errors
    /// - [`GameError::RoomNotFound`]
    /// - [`GameError::PreconditionFailed`] unless roles are dealt and no
    ///   guess is in yet
    /// - [`GameError::Forbidden`] if `mantri_id` is not this round's Mantri
    /// - [`GameError::InvariantViolation`] if the room has no Chor
    pub fn submit_guess(
        &self,
        room_id: &RoomId,
        mantri_id: &PlayerId,
        guess_id: &PlayerId,
    ) -> Result<GuessOutcome, GameError> {
        let outcome = self
            .store
            .update(room_id, |room| room.resolve_guess(mantri_id, guess_id))?;
        tracing::info!(
            %room_id,
            correct = outcome.correct,
            "guess resolved"
        );
        Ok(outcome)
    }

    /// Public scoreboard for a room.
    pub fn room_summary(&self, room_id: &RoomId) -> Result<RoomSummary, GameError> {
        self.store.view(room_id, |room| Ok(room.summary()))
    }

    /// Starts the next round in a scored room. Returns the round number.
    ///
    /// # Errors
    /// - [`GameError::RoomNotFound`]
    /// - [`GameError::PreconditionFailed`] unless the current round has
    ///   been guessed
    pub fn next_round(&self, room_id: &RoomId) -> Result<u32, GameError> {
        let round = self.store.update(room_id, Room::start_next_round)?;
        tracing::info!(%room_id, round, "new round");
        Ok(round)
    }
}

/// Trims a player name and checks it is usable.
fn clean_name(raw: &str) -> Result<String, GameError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(GameError::InvalidInput("player name is required".into()));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(GameError::InvalidInput(format!(
            "player name is longer than {MAX_NAME_CHARS} characters"
        )));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MIN_ROOM_CODE_LEN;

    #[test]
    fn test_clean_name_trims() {
        assert_eq!(clean_name("  Asha \n").unwrap(), "Asha");
    }

    #[test]
    fn test_clean_name_rejects_blank() {
        assert!(matches!(clean_name(""), Err(GameError::InvalidInput(_))));
        assert!(matches!(clean_name("   "), Err(GameError::InvalidInput(_))));
    }

    #[test]
    fn test_clean_name_counts_characters_not_bytes() {
        let name = "ज".repeat(MAX_NAME_CHARS);
        assert!(clean_name(&name).is_ok());
        assert!(clean_name(&format!("{name}x")).is_err());
    }

    #[test]
    fn test_short_code_length_is_clamped() {
        let engine = GameRoomEngine::with_config(EngineConfig {
            room_code_len: 0,
            seed: None,
        });
        assert_eq!(engine.config().room_code_len, MIN_ROOM_CODE_LEN);

        let engine = GameRoomEngine::with_config(EngineConfig {
            room_code_len: 1,
            seed: None,
        });
        let mut seen = std::collections::HashSet::new();
        for i in 0..40 {
            let receipt = engine.create_room(&format!("P{i}")).unwrap();
            assert_eq!(receipt.room_id.as_str().len(), MIN_ROOM_CODE_LEN);
            assert!(seen.insert(receipt.room_id));
        }
        assert_eq!(engine.store().len(), 40);
    }

    #[test]
    fn test_create_room_uses_configured_code_length() {
        let engine = GameRoomEngine::with_config(EngineConfig {
            room_code_len: 8,
            seed: None,
        });
        let receipt = engine.create_room("Asha").unwrap();
        assert_eq!(receipt.room_id.as_str().len(), 8);
    }

    /// A store whose every code is taken.
    struct FullStore;

    impl RoomStore for FullStore {
        fn insert(&self, room: Room) -> Result<(), Room> {
            Err(room)
        }
        fn get(&self, _: &RoomId) -> Option<Room> {
            None
        }
        fn update<T, F>(&self, room_id: &RoomId, _: F) -> Result<T, GameError>
        where
            F: FnOnce(&mut Room) -> Result<T, GameError>,
        {
            Err(GameError::RoomNotFound(room_id.clone()))
        }
        fn remove(&self, _: &RoomId) -> Option<Room> {
            None
        }
        fn len(&self) -> usize {
            0
        }
    }

    #[test]
    fn test_create_room_gives_up_when_codes_keep_colliding() {
        let engine = GameRoomEngine::from_parts(
            FullStore,
            RandomDealer::seeded(1),
            EngineConfig::default(),
        );
        let result = engine.create_room("Asha");
        assert!(matches!(result, Err(GameError::InvariantViolation(_))));
    }
}
