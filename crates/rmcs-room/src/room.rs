//! The room entity and its round state machine.
//!
//! A [`Room`] is plain data plus the transitions that are legal on it.
//! Every mutating method checks all of its preconditions first and only
//! then writes, so a returned `Err` never leaves a half-updated room
//! behind. Locking is not this module's job; see [`RoomStore`](crate::RoomStore).

use std::collections::HashMap;

use rmcs_protocol::{
    PlayerId, PlayerScore, Role, RoomId, RoomStatus, RoomSummary, RoundPoints, RoundResult,
};

use crate::scoring::{outcome_label, round_points};
use crate::GameError;

/// Seats per room: one per role.
pub const ROOM_CAPACITY: usize = Role::ALL.len();

/// A seated player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    id: PlayerId,
    name: String,
    /// The only place a role is stored.
    role: Option<Role>,
    score: i64,
}

impl Player {
    /// Creates a player with no role and a zero score.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            role: None,
            score: 0,
        }
    }

    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Cumulative score across every round played in this room.
    pub fn score(&self) -> i64 {
        self.score
    }
}

/// What the Mantri's guess came to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessOutcome {
    pub correct: bool,
    pub guessed_id: PlayerId,
}

/// One game session: up to four players and the current round.
#[derive(Debug, Clone)]
pub struct Room {
    id: RoomId,
    status: RoomStatus,
    round: u32,
    /// Join order. Never reordered, never shrinks.
    players: Vec<Player>,
    mantri_guess: Option<PlayerId>,
    last_round: Option<RoundResult>,
}

impl Room {
    /// Opens a room with its founding player, waiting for the rest.
    pub fn new(id: RoomId, founder: Player) -> Self {
        Self {
            id,
            status: RoomStatus::Waiting,
            round: 1,
            players: vec![founder],
            mantri_guess: None,
            last_round: None,
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn status(&self) -> RoomStatus {
        self.status
    }

    /// 1-based round counter.
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Players in join order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, player_id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == player_id)
    }

    /// Names in join order.
    pub fn player_names(&self) -> Vec<String> {
        self.players.iter().map(|p| p.name.clone()).collect()
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= ROOM_CAPACITY
    }

    /// Who the Mantri accused this round, once they have.
    pub fn mantri_guess(&self) -> Option<&PlayerId> {
        self.mantri_guess.as_ref()
    }

    /// The most recently scored round.
    pub fn last_round(&self) -> Option<&RoundResult> {
        self.last_round.as_ref()
    }

    /// The player currently holding `role`, if roles are dealt.
    pub fn holder_of(&self, role: Role) -> Option<&Player> {
        self.players.iter().find(|p| p.role == Some(role))
    }

    /// Player → role map for the current round, built from the players.
    /// Empty while roles are not dealt.
    pub fn round_roles(&self) -> HashMap<PlayerId, Role> {
        self.players
            .iter()
            .filter_map(|p| p.role.map(|role| (p.id.clone(), role)))
            .collect()
    }

    /// Public scoreboard. Carries no roles.
    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            room_id: self.id.clone(),
            status: self.status,
            round: self.round,
            players: self
                .players
                .iter()
                .map(|p| PlayerScore {
                    player_id: p.id.clone(),
                    name: p.name.clone(),
                    score: p.score,
                })
                .collect(),
            last_round: self.last_round.clone(),
        }
    }

    // -- Transitions ------------------------------------------------------

    /// Seats a new player at the end of the join order.
    pub(crate) fn add_player(&mut self, player: Player) -> Result<(), GameError> {
        if self.is_full() {
            return Err(GameError::RoomFull(self.id.clone()));
        }
        if self.player(&player.id).is_some() {
            return Err(GameError::InvariantViolation(format!(
                "player id {} issued twice in room {}",
                player.id, self.id
            )));
        }
        self.players.push(player);
        Ok(())
    }

    /// Hands `roles[i]` to the i-th player in join order.
    ///
    /// `roles` must be a permutation of [`Role::ALL`].
    pub(crate) fn assign_roles(&mut self, roles: [Role; ROOM_CAPACITY]) -> Result<(), GameError> {
        if self.players.len() != ROOM_CAPACITY {
            return Err(GameError::PreconditionFailed(format!(
                "need {ROOM_CAPACITY} players to deal roles, room {} has {}",
                self.id,
                self.players.len()
            )));
        }
        if self.status != RoomStatus::Waiting {
            return Err(GameError::PreconditionFailed(format!(
                "roles can only be dealt in WAITING, room {} is {}",
                self.id, self.status
            )));
        }
        if !Role::ALL.iter().all(|role| roles.contains(role)) {
            return Err(GameError::InvariantViolation(format!(
                "dealer produced {roles:?}, not one of each role"
            )));
        }

        for (player, role) in self.players.iter_mut().zip(roles) {
            player.role = Some(role);
        }
        self.advance(RoomStatus::Assigned);
        Ok(())
    }

    /// The role of one player, or `None` while roles are not dealt.
    pub(crate) fn role_of(&self, player_id: &PlayerId) -> Result<Option<Role>, GameError> {
        let player = self
            .player(player_id)
            .ok_or_else(|| GameError::PlayerNotFound(player_id.clone(), self.id.clone()))?;
        if self.status == RoomStatus::Waiting {
            return Ok(None);
        }
        Ok(player.role)
    }

    /// Resolves the Mantri's guess and scores the round for everyone.
    pub(crate) fn resolve_guess(
        &mut self,
        mantri_id: &PlayerId,
        guess_id: &PlayerId,
    ) -> Result<GuessOutcome, GameError> {
        if self.status != RoomStatus::Assigned {
            return Err(GameError::PreconditionFailed(format!(
                "guesses are only accepted in ASSIGNED, room {} is {}",
                self.id, self.status
            )));
        }
        if self.player(mantri_id).and_then(Player::role) != Some(Role::Mantri) {
            return Err(GameError::Forbidden(mantri_id.clone()));
        }
        let chor = self.holder_of(Role::Chor).ok_or_else(|| {
            GameError::InvariantViolation(format!("room {} has roles dealt but no Chor", self.id))
        })?;
        let correct = &chor.id == guess_id;

        // Work out every delta before touching a score.
        let points = self
            .players
            .iter()
            .map(|p| {
                let role = p.role.ok_or_else(|| {
                    GameError::InvariantViolation(format!(
                        "player {} in room {} has no role after dealing",
                        p.id, self.id
                    ))
                })?;
                Ok(RoundPoints {
                    player_id: p.id.clone(),
                    delta: round_points(role, correct),
                })
            })
            .collect::<Result<Vec<_>, GameError>>()?;

        for (player, awarded) in self.players.iter_mut().zip(&points) {
            player.score += awarded.delta;
        }
        self.mantri_guess = Some(guess_id.clone());
        self.last_round = Some(RoundResult {
            points,
            label: outcome_label(correct).to_string(),
        });
        self.advance(RoomStatus::Guessed);

        Ok(GuessOutcome {
            correct,
            guessed_id: guess_id.clone(),
        })
    }

    /// Clears the round so roles can be dealt again. Scores and the last
    /// round's result are kept. Returns the new round number.
    pub(crate) fn start_next_round(&mut self) -> Result<u32, GameError> {
        if self.status != RoomStatus::Guessed {
            return Err(GameError::PreconditionFailed(format!(
                "a new round can only start after the guess, room {} is {}",
                self.id, self.status
            )));
        }
        for player in &mut self.players {
            player.role = None;
        }
        self.mantri_guess = None;
        self.round += 1;
        self.advance(RoomStatus::Waiting);
        Ok(self.round)
    }

    fn advance(&mut self, target: RoomStatus) {
        debug_assert!(
            self.status.can_transition_to(target),
            "illegal transition {} -> {}",
            self.status,
            target
        );
        self.status = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(s: &str) -> PlayerId {
        PlayerId::from(s)
    }

    /// A, B, C, D seated in that order, still waiting.
    fn full_room() -> Room {
        let mut room = Room::new(RoomId::from("TEST01"), Player::new(pid("a"), "A"));
        for id in ["b", "c", "d"] {
            room.add_player(Player::new(pid(id), id.to_uppercase()))
                .unwrap();
        }
        room
    }

    /// A=Raja, B=Mantri, C=Chor, D=Sipahi.
    fn dealt_room() -> Room {
        let mut room = full_room();
        room.assign_roles([Role::Raja, Role::Mantri, Role::Chor, Role::Sipahi])
            .unwrap();
        room
    }

    fn scores(room: &Room) -> Vec<i64> {
        room.players().iter().map(Player::score).collect()
    }

    #[test]
    fn test_new_room_has_only_the_founder() {
        let room = Room::new(RoomId::from("R"), Player::new(pid("a"), "Asha"));
        assert_eq!(room.status(), RoomStatus::Waiting);
        assert_eq!(room.round(), 1);
        assert_eq!(room.player_names(), vec!["Asha"]);
        assert_eq!(room.players()[0].role(), None);
        assert_eq!(room.players()[0].score(), 0);
    }

    #[test]
    fn test_add_player_fifth_is_room_full() {
        let mut room = full_room();
        let result = room.add_player(Player::new(pid("e"), "E"));
        assert!(matches!(result, Err(GameError::RoomFull(_))));
        assert_eq!(room.players().len(), 4);
    }

    #[test]
    fn test_add_player_duplicate_id_is_rejected() {
        let mut room = Room::new(RoomId::from("R"), Player::new(pid("a"), "A"));
        let result = room.add_player(Player::new(pid("a"), "Again"));
        assert!(matches!(result, Err(GameError::InvariantViolation(_))));
        assert_eq!(room.players().len(), 1);
    }

    #[test]
    fn test_assign_roles_follows_join_order() {
        let room = dealt_room();
        let roles = room.round_roles();
        assert_eq!(roles[&pid("a")], Role::Raja);
        assert_eq!(roles[&pid("b")], Role::Mantri);
        assert_eq!(roles[&pid("c")], Role::Chor);
        assert_eq!(roles[&pid("d")], Role::Sipahi);
        assert_eq!(room.status(), RoomStatus::Assigned);
    }

    #[test]
    fn test_assign_roles_with_three_players_fails() {
        let mut room = Room::new(RoomId::from("R"), Player::new(pid("a"), "A"));
        room.add_player(Player::new(pid("b"), "B")).unwrap();
        room.add_player(Player::new(pid("c"), "C")).unwrap();

        let result = room.assign_roles(Role::ALL);
        assert!(matches!(result, Err(GameError::PreconditionFailed(_))));
        assert!(room.round_roles().is_empty());
    }

    #[test]
    fn test_assign_roles_twice_fails_and_keeps_first_deal() {
        let mut room = dealt_room();
        let result = room.assign_roles([Role::Chor, Role::Sipahi, Role::Raja, Role::Mantri]);
        assert!(matches!(result, Err(GameError::PreconditionFailed(_))));
        assert_eq!(room.round_roles()[&pid("a")], Role::Raja);
    }

    #[test]
    fn test_assign_roles_rejects_a_non_permutation() {
        let mut room = full_room();
        let result = room.assign_roles([Role::Raja, Role::Raja, Role::Chor, Role::Sipahi]);
        assert!(matches!(result, Err(GameError::InvariantViolation(_))));
        assert_eq!(room.status(), RoomStatus::Waiting);
        assert!(room.round_roles().is_empty());
    }

    #[test]
    fn test_role_of_is_none_while_waiting() {
        let room = full_room();
        assert_eq!(room.role_of(&pid("c")).unwrap(), None);
    }

    #[test]
    fn test_role_of_unknown_player_is_not_found() {
        let room = dealt_room();
        assert!(matches!(
            room.role_of(&pid("zz")),
            Err(GameError::PlayerNotFound(..))
        ));
    }

    #[test]
    fn test_resolve_guess_correct() {
        let mut room = dealt_room();
        let outcome = room.resolve_guess(&pid("b"), &pid("c")).unwrap();

        assert!(outcome.correct);
        assert_eq!(outcome.guessed_id, pid("c"));
        assert_eq!(scores(&room), vec![1000, 800, 0, 500]);
        assert_eq!(room.status(), RoomStatus::Guessed);
        assert_eq!(room.mantri_guess(), Some(&pid("c")));
        assert_eq!(room.last_round().unwrap().label, "Mantri caught the Chor");
    }

    #[test]
    fn test_resolve_guess_wrong() {
        let mut room = dealt_room();
        let outcome = room.resolve_guess(&pid("b"), &pid("d")).unwrap();

        assert!(!outcome.correct);
        assert_eq!(scores(&room), vec![1000, 0, 1300, 0]);
        let last = room.last_round().unwrap();
        assert_eq!(last.delta_for(&pid("c")), Some(1300));
        assert_eq!(last.label, "Chor escaped");
    }

    #[test]
    fn test_resolve_guess_by_non_mantri_is_forbidden() {
        let mut room = dealt_room();
        for id in ["a", "c", "d", "nobody"] {
            let result = room.resolve_guess(&pid(id), &pid("c"));
            assert!(matches!(result, Err(GameError::Forbidden(_))), "{id}");
        }
        assert_eq!(scores(&room), vec![0, 0, 0, 0]);
        assert_eq!(room.status(), RoomStatus::Assigned);
    }

    #[test]
    fn test_resolve_guess_twice_does_not_double_score() {
        let mut room = dealt_room();
        room.resolve_guess(&pid("b"), &pid("c")).unwrap();
        let result = room.resolve_guess(&pid("b"), &pid("c"));

        assert!(matches!(result, Err(GameError::PreconditionFailed(_))));
        assert_eq!(scores(&room), vec![1000, 800, 0, 500]);
    }

    #[test]
    fn test_resolve_guess_without_chor_is_invariant_violation() {
        let mut room = dealt_room();
        // Corrupt the deal behind the state machine's back.
        room.players[2].role = Some(Role::Sipahi);

        let result = room.resolve_guess(&pid("b"), &pid("c"));
        assert!(matches!(result, Err(GameError::InvariantViolation(_))));
        assert_eq!(scores(&room), vec![0, 0, 0, 0]);
        assert_eq!(room.status(), RoomStatus::Assigned);
    }

    #[test]
    fn test_start_next_round_keeps_scores_and_clears_roles() {
        let mut room = dealt_room();
        room.resolve_guess(&pid("b"), &pid("c")).unwrap();

        let round = room.start_next_round().unwrap();
        assert_eq!(round, 2);
        assert_eq!(room.status(), RoomStatus::Waiting);
        assert!(room.round_roles().is_empty());
        assert_eq!(room.mantri_guess(), None);
        assert_eq!(scores(&room), vec![1000, 800, 0, 500]);
        assert!(room.last_round().is_some());
    }

    #[test]
    fn test_start_next_round_before_guess_fails() {
        let mut room = dealt_room();
        assert!(matches!(
            room.start_next_round(),
            Err(GameError::PreconditionFailed(_))
        ));
        assert_eq!(room.round(), 1);
    }

    #[test]
    fn test_summary_has_scores_but_no_roles() {
        let mut room = dealt_room();
        room.resolve_guess(&pid("b"), &pid("d")).unwrap();

        let summary = room.summary();
        assert_eq!(summary.status, RoomStatus::Guessed);
        assert_eq!(summary.players.len(), 4);
        assert_eq!(summary.players[2].score, 1300);
        assert_eq!(summary.last_round.unwrap().label, "Chor escaped");
    }
}
