//! The `Dealer` trait: where each round's role permutation comes from.
//!
//! The engine never calls a random number generator itself. It asks a
//! [`Dealer`] for a permutation of the four roles, which lets production
//! use a real RNG and tests pin down exactly who gets what.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rmcs_protocol::Role;

use crate::{EngineConfig, ROOM_CAPACITY};

/// Produces role permutations for new rounds.
///
/// Shared by every room in the engine, hence `Send + Sync`.
pub trait Dealer: Send + Sync + 'static {
    /// Returns the four roles in seat order. Must contain each role once.
    fn deal(&self) -> [Role; ROOM_CAPACITY];
}

// ---------------------------------------------------------------------------
// RandomDealer
// ---------------------------------------------------------------------------

/// Deals a uniformly random permutation: every one of the 24 orders is
/// equally likely.
#[derive(Debug)]
pub struct RandomDealer {
    rng: Mutex<StdRng>,
}

impl RandomDealer {
    /// A dealer seeded from the operating system.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// A dealer whose sequence of deals is fixed by `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Seeded if the config carries a seed, OS-seeded otherwise.
    pub fn from_config(config: &EngineConfig) -> Self {
        match config.seed {
            Some(seed) => Self::seeded(seed),
            None => Self::new(),
        }
    }
}

impl Default for RandomDealer {
    fn default() -> Self {
        Self::new()
    }
}

impl Dealer for RandomDealer {
    fn deal(&self) -> [Role; ROOM_CAPACITY] {
        let mut roles = Role::ALL;
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        roles.shuffle(&mut *rng);
        roles
    }
}

// ---------------------------------------------------------------------------
// FixedDealer
// ---------------------------------------------------------------------------

/// Always deals the same order. For tests and scripted demos.
#[derive(Debug, Clone, Copy)]
pub struct FixedDealer {
    roles: [Role; ROOM_CAPACITY],
}

impl FixedDealer {
    pub fn new(roles: [Role; ROOM_CAPACITY]) -> Self {
        Self { roles }
    }
}

impl Dealer for FixedDealer {
    fn deal(&self) -> [Role; ROOM_CAPACITY] {
        self.roles
    }
}
