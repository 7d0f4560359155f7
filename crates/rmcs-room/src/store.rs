//! Room storage.
//!
//! The engine reaches rooms only through the [`RoomStore`] trait, so the
//! in-memory table can be swapped for something persistent without
//! touching game logic.
//!
//! # Concurrency
//!
//! [`RoomStore::update`] is the unit of atomicity: the closure runs with
//! exclusive access to one room, and nothing else can read or write that
//! room until it returns. Different rooms never wait on each other.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use rmcs_protocol::RoomId;

use crate::{GameError, Room};

/// Repository of rooms keyed by room id.
pub trait RoomStore: Send + Sync + 'static {
    /// Adds a new room. If its id is already taken the store is left
    /// untouched and the room is handed back.
    fn insert(&self, room: Room) -> Result<(), Room>;

    /// A snapshot copy of a room.
    fn get(&self, room_id: &RoomId) -> Option<Room>;

    /// Runs `op` with exclusive access to one room.
    ///
    /// # Errors
    /// [`GameError::RoomNotFound`] if there is no such room, otherwise
    /// whatever `op` returns.
    fn update<T, F>(&self, room_id: &RoomId, op: F) -> Result<T, GameError>
    where
        F: FnOnce(&mut Room) -> Result<T, GameError>;

    /// Runs a read-only `op` under the same exclusion as [`update`](Self::update).
    fn view<T, F>(&self, room_id: &RoomId, op: F) -> Result<T, GameError>
    where
        F: FnOnce(&Room) -> Result<T, GameError>,
    {
        self.update(room_id, |room| op(&*room))
    }

    /// Drops a room. Expiry policy belongs to whoever owns the store.
    fn remove(&self, room_id: &RoomId) -> Option<Room>;

    /// Number of rooms held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// MemoryRoomStore
// ---------------------------------------------------------------------------

/// Process-local store: a table of individually locked rooms.
///
/// The outer `RwLock` is held only long enough to find a room's slot;
/// all game work happens under that room's own `Mutex`.
#[derive(Debug, Default)]
pub struct MemoryRoomStore {
    rooms: RwLock<HashMap<RoomId, Arc<Mutex<Room>>>>,
}

impl MemoryRoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, room_id: &RoomId) -> Option<Arc<Mutex<Room>>> {
        self.rooms
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(room_id)
            .cloned()
    }
}

impl RoomStore for MemoryRoomStore {
    fn insert(&self, room: Room) -> Result<(), Room> {
        let mut rooms = self.rooms.write().unwrap_or_else(PoisonError::into_inner);
        match rooms.entry(room.id().clone()) {
            Entry::Occupied(_) => Err(room),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(Mutex::new(room)));
                Ok(())
            }
        }
    }

    fn get(&self, room_id: &RoomId) -> Option<Room> {
        let slot = self.slot(room_id)?;
        let room = slot.lock().unwrap_or_else(PoisonError::into_inner);
        Some(room.clone())
    }

    fn update<T, F>(&self, room_id: &RoomId, op: F) -> Result<T, GameError>
    where
        F: FnOnce(&mut Room) -> Result<T, GameError>,
    {
        let slot = self
            .slot(room_id)
            .ok_or_else(|| GameError::RoomNotFound(room_id.clone()))?;
        // Room mutations validate before writing, so a room behind a
        // poisoned lock is still consistent.
        let mut room = slot.lock().unwrap_or_else(PoisonError::into_inner);
        op(&mut room)
    }

    fn remove(&self, room_id: &RoomId) -> Option<Room> {
        let slot = self
            .rooms
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(room_id)?;
        let room = slot.lock().unwrap_or_else(PoisonError::into_inner);
        Some(room.clone())
    }

    fn len(&self) -> usize {
        self.rooms.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}
