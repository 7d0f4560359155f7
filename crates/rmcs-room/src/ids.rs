//! Room code and player token generation.

use rand::Rng;
use rmcs_protocol::{PlayerId, RoomId};

/// Room code alphabet. Leaves out 0/O and 1/I so codes survive being read
/// aloud.
const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Generates a random room code of `len` characters.
pub(crate) fn new_room_id(len: usize) -> RoomId {
    let mut rng = rand::rng();
    let code = (0..len)
        .map(|_| {
            let i = rng.random_range(0..ROOM_CODE_ALPHABET.len());
            char::from(ROOM_CODE_ALPHABET[i])
        })
        .collect();
    RoomId(code)
}

/// Generates a player token: 16 random bytes as 32 lowercase hex chars.
///
/// The token is the only thing standing between a player and someone
/// else reading their role, so it gets the full 128 bits.
pub(crate) fn new_player_id() -> PlayerId {
    let bytes: [u8; 16] = rand::rng().random();
    PlayerId(bytes.iter().map(|b| format!("{b:02x}")).collect())
}
