//! The round scoring table.
//!
//! | Outcome   | Raja  | Mantri | Sipahi | Chor  |
//! |-----------|-------|--------|--------|-------|
//! | Correct   | +1000 | +800   | +500   | +0    |
//! | Incorrect | +1000 | +0     | +0     | +1300 |
//!
//! On a wrong guess the Chor walks off with the Mantri's and Sipahi's
//! points, so every round pays out the same total.

use rmcs_protocol::Role;

/// Outcome label for a correct guess.
pub const CAUGHT_LABEL: &str = "Mantri caught the Chor";

/// Outcome label for a wrong guess.
pub const ESCAPED_LABEL: &str = "Chor escaped";

/// Points `role` earns this round given whether the Mantri guessed right.
pub fn round_points(role: Role, correct: bool) -> i64 {
    match (role, correct) {
        (Role::Raja, _) => Role::Raja.points(),
        (Role::Chor, false) => Role::Mantri.points() + Role::Sipahi.points(),
        (_, false) => 0,
        (role, true) => role.points(),
    }
}

/// Human-readable label for a round outcome.
pub fn outcome_label(correct: bool) -> &'static str {
    if correct { CAUGHT_LABEL } else { ESCAPED_LABEL }
}
