//! Terminal outcome detection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combat::{CombatState, Side};

/// How a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The defender's health reached zero.
    AttackerWins,
    /// The attacker's health reached zero.
    AttackerDefeated,
}

impl Outcome {
    /// The side left standing.
    #[must_use]
    pub const fn winner(self) -> Side {
        match self {
            Outcome::AttackerWins => Side::Attacker,
            Outcome::AttackerDefeated => Side::Defender,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::AttackerWins => f.write_str("attacker wins"),
            Outcome::AttackerDefeated => f.write_str("attacker defeated"),
        }
    }
}

/// Check for a finished match. The attacker's loss is checked first.
#[must_use]
pub fn evaluate(combat: &CombatState) -> Option<Outcome> {
    if combat.health(Side::Attacker) == 0 {
        Some(Outcome::AttackerDefeated)
    } else if combat.health(Side::Defender) == 0 {
        Some(Outcome::AttackerWins)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_outcome_while_both_stand() {
        assert_eq!(evaluate(&CombatState::new(1, 1)), None);
    }

    #[test]
    fn defender_down() {
        let mut combat = CombatState::new(10, 10);
        combat.damage(Side::Defender, 10);
        assert_eq!(evaluate(&combat), Some(Outcome::AttackerWins));
        assert_eq!(Outcome::AttackerWins.winner(), Side::Attacker);
    }

    #[test]
    fn loss_checked_first() {
        let mut combat = CombatState::new(10, 10);
        combat.damage(Side::Defender, 10);
        combat.damage(Side::Attacker, 10);
        assert_eq!(evaluate(&combat), Some(Outcome::AttackerDefeated));
        assert_eq!(Outcome::AttackerDefeated.winner(), Side::Defender);
    }
}
