//! Battle status derivation from faction presence

use serde::{Deserialize, Serialize};

use crate::battle::characters::Character;
use crate::core::types::Faction;

/// Overall battle verdict, recomputed after every mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleStatus {
    #[default]
    Active,
    Victory,
    Defeat,
    Draw,
}

/// A faction is present while it has at least one living character.
/// Characters at or below zero hp stay on the roster but no longer
/// count towards presence.
pub fn compute(roster: &[Character]) -> BattleStatus {
    let friendly = roster
        .iter()
        .any(|c| c.faction == Faction::Friendly && c.is_alive());
    let enemy = roster
        .iter()
        .any(|c| c.faction == Faction::Enemy && c.is_alive());

    match (friendly, enemy) {
        (true, true) => BattleStatus::Active,
        (true, false) => BattleStatus::Victory,
        (false, true) => BattleStatus::Defeat,
        (false, false) => BattleStatus::Draw,
    }
}
