//! Committed actions and their wind-up bookkeeping

use serde::{Deserialize, Serialize};

use crate::battle::catalog::{ActionType, SkillInstanceId};
use crate::battle::hex::HexCoord;
use crate::battle::triggers::ActionQualifier;
use crate::core::types::{CharacterId, Tick};

/// An action a character has committed to. It stays pending until the
/// wind-up elapses, locking the character out of further decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub action_type: ActionType,
    pub skill: SkillInstanceId,
    /// Cell the action was aimed at when it was chosen
    pub target_cell: HexCoord,
    pub target: Option<CharacterId>,
    pub started_at: Tick,
    /// Always `started_at + tick_cost` of the chosen skill
    pub resolves_at: Tick,
}

impl Action {
    /// Does this action match an interrupt or condition qualifier?
    pub fn matches(&self, qualifier: &ActionQualifier) -> bool {
        match qualifier {
            ActionQualifier::Any => true,
            ActionQualifier::Kind(kind) => self.action_type == *kind,
            ActionQualifier::Skill(skill) => self.skill.skill == *skill,
        }
    }
}
