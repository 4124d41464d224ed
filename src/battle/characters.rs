//! Characters: roster members with a skill priority list

use serde::{Deserialize, Serialize};

use crate::battle::actions::Action;
use crate::battle::catalog::{Skill, SkillInstanceId};
use crate::battle::decision::SkillEvaluation;
use crate::battle::hex::HexCoord;
use crate::battle::triggers::ActionQualifier;
use crate::core::types::{CharacterId, Faction};

/// A combatant on the board.
///
/// The `skills` order is the priority order the decision engine walks.
/// `hp` is not clamped at zero; a character at or below zero stays on
/// the roster (and remains a legal target) until explicitly removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub faction: Faction,
    pub hp: i32,
    pub max_hp: i32,
    pub position: HexCoord,
    pub skills: Vec<Skill>,
    pub current_action: Option<Action>,
    /// Last decision report; only meaningful while not mid-action
    pub evaluations: Vec<SkillEvaluation>,
}

impl Character {
    pub fn new(
        id: CharacterId,
        name: String,
        faction: Faction,
        hp: i32,
        max_hp: i32,
        position: HexCoord,
        skills: Vec<Skill>,
    ) -> Self {
        Self {
            id,
            name,
            faction,
            hp,
            max_hp,
            position,
            skills,
            current_action: None,
            evaluations: Vec::new(),
        }
    }

    /// Alive means strictly positive hit points
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Is this character winding up an action matching the qualifier?
    pub fn is_channeling(&self, qualifier: &ActionQualifier) -> bool {
        self.current_action
            .as_ref()
            .is_some_and(|a| a.matches(qualifier))
    }

    /// Does this character's pending action target the given unit?
    pub fn is_targeting(&self, id: CharacterId) -> bool {
        self.current_action
            .as_ref()
            .is_some_and(|a| a.target == Some(id))
    }

    pub fn skill(&self, instance: SkillInstanceId) -> Option<&Skill> {
        self.skills.iter().find(|s| s.id == instance)
    }

    pub fn skill_mut(&mut self, instance: SkillInstanceId) -> Option<&mut Skill> {
        self.skills.iter_mut().find(|s| s.id == instance)
    }

    /// Number of instances of one catalog definition in the loadout
    pub fn instance_count(&self, skill: crate::battle::catalog::SkillId) -> usize {
        self.skills.iter().filter(|s| s.id.skill == skill).count()
    }
}
