//! Trigger evaluation
//!
//! A skill carries up to two triggers; both must hold for the skill to
//! be considered. An empty trigger list means the skill is always
//! eligible.

use serde::{Deserialize, Serialize};

use crate::battle::catalog::{ActionType, SkillId};
use crate::battle::characters::Character;

/// Which units a channeling/idle condition inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionScope {
    Enemies,
    Allies,
    Own,
}

/// Narrows an action-state condition to a specific kind of action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionQualifier {
    Any,
    Kind(ActionType),
    Skill(SkillId),
}

/// A single trigger condition, evaluated against the acting character
/// and the rest of the roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerCondition {
    Always,
    /// Own hp strictly below this percentage of max
    HpBelow(u32),
    /// Own hp strictly above this percentage of max
    HpAbove(u32),
    /// Some enemy within this many hexes
    EnemyInRange(u32),
    /// Some other ally within this many hexes
    AllyInRange(u32),
    /// Any other unit within this many hexes
    InRange(u32),
    /// Some unit in scope has a pending action matching the qualifier
    Channeling {
        scope: ConditionScope,
        qualifier: ActionQualifier,
    },
    /// Some unit in scope has no pending action matching the qualifier
    Idle {
        scope: ConditionScope,
        qualifier: ActionQualifier,
    },
    /// Some other unit's pending action targets the acting character
    TargetingMe,
    /// Some unit's pending action targets an ally of the acting character
    TargetingAlly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Trigger {
    pub condition: TriggerCondition,
    #[serde(default)]
    pub negated: bool,
}

impl Trigger {
    pub fn new(condition: TriggerCondition) -> Self {
        Self {
            condition,
            negated: false,
        }
    }

    pub fn negated(condition: TriggerCondition) -> Self {
        Self {
            condition,
            negated: true,
        }
    }

    pub fn always() -> Self {
        Self::new(TriggerCondition::Always)
    }
}

/// AND-combine a skill's triggers. An empty list is an implicit `always`.
pub fn triggers_pass(triggers: &[Trigger], actor: &Character, roster: &[Character]) -> bool {
    triggers.iter().all(|t| trigger_passes(t, actor, roster))
}

/// Evaluate a single trigger for the given character
pub fn trigger_passes(trigger: &Trigger, actor: &Character, roster: &[Character]) -> bool {
    let pass = match &trigger.condition {
        TriggerCondition::Always => true,

        TriggerCondition::HpBelow(pct) => actor.hp * 100 < (*pct as i32) * actor.max_hp,

        TriggerCondition::HpAbove(pct) => actor.hp * 100 > (*pct as i32) * actor.max_hp,

        TriggerCondition::EnemyInRange(range) => roster
            .iter()
            .filter(|c| c.faction != actor.faction)
            .any(|c| actor.position.distance(&c.position) <= *range),

        TriggerCondition::AllyInRange(range) => roster
            .iter()
            .filter(|c| c.faction == actor.faction && c.id != actor.id)
            .any(|c| actor.position.distance(&c.position) <= *range),

        TriggerCondition::InRange(range) => roster
            .iter()
            .filter(|c| c.id != actor.id)
            .any(|c| actor.position.distance(&c.position) <= *range),

        TriggerCondition::Channeling { scope, qualifier } => {
            scoped(actor, roster, *scope).any(|c| c.is_channeling(qualifier))
        }

        TriggerCondition::Idle { scope, qualifier } => {
            scoped(actor, roster, *scope).any(|c| !c.is_channeling(qualifier))
        }

        TriggerCondition::TargetingMe => roster
            .iter()
            .filter(|c| c.id != actor.id)
            .any(|c| c.is_targeting(actor.id)),

        TriggerCondition::TargetingAlly => {
            let allies: Vec<_> = roster
                .iter()
                .filter(|c| c.faction == actor.faction && c.id != actor.id)
                .map(|c| c.id)
                .collect();
            roster
                .iter()
                .any(|c| allies.iter().any(|ally| c.is_targeting(*ally)))
        }
    };
    pass != trigger.negated
}

fn scoped<'a>(
    actor: &'a Character,
    roster: &'a [Character],
    scope: ConditionScope,
) -> impl Iterator<Item = &'a Character> {
    roster.iter().filter(move |c| match scope {
        ConditionScope::Enemies => c.faction != actor.faction,
        ConditionScope::Allies => c.faction == actor.faction && c.id != actor.id,
        ConditionScope::Own => c.id == actor.id,
    })
}
