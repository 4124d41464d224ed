//! Skill catalog - the static registry all characters draw from
//!
//! Definitions are the single source of truth for intrinsic stats.
//! Instances copy a definition's behavioral defaults and stay
//! configurable per character.

use serde::{Deserialize, Serialize};

use ahash::AHashMap;

use crate::battle::targeting::{Criterion, FilterCondition, TargetFilter, TargetScope};
use crate::battle::triggers::{ActionQualifier, ConditionScope, Trigger, TriggerCondition};

/// Kind of effect a skill applies when it resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Attack,
    Move,
    Heal,
    Interrupt,
    Charge,
}

/// Direction of a move or charge relative to the resolved target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveBehavior {
    Towards,
    Away,
}

/// Every skill in the game, in fixed catalog order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillId {
    LightPunch,
    HeavyStrike,
    PiercingBolt,
    Walk,
    Lunge,
    Mend,
    Disrupt,
}

/// Intrinsic stats and configuration defaults for a skill
#[derive(Debug, Clone)]
pub struct SkillDefinition {
    pub id: SkillId,
    pub name: &'static str,
    pub action_type: ActionType,
    /// Wind-up: ticks between selection and resolution
    pub tick_cost: u32,
    pub range: u32,
    pub damage: Option<i32>,
    pub healing: Option<i32>,
    /// Hexes covered by a move or charge
    pub distance: Option<u32>,
    pub cooldown: u32,
    pub behaviors: &'static [MoveBehavior],
    /// Innate skills seed every character and never drop below one instance
    pub innate: bool,
    /// Per-character cap on instances of this definition
    pub max_instances: u32,
    pub default_target: TargetScope,
    pub default_criterion: Criterion,
    pub default_trigger: Option<Trigger>,
    pub default_filter: Option<TargetFilter>,
}

impl SkillId {
    /// The full catalog in its fixed order
    pub fn all() -> [SkillId; 7] {
        [
            SkillId::LightPunch,
            SkillId::HeavyStrike,
            SkillId::PiercingBolt,
            SkillId::Walk,
            SkillId::Lunge,
            SkillId::Mend,
            SkillId::Disrupt,
        ]
    }

    /// Intrinsic stats for this skill
    pub fn definition(&self) -> SkillDefinition {
        match self {
            SkillId::LightPunch => SkillDefinition {
                id: SkillId::LightPunch,
                name: "Light Punch",
                action_type: ActionType::Attack,
                tick_cost: 1,
                range: 1,
                damage: Some(5),
                healing: None,
                distance: None,
                cooldown: 0,
                behaviors: &[],
                innate: true,
                max_instances: 2,
                default_target: TargetScope::Enemy,
                default_criterion: Criterion::Nearest,
                default_trigger: None,
                default_filter: None,
            },

            SkillId::HeavyStrike => SkillDefinition {
                id: SkillId::HeavyStrike,
                name: "Heavy Strike",
                action_type: ActionType::Attack,
                tick_cost: 3,
                range: 1,
                damage: Some(20),
                healing: None,
                distance: None,
                cooldown: 2,
                behaviors: &[],
                innate: false,
                max_instances: 1,
                default_target: TargetScope::Enemy,
                default_criterion: Criterion::Nearest,
                default_trigger: None,
                default_filter: None,
            },

            SkillId::PiercingBolt => SkillDefinition {
                id: SkillId::PiercingBolt,
                name: "Piercing Bolt",
                action_type: ActionType::Attack,
                tick_cost: 2,
                range: 4,
                damage: Some(8),
                healing: None,
                distance: None,
                cooldown: 1,
                behaviors: &[],
                innate: false,
                max_instances: 2,
                default_target: TargetScope::Enemy,
                default_criterion: Criterion::Nearest,
                default_trigger: None,
                default_filter: None,
            },

            SkillId::Walk => SkillDefinition {
                id: SkillId::Walk,
                name: "Walk",
                action_type: ActionType::Move,
                tick_cost: 1,
                range: 10,
                damage: None,
                healing: None,
                distance: Some(1),
                cooldown: 0,
                behaviors: &[MoveBehavior::Towards, MoveBehavior::Away],
                innate: true,
                max_instances: 2,
                default_target: TargetScope::Enemy,
                default_criterion: Criterion::Nearest,
                default_trigger: None,
                default_filter: None,
            },

            SkillId::Lunge => SkillDefinition {
                id: SkillId::Lunge,
                name: "Lunge",
                action_type: ActionType::Charge,
                tick_cost: 2,
                range: 4,
                damage: Some(6),
                healing: None,
                distance: Some(3),
                cooldown: 3,
                behaviors: &[MoveBehavior::Towards],
                innate: false,
                max_instances: 1,
                default_target: TargetScope::Enemy,
                default_criterion: Criterion::Nearest,
                default_trigger: None,
                default_filter: None,
            },

            SkillId::Mend => SkillDefinition {
                id: SkillId::Mend,
                name: "Mend",
                action_type: ActionType::Heal,
                tick_cost: 2,
                range: 3,
                damage: None,
                healing: Some(15),
                distance: None,
                cooldown: 2,
                behaviors: &[],
                innate: false,
                max_instances: 2,
                default_target: TargetScope::Ally,
                default_criterion: Criterion::LowestHp,
                default_trigger: None,
                // Skip targets already at (effectively) full health
                default_filter: Some(TargetFilter {
                    condition: FilterCondition::HpAbove(99),
                    negated: true,
                }),
            },

            SkillId::Disrupt => SkillDefinition {
                id: SkillId::Disrupt,
                name: "Disrupt",
                action_type: ActionType::Interrupt,
                tick_cost: 1,
                range: 3,
                damage: None,
                healing: None,
                distance: None,
                cooldown: 2,
                behaviors: &[],
                innate: false,
                max_instances: 1,
                default_target: TargetScope::Enemy,
                default_criterion: Criterion::Nearest,
                default_trigger: Some(Trigger::new(TriggerCondition::Channeling {
                    scope: ConditionScope::Enemies,
                    qualifier: ActionQualifier::Any,
                })),
                default_filter: Some(TargetFilter {
                    condition: FilterCondition::Channeling(ActionQualifier::Any),
                    negated: false,
                }),
            },
        }
    }
}

/// Unique identifier for a skill instance: definition plus a serial
/// drawn from that definition's counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillInstanceId {
    pub skill: SkillId,
    pub serial: u32,
}

/// A configurable skill instance held by one character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillInstanceId,
    pub enabled: bool,
    /// Zero, one, or two conditions; all must hold (empty means always)
    pub triggers: Vec<Trigger>,
    pub target: TargetScope,
    pub criterion: Criterion,
    pub filter: Option<TargetFilter>,
    pub behavior: MoveBehavior,
    pub cooldown_remaining: u32,
}

impl Skill {
    pub fn definition(&self) -> SkillDefinition {
        self.id.skill.definition()
    }
}

/// Per-definition serial counters. Carried inside the game state so
/// separate battles never share instance ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillSerials {
    counters: AHashMap<SkillId, u32>,
}

impl SkillSerials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next serial for a definition, monotonically increasing
    pub fn next(&mut self, id: SkillId) -> u32 {
        let counter = self.counters.entry(id).or_insert(0);
        *counter += 1;
        *counter
    }
}

/// Instantiate any catalog definition with its configuration defaults
pub fn instantiate(id: SkillId, serials: &mut SkillSerials) -> Skill {
    let def = id.definition();
    Skill {
        id: SkillInstanceId {
            skill: id,
            serial: serials.next(id),
        },
        enabled: true,
        triggers: def.default_trigger.into_iter().collect(),
        target: def.default_target,
        criterion: def.default_criterion,
        filter: def.default_filter,
        behavior: def
            .behaviors
            .first()
            .copied()
            .unwrap_or(MoveBehavior::Towards),
        cooldown_remaining: 0,
    }
}

/// The starting loadout every new character receives, in catalog order
pub fn innate_loadout(serials: &mut SkillSerials) -> Vec<Skill> {
    SkillId::all()
        .into_iter()
        .filter(|id| id.definition().innate)
        .map(|id| instantiate(id, serials))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_stable() {
        assert_eq!(SkillId::all()[0], SkillId::LightPunch);
        assert_eq!(SkillId::all(), SkillId::all());
    }

    #[test]
    fn test_light_punch_stats() {
        let def = SkillId::LightPunch.definition();
        assert_eq!(def.tick_cost, 1);
        assert_eq!(def.range, 1);
        assert_eq!(def.damage, Some(5));
        assert!(def.innate);
    }

    #[test]
    fn test_innate_loadout_contents() {
        let mut serials = SkillSerials::new();
        let loadout = innate_loadout(&mut serials);
        let ids: Vec<SkillId> = loadout.iter().map(|s| s.id.skill).collect();
        assert_eq!(ids, vec![SkillId::LightPunch, SkillId::Walk]);
        assert!(loadout.iter().all(|s| s.enabled));
        assert!(loadout.iter().all(|s| s.cooldown_remaining == 0));
    }

    #[test]
    fn test_serials_scoped_per_definition() {
        let mut serials = SkillSerials::new();
        let a = instantiate(SkillId::LightPunch, &mut serials);
        let b = instantiate(SkillId::LightPunch, &mut serials);
        let c = instantiate(SkillId::Walk, &mut serials);
        assert_eq!(a.id.serial, 1);
        assert_eq!(b.id.serial, 2);
        assert_eq!(c.id.serial, 1);
        assert_ne!(a.id, b.id);
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn test_disrupt_defaults() {
        let mut serials = SkillSerials::new();
        let disrupt = instantiate(SkillId::Disrupt, &mut serials);
        assert_eq!(disrupt.triggers.len(), 1);
        assert!(disrupt.filter.is_some());
    }

    #[test]
    fn test_walk_defaults_towards() {
        let mut serials = SkillSerials::new();
        let walk = instantiate(SkillId::Walk, &mut serials);
        assert_eq!(walk.behavior, MoveBehavior::Towards);
        assert!(walk.triggers.is_empty());
    }

    #[test]
    fn test_move_skills_have_distance() {
        for id in SkillId::all() {
            let def = id.definition();
            match def.action_type {
                ActionType::Move | ActionType::Charge => {
                    assert!(def.distance.is_some(), "{:?} needs a distance", id);
                    assert!(!def.behaviors.is_empty(), "{:?} needs behaviors", id);
                }
                _ => {}
            }
        }
    }

    #[test]
    fn test_max_instances_positive() {
        for id in SkillId::all() {
            assert!(id.definition().max_instances >= 1);
        }
    }
}
