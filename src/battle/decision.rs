//! Per-character decision algorithm
//!
//! Walks the skill priority list in order and commits to the first
//! skill that survives every check. Everything after the selected
//! skill is marked skipped, never evaluated.

use serde::{Deserialize, Serialize};

use crate::battle::actions::Action;
use crate::battle::catalog::SkillInstanceId;
use crate::battle::characters::Character;
use crate::battle::targeting::{select_target, TargetResolution};
use crate::battle::triggers::triggers_pass;
use crate::core::types::{CharacterId, Tick};

/// Why a skill was passed over this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    Disabled,
    OnCooldown,
    TriggerFailed,
    NoTarget,
    FilterFailed,
    OutOfRange,
}

/// Outcome of evaluating one skill in the priority list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvalStatus {
    Selected,
    Rejected(RejectReason),
    /// A higher-priority skill was already selected
    Skipped,
}

/// One entry of a character's per-tick decision report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillEvaluation {
    pub skill: SkillInstanceId,
    pub status: EvalStatus,
    /// Populated when a target survived selection (also for range
    /// rejections, where the target was resolved but too far away)
    pub resolved_target: Option<CharacterId>,
}

impl SkillEvaluation {
    fn rejected(skill: SkillInstanceId, reason: RejectReason) -> Self {
        Self {
            skill,
            status: EvalStatus::Rejected(reason),
            resolved_target: None,
        }
    }
}

/// Decide the action for the character at `actor_idx`.
///
/// Returns the full evaluation report plus the chosen action, if any.
/// A `None` action means the character idles this tick.
pub fn decide(
    actor_idx: usize,
    roster: &[Character],
    tick: Tick,
) -> (Vec<SkillEvaluation>, Option<Action>) {
    let actor = &roster[actor_idx];
    let mut evaluations = Vec::with_capacity(actor.skills.len());
    let mut chosen: Option<Action> = None;

    for skill in &actor.skills {
        if chosen.is_some() {
            evaluations.push(SkillEvaluation {
                skill: skill.id,
                status: EvalStatus::Skipped,
                resolved_target: None,
            });
            continue;
        }

        if !skill.enabled {
            evaluations.push(SkillEvaluation::rejected(skill.id, RejectReason::Disabled));
            continue;
        }

        // Cooldown gating happens before any trigger work
        if skill.cooldown_remaining > 0 {
            evaluations.push(SkillEvaluation::rejected(skill.id, RejectReason::OnCooldown));
            continue;
        }

        if !triggers_pass(&skill.triggers, actor, roster) {
            evaluations.push(SkillEvaluation::rejected(
                skill.id,
                RejectReason::TriggerFailed,
            ));
            continue;
        }

        let target_idx = match select_target(actor_idx, skill, roster) {
            TargetResolution::Target(idx) => idx,
            TargetResolution::Empty => {
                evaluations.push(SkillEvaluation::rejected(skill.id, RejectReason::NoTarget));
                continue;
            }
            TargetResolution::Filtered => {
                evaluations.push(SkillEvaluation::rejected(
                    skill.id,
                    RejectReason::FilterFailed,
                ));
                continue;
            }
        };

        let target = &roster[target_idx];
        let def = skill.definition();

        if actor.position.distance(&target.position) > def.range {
            evaluations.push(SkillEvaluation {
                skill: skill.id,
                status: EvalStatus::Rejected(RejectReason::OutOfRange),
                resolved_target: Some(target.id),
            });
            continue;
        }

        evaluations.push(SkillEvaluation {
            skill: skill.id,
            status: EvalStatus::Selected,
            resolved_target: Some(target.id),
        });
        chosen = Some(Action {
            action_type: def.action_type,
            skill: skill.id,
            target_cell: target.position,
            target: Some(target.id),
            started_at: tick,
            resolves_at: tick + def.tick_cost as Tick,
        });
    }

    (evaluations, chosen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::catalog::{instantiate, SkillId, SkillSerials};
    use crate::battle::hex::HexCoord;
    use crate::battle::triggers::{Trigger, TriggerCondition};
    use crate::core::types::Faction;

    fn character(id: u32, faction: Faction, hp: i32, q: i32, r: i32) -> Character {
        Character::new(
            CharacterId(id),
            format!("{}-{}", faction, id),
            faction,
            hp,
            100,
            HexCoord::new(q, r),
            Vec::new(),
        )
    }

    fn with_skills(mut ch: Character, ids: &[SkillId], serials: &mut SkillSerials) -> Character {
        ch.skills = ids.iter().map(|id| instantiate(*id, serials)).collect();
        ch
    }

    #[test]
    fn test_selects_first_passing_skill_and_skips_rest() {
        let mut serials = SkillSerials::new();
        let actor = with_skills(
            character(1, Faction::Friendly, 100, 0, 0),
            &[SkillId::LightPunch, SkillId::Walk, SkillId::PiercingBolt],
            &mut serials,
        );
        let enemy = character(2, Faction::Enemy, 100, 1, 0);
        let roster = vec![actor, enemy];

        let (evals, action) = decide(0, &roster, 5);
        assert_eq!(evals[0].status, EvalStatus::Selected);
        assert_eq!(evals[0].resolved_target, Some(CharacterId(2)));
        assert_eq!(evals[1].status, EvalStatus::Skipped);
        assert_eq!(evals[2].status, EvalStatus::Skipped);

        let action = action.expect("light punch should fire");
        assert_eq!(action.skill.skill, SkillId::LightPunch);
        assert_eq!(action.started_at, 5);
        assert_eq!(action.resolves_at, 6);
        assert_eq!(action.target_cell, HexCoord::new(1, 0));
    }

    #[test]
    fn test_earlier_rejections_keep_their_reasons() {
        let mut serials = SkillSerials::new();
        let mut actor = with_skills(
            character(1, Faction::Friendly, 100, 0, 0),
            &[SkillId::LightPunch, SkillId::PiercingBolt],
            &mut serials,
        );
        actor.skills[0].enabled = false;
        let enemy = character(2, Faction::Enemy, 100, 2, 0);
        let roster = vec![actor, enemy];

        let (evals, action) = decide(0, &roster, 0);
        assert_eq!(
            evals[0].status,
            EvalStatus::Rejected(RejectReason::Disabled)
        );
        assert_eq!(evals[1].status, EvalStatus::Selected);
        assert!(action.is_some());
    }

    #[test]
    fn test_cooldown_checked_before_triggers() {
        let mut serials = SkillSerials::new();
        let mut actor = with_skills(
            character(1, Faction::Friendly, 100, 0, 0),
            &[SkillId::PiercingBolt],
            &mut serials,
        );
        // Trigger would also fail; cooldown must win
        actor.skills[0].triggers = vec![Trigger::new(TriggerCondition::HpBelow(1))];
        actor.skills[0].cooldown_remaining = 2;
        let enemy = character(2, Faction::Enemy, 100, 2, 0);
        let roster = vec![actor, enemy];

        let (evals, action) = decide(0, &roster, 0);
        assert_eq!(
            evals[0].status,
            EvalStatus::Rejected(RejectReason::OnCooldown)
        );
        assert!(action.is_none());
    }

    #[test]
    fn test_all_rejected_means_idle() {
        let mut serials = SkillSerials::new();
        let actor = with_skills(
            character(1, Faction::Friendly, 100, 0, 0),
            &[SkillId::LightPunch, SkillId::PiercingBolt],
            &mut serials,
        );
        let enemy = character(2, Faction::Enemy, 100, 5, 0);
        let roster = vec![actor, enemy];

        let (evals, action) = decide(0, &roster, 0);
        assert_eq!(
            evals[0].status,
            EvalStatus::Rejected(RejectReason::OutOfRange)
        );
        assert_eq!(
            evals[1].status,
            EvalStatus::Rejected(RejectReason::OutOfRange)
        );
        assert!(action.is_none());
    }

    #[test]
    fn test_out_of_range_keeps_resolved_target() {
        let mut serials = SkillSerials::new();
        let actor = with_skills(
            character(1, Faction::Friendly, 100, 0, 0),
            &[SkillId::LightPunch],
            &mut serials,
        );
        let enemy = character(2, Faction::Enemy, 100, 3, 0);
        let roster = vec![actor, enemy];

        let (evals, _) = decide(0, &roster, 0);
        assert_eq!(evals[0].resolved_target, Some(CharacterId(2)));
    }

    #[test]
    fn test_no_target_when_roster_has_no_enemies() {
        let mut serials = SkillSerials::new();
        let actor = with_skills(
            character(1, Faction::Friendly, 100, 0, 0),
            &[SkillId::LightPunch],
            &mut serials,
        );
        let roster = vec![actor];

        let (evals, action) = decide(0, &roster, 0);
        assert_eq!(evals[0].status, EvalStatus::Rejected(RejectReason::NoTarget));
        assert!(action.is_none());
    }

    #[test]
    fn test_and_triggers_select_skill() {
        let mut serials = SkillSerials::new();
        let mut actor = with_skills(
            character(1, Faction::Friendly, 40, 0, 0),
            &[SkillId::PiercingBolt],
            &mut serials,
        );
        actor.skills[0].triggers = vec![
            Trigger::new(TriggerCondition::HpBelow(50)),
            Trigger::new(TriggerCondition::EnemyInRange(3)),
        ];
        let enemy = character(2, Faction::Enemy, 100, 2, 0);
        let roster = vec![actor, enemy];

        let (evals, action) = decide(0, &roster, 0);
        assert_eq!(evals[0].status, EvalStatus::Selected);
        assert!(action.is_some());
    }

    #[test]
    fn test_trigger_failure_reason() {
        let mut serials = SkillSerials::new();
        let mut actor = with_skills(
            character(1, Faction::Friendly, 90, 0, 0),
            &[SkillId::PiercingBolt],
            &mut serials,
        );
        actor.skills[0].triggers = vec![Trigger::new(TriggerCondition::HpBelow(50))];
        let enemy = character(2, Faction::Enemy, 100, 2, 0);
        let roster = vec![actor, enemy];

        let (evals, action) = decide(0, &roster, 0);
        assert_eq!(
            evals[0].status,
            EvalStatus::Rejected(RejectReason::TriggerFailed)
        );
        assert!(action.is_none());
    }
}
