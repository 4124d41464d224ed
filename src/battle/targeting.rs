//! Target selection: candidate sets, ranking criteria, and filters

use serde::{Deserialize, Serialize};

use crate::battle::characters::Character;
use crate::battle::catalog::Skill;
use crate::battle::triggers::ActionQualifier;
use std::cmp::Reverse;

/// Which units a skill may be aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetScope {
    Enemy,
    Ally,
    Own,
}

/// Ranking rule applied to the candidate set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Nearest,
    Furthest,
    LowestHp,
    HighestHp,
    MostEnemiesNearby,
}

/// Condition tested against the single resolved candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterCondition {
    /// Candidate hp strictly below this percentage of its max
    HpBelow(u32),
    /// Candidate hp strictly above this percentage of its max
    HpAbove(u32),
    /// Candidate has a pending action matching the qualifier
    Channeling(ActionQualifier),
    /// Candidate has no pending action matching the qualifier
    Idle(ActionQualifier),
    /// Candidate's pending action targets the acting character
    TargetingMe,
    /// Candidate's pending action targets an ally of the acting character
    TargetingAlly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetFilter {
    pub condition: FilterCondition,
    #[serde(default)]
    pub negated: bool,
}

/// Outcome of target selection. Filter rejection is reported apart from
/// an empty candidate set so the decision engine can surface the reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetResolution {
    /// Roster index of the resolved target
    Target(usize),
    Empty,
    Filtered,
}

/// Resolve the target for one skill of the character at `actor_idx`.
///
/// Own-scope skills resolve to the actor directly; criterion and filter
/// are skipped entirely. A candidate at or below zero hp is still valid
/// unless a filter excludes it.
pub fn select_target(actor_idx: usize, skill: &Skill, roster: &[Character]) -> TargetResolution {
    let actor = &roster[actor_idx];

    if skill.target == TargetScope::Own {
        return TargetResolution::Target(actor_idx);
    }

    let wanted = match skill.target {
        TargetScope::Enemy => actor.faction.opponent(),
        TargetScope::Ally => actor.faction,
        TargetScope::Own => unreachable!(),
    };

    let candidates: Vec<usize> = roster
        .iter()
        .enumerate()
        .filter(|(idx, c)| *idx != actor_idx && c.faction == wanted)
        .map(|(idx, _)| idx)
        .collect();

    if candidates.is_empty() {
        return TargetResolution::Empty;
    }

    let best = rank(actor, skill, &candidates, roster);

    if let Some(filter) = &skill.filter {
        if !filter_passes(filter, best, actor_idx, roster) {
            return TargetResolution::Filtered;
        }
    }

    TargetResolution::Target(best)
}

/// Pick the top candidate by the skill's criterion. Ties break towards
/// the earliest roster index, so results never depend on iteration
/// order quirks.
fn rank(actor: &Character, skill: &Skill, candidates: &[usize], roster: &[Character]) -> usize {
    let dist = |idx: &usize| actor.position.distance(&roster[*idx].position);

    match skill.criterion {
        Criterion::Nearest => *candidates
            .iter()
            .min_by_key(|idx| (dist(idx), **idx))
            .expect("candidate set is non-empty"),

        Criterion::Furthest => *candidates
            .iter()
            .min_by_key(|idx| (Reverse(dist(idx)), **idx))
            .expect("candidate set is non-empty"),

        Criterion::LowestHp => *candidates
            .iter()
            .min_by_key(|idx| (roster[**idx].hp, dist(idx), **idx))
            .expect("candidate set is non-empty"),

        Criterion::HighestHp => *candidates
            .iter()
            .min_by_key(|idx| (Reverse(roster[**idx].hp), dist(idx), **idx))
            .expect("candidate set is non-empty"),

        Criterion::MostEnemiesNearby => {
            let range = skill.definition().range;
            let opposing = actor.faction.opponent();
            let nearby = |idx: &usize| {
                roster
                    .iter()
                    .filter(|c| c.faction == opposing)
                    .filter(|c| roster[*idx].position.distance(&c.position) <= range)
                    .count()
            };
            *candidates
                .iter()
                .min_by_key(|idx| (Reverse(nearby(idx)), **idx))
                .expect("candidate set is non-empty")
        }
    }
}

/// Evaluate a filter against the resolved candidate
pub fn filter_passes(
    filter: &TargetFilter,
    candidate_idx: usize,
    actor_idx: usize,
    roster: &[Character],
) -> bool {
    let candidate = &roster[candidate_idx];
    let actor = &roster[actor_idx];

    let pass = match &filter.condition {
        FilterCondition::HpBelow(pct) => candidate.hp * 100 < (*pct as i32) * candidate.max_hp,

        FilterCondition::HpAbove(pct) => candidate.hp * 100 > (*pct as i32) * candidate.max_hp,

        FilterCondition::Channeling(qualifier) => candidate.is_channeling(qualifier),

        FilterCondition::Idle(qualifier) => !candidate.is_channeling(qualifier),

        FilterCondition::TargetingMe => candidate.is_targeting(actor.id),

        FilterCondition::TargetingAlly => roster
            .iter()
            .filter(|c| c.faction == actor.faction && c.id != actor.id)
            .any(|ally| candidate.is_targeting(ally.id)),
    };
    pass != filter.negated
}
