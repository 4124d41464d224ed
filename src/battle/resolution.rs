//! Effect application for actions whose wind-up has elapsed
//!
//! Attacks and heals are aimed at the cell recorded when the action was
//! chosen; if the target has since died out of the roster or left that
//! cell, the action whiffs instead of resolving.

use ahash::AHashSet;

use crate::battle::actions::Action;
use crate::battle::catalog::{ActionType, MoveBehavior};
use crate::battle::characters::Character;
use crate::battle::events::GameEvent;
use crate::battle::hex::{HexCoord, HexGrid};
use crate::battle::movement;
use crate::battle::targeting::FilterCondition;
use crate::battle::triggers::ActionQualifier;
use crate::core::types::{CharacterId, Tick};

/// Apply the effect of one due action and stamp its cooldown.
pub fn resolve(
    actor_idx: usize,
    action: &Action,
    roster: &mut [Character],
    grid: &HexGrid,
    tick: Tick,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    match action.action_type {
        ActionType::Attack => resolve_attack(actor_idx, action, roster, tick, &mut events),
        ActionType::Heal => resolve_heal(actor_idx, action, roster, tick, &mut events),
        ActionType::Interrupt => resolve_interrupt(actor_idx, action, roster, tick, &mut events),
        ActionType::Move => {
            resolve_move(actor_idx, action, roster, grid, tick, &mut events, false)
        }
        ActionType::Charge => {
            resolve_move(actor_idx, action, roster, grid, tick, &mut events, true)
        }
    }

    stamp_cooldown(&mut roster[actor_idx], action);
    events
}

fn find_target(roster: &[Character], id: Option<CharacterId>) -> Option<usize> {
    id.and_then(|id| roster.iter().position(|c| c.id == id))
}

fn whiff(source: CharacterId, action: &Action, tick: Tick, events: &mut Vec<GameEvent>) {
    events.push(GameEvent::Whiff {
        tick,
        source,
        action_type: action.action_type,
        target_cell: action.target_cell,
    });
}

fn resolve_attack(
    actor_idx: usize,
    action: &Action,
    roster: &mut [Character],
    tick: Tick,
    events: &mut Vec<GameEvent>,
) {
    let source = roster[actor_idx].id;
    match find_target(roster, action.target) {
        Some(t) if roster[t].position == action.target_cell => {
            let damage = action.skill.skill.definition().damage.unwrap_or(0);
            roster[t].hp -= damage;
            events.push(GameEvent::Damage {
                tick,
                source,
                target: roster[t].id,
                amount: damage,
                resulting_hp: roster[t].hp,
            });
        }
        _ => whiff(source, action, tick, events),
    }
}

fn resolve_heal(
    actor_idx: usize,
    action: &Action,
    roster: &mut [Character],
    tick: Tick,
    events: &mut Vec<GameEvent>,
) {
    let source = roster[actor_idx].id;
    match find_target(roster, action.target) {
        Some(t) if roster[t].position == action.target_cell => {
            let healing = action.skill.skill.definition().healing.unwrap_or(0);
            // Healing never pushes past max hp
            let amount = healing.min(roster[t].max_hp - roster[t].hp).max(0);
            roster[t].hp += amount;
            events.push(GameEvent::Heal {
                tick,
                source,
                target: roster[t].id,
                amount,
                resulting_hp: roster[t].hp,
            });
        }
        _ => whiff(source, action, tick, events),
    }
}

/// The qualifier an interrupt matches against its target's pending
/// action: a channeling filter on the skill narrows it, anything else
/// matches any action.
fn interrupt_qualifier(actor: &Character, action: &Action) -> ActionQualifier {
    match actor.skill(action.skill).and_then(|s| s.filter) {
        Some(filter) if !filter.negated => match filter.condition {
            FilterCondition::Channeling(qualifier) => qualifier,
            _ => ActionQualifier::Any,
        },
        _ => ActionQualifier::Any,
    }
}

fn resolve_interrupt(
    actor_idx: usize,
    action: &Action,
    roster: &mut [Character],
    tick: Tick,
    events: &mut Vec<GameEvent>,
) {
    let source = roster[actor_idx].id;
    let qualifier = interrupt_qualifier(&roster[actor_idx], action);

    if let Some(t) = find_target(roster, action.target) {
        if let Some(pending) = roster[t].current_action {
            if pending.matches(&qualifier) {
                roster[t].current_action = None;
                events.push(GameEvent::Interrupt {
                    tick,
                    source,
                    target: roster[t].id,
                    cancelled: pending.skill,
                });
                return;
            }
        }
    }
    whiff(source, action, tick, events);
}

fn resolve_move(
    actor_idx: usize,
    action: &Action,
    roster: &mut [Character],
    grid: &HexGrid,
    tick: Tick,
    events: &mut Vec<GameEvent>,
    charge: bool,
) {
    let source = roster[actor_idx].id;
    let def = action.skill.skill.definition();
    let steps = def.distance.unwrap_or(0);
    let behavior = roster[actor_idx]
        .skill(action.skill)
        .map(|s| s.behavior)
        .unwrap_or(MoveBehavior::Towards);

    let target_idx = find_target(roster, action.target);
    // A departed target still anchors the move at its last known cell
    let reference = target_idx
        .map(|t| roster[t].position)
        .unwrap_or(action.target_cell);

    let occupied: AHashSet<HexCoord> = roster
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != actor_idx)
        .map(|(_, c)| c.position)
        .collect();

    let from = roster[actor_idx].position;
    let to = movement::advance(grid, from, reference, steps, behavior, &occupied);
    if to != from {
        roster[actor_idx].position = to;
        events.push(GameEvent::Move {
            tick,
            source,
            from,
            to,
        });
    }

    if charge {
        match target_idx {
            // A charge connects only when it ends adjacent to its target
            Some(t) if to.distance(&roster[t].position) <= 1 => {
                let damage = def.damage.unwrap_or(0);
                roster[t].hp -= damage;
                events.push(GameEvent::Damage {
                    tick,
                    source,
                    target: roster[t].id,
                    amount: damage,
                    resulting_hp: roster[t].hp,
                });
            }
            _ => whiff(source, action, tick, events),
        }
    }
}

fn stamp_cooldown(actor: &mut Character, action: &Action) {
    let cooldown = action.skill.skill.definition().cooldown;
    if cooldown > 0 {
        if let Some(skill) = actor.skill_mut(action.skill) {
            skill.cooldown_remaining = cooldown;
        }
    }
}
