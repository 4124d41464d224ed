//! Loadout management integration tests
//!
//! Slot caps, instance caps, the innate floor, and the effect loadout
//! edits have on the decisions the engine makes afterwards.

use hex_arena::battle::*;
use hex_arena::core::types::{CharacterId, Faction};

fn duel() -> Battle {
    Battle::init(vec![
        CharacterSpec::new(Faction::Friendly, 100).at(HexCoord::new(0, 0)),
        CharacterSpec::new(Faction::Enemy, 100).at(HexCoord::new(1, 0)),
    ])
}

fn instance_of(battle: &Battle, id: CharacterId, skill: SkillId) -> SkillInstanceId {
    battle
        .character(id)
        .unwrap()
        .skills
        .iter()
        .find(|s| s.id.skill == skill)
        .unwrap()
        .id
}

#[test]
fn test_slot_cap_via_assign_and_duplicate() {
    let mut battle = duel();
    let id = battle.state().characters[0].id;

    // 2 innate + 6 assignments leaves two free slots
    for skill in [
        SkillId::HeavyStrike,
        SkillId::PiercingBolt,
        SkillId::Lunge,
        SkillId::Mend,
        SkillId::Disrupt,
        SkillId::LightPunch,
    ] {
        assert!(battle.assign_skill(id, skill), "{:?} should fit", skill);
    }
    assert_eq!(battle.character(id).unwrap().skills.len(), 8);

    // Duplicates fill the remaining slots
    let bolt = instance_of(&battle, id, SkillId::PiercingBolt);
    let mend = instance_of(&battle, id, SkillId::Mend);
    assert!(battle.duplicate_skill(id, bolt));
    assert!(battle.duplicate_skill(id, mend));
    assert_eq!(battle.character(id).unwrap().skills.len(), MAX_SKILL_SLOTS);

    // Full: neither assignment nor duplication fits anymore
    assert!(!battle.assign_skill(id, SkillId::Walk));
    let walk = instance_of(&battle, id, SkillId::Walk);
    assert!(!battle.duplicate_skill(id, walk));
}

#[test]
fn test_per_definition_instance_caps() {
    let mut battle = duel();
    let id = battle.state().characters[0].id;

    // HeavyStrike allows a single instance
    assert!(battle.assign_skill(id, SkillId::HeavyStrike));
    assert!(!battle.assign_skill(id, SkillId::HeavyStrike));
    let strike = instance_of(&battle, id, SkillId::HeavyStrike);
    assert!(!battle.duplicate_skill(id, strike));

    // LightPunch allows two: one innate copy plus one more
    assert!(battle.assign_skill(id, SkillId::LightPunch));
    assert!(!battle.assign_skill(id, SkillId::LightPunch));
    assert_eq!(
        battle.character(id).unwrap().instance_count(SkillId::LightPunch),
        2
    );
}

#[test]
fn test_innate_floor_survives_removal_chains() {
    let mut battle = duel();
    let id = battle.state().characters[0].id;
    let punch = instance_of(&battle, id, SkillId::LightPunch);

    // The last innate copy stays
    assert!(!battle.remove_skill(id, punch));
    assert!(battle.duplicate_skill(id, punch));
    assert!(battle.remove_skill(id, punch));
    let survivor = instance_of(&battle, id, SkillId::LightPunch);
    assert!(!battle.remove_skill(id, survivor));
    assert_eq!(
        battle.character(id).unwrap().instance_count(SkillId::LightPunch),
        1
    );

    // Non-innate skills remove freely
    battle.assign_skill(id, SkillId::Mend);
    let mend = instance_of(&battle, id, SkillId::Mend);
    assert!(battle.remove_skill(id, mend));
    assert_eq!(battle.character(id).unwrap().instance_count(SkillId::Mend), 0);
}

#[test]
fn test_duplicate_carries_configuration_not_cooldown() {
    let mut battle = duel();
    let id = battle.state().characters[0].id;
    battle.assign_skill(id, SkillId::PiercingBolt);
    let bolt = instance_of(&battle, id, SkillId::PiercingBolt);
    battle
        .update_skill(
            id,
            bolt,
            SkillUpdate {
                criterion: Some(Criterion::HighestHp),
                triggers: Some(vec![Trigger::new(TriggerCondition::EnemyInRange(4))]),
                ..Default::default()
            },
        )
        .unwrap();

    assert!(battle.duplicate_skill(id, bolt));
    let ch = battle.character(id).unwrap();
    let copies: Vec<_> = ch
        .skills
        .iter()
        .filter(|s| s.id.skill == SkillId::PiercingBolt)
        .collect();
    assert_eq!(copies.len(), 2);
    assert_ne!(copies[0].id, copies[1].id);
    assert_eq!(copies[1].criterion, Criterion::HighestHp);
    assert_eq!(copies[1].triggers, copies[0].triggers);
    assert_eq!(copies[1].cooldown_remaining, 0);
}

#[test]
fn test_reordering_changes_the_decision() {
    let mut battle = duel();
    let friendly = battle.state().characters[0].id;

    // Default priority picks the punch against an adjacent enemy
    battle.process_tick();
    assert_eq!(
        battle
            .character(friendly)
            .unwrap()
            .current_action
            .unwrap()
            .skill
            .skill,
        SkillId::LightPunch
    );

    battle.reset();
    let walk = instance_of(&battle, friendly, SkillId::Walk);
    assert!(battle.move_skill_up(friendly, walk));

    // Walk in front now wins the same situation
    battle.process_tick();
    assert_eq!(
        battle
            .character(friendly)
            .unwrap()
            .current_action
            .unwrap()
            .skill
            .skill,
        SkillId::Walk,
    );
}

#[test]
fn test_trigger_update_flips_the_outcome() {
    let mut battle = duel();
    let friendly = battle.state().characters[0].id;
    let punch = instance_of(&battle, friendly, SkillId::LightPunch);
    let walk = instance_of(&battle, friendly, SkillId::Walk);

    // Gate the punch behind a condition that cannot hold at full hp,
    // and disable the walk so nothing else fires
    battle
        .update_skill(
            friendly,
            punch,
            SkillUpdate {
                triggers: Some(vec![Trigger::new(TriggerCondition::HpBelow(50))]),
                ..Default::default()
            },
        )
        .unwrap();
    battle
        .update_skill(
            friendly,
            walk,
            SkillUpdate {
                enabled: Some(false),
                ..Default::default()
            },
        )
        .unwrap();

    battle.process_tick();
    let ch = battle.character(friendly).unwrap();
    assert!(ch.current_action.is_none());
    assert_eq!(
        ch.evaluations[0].status,
        EvalStatus::Rejected(RejectReason::TriggerFailed)
    );

    // Clearing the triggers restores the implicit always
    battle
        .update_skill(
            friendly,
            punch,
            SkillUpdate {
                triggers: Some(Vec::new()),
                ..Default::default()
            },
        )
        .unwrap();
    battle.process_tick();
    assert_eq!(
        battle
            .character(friendly)
            .unwrap()
            .current_action
            .unwrap()
            .skill
            .skill,
        SkillId::LightPunch
    );
}

#[test]
fn test_negated_filter_gates_selection() {
    let mut battle = Battle::init(vec![
        CharacterSpec::new(Faction::Friendly, 100).at(HexCoord::new(0, 0)),
        CharacterSpec::new(Faction::Enemy, 100).at(HexCoord::new(1, 0)),
    ]);
    let friendly = battle.state().characters[0].id;
    let punch = instance_of(&battle, friendly, SkillId::LightPunch);
    let walk = instance_of(&battle, friendly, SkillId::Walk);

    // NOT hp_above(50): only badly hurt targets qualify
    battle
        .update_skill(
            friendly,
            punch,
            SkillUpdate {
                filter: Some(Some(TargetFilter {
                    condition: FilterCondition::HpAbove(50),
                    negated: true,
                })),
                ..Default::default()
            },
        )
        .unwrap();
    battle
        .update_skill(
            friendly,
            walk,
            SkillUpdate {
                enabled: Some(false),
                ..Default::default()
            },
        )
        .unwrap();

    battle.process_tick();
    let ch = battle.character(friendly).unwrap();
    assert!(ch.current_action.is_none());
    assert_eq!(
        ch.evaluations[0].status,
        EvalStatus::Rejected(RejectReason::FilterFailed)
    );
}

#[test]
fn test_removing_a_character_clears_it_from_the_board() {
    let mut battle = duel();
    let enemy = battle.state().characters[1].id;
    let position = battle.character(enemy).unwrap().position;

    assert!(battle.remove_character(enemy));
    assert!(battle.character(enemy).is_none());
    // The freed cell is reusable immediately
    assert!(battle.add_character_at(Faction::Enemy, position));
}
