//! Hex Arena - Entry Point
//!
//! Interactive stepper for the battle engine: sets up a small skirmish,
//! then reads commands from stdin to advance ticks and inspect state.

use hex_arena::battle::catalog::SkillId;
use hex_arena::battle::events::GameEvent;
use hex_arena::battle::hex::HexCoord;
use hex_arena::battle::state::{Battle, CharacterSpec};
use hex_arena::battle::status::BattleStatus;
use hex_arena::core::error::Result;
use hex_arena::core::types::Faction;

use std::io::{self, Write};

fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("hex_arena=debug")
        .init();

    tracing::info!("Hex Arena starting...");

    let mut battle = starter_battle();

    println!("\n=== HEX ARENA ===");
    println!("Deterministic skill combat on a hex board");
    println!();
    println!("Commands:");
    println!("  tick / t        - Advance the battle by one tick");
    println!("  run <n>         - Run n ticks");
    println!("  status / s      - Show the full roster");
    println!("  add <faction>   - Add a character (friendly or enemy)");
    println!("  reset           - Restore the initial snapshot");
    println!("  quit / q        - Exit");
    println!();

    loop {
        display_status(&battle);

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input == "quit" || input == "q" {
            break;
        }

        if input == "tick" || input == "t" {
            let events = battle.process_tick();
            display_events(&events);
            println!("Tick {} complete.", battle.tick());
            continue;
        }

        if input == "status" || input == "s" {
            display_detailed_status(&battle);
            continue;
        }

        if let Some(rest) = input.strip_prefix("run ") {
            if let Ok(n) = rest.parse::<u32>() {
                println!("Running {} ticks...", n);
                for _ in 0..n {
                    let events = battle.process_tick();
                    display_events(&events);
                    if battle.status() != BattleStatus::Active {
                        break;
                    }
                }
                println!(
                    "Now at tick {}, status {:?}.",
                    battle.tick(),
                    battle.status()
                );
            } else {
                println!("Usage: run <number>");
            }
            continue;
        }

        if let Some(rest) = input.strip_prefix("add ") {
            let faction = match rest {
                "friendly" | "f" => Some(Faction::Friendly),
                "enemy" | "e" => Some(Faction::Enemy),
                _ => None,
            };
            match faction {
                Some(faction) => {
                    if battle.add_character(faction) {
                        println!("Added a {} character.", faction);
                    } else {
                        println!("Board is full.");
                    }
                }
                None => println!("Usage: add <friendly|enemy>"),
            }
            continue;
        }

        if input == "reset" {
            battle.reset();
            println!("Restored the initial snapshot.");
            continue;
        }

        println!("Unknown command. Available: tick, run <n>, status, add <faction>, reset, quit");
    }

    println!(
        "\nGoodbye! Final state: {} characters, {} ticks elapsed, status {:?}.",
        battle.state().characters.len(),
        battle.tick(),
        battle.status()
    );
    Ok(())
}

/// A small skirmish to step through: a bruiser and a healer against
/// two raiders
fn starter_battle() -> Battle {
    let battle = Battle::init(vec![
        CharacterSpec::new(Faction::Friendly, 100)
            .named("Bram")
            .at(HexCoord::new(-3, 0))
            .with_skills(&[SkillId::HeavyStrike]),
        CharacterSpec::new(Faction::Friendly, 80)
            .named("Wren")
            .at(HexCoord::new(-4, 1))
            .with_skills(&[SkillId::Mend, SkillId::PiercingBolt]),
        CharacterSpec::new(Faction::Enemy, 90)
            .named("Raider")
            .at(HexCoord::new(3, 0))
            .with_skills(&[SkillId::Lunge]),
        CharacterSpec::new(Faction::Enemy, 90)
            .named("Skirmisher")
            .at(HexCoord::new(4, -1))
            .with_skills(&[SkillId::PiercingBolt, SkillId::Disrupt]),
    ]);
    tracing::info!(
        characters = battle.state().characters.len(),
        "starter battle initialized"
    );
    battle
}

/// Display a brief status summary
fn display_status(battle: &Battle) {
    println!();
    println!(
        "--- Tick {} | Status: {:?} ---",
        battle.tick(),
        battle.status()
    );

    for ch in &battle.state().characters {
        let action = match &ch.current_action {
            Some(a) => format!(
                "{} (resolves at tick {})",
                a.skill.skill.definition().name,
                a.resolves_at
            ),
            None => "idle".to_string(),
        };
        println!(
            "  [{}] {} at ({},{}) - {}/{} hp - {}",
            ch.faction, ch.name, ch.position.q, ch.position.r, ch.hp, ch.max_hp, action
        );
    }
    println!();
}

/// Display the full roster with loadouts and last decision reports
fn display_detailed_status(battle: &Battle) {
    println!();
    println!("=== Detailed Status (Tick {}) ===", battle.tick());
    println!();

    for ch in &battle.state().characters {
        println!("{} ({}, {}/{} hp)", ch.name, ch.faction, ch.hp, ch.max_hp);
        for skill in &ch.skills {
            let def = skill.definition();
            let cooldown = if skill.cooldown_remaining > 0 {
                format!(", cooldown {}", skill.cooldown_remaining)
            } else {
                String::new()
            };
            println!(
                "  {} #{} ({:?}, range {}{}{})",
                def.name,
                skill.id.serial,
                def.action_type,
                def.range,
                if skill.enabled { "" } else { ", disabled" },
                cooldown
            );
        }
        match battle.evaluations(ch.id) {
            Some(evals) => {
                for eval in evals {
                    println!("    {:?} -> {:?}", eval.skill.skill, eval.status);
                }
            }
            None => println!("    (mid-action, no evaluation until resolution)"),
        }
        println!();
    }
}

/// Print the events one tick produced
fn display_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::Damage {
                source,
                target,
                amount,
                resulting_hp,
                ..
            } => println!(
                "  {:?} hit {:?} for {} ({} hp left)",
                source, target, amount, resulting_hp
            ),
            GameEvent::Heal {
                source,
                target,
                amount,
                resulting_hp,
                ..
            } => println!(
                "  {:?} healed {:?} for {} ({} hp now)",
                source, target, amount, resulting_hp
            ),
            GameEvent::Move {
                source, from, to, ..
            } => println!(
                "  {:?} moved ({},{}) -> ({},{})",
                source, from.q, from.r, to.q, to.r
            ),
            GameEvent::Interrupt {
                source,
                target,
                cancelled,
                ..
            } => println!(
                "  {:?} interrupted {:?} ({:?} cancelled)",
                source, target, cancelled.skill
            ),
            GameEvent::Whiff {
                source,
                action_type,
                target_cell,
                ..
            } => println!(
                "  {:?} whiffed a {:?} at ({},{})",
                source, action_type, target_cell.q, target_cell.r
            ),
        }
    }
}
