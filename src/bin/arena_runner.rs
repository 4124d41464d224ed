//! Headless Arena Runner
//!
//! Runs a battle to completion without any interaction and prints a
//! JSON report, for scripted sweeps over scenarios and seeds.

use std::path::PathBuf;

use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use hex_arena::battle::catalog::SkillId;
use hex_arena::battle::events::GameEvent;
use hex_arena::battle::hex::HexGrid;
use hex_arena::battle::scenario::Scenario;
use hex_arena::battle::state::{Battle, CharacterSpec};
use hex_arena::battle::status::BattleStatus;
use hex_arena::core::error::Result;
use hex_arena::core::types::Faction;

/// Headless Arena Runner - scripted battles with a JSON report
#[derive(Parser, Debug)]
#[command(name = "arena_runner")]
#[command(about = "Run a battle to completion and output a report")]
struct Args {
    /// Scenario TOML file; a seeded skirmish is generated when omitted
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum ticks before timeout (draw)
    #[arg(long, default_value_t = 500)]
    max_ticks: u64,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Enable verbose per-tick event logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct RunReport {
    outcome: String,
    ticks: u64,
    friendly_hp: i32,
    enemy_hp: i32,
    damage_events: usize,
    heal_events: usize,
    move_events: usize,
    interrupts: usize,
    whiffs: usize,
    seed: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(if args.verbose {
            "hex_arena=debug"
        } else {
            "hex_arena=info"
        })
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);

    let mut battle = match &args.scenario {
        Some(path) => {
            let scenario = Scenario::load(path)?;
            tracing::info!(name = %scenario.name, seed, "loaded scenario");
            scenario.into_battle(args.seed)
        }
        None => random_skirmish(seed),
    };

    while battle.status() == BattleStatus::Active && battle.tick() < args.max_ticks {
        let events = battle.process_tick();
        if args.verbose {
            for event in &events {
                eprintln!("  [{}] {:?}", event.tick(), event);
            }
        }
    }

    let report = build_report(&battle, seed);

    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "text" => {
            println!("Arena Run");
            println!("=========");
            println!("Outcome: {}", report.outcome);
            println!("Ticks: {}", report.ticks);
            println!("Friendly hp total: {}", report.friendly_hp);
            println!("Enemy hp total: {}", report.enemy_hp);
            println!(
                "Events: {} damage, {} heal, {} move, {} interrupt, {} whiff",
                report.damage_events,
                report.heal_events,
                report.move_events,
                report.interrupts,
                report.whiffs
            );
            println!("Seed: {}", report.seed);
        }
        other => {
            eprintln!("Unknown format '{}', defaulting to json", other);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn build_report(battle: &Battle, seed: u64) -> RunReport {
    let state = battle.state();
    let hp_total = |faction: Faction| {
        state
            .characters
            .iter()
            .filter(|c| c.faction == faction)
            .map(|c| c.hp.max(0))
            .sum()
    };
    let count = |pred: fn(&GameEvent) -> bool| state.events.iter().filter(|e| pred(e)).count();

    RunReport {
        outcome: format!("{:?}", battle.status()),
        ticks: battle.tick(),
        friendly_hp: hp_total(Faction::Friendly),
        enemy_hp: hp_total(Faction::Enemy),
        damage_events: count(|e| matches!(e, GameEvent::Damage { .. })),
        heal_events: count(|e| matches!(e, GameEvent::Heal { .. })),
        move_events: count(|e| matches!(e, GameEvent::Move { .. })),
        interrupts: count(|e| matches!(e, GameEvent::Interrupt { .. })),
        whiffs: count(|e| matches!(e, GameEvent::Whiff { .. })),
        seed,
    }
}

/// Generate a 3v3 skirmish: seeded positions on opposite halves of the
/// board and one random extra skill each
fn random_skirmish(seed: u64) -> Battle {
    let mut rng = StdRng::seed_from_u64(seed);
    let cells = HexGrid::standard().cells();
    let extras = [
        SkillId::HeavyStrike,
        SkillId::PiercingBolt,
        SkillId::Lunge,
        SkillId::Mend,
        SkillId::Disrupt,
    ];

    let mut taken: Vec<usize> = Vec::new();
    let mut pick_cell = |rng: &mut StdRng, west: bool| loop {
        let idx = rng.gen_range(0..cells.len());
        let cell = cells[idx];
        let on_side = if west { cell.q < 0 } else { cell.q > 0 };
        if on_side && !taken.contains(&idx) {
            taken.push(idx);
            return cell;
        }
    };

    let mut specs = Vec::new();
    for faction in [Faction::Friendly, Faction::Enemy] {
        let west = faction == Faction::Friendly;
        for _ in 0..3 {
            let position = pick_cell(&mut rng, west);
            let extra = extras[rng.gen_range(0..extras.len())];
            specs.push(
                CharacterSpec::new(faction, 100)
                    .at(position)
                    .with_skills(&[extra]),
            );
        }
    }

    tracing::info!(seed, "generated seeded skirmish");
    Battle::init_seeded(specs, seed)
}
