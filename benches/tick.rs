//! Criterion benchmark of the tick processor

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

use hex_arena::battle::catalog::SkillId;
use hex_arena::battle::hex::HexCoord;
use hex_arena::battle::state::{Battle, CharacterSpec};
use hex_arena::core::types::Faction;

/// A 4v4 battle with mixed loadouts on opposite board edges
fn skirmish() -> Battle {
    let mut specs = Vec::new();
    for i in 0..4 {
        specs.push(
            CharacterSpec::new(Faction::Friendly, 100)
                .at(HexCoord::new(-4, i))
                .with_skills(&[SkillId::PiercingBolt, SkillId::Mend]),
        );
        specs.push(
            CharacterSpec::new(Faction::Enemy, 100)
                .at(HexCoord::new(4, -i))
                .with_skills(&[SkillId::HeavyStrike, SkillId::Lunge]),
        );
    }
    Battle::init(specs)
}

fn bench_process_tick(c: &mut Criterion) {
    let battle = skirmish();

    c.bench_function("process_tick_4v4_x20", |b| {
        b.iter_batched(
            || battle.clone(),
            |mut battle| {
                for _ in 0..20 {
                    battle.process_tick();
                }
                battle
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_process_tick);
criterion_main!(benches);
