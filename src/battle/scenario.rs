//! Load battle scenarios from TOML files
//!
//! A scenario lists the characters to place at initialization, each
//! with an optional position and loadout entries on top of the innate
//! skills. Loadout overrides are validated here, before any state is
//! built, so initialization itself never fails.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::battle::constants::MAX_TRIGGERS_PER_SKILL;
use crate::battle::state::{Battle, CharacterSpec};
use crate::core::error::{ArenaError, Result};

/// A parsed scenario file
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub characters: Vec<CharacterSpec>,
}

impl Scenario {
    /// Read and parse a scenario file
    pub fn load(path: &Path) -> Result<Scenario> {
        let content = fs::read_to_string(path)?;
        Scenario::parse(&content)
    }

    /// Parse scenario TOML
    pub fn parse(content: &str) -> Result<Scenario> {
        let scenario: Scenario = toml::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Build a battle from this scenario, seeded from the file unless
    /// the caller overrides it
    pub fn into_battle(self, seed: Option<u64>) -> Battle {
        let seed = seed.unwrap_or(self.seed);
        Battle::init_seeded(self.characters, seed)
    }

    fn validate(&self) -> Result<()> {
        for character in &self.characters {
            for entry in &character.skills {
                if let Some(triggers) = &entry.triggers {
                    if triggers.len() > MAX_TRIGGERS_PER_SKILL {
                        return Err(ArenaError::InvalidLoadout(format!(
                            "{:?}: at most {} triggers per skill",
                            entry.id, MAX_TRIGGERS_PER_SKILL
                        )));
                    }
                }
                if let Some(behavior) = entry.behavior {
                    let def = entry.id.definition();
                    if !def.behaviors.contains(&behavior) {
                        return Err(ArenaError::InvalidLoadout(format!(
                            "{} does not support {:?}",
                            def.name, behavior
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::catalog::SkillId;
    use crate::battle::hex::HexCoord;
    use crate::battle::status::BattleStatus;
    use crate::battle::targeting::Criterion;
    use crate::core::types::Faction;

    const DUEL: &str = r#"
name = "duel"
seed = 7

[[characters]]
name = "bram"
faction = "friendly"
hp = 100
position = { q = -2, r = 0 }

[[characters.skills]]
id = "heavy_strike"

[[characters]]
faction = "enemy"
hp = 80
position = { q = 2, r = 0 }

[[characters.skills]]
id = "mend"
target = "ally"
criterion = "lowest_hp"
"#;

    #[test]
    fn test_parse_scenario() {
        let scenario = Scenario::parse(DUEL).unwrap();
        assert_eq!(scenario.name, "duel");
        assert_eq!(scenario.seed, 7);
        assert_eq!(scenario.characters.len(), 2);

        let bram = &scenario.characters[0];
        assert_eq!(bram.name, "bram");
        assert_eq!(bram.faction, Faction::Friendly);
        assert_eq!(bram.position, Some(HexCoord::new(-2, 0)));
        assert_eq!(bram.skills[0].id, SkillId::HeavyStrike);

        let foe = &scenario.characters[1];
        assert_eq!(foe.skills[0].criterion, Some(Criterion::LowestHp));
    }

    #[test]
    fn test_scenario_builds_battle() {
        let battle = Scenario::parse(DUEL).unwrap().into_battle(None);
        assert_eq!(battle.state().seed, 7);
        assert_eq!(battle.status(), BattleStatus::Active);

        let bram = &battle.state().characters[0];
        assert_eq!(bram.name, "bram");
        assert_eq!(bram.position, HexCoord::new(-2, 0));
        // Innate loadout plus the scenario entry
        assert_eq!(bram.instance_count(SkillId::HeavyStrike), 1);
        assert_eq!(bram.skills.len(), 3);

        let foe = &battle.state().characters[1];
        let mend = foe
            .skills
            .iter()
            .find(|s| s.id.skill == SkillId::Mend)
            .unwrap();
        assert_eq!(mend.criterion, Criterion::LowestHp);
    }

    #[test]
    fn test_trigger_override_parses() {
        let content = r#"
[[characters]]
faction = "friendly"
hp = 100

[[characters.skills]]
id = "piercing_bolt"
triggers = [
    { condition = { hp_below = 50 } },
    { condition = { enemy_in_range = 3 }, negated = true },
]
"#;
        let scenario = Scenario::parse(content).unwrap();
        let triggers = scenario.characters[0].skills[0].triggers.as_ref().unwrap();
        assert_eq!(triggers.len(), 2);
        assert!(!triggers[0].negated);
        assert!(triggers[1].negated);
    }

    #[test]
    fn test_too_many_triggers_rejected() {
        let content = r#"
[[characters]]
faction = "friendly"
hp = 100

[[characters.skills]]
id = "light_punch"
triggers = [
    { condition = "always" },
    { condition = "always" },
    { condition = "always" },
]
"#;
        assert!(matches!(
            Scenario::parse(content),
            Err(ArenaError::InvalidLoadout(_))
        ));
    }

    #[test]
    fn test_unsupported_behavior_rejected() {
        let content = r#"
[[characters]]
faction = "friendly"
hp = 100

[[characters.skills]]
id = "lunge"
behavior = "away"
"#;
        assert!(matches!(
            Scenario::parse(content),
            Err(ArenaError::InvalidLoadout(_))
        ));
    }

    #[test]
    fn test_invalid_toml_is_a_scenario_error() {
        assert!(matches!(
            Scenario::parse("characters = 3"),
            Err(ArenaError::ScenarioError(_))
        ));
    }

    #[test]
    fn test_empty_scenario() {
        let scenario = Scenario::parse("").unwrap();
        let battle = scenario.into_battle(Some(1));
        assert_eq!(battle.status(), BattleStatus::Draw);
    }
}
