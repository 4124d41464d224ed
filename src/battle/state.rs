//! Game state and the battle lifecycle API
//!
//! `GameState` is a plain value: every engine operation takes it
//! explicitly and a tick is one atomic transition. `Battle` wraps a
//! state together with the snapshot captured at initialization so
//! `reset` can restore it bit-for-bit.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::battle::catalog::{self, MoveBehavior, Skill, SkillId, SkillInstanceId, SkillSerials};
use crate::battle::characters::Character;
use crate::battle::constants::{DEFAULT_HP, MAX_SKILL_SLOTS, MAX_TRIGGERS_PER_SKILL};
use crate::battle::decision::{self, SkillEvaluation};
use crate::battle::events::GameEvent;
use crate::battle::hex::{HexCoord, HexGrid};
use crate::battle::resolution;
use crate::battle::status::{self, BattleStatus};
use crate::battle::targeting::{Criterion, TargetFilter, TargetScope};
use crate::battle::triggers::Trigger;
use crate::core::error::{ArenaError, Result};
use crate::core::types::{BattleId, CharacterId, Faction, Tick};

/// Coarse lifecycle phase, derived from the battle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattlePhase {
    #[default]
    Active,
    Finished,
}

/// Everything the engine knows about one battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub battle_id: BattleId,
    /// Stored order is the deterministic processing order for a tick
    pub characters: Vec<Character>,
    pub tick: Tick,
    pub phase: BattlePhase,
    pub status: BattleStatus,
    pub events: Vec<GameEvent>,
    /// Reserved for stochastic resolution; nothing consumes it yet
    pub seed: u64,
    next_character_id: u32,
    skill_serials: SkillSerials,
}

/// One loadout entry of a character blueprint: the catalog skill to
/// assign plus optional overrides of its configuration defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillSpec {
    pub id: SkillId,
    #[serde(default)]
    pub target: Option<TargetScope>,
    #[serde(default)]
    pub criterion: Option<Criterion>,
    #[serde(default)]
    pub triggers: Option<Vec<Trigger>>,
    #[serde(default)]
    pub filter: Option<TargetFilter>,
    #[serde(default)]
    pub behavior: Option<MoveBehavior>,
}

impl SkillSpec {
    pub fn new(id: SkillId) -> Self {
        Self {
            id,
            target: None,
            criterion: None,
            triggers: None,
            filter: None,
            behavior: None,
        }
    }
}

impl From<SkillId> for SkillSpec {
    fn from(id: SkillId) -> Self {
        Self::new(id)
    }
}

/// Blueprint for a character added at battle initialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSpec {
    #[serde(default)]
    pub name: String,
    pub faction: Faction,
    pub hp: i32,
    #[serde(default)]
    pub max_hp: Option<i32>,
    #[serde(default)]
    pub position: Option<HexCoord>,
    /// Assigned on top of the innate loadout, in order
    #[serde(default)]
    pub skills: Vec<SkillSpec>,
}

impl CharacterSpec {
    pub fn new(faction: Faction, hp: i32) -> Self {
        Self {
            name: String::new(),
            faction,
            hp,
            max_hp: None,
            position: None,
            skills: Vec::new(),
        }
    }

    pub fn at(mut self, position: HexCoord) -> Self {
        self.position = Some(position);
        self
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_skills(mut self, skills: &[SkillId]) -> Self {
        self.skills = skills.iter().copied().map(SkillSpec::new).collect();
        self
    }

    pub fn with_skill(mut self, skill: SkillSpec) -> Self {
        self.skills.push(skill);
        self
    }
}

/// Partial update for one skill instance. `None` fields are untouched;
/// `filter: Some(None)` clears the filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillUpdate {
    pub enabled: Option<bool>,
    pub triggers: Option<Vec<Trigger>>,
    pub target: Option<TargetScope>,
    pub criterion: Option<Criterion>,
    pub filter: Option<Option<TargetFilter>>,
    pub behavior: Option<MoveBehavior>,
}

impl GameState {
    fn new(seed: u64) -> Self {
        Self {
            battle_id: BattleId::new(),
            characters: Vec::new(),
            tick: 0,
            phase: BattlePhase::Active,
            status: BattleStatus::Draw,
            events: Vec::new(),
            seed,
            next_character_id: 1,
            skill_serials: SkillSerials::new(),
        }
    }

    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    fn index_of(&self, id: CharacterId) -> Option<usize> {
        self.characters.iter().position(|c| c.id == id)
    }

    fn occupied(&self) -> AHashSet<HexCoord> {
        self.characters.iter().map(|c| c.position).collect()
    }

    /// Place a character, at its requested cell or the first free cell
    /// in board enumeration order. Returns false when no cell is
    /// available.
    fn spawn(&mut self, spec: CharacterSpec) -> bool {
        let grid = HexGrid::standard();
        let occupied = self.occupied();
        let position = match spec.position {
            Some(p) => {
                if !grid.contains(&p) || occupied.contains(&p) {
                    return false;
                }
                p
            }
            None => match grid.cells().into_iter().find(|c| !occupied.contains(c)) {
                Some(p) => p,
                None => return false,
            },
        };

        let id = CharacterId(self.next_character_id);
        self.next_character_id += 1;

        let mut skills = catalog::innate_loadout(&mut self.skill_serials);
        for entry in &spec.skills {
            if !try_assign(&mut skills, entry.id, &mut self.skill_serials) {
                tracing::warn!(skill = ?entry.id, "loadout entry dropped, cap reached");
                continue;
            }
            let Some(skill) = skills.last_mut() else {
                continue;
            };
            if let Some(target) = entry.target {
                skill.target = target;
            }
            if let Some(criterion) = entry.criterion {
                skill.criterion = criterion;
            }
            if let Some(triggers) = &entry.triggers {
                skill.triggers = triggers.clone();
            }
            if let Some(filter) = entry.filter {
                skill.filter = Some(filter);
            }
            if let Some(behavior) = entry.behavior {
                skill.behavior = behavior;
            }
        }

        let max_hp = spec.max_hp.unwrap_or_else(|| spec.hp.max(DEFAULT_HP));
        let name = if spec.name.is_empty() {
            format!("{}-{}", spec.faction, id.0)
        } else {
            spec.name
        };

        self.characters.push(Character::new(
            id,
            name,
            spec.faction,
            spec.hp,
            max_hp,
            position,
            skills,
        ));
        true
    }

    fn refresh_status(&mut self) {
        self.status = status::compute(&self.characters);
        self.phase = match self.status {
            BattleStatus::Active => BattlePhase::Active,
            _ => BattlePhase::Finished,
        };
    }

    /// Run one atomic tick: decisions for idle characters, resolution
    /// of elapsed wind-ups, cooldown decrement, time advance, status
    /// recompute. Returns the events this tick produced (they are also
    /// appended to the history).
    pub fn process_tick(&mut self) -> Vec<GameEvent> {
        let tick = self.tick;
        let grid = HexGrid::standard();
        tracing::debug!(tick, characters = self.characters.len(), "processing tick");

        // Decisions in stored roster order. Later characters see the
        // actions committed by earlier ones this tick.
        for idx in 0..self.characters.len() {
            if self.characters[idx].current_action.is_some() {
                continue; // mid-action lock
            }
            let (evaluations, action) = decision::decide(idx, &self.characters, tick);
            let ch = &mut self.characters[idx];
            ch.evaluations = evaluations;
            ch.current_action = action;
        }

        // Resolve everything due this tick, same order. An interrupt
        // resolving earlier in the pass can cancel a later character's
        // due action before it fires.
        let mut events = Vec::new();
        for idx in 0..self.characters.len() {
            let Some(action) = self.characters[idx].current_action else {
                continue;
            };
            if action.resolves_at != tick {
                continue;
            }
            self.characters[idx].current_action = None;
            events.extend(resolution::resolve(
                idx,
                &action,
                &mut self.characters,
                &grid,
                tick,
            ));
        }

        for ch in &mut self.characters {
            for skill in &mut ch.skills {
                if skill.cooldown_remaining > 0 {
                    skill.cooldown_remaining -= 1;
                }
            }
        }

        self.tick += 1;
        self.refresh_status();

        self.events.extend(events.iter().copied());
        events
    }

    /// Advance the tick counter without processing anything
    pub fn next_tick(&mut self) {
        self.tick += 1;
    }
}

/// Push a new instance of a definition onto a loadout, subject to the
/// slot cap and the definition's instance cap
fn try_assign(skills: &mut Vec<Skill>, skill_id: SkillId, serials: &mut SkillSerials) -> bool {
    if skills.len() >= MAX_SKILL_SLOTS {
        return false;
    }
    let def = skill_id.definition();
    let existing = skills.iter().filter(|s| s.id.skill == skill_id).count();
    if existing >= def.max_instances as usize {
        return false;
    }
    skills.push(catalog::instantiate(skill_id, serials));
    true
}

/// A running battle: the live state plus its initial snapshot
#[derive(Debug, Clone)]
pub struct Battle {
    state: GameState,
    initial: GameState,
}

impl Battle {
    /// Initialize a battle and capture the reset snapshot
    pub fn init(specs: Vec<CharacterSpec>) -> Self {
        Self::init_seeded(specs, 0)
    }

    pub fn init_seeded(specs: Vec<CharacterSpec>, seed: u64) -> Self {
        let mut state = GameState::new(seed);
        for spec in specs {
            state.spawn(spec);
        }
        state.refresh_status();
        Self {
            initial: state.clone(),
            state,
        }
    }

    pub fn init_empty() -> Self {
        Self::init(Vec::new())
    }

    /// Restore the initial snapshot exactly
    pub fn reset(&mut self) {
        self.state = self.initial.clone();
    }

    // ---- queries -------------------------------------------------------

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tick(&self) -> Tick {
        self.state.tick
    }

    pub fn status(&self) -> BattleStatus {
        self.state.status
    }

    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.state.character(id)
    }

    /// Last decision report for a character. Unavailable mid-action:
    /// the committed action is the only information until it resolves.
    pub fn evaluations(&self, id: CharacterId) -> Option<&[SkillEvaluation]> {
        let ch = self.state.character(id)?;
        if ch.current_action.is_some() {
            return None;
        }
        Some(&ch.evaluations)
    }

    /// Events at or after the given tick, oldest first
    pub fn events_since(&self, tick: Tick) -> Vec<GameEvent> {
        self.state
            .events
            .iter()
            .filter(|e| e.tick() >= tick)
            .copied()
            .collect()
    }

    // ---- tick control --------------------------------------------------

    pub fn process_tick(&mut self) -> Vec<GameEvent> {
        self.state.process_tick()
    }

    pub fn next_tick(&mut self) {
        self.state.next_tick();
    }

    // ---- roster --------------------------------------------------------

    /// Add a fresh character at the first free cell. False if the board
    /// is full.
    pub fn add_character(&mut self, faction: Faction) -> bool {
        let spawned = self.state.spawn(CharacterSpec::new(faction, DEFAULT_HP));
        if spawned {
            self.state.refresh_status();
        }
        spawned
    }

    /// Add a fresh character at a specific cell. False if the cell is
    /// off the board or occupied.
    pub fn add_character_at(&mut self, faction: Faction, position: HexCoord) -> bool {
        let spawned = self
            .state
            .spawn(CharacterSpec::new(faction, DEFAULT_HP).at(position));
        if spawned {
            self.state.refresh_status();
        }
        spawned
    }

    pub fn remove_character(&mut self, id: CharacterId) -> bool {
        match self.state.index_of(id) {
            Some(idx) => {
                self.state.characters.remove(idx);
                self.state.refresh_status();
                true
            }
            None => false,
        }
    }

    // ---- loadout management --------------------------------------------

    /// Assign a new instance of a catalog skill. False when the slot
    /// cap or the definition's instance cap is hit.
    pub fn assign_skill(&mut self, character: CharacterId, skill: SkillId) -> bool {
        let Some(idx) = self.state.index_of(character) else {
            return false;
        };
        let characters = &mut self.state.characters;
        let serials = &mut self.state.skill_serials;
        try_assign(&mut characters[idx].skills, skill, serials)
    }

    /// Remove a skill instance. Innate definitions never drop below one
    /// instance.
    pub fn remove_skill(&mut self, character: CharacterId, instance: SkillInstanceId) -> bool {
        let Some(idx) = self.state.index_of(character) else {
            return false;
        };
        let ch = &mut self.state.characters[idx];
        let Some(pos) = ch.skills.iter().position(|s| s.id == instance) else {
            return false;
        };
        if instance.skill.definition().innate && ch.instance_count(instance.skill) <= 1 {
            return false;
        }
        ch.skills.remove(pos);
        true
    }

    /// Copy an instance's configuration into a new instance right after
    /// it in the priority list, subject to the same caps as assignment.
    pub fn duplicate_skill(&mut self, character: CharacterId, instance: SkillInstanceId) -> bool {
        let Some(idx) = self.state.index_of(character) else {
            return false;
        };
        let characters = &mut self.state.characters;
        let serials = &mut self.state.skill_serials;
        let ch = &mut characters[idx];

        let Some(pos) = ch.skills.iter().position(|s| s.id == instance) else {
            return false;
        };
        if ch.skills.len() >= MAX_SKILL_SLOTS {
            return false;
        }
        let def = instance.skill.definition();
        if ch.instance_count(instance.skill) >= def.max_instances as usize {
            return false;
        }

        let mut copy = ch.skills[pos].clone();
        copy.id = SkillInstanceId {
            skill: instance.skill,
            serial: serials.next(instance.skill),
        };
        copy.cooldown_remaining = 0;
        ch.skills.insert(pos + 1, copy);
        true
    }

    /// Apply a partial update to one skill instance, validated as a
    /// whole before anything is written.
    pub fn update_skill(
        &mut self,
        character: CharacterId,
        instance: SkillInstanceId,
        update: SkillUpdate,
    ) -> Result<()> {
        let idx = self
            .state
            .index_of(character)
            .ok_or(ArenaError::CharacterNotFound(character))?;
        let skill = self.state.characters[idx]
            .skill_mut(instance)
            .ok_or(ArenaError::SkillInstanceNotFound(instance))?;

        if let Some(triggers) = &update.triggers {
            if triggers.len() > MAX_TRIGGERS_PER_SKILL {
                return Err(ArenaError::InvalidLoadout(format!(
                    "at most {} triggers per skill",
                    MAX_TRIGGERS_PER_SKILL
                )));
            }
        }
        if let Some(behavior) = update.behavior {
            let def = instance.skill.definition();
            if !def.behaviors.contains(&behavior) {
                return Err(ArenaError::InvalidLoadout(format!(
                    "{} does not support {:?}",
                    def.name, behavior
                )));
            }
        }

        if let Some(enabled) = update.enabled {
            skill.enabled = enabled;
        }
        if let Some(triggers) = update.triggers {
            skill.triggers = triggers;
        }
        if let Some(target) = update.target {
            skill.target = target;
        }
        if let Some(criterion) = update.criterion {
            skill.criterion = criterion;
        }
        if let Some(filter) = update.filter {
            skill.filter = filter;
        }
        if let Some(behavior) = update.behavior {
            skill.behavior = behavior;
        }
        Ok(())
    }

    /// Move a skill one step towards the front of the priority list
    pub fn move_skill_up(&mut self, character: CharacterId, instance: SkillInstanceId) -> bool {
        let Some(idx) = self.state.index_of(character) else {
            return false;
        };
        let ch = &mut self.state.characters[idx];
        match ch.skills.iter().position(|s| s.id == instance) {
            Some(pos) if pos > 0 => {
                ch.skills.swap(pos, pos - 1);
                true
            }
            _ => false,
        }
    }

    /// Move a skill one step towards the back of the priority list
    pub fn move_skill_down(&mut self, character: CharacterId, instance: SkillInstanceId) -> bool {
        let Some(idx) = self.state.index_of(character) else {
            return false;
        };
        let ch = &mut self.state.characters[idx];
        match ch.skills.iter().position(|s| s.id == instance) {
            Some(pos) if pos + 1 < ch.skills.len() => {
                ch.skills.swap(pos, pos + 1);
                true
            }
            _ => false,
        }
    }
}
