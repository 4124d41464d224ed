//! Battle engine - deterministic skill combat on a bounded hex board
//!
//! Characters carry an ordered skill list; every tick each idle
//! character commits to the first skill whose triggers, target, and
//! range all check out, then the wind-up elapses and the effect lands.
//!
//! Key properties:
//! - One tick is one atomic state transition, no partial application
//! - Processing order is the stored roster order, nothing re-sorted
//! - Every decision outcome is data (statuses and reason codes)
//! - No randomness anywhere in resolution

pub mod actions;
pub mod catalog;
pub mod characters;
pub mod constants;
pub mod decision;
pub mod events;
pub mod hex;
pub mod movement;
pub mod resolution;
pub mod scenario;
pub mod state;
pub mod status;
pub mod targeting;
pub mod triggers;

// Re-exports for convenient access
pub use actions::Action;
pub use catalog::{
    innate_loadout, instantiate, ActionType, MoveBehavior, Skill, SkillDefinition, SkillId,
    SkillInstanceId, SkillSerials,
};
pub use characters::Character;
pub use constants::*;
pub use decision::{decide, EvalStatus, RejectReason, SkillEvaluation};
pub use events::GameEvent;
pub use hex::{HexCoord, HexGrid};
pub use movement::advance;
pub use resolution::resolve;
pub use scenario::Scenario;
pub use state::{Battle, BattlePhase, CharacterSpec, GameState, SkillSpec, SkillUpdate};
pub use status::BattleStatus;
pub use targeting::{
    select_target, Criterion, FilterCondition, TargetFilter, TargetResolution, TargetScope,
};
pub use triggers::{
    trigger_passes, triggers_pass, ActionQualifier, ConditionScope, Trigger, TriggerCondition,
};
