//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Game tick counter (simulation time unit)
pub type Tick = u64;

/// Unique identifier for a running battle, stamped at initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BattleId(pub Uuid);

impl BattleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BattleId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for characters, allocated sequentially per battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CharacterId(pub u32);

/// Which side a character fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    Friendly,
    Enemy,
}

impl Faction {
    /// The opposing faction
    pub fn opponent(&self) -> Faction {
        match self {
            Faction::Friendly => Faction::Enemy,
            Faction::Enemy => Faction::Friendly,
        }
    }
}

impl std::fmt::Display for Faction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Faction::Friendly => write!(f, "friendly"),
            Faction::Enemy => write!(f, "enemy"),
        }
    }
}
