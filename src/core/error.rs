use thiserror::Error;

use crate::battle::catalog::SkillInstanceId;
use crate::core::types::CharacterId;

#[derive(Error, Debug)]
pub enum ArenaError {
    #[error("Character not found: {0:?}")]
    CharacterNotFound(CharacterId),

    #[error("Skill instance not found: {0:?}")]
    SkillInstanceNotFound(SkillInstanceId),

    #[error("Invalid loadout: {0}")]
    InvalidLoadout(String),

    #[error("Scenario error: {0}")]
    ScenarioError(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ArenaError>;
