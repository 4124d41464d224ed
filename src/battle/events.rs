//! Battle events - the append-only record of everything that resolved

use serde::{Deserialize, Serialize};

use crate::battle::catalog::{ActionType, SkillInstanceId};
use crate::battle::hex::HexCoord;
use crate::core::types::{CharacterId, Tick};

/// One resolved effect. Events are immutable once appended; the
/// presentation layer reads recent ones for overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameEvent {
    Damage {
        tick: Tick,
        source: CharacterId,
        target: CharacterId,
        amount: i32,
        resulting_hp: i32,
    },
    Heal {
        tick: Tick,
        source: CharacterId,
        target: CharacterId,
        amount: i32,
        resulting_hp: i32,
    },
    Move {
        tick: Tick,
        source: CharacterId,
        from: HexCoord,
        to: HexCoord,
    },
    Interrupt {
        tick: Tick,
        source: CharacterId,
        target: CharacterId,
        cancelled: SkillInstanceId,
    },
    /// The aimed-at cell no longer held a valid target at resolution
    Whiff {
        tick: Tick,
        source: CharacterId,
        action_type: ActionType,
        target_cell: HexCoord,
    },
}

impl GameEvent {
    pub fn tick(&self) -> Tick {
        match self {
            GameEvent::Damage { tick, .. }
            | GameEvent::Heal { tick, .. }
            | GameEvent::Move { tick, .. }
            | GameEvent::Interrupt { tick, .. }
            | GameEvent::Whiff { tick, .. } => *tick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_tick_accessor() {
        let event = GameEvent::Whiff {
            tick: 9,
            source: CharacterId(1),
            action_type: ActionType::Attack,
            target_cell: HexCoord::new(2, -1),
        };
        assert_eq!(event.tick(), 9);
    }
}
