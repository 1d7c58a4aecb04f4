//! Collaborator callbacks invoked by the sequencer

use crate::actor::{Enemy, Player};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by a collaborator hook
///
/// The sequencer logs these and carries on; they never abort a transition.
#[derive(Error, Debug)]
pub enum HookError {
    #[error("reward generation failed: {0}")]
    Reward(String),
    #[error("save request failed: {0}")]
    Save(String),
    #[error("hook failed: {0}")]
    Other(String),
}

/// Why a save is being requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveReason {
    EnemyDefeated,
    Victory,
    Defeat,
    Fled,
}

/// Reward/loot and persistence collaborators
///
/// Every method defaults to a no-op.
pub trait BattleHooks {
    /// Called once per enemy, after its defeat has been stamped
    fn on_enemy_defeated(&mut self, _enemy: &Enemy) -> Result<(), HookError> {
        Ok(())
    }

    fn on_victory(&mut self, _player: &Player, _enemies: &[Enemy]) -> Result<(), HookError> {
        Ok(())
    }

    fn on_defeat(&mut self, _player: &Player) -> Result<(), HookError> {
        Ok(())
    }

    fn request_save(&mut self, _reason: SaveReason) -> Result<(), HookError> {
        Ok(())
    }
}

/// Hooks that do nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl BattleHooks for NoopHooks {}
