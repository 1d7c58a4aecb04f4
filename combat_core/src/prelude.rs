//! Prelude module for convenient imports
//!
//! ```rust
//! use combat_core::prelude::*;
//! ```

// Core types
pub use crate::types::{DamageKind, Difficulty, Element, RarityTier, Side};

// Services
pub use crate::battle::{BattleContext, BattleHooks, HookError, NoopHooks, SaveReason};
pub use crate::log::{CombatLog, LogEntry, Severity};
pub use crate::rng::{BattleRng, ScriptedRng, SeededRng};

// Static data
pub use crate::ability::{default_abilities, Ability, AbilityCatalog};
pub use crate::config::{CombatConstants, DifficultyConfig};

// Actors
pub use crate::actor::{Actor, Companion, Enemy, Player, Stats};

// Turn flow
pub use crate::battle::{
    flee, play_round, player_action, run_enemy_phase, start_battle, BattleOutcome, BattleState,
};
pub use crate::combat::{apply_ability, AbilityOutcome};

// Spawning
pub use crate::spawn::{
    default_templates, spawn_enemy, spawn_group, EnemyTemplate, SpawnContext, SpawnTables,
};
