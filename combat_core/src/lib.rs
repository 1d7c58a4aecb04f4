//! combat_core - Turn-based combat core for an RPG
//!
//! This library provides:
//! - DamageResolver: Hit pipeline from attacker stat to final integer damage
//! - StatusEngine: Timed buffs/debuffs, DOT ticks and elemental synergies
//! - EnemyAI: Scored, learning ability choice with telegraphed intents
//! - TurnSequencer: Round structure, defeat/victory detection, collaborator hooks
//! - EnemySpawnPipeline: Level curves, difficulty, rarity and affixes
//!
//! All randomness goes through [`rng::BattleRng`]; services are bundled in
//! [`battle::BattleContext`] and passed explicitly.

pub mod ability;
pub mod actor;
pub mod ai;
pub mod battle;
pub mod combat;
pub mod config;
pub mod damage;
pub mod defense;
pub mod log;
pub mod prelude;
pub mod rng;
pub mod spawn;
pub mod status;
pub mod types;

// Re-export core types for convenience
pub use ability::{default_abilities, Ability, AbilityCatalog};
pub use actor::{Actor, Companion, Enemy, Player, Stats};
pub use battle::{BattleContext, BattleHooks, BattleOutcome, BattleState};
pub use combat::{apply_ability, AbilityOutcome};
pub use config::{CombatConstants, ConfigError, DifficultyConfig};
pub use log::{CombatLog, Severity};
pub use rng::{BattleRng, SeededRng};
pub use spawn::{spawn_enemy, EnemyTemplate, SpawnContext};
pub use types::{DamageKind, Difficulty, Element, RarityTier, Side};
