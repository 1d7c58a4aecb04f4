//! Difficulty presets

use crate::types::{Difficulty, RarityTier};
use serde::{Deserialize, Serialize};

/// Active difficulty, consumed by spawning (HP) and combat (enemy damage, AI)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyConfig {
    pub id: Difficulty,
    /// Enemy max HP multiplier applied at spawn
    pub hp_mult: f64,
    /// 0..1, how strongly the AI exploits its scoring
    pub ai_smartness: f64,
    /// Enemy damage multiplier applied at hit time
    #[serde(default = "default_damage_mult")]
    pub enemy_damage_mult: f64,
    /// Highest rarity a regular enemy may roll
    pub max_rarity: RarityTier,
}

fn default_damage_mult() -> f64 {
    1.0
}

impl DifficultyConfig {
    /// Built-in preset for a difficulty id
    pub fn preset(id: Difficulty) -> Self {
        match id {
            Difficulty::Easy => DifficultyConfig {
                id,
                hp_mult: 0.85,
                ai_smartness: 0.15,
                enemy_damage_mult: 0.8,
                max_rarity: RarityTier::Common,
            },
            Difficulty::Normal => DifficultyConfig {
                id,
                hp_mult: 1.0,
                ai_smartness: 0.5,
                enemy_damage_mult: 1.0,
                max_rarity: RarityTier::Legendary,
            },
            Difficulty::Hard => DifficultyConfig {
                id,
                hp_mult: 1.2,
                ai_smartness: 0.75,
                enemy_damage_mult: 1.15,
                max_rarity: RarityTier::Mythic,
            },
            Difficulty::Nightmare => DifficultyConfig {
                id,
                hp_mult: 1.5,
                ai_smartness: 0.95,
                enemy_damage_mult: 1.3,
                max_rarity: RarityTier::Mythic,
            },
        }
    }

    /// Smartness clamped to its valid range
    pub fn smartness(&self) -> f64 {
        self.ai_smartness.clamp(0.0, 1.0)
    }

    pub fn is_easy(&self) -> bool {
        self.id == Difficulty::Easy
    }
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self::preset(Difficulty::Normal)
    }
}
