//! Combat constants configuration

use serde::{Deserialize, Serialize};

/// Tunable combat constants
///
/// Every group deserializes with defaults, so a TOML override only needs the
/// keys it changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConstants {
    pub damage: DamageConstants,
    pub synergy: SynergyConstants,
    pub learning: LearningConstants,
    pub posture: PostureConstants,
    pub scaling: ScalingConstants,
    pub elite: EliteConstants,
    pub affixes: AffixConstants,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageConstants {
    /// Critical strike multiplier (1.5 = 150%)
    #[serde(default = "default_crit_multiplier")]
    pub crit_multiplier: f64,
    /// Formula constant: damage * scale / (scale + effective_defense)
    #[serde(default = "default_defense_scale")]
    pub defense_scale: f64,
    /// Elemental resistance cap in percent, applied symmetrically
    #[serde(default = "default_max_resist")]
    pub max_resist: f64,
    /// Damage reduction from a forced guard turn
    #[serde(default = "default_forced_guard_reduction")]
    pub forced_guard_reduction: f64,
}

impl Default for DamageConstants {
    fn default() -> Self {
        DamageConstants {
            crit_multiplier: 1.5,
            defense_scale: 100.0,
            max_resist: 75.0,
            forced_guard_reduction: 0.5,
        }
    }
}

fn default_crit_multiplier() -> f64 {
    1.5
}
fn default_defense_scale() -> f64 {
    100.0
}
fn default_max_resist() -> f64 {
    75.0
}
fn default_forced_guard_reduction() -> f64 {
    0.5
}

/// Cross-effect synergy numbers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynergyConstants {
    /// Burn magnitude as a share of the igniting hit
    pub ignite_ratio: f64,
    pub ignite_min: u32,
    pub ignite_turns: u32,
    /// Bonus burst as a share of the physical hit consuming chill
    pub shatter_ratio: f64,
    pub shatter_min: u32,
}

impl Default for SynergyConstants {
    fn default() -> Self {
        SynergyConstants {
            ignite_ratio: 0.12,
            ignite_min: 2,
            ignite_turns: 2,
            shatter_ratio: 0.18,
            shatter_min: 1,
        }
    }
}

/// Enemy learning and exploration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConstants {
    /// EMA blend factor for new rewards
    pub rate: f64,
    pub exploration_decay: f64,
    pub exploration_floor: f64,
    pub initial_exploration: f64,
    pub epsilon_min: f64,
    pub epsilon_max: f64,
    pub heal_weight: f64,
    pub shield_weight: f64,
    /// Learned value weight = learned_base + smartness * learned_smart
    pub learned_base: f64,
    pub learned_smart: f64,
    /// Maximum number of abilities tracked per enemy
    pub memory_capacity: usize,
}

impl Default for LearningConstants {
    fn default() -> Self {
        LearningConstants {
            rate: 0.18,
            exploration_decay: 0.996,
            exploration_floor: 0.06,
            initial_exploration: 0.25,
            epsilon_min: 0.05,
            epsilon_max: 0.35,
            heal_weight: 0.8,
            shield_weight: 0.35,
            learned_base: 0.35,
            learned_smart: 0.45,
            memory_capacity: 32,
        }
    }
}

/// Enemy posture pool sizing and break rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostureConstants {
    pub base: f64,
    pub per_level: f64,
    pub elite_mult: f64,
    pub boss_mult: f64,
    /// Share of HP damage also dealt to posture
    pub damage_ratio: f64,
    pub broken_turns: u32,
}

impl Default for PostureConstants {
    fn default() -> Self {
        PostureConstants {
            base: 20.0,
            per_level: 3.0,
            elite_mult: 1.5,
            boss_mult: 2.5,
            damage_ratio: 0.5,
            broken_turns: 2,
        }
    }
}

/// Per-level exponential stat curves (value *= growth ^ level_delta)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalingConstants {
    pub hp_growth: f64,
    pub attack_growth: f64,
    pub defense_growth: f64,
    pub xp_growth: f64,
    pub gold_growth: f64,
}

impl Default for ScalingConstants {
    fn default() -> Self {
        ScalingConstants {
            hp_growth: 1.14,
            attack_growth: 1.11,
            defense_growth: 1.05,
            xp_growth: 1.16,
            gold_growth: 1.13,
        }
    }
}

/// Elite stat multipliers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EliteConstants {
    pub hp: f64,
    pub attack: f64,
    pub magic: f64,
    pub armor: f64,
    pub magic_res: f64,
    pub xp: f64,
    pub gold: f64,
}

impl Default for EliteConstants {
    fn default() -> Self {
        EliteConstants {
            hp: 1.5,
            attack: 1.25,
            magic: 1.25,
            armor: 1.15,
            magic_res: 1.15,
            xp: 1.75,
            gold: 1.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AffixConstants {
    /// Hard ceiling on affixes per enemy
    pub max_affixes: u32,
    /// Boss-only chance of one extra affix
    pub boss_bonus_chance: f64,
    /// HP ratio at which the berserk latch fires
    pub berserk_threshold: f64,
}

impl Default for AffixConstants {
    fn default() -> Self {
        AffixConstants {
            max_affixes: 3,
            boss_bonus_chance: 0.5,
            berserk_threshold: 0.3,
        }
    }
}
