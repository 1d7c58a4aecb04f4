//! Enemy affixes - weighted pool, count roll and stat effects

use super::rarity::RarityTable;
use crate::actor::{AppliedAffix, BerserkLatch, Enemy};
use crate::config::{load_toml, parse_toml, AffixConstants, ConfigError};
use crate::rng::{pick_weighted, BattleRng};
use crate::types::RarityTier;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What an affix does to the enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffixEffect {
    /// Attack multiplier bonus
    Brutal,
    /// Magic multiplier bonus
    Arcane,
    /// Flat armor and magic resistance
    Armored,
    /// Lifesteal percent
    Vampiric,
    /// Flat physical reflect
    Thorned,
    /// Dodge percent
    Swift,
    /// Max HP multiplier bonus
    Hardy,
    /// Enrage latch below the configured HP ratio
    Berserk,
    /// Combat-start shield
    Shielded,
    /// HP per round
    Regenerating,
    /// Crit percent
    Keen,
}

/// One entry of the affix pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffixDef {
    pub id: String,
    pub name: String,
    pub weight: f64,
    pub effect: AffixEffect,
    #[serde(default)]
    pub base: f64,
    #[serde(default)]
    pub per_level: f64,
    #[serde(default)]
    pub per_rank: f64,
}

impl AffixDef {
    /// Effect magnitude for an enemy of `level` and `tier`
    pub fn magnitude(&self, level: u32, tier: RarityTier) -> f64 {
        self.base + self.per_level * level as f64 + self.per_rank * tier.rank() as f64
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AffixPool {
    pub affixes: Vec<AffixDef>,
}

impl AffixPool {
    pub fn get(&self, id: &str) -> Option<&AffixDef> {
        self.affixes.iter().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.affixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.affixes.is_empty()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        for (i, def) in self.affixes.iter().enumerate() {
            if def.weight < 0.0 || !def.weight.is_finite() {
                return Err(ConfigError::ValidationError(format!(
                    "affix '{}' has an invalid weight",
                    def.id
                )));
            }
            if self.affixes[..i].iter().any(|other| other.id == def.id) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate affix id '{}'",
                    def.id
                )));
            }
        }
        Ok(self)
    }
}

/// Load an affix pool from a TOML file
pub fn load_affix_pool(path: &Path) -> Result<AffixPool, ConfigError> {
    let pool: AffixPool = load_toml(path)?;
    pool.validate()
}

/// Load an affix pool from a TOML string
pub fn parse_affix_pool(content: &str) -> Result<AffixPool, ConfigError> {
    let pool: AffixPool = parse_toml(content)?;
    pool.validate()
}

/// Get the built-in affix pool
pub fn default_affix_pool() -> AffixPool {
    let toml = include_str!("../../config/affixes.toml");
    parse_affix_pool(toml).unwrap_or_else(|err| {
        tracing::warn!(%err, "built-in affix pool failed to parse, enemies spawn without affixes");
        AffixPool::default()
    })
}

/// Roll how many affixes an enemy gets
///
/// Draws once for the tier rule and, for bosses, once more for the bonus.
/// The result never exceeds the tier's base count plus one for bosses, nor
/// the global ceiling.
pub fn roll_affix_count(
    table: &RarityTable,
    tier: RarityTier,
    boss: bool,
    constants: &AffixConstants,
    rng: &mut dyn BattleRng,
) -> u32 {
    let rule = table.affix_rule(tier);
    let mut count = if rng.chance(rule.chance, "spawn.affix_count") {
        rule.count
    } else {
        rule.count.saturating_sub(1)
    };
    if boss && rng.chance(constants.boss_bonus_chance, "spawn.affix_boss") {
        count += 1;
    }
    count.min(constants.max_affixes)
}

/// Draw `count` distinct affixes by weight, without replacement
pub fn pick_affixes<'a>(pool: &'a AffixPool, count: u32, rng: &mut dyn BattleRng) -> Vec<&'a AffixDef> {
    let mut remaining: Vec<&AffixDef> = pool.affixes.iter().collect();
    let mut picked = Vec::new();

    for _ in 0..count {
        let weights: Vec<f64> = remaining.iter().map(|a| a.weight).collect();
        let Some(index) = pick_weighted(rng, &weights, "spawn.affix") else {
            break;
        };
        picked.push(remaining.remove(index));
    }
    picked
}

/// Apply one affix's effect and record it on the enemy
pub fn apply_affix(enemy: &mut Enemy, def: &AffixDef, constants: &AffixConstants) {
    let magnitude = def.magnitude(enemy.actor.level, enemy.rarity);
    let actor = &mut enemy.actor;
    let stats = &mut actor.stats;

    match def.effect {
        AffixEffect::Brutal => stats.attack = (stats.attack * (1.0 + magnitude)).round(),
        AffixEffect::Arcane => stats.magic = (stats.magic * (1.0 + magnitude)).round(),
        AffixEffect::Armored => {
            stats.armor += magnitude.round();
            stats.magic_res += magnitude.round();
        }
        AffixEffect::Vampiric => stats.lifesteal += magnitude,
        AffixEffect::Thorned => stats.thorns += magnitude.round(),
        AffixEffect::Swift => stats.dodge_chance += magnitude,
        AffixEffect::Keen => stats.crit_chance += magnitude,
        AffixEffect::Regenerating => stats.hp_regen += magnitude.round(),
        AffixEffect::Hardy => {
            let was_full = actor.hp >= actor.max_hp;
            let deficit = actor.max_hp.saturating_sub(actor.hp);
            actor.max_hp = ((actor.max_hp as f64) * (1.0 + magnitude)).round().max(1.0) as u32;
            actor.hp = if was_full {
                actor.max_hp
            } else {
                actor.max_hp.saturating_sub(deficit).max(1)
            };
        }
        AffixEffect::Shielded => {
            actor.combat_start_shield += magnitude.round().max(0.0) as u32;
        }
        AffixEffect::Berserk => {
            enemy.berserk = Some(BerserkLatch {
                threshold: constants.berserk_threshold.clamp(0.0, 1.0),
                attack_bonus: magnitude,
                consumed: false,
            });
        }
    }

    enemy.affixes.push(AppliedAffix {
        id: def.id.clone(),
        name: def.name.clone(),
        magnitude,
    });
}
