//! Rarity tiers - weighted roll and one-shot stat multipliers

use crate::actor::Enemy;
use crate::config::{load_toml, parse_toml, ConfigError, DifficultyConfig};
use crate::rng::{pick_weighted, BattleRng};
use crate::types::RarityTier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

fn one() -> f64 {
    1.0
}

fn first_level() -> u32 {
    1
}

/// Multipliers and roll gates for one tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RarityDef {
    pub tier: RarityTier,
    #[serde(default)]
    pub weight: f64,
    #[serde(default = "first_level")]
    pub min_level: u32,
    #[serde(default = "one")]
    pub hp: f64,
    #[serde(default = "one")]
    pub attack: f64,
    #[serde(default = "one")]
    pub magic: f64,
    #[serde(default = "one")]
    pub armor: f64,
    #[serde(default = "one")]
    pub magic_res: f64,
    #[serde(default = "one")]
    pub xp: f64,
    #[serde(default = "one")]
    pub gold: f64,
    #[serde(default = "one")]
    pub drop: f64,
}

impl RarityDef {
    /// A tier that changes nothing
    pub fn neutral(tier: RarityTier) -> Self {
        RarityDef {
            tier,
            weight: 0.0,
            min_level: 1,
            hp: 1.0,
            attack: 1.0,
            magic: 1.0,
            armor: 1.0,
            magic_res: 1.0,
            xp: 1.0,
            gold: 1.0,
            drop: 1.0,
        }
    }
}

/// Affix count rule: `count` with probability `chance`, otherwise `count - 1`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffixCountRule {
    pub tier: RarityTier,
    pub count: u32,
    #[serde(default = "one")]
    pub chance: f64,
}

/// Rarity table loaded from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RarityTable {
    pub tiers: Vec<RarityDef>,
    /// Separate weights used for elites
    #[serde(default)]
    pub elite_weights: BTreeMap<RarityTier, f64>,
    #[serde(default)]
    pub affix_counts: Vec<AffixCountRule>,
}

impl RarityTable {
    /// Definition for a tier, neutral if the table has none
    pub fn def(&self, tier: RarityTier) -> RarityDef {
        self.tiers
            .iter()
            .find(|d| d.tier == tier)
            .cloned()
            .unwrap_or_else(|| RarityDef::neutral(tier))
    }

    pub fn affix_rule(&self, tier: RarityTier) -> AffixCountRule {
        self.affix_counts
            .iter()
            .find(|r| r.tier == tier)
            .copied()
            .unwrap_or(AffixCountRule {
                tier,
                count: 0,
                chance: 0.0,
            })
    }

    /// Highest tier this table defines
    pub fn top_tier(&self) -> RarityTier {
        self.tiers
            .iter()
            .map(|d| d.tier)
            .max()
            .unwrap_or_else(RarityTier::top)
    }

    /// Highest affix count a tier can roll before the boss bonus
    pub fn base_affix_count(&self, tier: RarityTier) -> u32 {
        self.affix_rule(tier).count
    }

    fn validate(self) -> Result<Self, ConfigError> {
        for def in &self.tiers {
            let multipliers = [
                def.hp,
                def.attack,
                def.magic,
                def.armor,
                def.magic_res,
                def.xp,
                def.gold,
                def.drop,
            ];
            if def.weight < 0.0 || multipliers.iter().any(|m| !m.is_finite() || *m <= 0.0) {
                return Err(ConfigError::ValidationError(format!(
                    "rarity '{}' has a negative weight or non-positive multiplier",
                    def.tier.display_name()
                )));
            }
        }
        if self.elite_weights.values().any(|w| *w < 0.0) {
            return Err(ConfigError::ValidationError(
                "elite rarity weights must be non-negative".to_string(),
            ));
        }
        for rule in &self.affix_counts {
            if !(0.0..=1.0).contains(&rule.chance) {
                return Err(ConfigError::ValidationError(format!(
                    "affix count chance for '{}' must be within 0..1",
                    rule.tier.display_name()
                )));
            }
        }
        Ok(self)
    }
}

/// Load a rarity table from a TOML file
pub fn load_rarity_table(path: &Path) -> Result<RarityTable, ConfigError> {
    let table: RarityTable = load_toml(path)?;
    table.validate()
}

/// Load a rarity table from a TOML string
pub fn parse_rarity_table(content: &str) -> Result<RarityTable, ConfigError> {
    let table: RarityTable = parse_toml(content)?;
    table.validate()
}

/// Get the built-in rarity table
pub fn default_rarity_table() -> RarityTable {
    let toml = include_str!("../../config/rarity.toml");
    parse_rarity_table(toml).unwrap_or_else(|err| {
        tracing::warn!(%err, "built-in rarity table failed to parse, everything spawns common");
        RarityTable::default()
    })
}

/// Roll a rarity tier
///
/// Bosses take the table's top tier without drawing. Easy difficulty pins
/// regular enemies to the lowest tier. Regular rolls are gated by the
/// difficulty's ceiling and each tier's minimum level; elites use the elite
/// table.
pub fn roll_rarity(
    table: &RarityTable,
    difficulty: &DifficultyConfig,
    level: u32,
    boss: bool,
    elite: bool,
    rng: &mut dyn BattleRng,
) -> RarityTier {
    if boss {
        return table.top_tier();
    }

    let (tiers, weights): (Vec<RarityTier>, Vec<f64>) = if elite {
        table.elite_weights.iter().map(|(t, w)| (*t, *w)).unzip()
    } else {
        if difficulty.is_easy() {
            return RarityTier::lowest();
        }
        table
            .tiers
            .iter()
            .filter(|d| d.tier <= difficulty.max_rarity && level >= d.min_level)
            .map(|d| (d.tier, d.weight))
            .unzip()
    };

    let tier = pick_weighted(rng, &weights, "spawn.rarity")
        .and_then(|i| tiers.get(i).copied())
        .unwrap_or_else(RarityTier::lowest);
    tracing::debug!(?tier, level, elite, "rarity rolled");
    tier
}

/// Bake rarity multipliers into an enemy's current stats
///
/// Runs at most once per enemy; later calls return `false` and change
/// nothing. A full-HP enemy is healed to the new maximum, otherwise the
/// absolute HP deficit is kept.
pub fn apply_rarity(enemy: &mut Enemy, def: &RarityDef) -> bool {
    if enemy.rarity_applied {
        return false;
    }

    let actor = &mut enemy.actor;
    let was_full = actor.hp >= actor.max_hp;
    let deficit = actor.max_hp.saturating_sub(actor.hp);

    let new_max = ((actor.max_hp as f64) * def.hp).round().max(1.0) as u32;
    actor.max_hp = new_max;
    actor.hp = if was_full {
        new_max
    } else {
        new_max.saturating_sub(deficit).max(1)
    };

    let stats = &mut actor.stats;
    stats.attack = (stats.attack * def.attack).round();
    stats.magic = (stats.magic * def.magic).round();
    stats.armor = (stats.armor * def.armor).round();
    stats.magic_res = (stats.magic_res * def.magic_res).round();

    enemy.xp = ((enemy.xp as f64) * def.xp).round() as u32;
    enemy.gold = ((enemy.gold as f64) * def.gold).round() as u32;
    enemy.drop_mult *= def.drop;
    enemy.rarity = def.tier;
    enemy.rarity_applied = true;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{Actor, Stats};
    use crate::rng::{ScriptedRng, SeededRng};
    use crate::types::{Difficulty, Side};

    fn make_enemy(level: u32) -> Enemy {
        let actor = Actor::new("e", "Ghoul", Side::Enemy, level, 100).with_stats(Stats {
            attack: 10.0,
            armor: 10.0,
            ..Default::default()
        });
        let mut enemy = Enemy::new(actor, "ghoul");
        enemy.xp = 20;
        enemy.gold = 10;
        enemy
    }

    #[test]
    fn test_default_table() {
        let table = default_rarity_table();
        assert_eq!(table.tiers.len(), RarityTier::all().len());
        assert_eq!(table.base_affix_count(RarityTier::Common), 1);
        assert_eq!(table.base_affix_count(RarityTier::Mythic), 3);
        assert!(table.elite_weights.get(&RarityTier::Common).is_none());
    }

    #[test]
    fn test_boss_forced_to_top_without_draw() {
        let table = default_rarity_table();
        let mut rng = SeededRng::new(9);
        let tier = roll_rarity(
            &table,
            &DifficultyConfig::preset(Difficulty::Easy),
            1,
            true,
            false,
            &mut rng,
        );
        assert_eq!(tier, RarityTier::top());
        assert_eq!(rng.draw_index(), 0);
    }

    #[test]
    fn test_boss_takes_top_of_trimmed_table() {
        let mut table = default_rarity_table();
        table.tiers.retain(|d| d.tier <= RarityTier::Rare);
        assert_eq!(table.top_tier(), RarityTier::Rare);

        let mut rng = SeededRng::new(9);
        let tier = roll_rarity(
            &table,
            &DifficultyConfig::preset(Difficulty::Nightmare),
            30,
            true,
            false,
            &mut rng,
        );
        assert_eq!(tier, RarityTier::Rare);
        assert_eq!(rng.draw_index(), 0);
    }

    #[test]
    fn test_empty_table_top_falls_back() {
        assert_eq!(RarityTable::default().top_tier(), RarityTier::top());
    }

    #[test]
    fn test_easy_never_exceeds_lowest() {
        let table = default_rarity_table();
        let easy = DifficultyConfig::preset(Difficulty::Easy);
        let mut rng = SeededRng::new(3);
        for level in 1..40 {
            let tier = roll_rarity(&table, &easy, level, false, false, &mut rng);
            assert_eq!(tier, RarityTier::lowest());
        }
    }

    #[test]
    fn test_level_gate() {
        let table = default_rarity_table();
        let nightmare = DifficultyConfig::preset(Difficulty::Nightmare);
        // Top of the range lands on the last eligible tier
        let mut rng = ScriptedRng::constant(0.9999);
        let tier = roll_rarity(&table, &nightmare, 1, false, false, &mut rng);
        assert_eq!(tier, RarityTier::Uncommon);
        let tier = roll_rarity(&table, &nightmare, 30, false, false, &mut rng);
        assert_eq!(tier, RarityTier::Mythic);
    }

    #[test]
    fn test_elite_table_skips_common() {
        let table = default_rarity_table();
        let normal = DifficultyConfig::preset(Difficulty::Normal);
        let mut rng = ScriptedRng::constant(0.0);
        let tier = roll_rarity(&table, &normal, 1, false, true, &mut rng);
        assert_eq!(tier, RarityTier::Uncommon);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let table = default_rarity_table();
        let def = table.def(RarityTier::Rare);
        let mut enemy = make_enemy(5);

        assert!(apply_rarity(&mut enemy, &def));
        let after_first = (enemy.actor.max_hp, enemy.actor.stats.attack, enemy.xp);
        assert!(!apply_rarity(&mut enemy, &def));
        assert_eq!(
            (enemy.actor.max_hp, enemy.actor.stats.attack, enemy.xp),
            after_first
        );
        assert_eq!(enemy.actor.max_hp, 135);
        assert_eq!(enemy.actor.hp, 135);
        assert_eq!(enemy.rarity, RarityTier::Rare);
    }

    #[test]
    fn test_apply_preserves_deficit() {
        let def = RarityDef {
            hp: 2.0,
            ..RarityDef::neutral(RarityTier::Epic)
        };
        let mut enemy = make_enemy(5);
        enemy.actor.hp = 70;
        apply_rarity(&mut enemy, &def);
        assert_eq!(enemy.actor.max_hp, 200);
        assert_eq!(enemy.actor.hp, 170);
    }

    #[test]
    fn test_bad_chance_rejected() {
        let toml = r#"
tiers = []

[[affix_counts]]
tier = "rare"
count = 2
chance = 1.5
"#;
        assert!(matches!(
            parse_rarity_table(toml),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
