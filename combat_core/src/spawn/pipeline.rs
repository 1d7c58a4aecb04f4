//! Spawn pipeline - template to battle-ready enemy
//!
//! Order matters: level, level curves, difficulty HP, runtime fields, elite,
//! rarity, affixes, base-stat resync, then the display name. Every random
//! roll goes through the supplied [`BattleRng`], so a fixed seed reproduces
//! the same enemy.

use super::affix::{apply_affix, default_affix_pool, pick_affixes, roll_affix_count, AffixPool};
use super::names::compose_name;
use super::rarity::{apply_rarity, default_rarity_table, roll_rarity, RarityTable};
use super::template::EnemyTemplate;
use crate::ability::BASELINE_STRIKE;
use crate::actor::{Actor, Enemy, Stats};
use crate::config::{CombatConstants, DifficultyConfig};
use crate::rng::BattleRng;
use crate::types::Side;

/// Chooses an enemy's ability kit
pub trait AbilityPicker {
    fn pick_abilities(&self, template: &EnemyTemplate, enemy: &Enemy) -> Vec<String>;
}

/// Uses the template's own kit
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateKit;

impl AbilityPicker for TemplateKit {
    fn pick_abilities(&self, template: &EnemyTemplate, _enemy: &Enemy) -> Vec<String> {
        template.abilities.clone()
    }
}

impl<F> AbilityPicker for F
where
    F: Fn(&EnemyTemplate, &Enemy) -> Vec<String>,
{
    fn pick_abilities(&self, template: &EnemyTemplate, enemy: &Enemy) -> Vec<String> {
        self(template, enemy)
    }
}

/// Static tables consulted while spawning
#[derive(Debug, Clone)]
pub struct SpawnTables {
    pub rarity: RarityTable,
    pub affixes: AffixPool,
}

impl Default for SpawnTables {
    fn default() -> Self {
        SpawnTables {
            rarity: default_rarity_table(),
            affixes: default_affix_pool(),
        }
    }
}

/// Everything a spawn call needs besides the template and the RNG
pub struct SpawnContext<'a> {
    pub zone_min_level: u32,
    pub zone_max_level: u32,
    pub difficulty: &'a DifficultyConfig,
    pub constants: &'a CombatConstants,
    pub tables: &'a SpawnTables,
    pub picker: &'a dyn AbilityPicker,
    /// Roll this enemy as an elite
    pub elite: bool,
}

impl<'a> SpawnContext<'a> {
    pub fn new(
        zone_min_level: u32,
        zone_max_level: u32,
        difficulty: &'a DifficultyConfig,
        constants: &'a CombatConstants,
        tables: &'a SpawnTables,
    ) -> Self {
        SpawnContext {
            zone_min_level,
            zone_max_level,
            difficulty,
            constants,
            tables,
            picker: &TemplateKit,
            elite: false,
        }
    }

    pub fn with_picker(mut self, picker: &'a dyn AbilityPicker) -> Self {
        self.picker = picker;
        self
    }

    pub fn with_elite(mut self, elite: bool) -> Self {
        self.elite = elite;
        self
    }
}

fn scaled(value: f64, growth: f64, delta: i32) -> f64 {
    (value * growth.powi(delta)).round()
}

/// Pick the spawn level: bosses take the zone maximum
pub fn roll_level(
    zone_min_level: u32,
    zone_max_level: u32,
    boss: bool,
    rng: &mut dyn BattleRng,
) -> u32 {
    let low = zone_min_level.min(zone_max_level).max(1);
    let high = zone_max_level.max(zone_min_level).max(1);
    if boss {
        return high;
    }
    rng.rand_int(low as i64, high as i64, "spawn.level") as u32
}

/// Build a battle-ready enemy from a template
pub fn spawn_enemy(
    template: &EnemyTemplate,
    ctx: &SpawnContext<'_>,
    rng: &mut dyn BattleRng,
) -> Enemy {
    let constants = ctx.constants;
    let curves = &constants.scaling;
    let boss = template.boss;

    // (1) level
    let level = roll_level(ctx.zone_min_level, ctx.zone_max_level, boss, rng);
    let delta = level as i32 - template.base_level as i32;

    // (2)(3) level curves, then difficulty HP
    let max_hp = (template.max_hp as f64 * curves.hp_growth.powi(delta) * ctx.difficulty.hp_mult)
        .round()
        .max(1.0) as u32;
    let stats = Stats {
        attack: scaled(template.attack, curves.attack_growth, delta),
        magic: scaled(template.magic, curves.attack_growth, delta),
        armor: scaled(template.armor, curves.defense_growth, delta),
        magic_res: scaled(template.magic_res, curves.defense_growth, delta),
        speed: template.speed,
        crit_chance: template.crit,
        dodge_chance: template.dodge,
        resist_all: template.resist_all,
        ..Default::default()
    };

    // (4) runtime fields
    let mut actor = Actor::new(template.id.as_str(), template.name.as_str(), Side::Enemy, level, max_hp)
        .with_stats(stats);
    actor.affinities = template.affinities.clone();

    let mut enemy = Enemy::new(actor, template.id.as_str());
    enemy.boss = boss;
    enemy.elite = ctx.elite && !boss;
    enemy.xp = scaled(template.xp as f64, curves.xp_growth, delta).max(0.0) as u32;
    enemy.gold = scaled(template.gold as f64, curves.gold_growth, delta).max(0.0) as u32;

    let mut kit = ctx.picker.pick_abilities(template, &enemy);
    if kit.is_empty() {
        kit.push(BASELINE_STRIKE.to_string());
    }
    enemy.abilities = kit;

    let posture = &constants.posture;
    let mut max_posture = posture.base + posture.per_level * level as f64;
    if enemy.elite {
        max_posture *= posture.elite_mult;
    }
    if boss {
        max_posture *= posture.boss_mult;
    }
    enemy.actor.max_posture = max_posture.round().max(1.0) as u32;
    enemy.actor.posture = enemy.actor.max_posture;

    // (5) elite
    if enemy.elite {
        apply_elite(&mut enemy, constants);
    }

    // (6) rarity
    let tier = roll_rarity(
        &ctx.tables.rarity,
        ctx.difficulty,
        level,
        boss,
        enemy.elite,
        rng,
    );
    apply_rarity(&mut enemy, &ctx.tables.rarity.def(tier));

    // (7) affixes
    let count = roll_affix_count(&ctx.tables.rarity, tier, boss, &constants.affixes, rng);
    for def in pick_affixes(&ctx.tables.affixes, count, rng) {
        apply_affix(&mut enemy, def, &constants.affixes);
    }

    // (8) debuffs compute from these
    enemy.actor.sync_base_stats();

    // (9)
    enemy.actor.name = compose_name(&enemy);

    tracing::debug!(
        template = %template.id,
        level,
        ?tier,
        affixes = enemy.affixes.len(),
        max_hp = enemy.actor.max_hp,
        "enemy spawned"
    );
    enemy
}

/// Spawn several enemies, giving each a unique actor id
pub fn spawn_group(
    templates: &[&EnemyTemplate],
    ctx: &SpawnContext<'_>,
    rng: &mut dyn BattleRng,
) -> Vec<Enemy> {
    templates
        .iter()
        .enumerate()
        .map(|(i, template)| {
            let mut enemy = spawn_enemy(template, ctx, rng);
            enemy.actor.id = format!("{}-{}", template.id, i + 1);
            enemy
        })
        .collect()
}

fn apply_elite(enemy: &mut Enemy, constants: &CombatConstants) {
    let elite = &constants.elite;
    let actor = &mut enemy.actor;
    actor.max_hp = ((actor.max_hp as f64) * elite.hp).round().max(1.0) as u32;
    actor.hp = actor.max_hp;
    actor.stats.attack = (actor.stats.attack * elite.attack).round();
    actor.stats.magic = (actor.stats.magic * elite.magic).round();
    actor.stats.armor = (actor.stats.armor * elite.armor).round();
    actor.stats.magic_res = (actor.stats.magic_res * elite.magic_res).round();
    enemy.xp = ((enemy.xp as f64) * elite.xp).round() as u32;
    enemy.gold = ((enemy.gold as f64) * elite.gold).round() as u32;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ScriptedRng, SeededRng};
    use crate::types::{Difficulty, RarityTier};

    fn brute() -> EnemyTemplate {
        let mut template = EnemyTemplate::new("brute", "Brute", 5, 100);
        template.attack = 10.0;
        template.armor = 8.0;
        template.xp = 20;
        template.gold = 5;
        template.abilities = vec!["heavy_slam".to_string()];
        template
    }

    #[test]
    fn test_pre_rarity_hp_at_base_level() {
        let difficulty = DifficultyConfig {
            hp_mult: 1.2,
            ..DifficultyConfig::preset(Difficulty::Easy)
        };
        let constants = CombatConstants::default();
        let tables = SpawnTables::default();
        let ctx = SpawnContext::new(5, 5, &difficulty, &constants, &tables);

        // 0.99 keeps the common affix roll at zero
        let mut rng = ScriptedRng::constant(0.99);
        let enemy = spawn_enemy(&brute(), &ctx, &mut rng);
        assert_eq!(enemy.actor.level, 5);
        assert_eq!(enemy.rarity, RarityTier::Common);
        assert!(enemy.affixes.is_empty());
        assert_eq!(enemy.actor.max_hp, 120);
        assert_eq!(enemy.actor.hp, 120);
        assert_eq!(enemy.actor.name, "Brute");
    }

    #[test]
    fn test_level_curves() {
        let difficulty = DifficultyConfig::preset(Difficulty::Easy);
        let constants = CombatConstants::default();
        let tables = SpawnTables::default();
        let ctx = SpawnContext::new(7, 7, &difficulty, &constants, &tables);
        let mut rng = ScriptedRng::constant(0.99);
        let enemy = spawn_enemy(&brute(), &ctx, &mut rng);

        // 100 * 1.14^2 * 0.85
        assert_eq!(enemy.actor.max_hp, 110);
        // 10 * 1.11^2
        assert!((enemy.actor.stats.attack - 12.0).abs() < f64::EPSILON);
        assert!((enemy.actor.base_attack - 12.0).abs() < f64::EPSILON);
        // 20 * 1.16^2
        assert_eq!(enemy.xp, 27);
    }

    #[test]
    fn test_boss_takes_zone_max_and_top_rarity() {
        let difficulty = DifficultyConfig::preset(Difficulty::Easy);
        let constants = CombatConstants::default();
        let tables = SpawnTables::default();
        let ctx = SpawnContext::new(3, 9, &difficulty, &constants, &tables);
        let mut template = brute();
        template.boss = true;

        let mut rng = SeededRng::new(12);
        let enemy = spawn_enemy(&template, &ctx, &mut rng);
        assert_eq!(enemy.actor.level, 9);
        assert_eq!(enemy.rarity, RarityTier::top());
        assert!(enemy.rarity_applied);
        assert!(enemy.affixes.len() as u32 <= constants.affixes.max_affixes);
        assert!(enemy.actor.name.starts_with("Mythic"));
    }

    #[test]
    fn test_picker_closure_and_fallback() {
        let difficulty = DifficultyConfig::preset(Difficulty::Normal);
        let constants = CombatConstants::default();
        let tables = SpawnTables::default();
        let empty = |_: &EnemyTemplate, _: &Enemy| -> Vec<String> { Vec::new() };
        let ctx = SpawnContext::new(5, 5, &difficulty, &constants, &tables).with_picker(&empty);

        let mut rng = SeededRng::new(1);
        let enemy = spawn_enemy(&brute(), &ctx, &mut rng);
        assert_eq!(enemy.abilities, vec![BASELINE_STRIKE.to_string()]);
    }

    #[test]
    fn test_elite_posture_and_stats() {
        let difficulty = DifficultyConfig::preset(Difficulty::Normal);
        let constants = CombatConstants::default();
        let tables = SpawnTables::default();
        let plain_ctx = SpawnContext::new(5, 5, &difficulty, &constants, &tables);
        let elite_ctx = SpawnContext::new(5, 5, &difficulty, &constants, &tables).with_elite(true);

        let plain = spawn_enemy(&brute(), &plain_ctx, &mut ScriptedRng::constant(0.0));
        let elite = spawn_enemy(&brute(), &elite_ctx, &mut ScriptedRng::constant(0.0));
        assert!(elite.elite);
        // (20 + 3 * 5) * 1.5
        assert_eq!(elite.actor.max_posture, 53);
        assert_eq!(plain.actor.max_posture, 35);
        assert!(elite.actor.name.contains("Elite"));
    }

    #[test]
    fn test_group_ids_unique() {
        let difficulty = DifficultyConfig::preset(Difficulty::Normal);
        let constants = CombatConstants::default();
        let tables = SpawnTables::default();
        let ctx = SpawnContext::new(2, 6, &difficulty, &constants, &tables);
        let template = brute();
        let mut rng = SeededRng::new(77);

        let group = spawn_group(&[&template, &template], &ctx, &mut rng);
        assert_eq!(group[0].actor.id, "brute-1");
        assert_eq!(group[1].actor.id, "brute-2");
    }
}
