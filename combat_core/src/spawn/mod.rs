//! Enemy spawn pipeline
//!
//! Templates, rarity and affix tables are TOML-backed like the ability
//! catalog; [`spawn_enemy`] turns a template into a battle-ready [`Enemy`].
//!
//! [`Enemy`]: crate::actor::Enemy

mod affix;
mod names;
mod pipeline;
mod rarity;
mod template;

pub use affix::{
    apply_affix, default_affix_pool, load_affix_pool, parse_affix_pool, pick_affixes,
    roll_affix_count, AffixDef, AffixEffect, AffixPool,
};
pub use names::compose_name;
pub use pipeline::{
    roll_level, spawn_enemy, spawn_group, AbilityPicker, SpawnContext, SpawnTables, TemplateKit,
};
pub use rarity::{
    apply_rarity, default_rarity_table, load_rarity_table, parse_rarity_table, roll_rarity,
    AffixCountRule, RarityDef, RarityTable,
};
pub use template::{default_templates, load_templates, parse_templates, EnemyTemplate, TemplateRegistry};
