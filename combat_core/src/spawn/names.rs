//! Display names from rarity, elite and affix fragments

use crate::actor::Enemy;
use crate::types::RarityTier;

/// Compose `[Rarity] [Elite] [Affix...] Base`, dropping the common prefix
pub fn compose_name(enemy: &Enemy) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if enemy.rarity != RarityTier::Common {
        parts.push(enemy.rarity.display_name());
    }
    if enemy.elite {
        parts.push("Elite");
    }
    parts.extend(enemy.affixes.iter().map(|a| a.name.as_str()));
    parts.push(&enemy.base_name);
    parts.join(" ")
}
