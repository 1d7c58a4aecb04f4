//! Enemy - actor plus AI and spawn metadata

use super::Actor;
use crate::ai::{Intent, Memory};
use crate::types::RarityTier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An affix rolled onto an enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedAffix {
    pub id: String,
    pub name: String,
    pub magnitude: f64,
}

/// One-shot enrage that triggers below an HP threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BerserkLatch {
    /// HP ratio at or below which the latch fires
    pub threshold: f64,
    /// Enrage attack bonus (0.4 = +40%)
    pub attack_bonus: f64,
    pub consumed: bool,
}

/// A battle-ready enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub actor: Actor,
    pub template_id: String,
    /// Template name before rarity/elite/affix fragments
    pub base_name: String,

    // === AI ===
    pub abilities: Vec<String>,
    pub cooldowns: BTreeMap<String, u32>,
    pub intent: Intent,
    pub memory: Memory,

    // === Spawn Metadata ===
    pub rarity: RarityTier,
    pub rarity_applied: bool,
    pub affixes: Vec<AppliedAffix>,
    pub elite: bool,
    pub boss: bool,
    pub berserk: Option<BerserkLatch>,

    // === Rewards ===
    pub xp: u32,
    pub gold: u32,
    pub drop_mult: f64,
    /// Set once rewards for this enemy have been granted
    pub defeat_handled: bool,
}

impl Enemy {
    /// Create an enemy around an actor with an empty kit
    pub fn new(actor: Actor, template_id: impl Into<String>) -> Self {
        let base_name = actor.name.clone();
        Enemy {
            actor,
            template_id: template_id.into(),
            base_name,
            abilities: Vec::new(),
            cooldowns: BTreeMap::new(),
            intent: Intent::None,
            memory: Memory::default(),
            rarity: RarityTier::lowest(),
            rarity_applied: false,
            affixes: Vec::new(),
            elite: false,
            boss: false,
            berserk: None,
            xp: 0,
            gold: 0,
            drop_mult: 1.0,
            defeat_handled: false,
        }
    }

    pub fn with_abilities<I, S>(mut self, abilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.abilities = abilities.into_iter().map(Into::into).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.actor.name
    }

    pub fn is_alive(&self) -> bool {
        self.actor.is_alive()
    }

    pub fn cooldown(&self, ability_id: &str) -> u32 {
        self.cooldowns.get(ability_id).copied().unwrap_or(0)
    }

    pub fn is_ready(&self, ability_id: &str) -> bool {
        self.cooldown(ability_id) == 0
    }

    pub fn start_cooldown(&mut self, ability_id: &str, turns: u32) {
        if turns > 0 {
            self.cooldowns.insert(ability_id.to_string(), turns);
        }
    }

    pub fn tick_cooldowns(&mut self) {
        for turns in self.cooldowns.values_mut() {
            *turns = turns.saturating_sub(1);
        }
        self.cooldowns.retain(|_, turns| *turns > 0);
    }

    pub fn has_affix(&self, affix_id: &str) -> bool {
        self.affixes.iter().any(|a| a.id == affix_id)
    }
}
