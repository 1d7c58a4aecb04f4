//! Actors - the player side and enemies
//!
//! [`Actor`] holds everything the damage and status code needs. [`Player`]
//! and [`Enemy`] wrap it with side-specific state (kits, cooldowns, AI memory,
//! rarity metadata).

mod enemy;
mod player;
mod stats;

pub use enemy::{AppliedAffix, BerserkLatch, Enemy};
pub use player::{ActionError, Companion, Player};
pub use stats::Stats;

use crate::status::StatusContainer;
use crate::types::{Element, Side};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A combatant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub name: String,
    pub side: Side,
    pub level: u32,

    // === Pools ===
    pub hp: u32,
    pub max_hp: u32,
    pub resource: u32,
    pub max_resource: u32,
    /// Enemy stagger pool; 0 max means the actor cannot be Broken
    pub posture: u32,
    pub max_posture: u32,

    pub stats: Stats,
    /// Attack before any debuffs; flat attack-down is computed from this
    pub base_attack: f64,
    pub base_magic: f64,
    /// Damage taken multiplier per element (weak > 1.0, resist < 1.0)
    pub affinities: BTreeMap<Element, f64>,

    pub status: StatusContainer,
    /// Shield granted by [`crate::status::reset_combat_status`] each fight
    pub combat_start_shield: u32,
}

impl Actor {
    /// Create an actor at full HP with empty stats
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        side: Side,
        level: u32,
        max_hp: u32,
    ) -> Self {
        Actor {
            id: id.into(),
            name: name.into(),
            side,
            level,
            hp: max_hp,
            max_hp,
            resource: 0,
            max_resource: 0,
            posture: 0,
            max_posture: 0,
            stats: Stats::default(),
            base_attack: 0.0,
            base_magic: 0.0,
            affinities: BTreeMap::new(),
            status: StatusContainer::default(),
            combat_start_shield: 0,
        }
    }

    /// Set stats and mirror attack/magic into the base fields
    pub fn with_stats(mut self, stats: Stats) -> Self {
        self.stats = stats;
        self.sync_base_stats();
        self
    }

    pub fn with_resource(mut self, max_resource: u32) -> Self {
        self.max_resource = max_resource;
        self.resource = max_resource;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn hp_ratio(&self) -> f64 {
        if self.max_hp == 0 {
            return 0.0;
        }
        self.hp as f64 / self.max_hp as f64
    }

    /// Remove HP, saturating at 0. Returns the HP actually removed.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.hp);
        self.hp -= dealt;
        dealt
    }

    /// Restore HP up to max. Dead actors are not revived.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if !self.is_alive() {
            return 0;
        }
        let healed = amount.min(self.max_hp.saturating_sub(self.hp));
        self.hp += healed;
        healed
    }

    pub fn restore_resource(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max_resource.saturating_sub(self.resource));
        self.resource += restored;
        restored
    }

    /// Spend resource if enough is available
    pub fn spend_resource(&mut self, amount: u32) -> bool {
        if self.resource < amount {
            return false;
        }
        self.resource -= amount;
        true
    }

    /// Attack after flat debuffs and buff multipliers
    pub fn effective_attack(&self) -> f64 {
        let flat = (self.stats.attack - self.status.atk_down.value()).max(0.0);
        flat * (1.0 + self.status.atk_buff.value() + self.status.ext_buff.value())
    }

    /// Magic after flat debuffs and buff multipliers
    pub fn effective_magic(&self) -> f64 {
        let flat = (self.stats.magic - self.status.mag_down.value()).max(0.0);
        flat * (1.0 + self.status.mag_buff.value() + self.status.ext_buff.value())
    }

    pub fn effective_armor(&self) -> f64 {
        let reduction = self.status.armor_down.value().clamp(0.0, 1.0);
        (self.stats.armor * (1.0 - reduction)).max(0.0)
    }

    pub fn effective_magic_res(&self) -> f64 {
        let reduction = self.status.magic_res_down.value().clamp(0.0, 1.0);
        (self.stats.magic_res * (1.0 - reduction)).max(0.0)
    }

    /// Dodge chance in percent, including evasion windows
    pub fn dodge_chance(&self) -> f64 {
        (self.stats.dodge_chance + self.status.evasion.value()).max(0.0)
    }

    /// Elemental affinity multiplier, neutral when unset
    pub fn affinity(&self, element: Element) -> f64 {
        self.affinities.get(&element).copied().unwrap_or(1.0)
    }

    /// Mirror the current attack/magic into the base fields
    pub fn sync_base_stats(&mut self) {
        self.base_attack = self.stats.attack;
        self.base_magic = self.stats.magic;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_actor() -> Actor {
        Actor::new("hero", "Hero", Side::Player, 1, 100).with_stats(Stats {
            attack: 20.0,
            magic: 10.0,
            armor: 40.0,
            ..Default::default()
        })
    }

    #[test]
    fn test_damage_and_heal_clamp() {
        let mut actor = make_actor();
        assert_eq!(actor.take_damage(30), 30);
        assert_eq!(actor.hp, 70);
        assert_eq!(actor.heal(50), 30);
        assert_eq!(actor.hp, 100);
        assert_eq!(actor.take_damage(500), 100);
        assert_eq!(actor.hp, 0);
        assert_eq!(actor.heal(10), 0);
        assert!(!actor.is_alive());
    }

    #[test]
    fn test_effective_attack_with_debuff_and_buff() {
        let mut actor = make_actor();
        actor.status.atk_down.set(5.0, 2);
        actor.status.atk_buff.set(0.2, 2);
        // (20 - 5) * 1.2
        assert!((actor.effective_attack() - 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_effective_armor_reduction() {
        let mut actor = make_actor();
        actor.status.armor_down.set(0.25, 1);
        assert!((actor.effective_armor() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_resource_spend() {
        let mut actor = make_actor().with_resource(30);
        assert!(actor.spend_resource(20));
        assert!(!actor.spend_resource(20));
        assert_eq!(actor.restore_resource(50), 20);
        assert_eq!(actor.resource, 30);
    }

    #[test]
    fn test_sync_base_stats() {
        let mut actor = make_actor();
        actor.stats.attack = 33.0;
        actor.sync_base_stats();
        assert!((actor.base_attack - 33.0).abs() < f64::EPSILON);
    }
}
