//! Ability static data

mod catalog;

pub use catalog::{default_abilities, load_ability_catalog, parse_ability_catalog, AbilityCatalog};

use crate::types::{DamageKind, Element};
use serde::{Deserialize, Serialize};

/// Id of the fallback ability used when nothing else is usable
pub const BASELINE_STRIKE: &str = "strike";

/// A (magnitude, turns) effect carried by an ability
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EffectSpec {
    pub magnitude: f64,
    pub turns: u32,
}

impl EffectSpec {
    pub fn new(magnitude: f64, turns: u32) -> Self {
        EffectSpec { magnitude, turns }
    }
}

/// Describes how an ability resolves
/// Loaded from TOML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ability {
    /// Unique ability identifier
    pub id: String,
    /// Display name
    pub name: String,
    pub kind: DamageKind,
    /// Multiplier applied to the attacker's scaling stat
    #[serde(default)]
    pub potency: f64,
    #[serde(default)]
    pub element: Option<Element>,
    /// Turns before the ability can be used again
    #[serde(default)]
    pub cooldown: u32,
    /// Turns of warning before resolving (0 = instant)
    #[serde(default)]
    pub telegraph_turns: u32,
    /// Resource cost (player abilities)
    #[serde(default)]
    pub cost: u32,
    #[serde(default)]
    pub undodgeable: bool,

    // === Target Effects ===
    /// Bleed DOT: magnitude is damage per tick
    #[serde(default)]
    pub bleed: Option<EffectSpec>,
    #[serde(default)]
    pub chill: Option<EffectSpec>,
    /// Extra damage taken, as a fraction
    #[serde(default)]
    pub vulnerable: Option<EffectSpec>,
    /// Armor reduction, as a fraction
    #[serde(default)]
    pub armor_down: Option<EffectSpec>,
    #[serde(default)]
    pub magic_res_down: Option<EffectSpec>,
    /// Attack reduction as a fraction of the target's base attack
    #[serde(default)]
    pub atk_down: Option<EffectSpec>,
    #[serde(default)]
    pub mag_down: Option<EffectSpec>,
    #[serde(default)]
    pub stun_turns: u32,
    #[serde(default)]
    pub force_guard_turns: u32,
    /// Flat shield points destroyed before damage lands
    #[serde(default)]
    pub shield_shatter: u32,
    /// Extra posture damage on top of the HP-derived amount
    #[serde(default)]
    pub posture_damage: u32,

    // === Self Effects ===
    /// Heal the user by this fraction of damage dealt
    #[serde(default)]
    pub drain_pct: f64,
    /// Heal the user by this fraction of max HP
    #[serde(default)]
    pub heal_pct: f64,
    /// Damage reduction window (guard)
    #[serde(default)]
    pub guard: Option<EffectSpec>,
    #[serde(default)]
    pub enrage: Option<EffectSpec>,
    #[serde(default)]
    pub atk_buff: Option<EffectSpec>,
    #[serde(default)]
    pub mag_buff: Option<EffectSpec>,
    #[serde(default)]
    pub evasion: Option<EffectSpec>,
    #[serde(default)]
    pub haste: Option<EffectSpec>,
    /// Flat shield granted to the user
    #[serde(default)]
    pub shield: u32,
}

impl Ability {
    /// Create a bare ability; optional effects start empty
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: DamageKind, potency: f64) -> Self {
        Ability {
            id: id.into(),
            name: name.into(),
            kind,
            potency,
            element: None,
            cooldown: 0,
            telegraph_turns: 0,
            cost: 0,
            undodgeable: false,
            bleed: None,
            chill: None,
            vulnerable: None,
            armor_down: None,
            magic_res_down: None,
            atk_down: None,
            mag_down: None,
            stun_turns: 0,
            force_guard_turns: 0,
            shield_shatter: 0,
            posture_damage: 0,
            drain_pct: 0.0,
            heal_pct: 0.0,
            guard: None,
            enrage: None,
            atk_buff: None,
            mag_buff: None,
            evasion: None,
            haste: None,
            shield: 0,
        }
    }

    /// The fallback strike every enemy can use
    pub fn baseline_strike() -> Self {
        Ability::new(BASELINE_STRIKE, "Strike", DamageKind::Physical, 1.0)
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    pub fn with_cooldown(mut self, cooldown: u32) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_telegraph(mut self, turns: u32) -> Self {
        self.telegraph_turns = turns;
        self
    }

    pub fn is_telegraphed(&self) -> bool {
        self.telegraph_turns > 0
    }

    /// Whether the ability applies any debuff to its target
    pub fn applies_debuff(&self) -> bool {
        self.bleed.is_some()
            || self.chill.is_some()
            || self.vulnerable.is_some()
            || self.armor_down.is_some()
            || self.magic_res_down.is_some()
            || self.atk_down.is_some()
            || self.mag_down.is_some()
            || self.stun_turns > 0
            || self.force_guard_turns > 0
    }

    /// Whether the ability heals its user
    pub fn heals(&self) -> bool {
        self.heal_pct > 0.0 || self.drain_pct > 0.0 || self.kind == DamageKind::DamageHeal
    }
}
