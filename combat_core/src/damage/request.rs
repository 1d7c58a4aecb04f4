//! HitRequest - resolver inputs gathered from two actors

use crate::ability::Ability;
use crate::actor::Actor;
use crate::config::CombatConstants;
use crate::types::{DamageKind, Element};
use serde::{Deserialize, Serialize};

/// Everything the resolver needs for one hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitRequest {
    // === Attacker ===
    /// Attack for physical, magic otherwise
    pub attacker_stat: f64,
    pub potency: f64,
    pub kind: DamageKind,
    pub element: Option<Element>,
    /// Attacker's bonus for `element`, in percent
    pub element_bonus_pct: f64,
    pub enrage_mult: f64,
    pub crit_chance: f64,
    pub crit_mult: f64,
    /// Fraction of defense ignored (0.0 to 1.0)
    pub penetration: f64,

    // === Defender ===
    /// Armor or magic resist, depending on `kind`
    pub defense: f64,
    pub affinity_mult: f64,
    /// Flat elemental resistance, in percent
    pub flat_resist_pct: f64,
    pub dodge_chance: f64,
    pub undodgeable: bool,
}

impl HitRequest {
    /// A plain request with neutral modifiers
    pub fn new(attacker_stat: f64, potency: f64, kind: DamageKind) -> Self {
        HitRequest {
            attacker_stat,
            potency,
            kind,
            element: None,
            element_bonus_pct: 0.0,
            enrage_mult: 1.0,
            crit_chance: 0.0,
            crit_mult: 1.5,
            penetration: 0.0,
            defense: 0.0,
            affinity_mult: 1.0,
            flat_resist_pct: 0.0,
            dodge_chance: 0.0,
            undodgeable: false,
        }
    }

    /// Gather inputs for `attacker` using `ability` on `target`
    pub fn between(
        attacker: &Actor,
        target: &Actor,
        ability: &Ability,
        constants: &CombatConstants,
    ) -> Self {
        let physical = ability.kind.uses_armor();
        let attacker_stat = if physical {
            attacker.effective_attack()
        } else {
            attacker.effective_magic()
        };

        let (affinity_mult, flat_resist_pct, element_bonus_pct) = match ability.element {
            Some(element) => (
                target.affinity(element),
                target.stats.element_resist(element),
                attacker.stats.element_bonus(element),
            ),
            None => (1.0, target.stats.resist_all, 0.0),
        };

        HitRequest {
            attacker_stat,
            potency: ability.potency,
            kind: ability.kind,
            element: ability.element,
            element_bonus_pct,
            enrage_mult: attacker.status.enrage_multiplier(),
            crit_chance: attacker.stats.crit_chance,
            crit_mult: constants.damage.crit_multiplier,
            penetration: if physical {
                attacker.stats.armor_pen / 100.0
            } else {
                0.0
            },
            defense: if physical {
                target.effective_armor()
            } else {
                target.effective_magic_res()
            },
            affinity_mult,
            flat_resist_pct,
            dodge_chance: target.dodge_chance(),
            undodgeable: ability.undodgeable,
        }
    }
}
