//! Stats - flat combat stat record

use crate::types::Element;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Combat stats of an actor
///
/// Percent fields are stored as percentages (25.0 = 25%).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    // === Offense ===
    pub attack: f64,
    pub magic: f64,
    pub crit_chance: f64,
    /// Fraction of the target's armor ignored, in percent
    pub armor_pen: f64,
    pub lifesteal: f64,
    /// Bonus damage per element, in percent
    pub elemental_bonus: BTreeMap<Element, f64>,

    // === Defense ===
    pub armor: f64,
    pub magic_res: f64,
    pub dodge_chance: f64,
    /// Resistance against every element, in percent
    pub resist_all: f64,
    pub elemental_resist: BTreeMap<Element, f64>,
    /// Flat damage reflected to physical attackers
    pub thorns: f64,

    // === Misc ===
    /// Enemies act fastest first
    pub speed: f64,
    /// Flat HP restored each round
    pub hp_regen: f64,
}

impl Stats {
    /// Total resistance against an element, before capping
    pub fn element_resist(&self, element: Element) -> f64 {
        self.resist_all + self.elemental_resist.get(&element).copied().unwrap_or(0.0)
    }

    /// Damage bonus for an element, in percent
    pub fn element_bonus(&self, element: Element) -> f64 {
        self.elemental_bonus.get(&element).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_resist_adds_resist_all() {
        let mut stats = Stats {
            resist_all: 10.0,
            ..Default::default()
        };
        stats.elemental_resist.insert(Element::Fire, 25.0);

        assert!((stats.element_resist(Element::Fire) - 35.0).abs() < f64::EPSILON);
        assert!((stats.element_resist(Element::Frost) - 10.0).abs() < f64::EPSILON);
    }
}
