//! AbilityOutcome - what one ability use did

use serde::{Deserialize, Serialize};

/// Result of [`super::apply_ability`]
///
/// The default value is the neutral no-op result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityOutcome {
    // === Damage ===
    /// HP removed from the target, including synergy bursts
    pub damage_dealt: u32,
    /// Shield points destroyed by shatter before the hit
    pub shield_shattered: u32,
    /// Shield points that absorbed the hit
    pub shield_consumed: u32,
    /// Damage reflected back to the user
    pub reflected: u32,

    // === Healing ===
    pub heal_done: u32,
    pub shield_gained: u32,

    // === Flags ===
    pub dodged: bool,
    pub crit: bool,
    pub ignited: bool,
    pub target_broken: bool,
    pub target_defeated: bool,
    /// The user died to reflected damage
    pub user_defeated: bool,
    /// Set when nothing happened (unknown ability, dead actor...)
    pub skipped: bool,
}

impl AbilityOutcome {
    /// Neutral result for an ability that could not be used
    pub fn skipped() -> Self {
        AbilityOutcome {
            skipped: true,
            ..Default::default()
        }
    }

    /// Reward signal used by enemy learning
    pub fn reward(&self, heal_weight: f64, shield_weight: f64) -> f64 {
        self.damage_dealt as f64
            + self.heal_done as f64 * heal_weight
            + self.shield_consumed as f64 * shield_weight
    }
}
