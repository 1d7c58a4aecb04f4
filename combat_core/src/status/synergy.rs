//! Cross-effect synergies evaluated on every successful hit

use crate::actor::Actor;
use crate::config::SynergyConstants;
use crate::log::{CombatLog, Severity};
use crate::types::{DamageKind, Element};

/// What a hit triggered
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SynergyResult {
    /// Burn went from inactive to active
    pub ignited: bool,
    /// Burn was already active and got refreshed
    pub burn_refreshed: bool,
    /// Bonus damage from shattering chill
    pub shatter_damage: u32,
}

/// Apply element-into-status combos to a target that was just hit
///
/// - Fire into an active bleed adds/refreshes a burn of
///   `max(ignite_min, round(damage * ignite_ratio))` for
///   `max(existing burn turns, ignite_turns)`. The ignite message is logged
///   only when burn goes from inactive to active.
/// - A physical hit on a chilled target deals a bonus burst of
///   `max(shatter_min, round(damage * shatter_ratio))` and consumes the chill.
pub fn apply_synergy_on_hit(
    target: &mut Actor,
    damage_dealt: u32,
    element: Option<Element>,
    kind: DamageKind,
    constants: &SynergyConstants,
    log: &mut CombatLog,
) -> SynergyResult {
    let mut result = SynergyResult::default();

    if element == Some(Element::Fire) && target.status.bleed.is_active() {
        let magnitude = (damage_dealt as f64 * constants.ignite_ratio)
            .round()
            .max(constants.ignite_min as f64);
        let was_burning = target.status.burn.is_active();
        let turns = target.status.burn.turns.max(constants.ignite_turns);
        target.status.burn.set(magnitude, turns);

        if was_burning {
            result.burn_refreshed = true;
        } else {
            result.ignited = true;
            log.log(
                format!("The flames catch {}'s open wounds. {} ignites!", target.name, target.name),
                Severity::Good,
            );
        }
    }

    if kind == DamageKind::Physical && target.status.chill.is_active() {
        let burst = (damage_dealt as f64 * constants.shatter_ratio)
            .round()
            .max(constants.shatter_min as f64) as u32;
        target.status.chill.clear();
        let dealt = if target.status.invulnerable > 0 {
            0
        } else {
            target.take_damage(burst)
        };
        result.shatter_damage = dealt;
        log.log(
            format!("The chill on {} shatters for {} bonus damage!", target.name, dealt),
            Severity::Good,
        );
    }

    result
}
