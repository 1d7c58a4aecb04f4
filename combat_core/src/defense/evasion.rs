//! Evasion - Dodge and critical strike rolls
//!
//! Chances are percentages. A roll in `[0, 1)` is drawn for every check
//! (even at 0% chance) so the RNG stream position only depends on how many
//! checks happened, not on stat values.

use super::constants::MAX_DODGE;
use crate::rng::BattleRng;

/// Roll for a dodge
///
/// Returns true when `roll < dodge_chance` and the ability can be dodged.
pub fn roll_dodge(rng: &mut dyn BattleRng, dodge_chance: f64, undodgeable: bool) -> bool {
    let roll = rng.rand("resolve.dodge");
    if undodgeable {
        return false;
    }
    let chance = dodge_chance.clamp(0.0, MAX_DODGE) / 100.0;
    roll < chance
}

/// Roll for a critical strike
pub fn roll_crit(rng: &mut dyn BattleRng, crit_chance: f64) -> bool {
    let roll = rng.rand("resolve.crit");
    roll < crit_chance.clamp(0.0, 100.0) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRng;

    #[test]
    fn test_dodge_below_chance() {
        let mut rng = ScriptedRng::constant(0.1);
        assert!(roll_dodge(&mut rng, 20.0, false));
    }

    #[test]
    fn test_dodge_above_chance() {
        let mut rng = ScriptedRng::constant(0.3);
        assert!(!roll_dodge(&mut rng, 20.0, false));
    }

    #[test]
    fn test_undodgeable_still_draws() {
        let mut rng = ScriptedRng::constant(0.0);
        assert!(!roll_dodge(&mut rng, 50.0, true));
        assert_eq!(rng.draw_index(), 1);
    }

    #[test]
    fn test_zero_chance_never_dodges() {
        let mut rng = ScriptedRng::constant(0.0);
        assert!(!roll_dodge(&mut rng, 0.0, false));
        assert!(!roll_crit(&mut rng, 0.0));
    }

    #[test]
    fn test_dodge_is_capped() {
        let mut rng = ScriptedRng::constant(0.8);
        assert!(!roll_dodge(&mut rng, 500.0, false));
    }
}
