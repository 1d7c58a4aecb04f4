//! Hit resolution

use super::HitRequest;
use crate::config::CombatConstants;
use crate::defense::{apply_affinity, apply_element_resist, mitigate_by_defense, roll_crit, roll_dodge};
use crate::rng::BattleRng;
use serde::{Deserialize, Serialize};

/// Result of a resolved hit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitResult {
    /// Final non-negative damage
    pub amount: u32,
    pub dodged: bool,
    pub crit: bool,
}

impl HitResult {
    pub fn dodged() -> Self {
        HitResult {
            amount: 0,
            dodged: true,
            crit: false,
        }
    }
}

/// Steps 1-4 of the pipeline, before crit
fn mitigated(req: &HitRequest, constants: &CombatConstants) -> f64 {
    let base = req.attacker_stat.max(0.0)
        * req.potency.max(0.0)
        * req.enrage_mult.max(0.0)
        * (1.0 + req.element_bonus_pct / 100.0).max(0.0);
    let after_affinity = apply_affinity(base, req.affinity_mult);
    let after_resist = apply_element_resist(
        after_affinity,
        req.flat_resist_pct,
        constants.damage.max_resist,
    );
    mitigate_by_defense(
        after_resist,
        req.defense,
        req.penetration,
        constants.damage.defense_scale,
    )
}

fn finalize(damage: f64) -> u32 {
    if !damage.is_finite() || damage <= 0.0 {
        return 0;
    }
    damage.round().min(u32::MAX as f64) as u32
}

/// Resolve a hit
///
/// Always draws the dodge roll then the crit roll, in that order, so the RNG
/// position only depends on the number of hits.
pub fn resolve(req: &HitRequest, rng: &mut dyn BattleRng, constants: &CombatConstants) -> HitResult {
    let dodged = roll_dodge(rng, req.dodge_chance, req.undodgeable);
    let crit = roll_crit(rng, req.crit_chance);
    if dodged {
        return HitResult::dodged();
    }

    let mut damage = mitigated(req, constants);
    if crit {
        damage *= req.crit_mult.max(1.0);
    }

    HitResult {
        amount: finalize(damage),
        dodged: false,
        crit,
    }
}

/// Expected damage without rolling (crit folded in at its average)
///
/// Used by the enemy AI to score damage abilities.
pub fn estimate(req: &HitRequest, constants: &CombatConstants) -> u32 {
    let crit_share = req.crit_chance.clamp(0.0, 100.0) / 100.0;
    let expected_mult = 1.0 + crit_share * (req.crit_mult.max(1.0) - 1.0);
    finalize(mitigated(req, constants) * expected_mult)
}
