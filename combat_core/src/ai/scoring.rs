//! Ability scoring heuristics

use crate::ability::{Ability, AbilityCatalog};
use crate::actor::{Actor, Enemy};
use crate::config::CombatConstants;
use crate::damage::{estimate, HitRequest};
use crate::types::DamageKind;

/// Read-only inputs shared by every score in one decision
pub struct ScoreInputs<'a> {
    pub catalog: &'a AbilityCatalog,
    pub constants: &'a CombatConstants,
    /// 0..1 difficulty smartness
    pub smartness: f64,
}

/// Heuristic score plus the learned preference
pub fn score_ability(enemy: &Enemy, target: &Actor, ability: &Ability, inputs: &ScoreInputs) -> f64 {
    let learning = &inputs.constants.learning;
    let learned_weight = learning.learned_base + inputs.smartness * learning.learned_smart;
    heuristic_score(enemy, target, ability, inputs)
        + enemy.memory.learned_value(&ability.id) * learned_weight
}

/// Role-specific part of the score
pub fn heuristic_score(enemy: &Enemy, target: &Actor, ability: &Ability, inputs: &ScoreInputs) -> f64 {
    let me = &enemy.actor;
    let missing_hp = 1.0 - me.hp_ratio();

    let mut score = match ability.kind {
        DamageKind::Guard => {
            let mut s = 8.0 + missing_hp * 30.0;
            if me.status.is_guarding() {
                s -= 25.0;
            }
            s
        }
        DamageKind::Buff => {
            let mut s = 6.0;
            if planning_burst(enemy, ability, inputs.catalog) {
                s += 10.0;
            }
            if ability.enrage.is_some() && me.status.is_enraged() {
                s -= 20.0;
            }
            s
        }
        DamageKind::Debuff => {
            let mut s = 6.0 + target.hp_ratio() * 10.0;
            if target.status.shield > 0 {
                s += 6.0;
            }
            if already_applied(target, ability) {
                s -= 12.0;
            }
            s
        }
        DamageKind::Physical | DamageKind::Magic | DamageKind::DamageHeal => {
            let req = HitRequest::between(me, target, ability, inputs.constants);
            let expected = estimate(&req, inputs.constants);
            let mut s = expected as f64;
            if expected >= target.hp.saturating_add(target.status.shield) {
                s += 50.0;
            }
            if ability.bleed.is_some() && !target.status.bleed.is_active() {
                s += 6.0;
            }
            if ability.vulnerable.is_some() && !target.status.vulnerable.is_active() {
                s += 5.0;
            }
            s += target.status.shield.min(ability.shield_shatter) as f64 * 0.5;
            s
        }
    };

    if ability.heals() {
        score += missing_hp * 25.0;
    }
    score
}

/// Whether a heavy hit is coming up soon in this enemy's kit
fn planning_burst(enemy: &Enemy, buff: &Ability, catalog: &AbilityCatalog) -> bool {
    enemy
        .abilities
        .iter()
        .filter(|id| **id != buff.id)
        .filter_map(|id| catalog.get(id))
        .any(|a| {
            a.kind.deals_damage()
                && (a.potency >= 1.5 || a.is_telegraphed())
                && enemy.cooldown(&a.id) <= 1
        })
}

/// Whether every debuff `ability` carries is already on the target
fn already_applied(target: &Actor, ability: &Ability) -> bool {
    let status = &target.status;
    let checks = [
        (ability.bleed.is_some(), status.bleed.is_active()),
        (ability.chill.is_some(), status.chill.is_active()),
        (ability.vulnerable.is_some(), status.vulnerable.is_active()),
        (ability.armor_down.is_some(), status.armor_down.is_active()),
        (ability.magic_res_down.is_some(), status.magic_res_down.is_active()),
        (ability.atk_down.is_some(), status.atk_down.is_active()),
        (ability.mag_down.is_some(), status.mag_down.is_active()),
        (ability.stun_turns > 0, status.stunned > 0),
    ];
    let mut carried = checks.iter().filter(|(has, _)| *has).peekable();
    carried.peek().is_some() && carried.all(|(_, active)| *active)
}
