//! Ability application - resolver output applied to actors
//!
//! Offensive abilities run through dodge/resolve, then damage windows
//! (vulnerable, guard, difficulty), then shields (shatter first, then absorb),
//! then HP. Reflect, lifesteal, posture and synergies follow in that order,
//! and target debuffs are applied last. Self effects apply to the user.

use super::AbilityOutcome;
use crate::ability::{Ability, BASELINE_STRIKE};
use crate::actor::Actor;
use crate::battle::BattleContext;
use crate::damage::{resolve, HitRequest};
use crate::log::Severity;
use crate::status::apply_synergy_on_hit;
use crate::types::{DamageKind, Side};
use serde_json::json;

/// Use `ability_id` from `user` on `target`
///
/// Unknown ids and dead actors give a neutral result and a warning entry.
pub fn apply_ability(
    ctx: &mut BattleContext,
    user: &mut Actor,
    target: &mut Actor,
    ability_id: &str,
) -> AbilityOutcome {
    let ability = if ability_id == BASELINE_STRIKE {
        Some(ctx.catalog.baseline())
    } else {
        ctx.catalog.get(ability_id).cloned()
    };

    match ability {
        Some(ability) => apply_resolved(ctx, user, target, &ability),
        None => {
            ctx.log.log(
                format!("{} tries an unknown ability ({}).", user.name, ability_id),
                Severity::Warn,
            );
            AbilityOutcome::skipped()
        }
    }
}

/// Use an already looked-up ability
pub fn apply_resolved(
    ctx: &mut BattleContext,
    user: &mut Actor,
    target: &mut Actor,
    ability: &Ability,
) -> AbilityOutcome {
    if !user.is_alive() {
        ctx.log.log(
            format!("{} cannot act while defeated.", user.name),
            Severity::Warn,
        );
        return AbilityOutcome::skipped();
    }

    let mut outcome = AbilityOutcome::default();

    if ability.kind.is_offensive() {
        if !target.is_alive() {
            ctx.log.log(
                format!("{} has no living target for {}.", user.name, ability.name),
                Severity::Warn,
            );
            return AbilityOutcome::skipped();
        }

        let req = HitRequest::between(user, target, ability, &ctx.constants);
        let hit = resolve(&req, ctx.rng.as_mut(), &ctx.constants);
        if hit.dodged {
            ctx.log.log(
                format!("{} dodges {}'s {}.", target.name, user.name, ability.name),
                Severity::Info,
            );
            outcome.dodged = true;
            return outcome;
        }
        outcome.crit = hit.crit;

        if ability.kind.deals_damage() {
            land_hit(ctx, user, target, ability, hit.amount, &mut outcome);
        } else {
            ctx.log.log(
                format!("{} uses {} on {}.", user.name, ability.name, target.name),
                Severity::Info,
            );
        }

        if target.is_alive() {
            apply_target_effects(ctx, user, target, ability);
        }
        outcome.target_defeated = !target.is_alive();
    } else {
        ctx.log.log(format!("{} uses {}.", user.name, ability.name), Severity::Info);
    }

    if user.is_alive() {
        apply_self_effects(ctx, user, ability, &mut outcome);
    }

    tracing::debug!(
        user = %user.id,
        target = %target.id,
        ability = %ability.id,
        damage = outcome.damage_dealt,
        heal = outcome.heal_done,
        "ability applied"
    );
    outcome
}

fn hit_severity(target: &Actor) -> Severity {
    match target.side {
        Side::Player => Severity::Danger,
        Side::Enemy => Severity::Info,
    }
}

fn land_hit(
    ctx: &mut BattleContext,
    user: &mut Actor,
    target: &mut Actor,
    ability: &Ability,
    resolved: u32,
    outcome: &mut AbilityOutcome,
) {
    let mut scaled = resolved as f64;
    scaled *= 1.0 + target.status.vulnerable.value().max(0.0);
    scaled *= 1.0 - target.status.guard.value().clamp(0.0, 1.0);
    if user.side == Side::Enemy {
        scaled *= ctx.difficulty.enemy_damage_mult.max(0.0);
    }
    let mut amount = if scaled.is_finite() && scaled > 0.0 {
        scaled.round() as u32
    } else {
        0
    };
    if target.status.invulnerable > 0 {
        amount = 0;
    }

    // Shields: shatter, then absorb, then HP
    let shattered = target.status.shield.min(ability.shield_shatter);
    target.status.shield -= shattered;
    let absorbed = target.status.shield.min(amount);
    target.status.shield -= absorbed;
    let hp_damage = target.take_damage(amount - absorbed);

    outcome.shield_shattered = shattered;
    outcome.shield_consumed = absorbed;
    outcome.damage_dealt = hp_damage;

    if shattered > 0 {
        ctx.log.log(
            format!("{} shatters {} of {}'s shield.", ability.name, shattered, target.name),
            Severity::Info,
        );
    }
    let crit_note = if outcome.crit { " Critical hit!" } else { "" };
    ctx.log.log_with_meta(
        format!(
            "{} hits {} with {} for {} damage.{}",
            user.name, target.name, ability.name, hp_damage, crit_note
        ),
        hit_severity(target),
        json!({
            "ability": ability.id,
            "damage": hp_damage,
            "absorbed": absorbed,
            "crit": outcome.crit,
        }),
    );

    // Reflect after HP has been debited
    if ability.kind == DamageKind::Physical && target.stats.thorns > 0.0 && amount > 0 {
        let reflect = target.stats.thorns.round().max(0.0) as u32;
        if reflect > 0 && user.status.invulnerable == 0 {
            let dealt = user.take_damage(reflect);
            outcome.reflected = dealt;
            ctx.log.log(
                format!("{}'s thorns deal {} damage to {}.", target.name, dealt, user.name),
                hit_severity(user),
            );
            if !user.is_alive() {
                outcome.user_defeated = true;
                ctx.log.log(
                    format!("{} is slain by thorns!", user.name),
                    Severity::Danger,
                );
            }
        }
    }

    // Lifesteal and drains
    let steal = user.stats.lifesteal.max(0.0) / 100.0 + ability.drain_pct.max(0.0);
    if steal > 0.0 && hp_damage > 0 {
        let healed = user.heal((hp_damage as f64 * steal).round() as u32);
        if healed > 0 {
            outcome.heal_done += healed;
            ctx.log.log(
                format!("{} drains {} HP.", user.name, healed),
                Severity::Good,
            );
        }
    }

    // Posture
    if target.max_posture > 0 && target.status.broken == 0 && target.is_alive() {
        let from_damage = (hp_damage as f64 * ctx.constants.posture.damage_ratio).round() as u32;
        let posture_hit = from_damage + ability.posture_damage;
        if posture_hit > 0 {
            target.posture = target.posture.saturating_sub(posture_hit);
            if target.posture == 0 {
                target.status.broken = ctx.constants.posture.broken_turns;
                outcome.target_broken = true;
                ctx.log.log(format!("{} is Broken!", target.name), Severity::Good);
            }
        }
    }

    // Synergies scale with what reached HP, not what the shield soaked
    if target.is_alive() && amount > 0 {
        let synergy = apply_synergy_on_hit(
            target,
            hp_damage,
            ability.element,
            ability.kind,
            &ctx.constants.synergy,
            &mut ctx.log,
        );
        outcome.ignited = synergy.ignited;
        outcome.damage_dealt += synergy.shatter_damage;
    }
}

fn apply_target_effects(ctx: &mut BattleContext, user: &Actor, target: &mut Actor, ability: &Ability) {
    if let Some(bleed) = ability.bleed {
        target.status.bleed.refresh(bleed.magnitude, bleed.turns);
        ctx.log.log(format!("{} starts bleeding.", target.name), Severity::Info);
    }
    if let Some(chill) = ability.chill {
        target.status.chill.refresh(chill.magnitude, chill.turns);
        ctx.log.log(format!("{} is chilled.", target.name), Severity::Info);
    }
    if let Some(vulnerable) = ability.vulnerable {
        target.status.vulnerable.refresh(vulnerable.magnitude, vulnerable.turns);
        ctx.log.log(format!("{} is exposed.", target.name), Severity::Info);
    }
    if let Some(armor_down) = ability.armor_down {
        target.status.armor_down.refresh(armor_down.magnitude, armor_down.turns);
        ctx.log.log(format!("{}'s armor is sundered.", target.name), Severity::Info);
    }
    if let Some(mres_down) = ability.magic_res_down {
        target.status.magic_res_down.refresh(mres_down.magnitude, mres_down.turns);
    }
    if let Some(atk_down) = ability.atk_down {
        let flat = (target.base_attack * atk_down.magnitude).round().max(0.0);
        target.status.atk_down.refresh(flat, atk_down.turns);
        ctx.log.log(format!("{} is weakened.", target.name), Severity::Info);
    }
    if let Some(mag_down) = ability.mag_down {
        let flat = (target.base_magic * mag_down.magnitude).round().max(0.0);
        target.status.mag_down.refresh(flat, mag_down.turns);
    }
    if ability.stun_turns > 0 {
        target.status.stunned = target.status.stunned.max(ability.stun_turns);
        ctx.log.log(format!("{} is stunned!", target.name), Severity::Good);
    }
    if ability.force_guard_turns > 0 {
        target.status.forced_guard = target.status.forced_guard.max(ability.force_guard_turns);
        ctx.log.log(
            format!("{} forces {} onto the defensive.", user.name, target.name),
            Severity::Info,
        );
    }
}

fn apply_self_effects(
    ctx: &mut BattleContext,
    user: &mut Actor,
    ability: &Ability,
    outcome: &mut AbilityOutcome,
) {
    if let Some(guard) = ability.guard {
        user.status.guard.refresh(guard.magnitude, guard.turns);
        ctx.log.log(format!("{} raises their guard.", user.name), Severity::Info);
    }
    if let Some(enrage) = ability.enrage {
        user.status.enrage.refresh(enrage.magnitude, enrage.turns);
        ctx.log.log(format!("{} becomes enraged!", user.name), Severity::Warn);
    }
    if let Some(buff) = ability.atk_buff {
        user.status.atk_buff.refresh(buff.magnitude, buff.turns);
    }
    if let Some(buff) = ability.mag_buff {
        user.status.mag_buff.refresh(buff.magnitude, buff.turns);
    }
    if let Some(evasion) = ability.evasion {
        user.status.evasion.refresh(evasion.magnitude, evasion.turns);
    }
    if let Some(haste) = ability.haste {
        user.status.haste.refresh(haste.magnitude, haste.turns);
    }
    if ability.shield > 0 {
        user.status.shield = user.status.shield.saturating_add(ability.shield);
        outcome.shield_gained = ability.shield;
        ctx.log.log(
            format!("{} gains a {} point shield.", user.name, ability.shield),
            Severity::Good,
        );
    }
    if ability.heal_pct > 0.0 {
        let amount = (user.max_hp as f64 * ability.heal_pct).round().max(0.0) as u32;
        let healed = user.heal(amount);
        outcome.heal_done += healed;
        ctx.log.log(format!("{} recovers {} HP.", user.name, healed), Severity::Good);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::{default_abilities, EffectSpec};
    use crate::actor::Stats;
    use crate::config::DifficultyConfig;
    use crate::rng::ScriptedRng;
    use crate::types::Element;

    /// 0.99 never dodges and never crits at normal chances
    fn make_ctx() -> BattleContext {
        BattleContext::new(
            Box::new(ScriptedRng::constant(0.99)),
            default_abilities(),
            DifficultyConfig::default(),
        )
    }

    fn make_hero() -> Actor {
        Actor::new("hero", "Hero", Side::Player, 5, 100).with_stats(Stats {
            attack: 20.0,
            magic: 20.0,
            ..Default::default()
        })
    }

    fn make_dummy() -> Actor {
        Actor::new("dummy", "Dummy", Side::Enemy, 5, 200)
    }

    fn register(ctx: &mut BattleContext, ability: Ability) {
        ctx.catalog.register(ability);
    }

    #[test]
    fn test_unknown_ability_is_neutral() {
        let mut ctx = make_ctx();
        let mut hero = make_hero();
        let mut dummy = make_dummy();
        let outcome = apply_ability(&mut ctx, &mut hero, &mut dummy, "no_such_move");
        assert!(outcome.skipped);
        assert_eq!(outcome.damage_dealt, 0);
        assert_eq!(dummy.hp, 200);
        assert_eq!(ctx.log.entries().last().map(|e| e.severity), Some(Severity::Warn));
    }

    #[test]
    fn test_shield_shatter_then_absorb() {
        let mut ctx = make_ctx();
        let mut breaker = Ability::new("breaker", "Breaker", DamageKind::Physical, 1.0);
        breaker.shield_shatter = 5;
        register(&mut ctx, breaker);

        let mut hero = make_hero();
        let mut dummy = make_dummy();
        dummy.status.shield = 12;

        let outcome = apply_ability(&mut ctx, &mut hero, &mut dummy, "breaker");
        // 20 damage: 5 shattered, 7 absorbed, 13 to HP
        assert_eq!(outcome.shield_shattered, 5);
        assert_eq!(outcome.shield_consumed, 7);
        assert_eq!(outcome.damage_dealt, 13);
        assert_eq!(dummy.status.shield, 0);
        assert_eq!(dummy.hp, 187);
    }

    #[test]
    fn test_dodge_applies_nothing() {
        let mut ctx = BattleContext::new(
            Box::new(ScriptedRng::new([0.0], 0.99)),
            default_abilities(),
            DifficultyConfig::default(),
        );
        let mut hero = make_hero();
        let mut dummy = make_dummy();
        dummy.stats.dodge_chance = 50.0;

        let outcome = apply_ability(&mut ctx, &mut hero, &mut dummy, "rend");
        assert!(outcome.dodged);
        assert_eq!(outcome.damage_dealt, 0);
        assert_eq!(dummy.hp, 200);
        assert!(!dummy.status.bleed.is_active());
    }

    #[test]
    fn test_thorns_can_kill_attacker() {
        let mut ctx = make_ctx();
        let mut hero = make_hero();
        hero.hp = 3;
        let mut dummy = make_dummy();
        dummy.stats.thorns = 5.0;

        let outcome = apply_ability(&mut ctx, &mut hero, &mut dummy, "strike");
        assert!(outcome.damage_dealt > 0);
        assert!(outcome.user_defeated);
        assert!(!hero.is_alive());
    }

    #[test]
    fn test_guard_and_vulnerable_windows() {
        let mut ctx = make_ctx();
        let mut hero = make_hero();
        let mut dummy = make_dummy();

        dummy.status.guard.set(0.5, 1);
        let guarded = apply_ability(&mut ctx, &mut hero, &mut dummy, "strike");
        assert_eq!(guarded.damage_dealt, 10);

        dummy.status.guard.clear();
        dummy.status.vulnerable.set(0.5, 1);
        let exposed = apply_ability(&mut ctx, &mut hero, &mut dummy, "strike");
        assert_eq!(exposed.damage_dealt, 30);
    }

    #[test]
    fn test_enemy_damage_scaled_by_difficulty() {
        let mut ctx = make_ctx();
        ctx.difficulty.enemy_damage_mult = 1.5;
        let mut enemy = Actor::new("orc", "Orc", Side::Enemy, 5, 100).with_stats(Stats {
            attack: 20.0,
            ..Default::default()
        });
        let mut hero = make_hero();

        let outcome = apply_ability(&mut ctx, &mut enemy, &mut hero, "strike");
        assert_eq!(outcome.damage_dealt, 30);
    }

    #[test]
    fn test_atk_down_uses_base_attack() {
        let mut ctx = make_ctx();
        let mut weaken = Ability::new("sap", "Sap", DamageKind::Debuff, 0.0);
        weaken.atk_down = Some(EffectSpec::new(0.25, 2));
        register(&mut ctx, weaken);

        let mut hero = make_hero();
        let mut dummy = make_dummy().with_stats(Stats {
            attack: 40.0,
            ..Default::default()
        });

        apply_ability(&mut ctx, &mut hero, &mut dummy, "sap");
        assert!((dummy.status.atk_down.magnitude - 10.0).abs() < f64::EPSILON);
        assert!((dummy.effective_attack() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fire_on_bleeding_target_ignites() {
        let mut ctx = make_ctx();
        let bolt =
            Ability::new("bolt", "Bolt", DamageKind::Magic, 1.0).with_element(Element::Fire);
        register(&mut ctx, bolt);

        let mut hero = make_hero();
        let mut dummy = make_dummy();
        dummy.status.bleed.set(3.0, 2);

        let outcome = apply_ability(&mut ctx, &mut hero, &mut dummy, "bolt");
        assert!(outcome.ignited);
        assert!(dummy.status.burn.is_active());
        assert_eq!(ctx.log.count_containing("ignites"), 1);
    }

    #[test]
    fn test_chill_shatter_scales_with_hp_damage() {
        let mut ctx = make_ctx();
        let mut hero = make_hero();

        // 20 damage fully absorbed: burst falls back to the minimum
        let mut dummy = make_dummy();
        dummy.status.shield = 50;
        dummy.status.chill.set(0.2, 2);
        let outcome = apply_ability(&mut ctx, &mut hero, &mut dummy, "strike");
        assert_eq!(outcome.shield_consumed, 20);
        assert_eq!(dummy.status.shield, 30);
        assert_eq!(outcome.damage_dealt, ctx.constants.synergy.shatter_min);
        assert_eq!(dummy.hp, 200 - ctx.constants.synergy.shatter_min);
        assert!(!dummy.status.chill.is_active());

        // 10 absorbed, 10 to HP, burst round(10 * 0.18) = 2
        let mut dummy = make_dummy();
        dummy.status.shield = 10;
        dummy.status.chill.set(0.2, 2);
        let outcome = apply_ability(&mut ctx, &mut hero, &mut dummy, "strike");
        assert_eq!(outcome.damage_dealt, 12);
        assert_eq!(dummy.hp, 188);
    }

    #[test]
    fn test_ignite_ignores_shielded_damage() {
        let mut ctx = make_ctx();
        let blast =
            Ability::new("blast", "Blast", DamageKind::Magic, 3.0).with_element(Element::Fire);
        register(&mut ctx, blast);

        let mut hero = make_hero();
        let mut dummy = make_dummy();
        dummy.status.shield = 40;
        dummy.status.bleed.set(3.0, 2);

        // 60 damage, 20 reaches HP: round(20 * 0.12) = 2, not round(60 * 0.12) = 7
        let outcome = apply_ability(&mut ctx, &mut hero, &mut dummy, "blast");
        assert_eq!(outcome.damage_dealt, 20);
        assert!(outcome.ignited);
        assert!((dummy.status.burn.magnitude - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_posture_break() {
        let mut ctx = make_ctx();
        let mut hero = make_hero();
        let mut dummy = make_dummy();
        dummy.max_posture = 10;
        dummy.posture = 10;

        // 20 damage * 0.5 = 10 posture
        let outcome = apply_ability(&mut ctx, &mut hero, &mut dummy, "strike");
        assert!(outcome.target_broken);
        assert_eq!(dummy.status.broken, ctx.constants.posture.broken_turns);
    }

    #[test]
    fn test_self_heal_and_shield() {
        let mut ctx = make_ctx();
        let mut hero = make_hero();
        hero.hp = 50;
        let mut dummy = make_dummy();

        let outcome = apply_ability(&mut ctx, &mut hero, &mut dummy, "mend");
        assert_eq!(outcome.heal_done, 25);
        assert_eq!(hero.hp, 75);

        let ward = apply_ability(&mut ctx, &mut hero, &mut dummy, "ward");
        assert!(ward.shield_gained > 0);
        assert_eq!(hero.status.shield, ward.shield_gained);
    }

    #[test]
    fn test_dead_user_is_neutral() {
        let mut ctx = make_ctx();
        let mut hero = make_hero();
        hero.hp = 0;
        let mut dummy = make_dummy();
        let outcome = apply_ability(&mut ctx, &mut hero, &mut dummy, "strike");
        assert!(outcome.skipped);
        assert_eq!(dummy.hp, 200);
    }
}
