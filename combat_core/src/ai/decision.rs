//! Epsilon-greedy ability selection

use super::scoring::{score_ability, ScoreInputs};
use crate::ability::{AbilityCatalog, BASELINE_STRIKE};
use crate::actor::{Actor, Enemy};
use crate::battle::BattleContext;
use crate::config::LearningConstants;

/// Kit abilities that exist in the catalog and are off cooldown
pub fn usable_abilities(enemy: &Enemy, catalog: &AbilityCatalog) -> Vec<String> {
    enemy
        .abilities
        .iter()
        .filter(|id| catalog.contains(id) || id.as_str() == BASELINE_STRIKE)
        .filter(|id| enemy.is_ready(id))
        .cloned()
        .collect()
}

/// `clamp(exploration * (1.2 - smartness), min, max)`
pub fn exploration_epsilon(exploration: f64, smartness: f64, constants: &LearningConstants) -> f64 {
    (exploration * (1.2 - smartness.clamp(0.0, 1.0)))
        .clamp(constants.epsilon_min, constants.epsilon_max)
}

/// Pick the ability the enemy uses this turn
///
/// Falls back to the baseline strike when nothing is usable. Otherwise draws
/// `ai.explore`; on success picks uniformly (`ai.pick`), else takes the best
/// score with ties going to the first ability in kit order.
pub fn choose_ability(ctx: &mut BattleContext, enemy: &Enemy, target: &Actor) -> String {
    let usable = usable_abilities(enemy, &ctx.catalog);
    if usable.is_empty() {
        return BASELINE_STRIKE.to_string();
    }

    let smartness = ctx.difficulty.smartness();
    let epsilon = exploration_epsilon(
        enemy.memory.exploration,
        smartness,
        &ctx.constants.learning,
    );
    if ctx.rng.chance(epsilon, "ai.explore") {
        let last = usable.len() - 1;
        let index = ctx.rng.rand_int(0, last as i64, "ai.pick").clamp(0, last as i64) as usize;
        tracing::debug!(enemy = %enemy.actor.id, epsilon, pick = %usable[index], "ai explores");
        return usable[index].clone();
    }

    let inputs = ScoreInputs {
        catalog: &ctx.catalog,
        constants: &ctx.constants,
        smartness,
    };
    let mut best: Option<(&String, f64)> = None;
    for id in &usable {
        let ability = if id == BASELINE_STRIKE {
            ctx.catalog.baseline()
        } else {
            match ctx.catalog.get(id) {
                Some(ability) => ability.clone(),
                None => continue,
            }
        };
        let score = score_ability(enemy, target, &ability, &inputs);
        tracing::trace!(enemy = %enemy.actor.id, ability = %id, score, "ai score");
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((id, score));
        }
    }

    best.map(|(id, _)| id.clone())
        .unwrap_or_else(|| BASELINE_STRIKE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::{default_abilities, Ability};
    use crate::actor::Stats;
    use crate::config::DifficultyConfig;
    use crate::rng::ScriptedRng;
    use crate::types::{DamageKind, Side};

    fn make_ctx(rng: ScriptedRng) -> BattleContext {
        BattleContext::new(Box::new(rng), default_abilities(), DifficultyConfig::default())
    }

    fn make_enemy(abilities: &[&str]) -> Enemy {
        let actor = Actor::new("orc", "Orc", Side::Enemy, 3, 100).with_stats(Stats {
            attack: 20.0,
            ..Default::default()
        });
        Enemy::new(actor, "orc").with_abilities(abilities.iter().copied())
    }

    fn make_target() -> Actor {
        Actor::new("hero", "Hero", Side::Player, 3, 100)
    }

    #[test]
    fn test_epsilon_clamped() {
        let constants = LearningConstants::default();
        assert!((exploration_epsilon(0.25, 0.5, &constants) - 0.175).abs() < 1e-9);
        assert!((exploration_epsilon(1.0, 0.0, &constants) - 0.35).abs() < 1e-9);
        assert!((exploration_epsilon(0.01, 1.0, &constants) - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_all_on_cooldown_falls_back_to_strike() {
        let mut ctx = make_ctx(ScriptedRng::constant(0.99));
        let mut enemy = make_enemy(&["bite"]);
        enemy.start_cooldown("bite", 2);
        assert_eq!(choose_ability(&mut ctx, &enemy, &make_target()), BASELINE_STRIKE);
        // No draw for the fallback
        assert_eq!(ctx.rng.draw_index(), 0);
    }

    #[test]
    fn test_exploit_picks_highest_score() {
        let mut ctx = make_ctx(ScriptedRng::constant(0.99));
        ctx.catalog
            .register(Ability::new("tap", "Tap", DamageKind::Physical, 0.5));
        ctx.catalog
            .register(Ability::new("smash", "Smash", DamageKind::Physical, 2.0));
        let enemy = make_enemy(&["tap", "smash"]);
        assert_eq!(choose_ability(&mut ctx, &enemy, &make_target()), "smash");
        assert_eq!(ctx.rng.draw_index(), 1);
    }

    #[test]
    fn test_ties_go_to_first() {
        let mut ctx = make_ctx(ScriptedRng::constant(0.99));
        ctx.catalog
            .register(Ability::new("left", "Left", DamageKind::Physical, 1.0));
        ctx.catalog
            .register(Ability::new("right", "Right", DamageKind::Physical, 1.0));
        let enemy = make_enemy(&["left", "right"]);
        assert_eq!(choose_ability(&mut ctx, &enemy, &make_target()), "left");
    }

    #[test]
    fn test_explore_picks_uniformly() {
        // explore roll 0.0 < epsilon, then pick 0.7 * 3 -> index 2
        let mut ctx = make_ctx(ScriptedRng::new([0.0, 0.7], 0.99));
        let enemy = make_enemy(&["bite", "claw_rake", "guard"]);
        assert_eq!(choose_ability(&mut ctx, &enemy, &make_target()), "guard");
        assert_eq!(ctx.rng.draw_index(), 2);
    }

    #[test]
    fn test_unknown_kit_entries_skipped() {
        let ctx_catalog = default_abilities();
        let enemy = make_enemy(&["does_not_exist", "bite"]);
        assert_eq!(usable_abilities(&enemy, &ctx_catalog), vec!["bite".to_string()]);
    }
}
