//! Enemy turn state machine
//!
//! Turn start runs, in order: DOT tick, round timers, berserk latch, then the
//! stunned/broken/forced-guard shortcuts. A pending intent is advanced next;
//! otherwise a new ability is chosen and either declared (telegraphed) or
//! applied and learned from.

use super::decision::choose_ability;
use super::intent::{Intent, IntentStep};
use crate::actor::{Actor, Enemy};
use crate::battle::BattleContext;
use crate::combat::{apply_ability, AbilityOutcome};
use crate::log::Severity;
use crate::status::{tick_round_boundary, tick_start_of_turn};
use serde_json::json;

/// How an enemy turn ended
#[derive(Debug, Clone, PartialEq)]
pub enum EnemyTurn {
    /// The enemy was already defeated
    Inactive,
    /// A DOT tick at turn start defeated the enemy
    DiedToDot,
    Stunned,
    Broken,
    ForcedGuard,
    /// A telegraphed ability was declared
    Declared(String),
    /// A declared ability is still readying
    Readying(String),
    Acted {
        ability_id: String,
        outcome: AbilityOutcome,
    },
}

impl EnemyTurn {
    /// Outcome of the applied ability, if one was applied
    pub fn outcome(&self) -> Option<&AbilityOutcome> {
        match self {
            EnemyTurn::Acted { outcome, .. } => Some(outcome),
            _ => None,
        }
    }
}

/// Run one enemy turn against `target`
pub fn take_enemy_turn(ctx: &mut BattleContext, enemy: &mut Enemy, target: &mut Actor) -> EnemyTurn {
    if !enemy.is_alive() {
        return EnemyTurn::Inactive;
    }

    // (a) residual DOT
    let dot = tick_start_of_turn(&mut enemy.actor, &mut ctx.log);
    if dot.defeated {
        enemy.intent.clear();
        return EnemyTurn::DiedToDot;
    }

    // (b) own timers
    tick_round_boundary(&mut enemy.actor, &mut ctx.log);

    // (c) berserk latch, only checked here
    check_berserk(ctx, enemy);

    // (d) turn-consuming states
    if let Some(skip) = consume_disabled_turn(ctx, enemy) {
        return skip;
    }

    match enemy.intent.advance() {
        IntentStep::Readying(turns_left) => {
            let ability_id = enemy.intent.ability_id().unwrap_or_default().to_string();
            let ability_name = display_name(ctx, &ability_id);
            ctx.log.log_with_meta(
                format!("{} continues to ready {}...", enemy.name(), ability_name),
                Severity::Warn,
                json!({ "intent": ability_id, "turns": turns_left }),
            );
            return EnemyTurn::Readying(ability_id);
        }
        IntentStep::Resolve(ability_id) => {
            return act(ctx, enemy, target, ability_id);
        }
        IntentStep::Idle => {}
    }

    let chosen = choose_ability(ctx, enemy, target);
    let ability = ctx
        .catalog
        .get(&chosen)
        .cloned()
        .unwrap_or_else(|| ctx.catalog.baseline());

    enemy.start_cooldown(&ability.id, ability.cooldown);

    if ability.is_telegraphed() {
        enemy.intent = Intent::declare(ability.id.clone(), ability.telegraph_turns);
        ctx.log.log_with_meta(
            format!("{} prepares {}!", enemy.name(), ability.name),
            Severity::Warn,
            json!({ "intent": ability.id, "turns": ability.telegraph_turns }),
        );
        return EnemyTurn::Declared(ability.id);
    }

    act(ctx, enemy, target, ability.id)
}

fn display_name(ctx: &BattleContext, ability_id: &str) -> String {
    ctx.catalog
        .get(ability_id)
        .map(|a| a.name.clone())
        .unwrap_or_else(|| ability_id.to_string())
}

/// Apply the ability and update learning
fn act(ctx: &mut BattleContext, enemy: &mut Enemy, target: &mut Actor, ability_id: String) -> EnemyTurn {
    let outcome = apply_ability(ctx, &mut enemy.actor, target, &ability_id);

    if !outcome.skipped {
        let learning = &ctx.constants.learning;
        let reward = outcome.reward(learning.heal_weight, learning.shield_weight);
        let value = enemy.memory.learn(&ability_id, reward, learning);
        tracing::debug!(
            enemy = %enemy.actor.id,
            ability = %ability_id,
            reward,
            value,
            exploration = enemy.memory.exploration,
            "enemy learned"
        );
    }

    EnemyTurn::Acted {
        ability_id,
        outcome,
    }
}

/// Fire the berserk affix once when HP falls to its threshold
fn check_berserk(ctx: &mut BattleContext, enemy: &mut Enemy) {
    let hp_ratio = enemy.actor.hp_ratio();
    let bonus = match enemy.berserk.as_mut() {
        Some(latch) if !latch.consumed && hp_ratio <= latch.threshold => {
            latch.consumed = true;
            latch.attack_bonus
        }
        _ => return,
    };

    let status = &mut enemy.actor.status;
    let magnitude = bonus.max(status.enrage.value());
    status.enrage.set(magnitude, 1);
    status.enrage_latched = true;
    ctx.log.log(
        format!("{} flies into a berserk rage!", enemy.actor.name),
        Severity::Danger,
    );
}

fn consume_disabled_turn(ctx: &mut BattleContext, enemy: &mut Enemy) -> Option<EnemyTurn> {
    let actor = &mut enemy.actor;

    if actor.status.broken > 0 {
        actor.status.broken -= 1;
        ctx.log.log(
            format!("{} is Broken and cannot act.", actor.name),
            Severity::Good,
        );
        if actor.status.broken == 0 {
            actor.posture = actor.max_posture;
            ctx.log.log(format!("{} regains their footing.", actor.name), Severity::Info);
        }
        return Some(EnemyTurn::Broken);
    }

    if actor.status.stunned > 0 {
        actor.status.stunned -= 1;
        ctx.log.log(
            format!("{} is stunned and cannot act.", actor.name),
            Severity::Good,
        );
        return Some(EnemyTurn::Stunned);
    }

    if actor.status.forced_guard > 0 {
        actor.status.forced_guard -= 1;
        let reduction = ctx.constants.damage.forced_guard_reduction;
        actor.status.guard.refresh(reduction, 1);
        ctx.log.log(format!("{} is forced to guard.", actor.name), Severity::Info);
        return Some(EnemyTurn::ForcedGuard);
    }

    None
}
