//! Turn sequencer - round structure and battle-end detection
//!
//! A round is: [`begin_player_turn`] (player DOT, once per round), the
//! player's action plus companion assists, every living enemy's turn, then
//! [`post_enemy_turn`] (regen, round-boundary timers, cooldowns). Victory and
//! defeat are checked after every step and clear the state immediately.

use super::context::BattleContext;
use super::hooks::SaveReason;
use super::state::{BattleOutcome, BattleState};
use crate::ability::{Ability, BASELINE_STRIKE};
use crate::actor::{ActionError, Enemy, Player};
use crate::ai::{take_enemy_turn, EnemyTurn};
use crate::combat::{apply_ability, apply_resolved, AbilityOutcome};
use crate::log::Severity;
use crate::status::{reset_combat_status, tick_round_boundary, tick_start_of_turn};
use serde_json::json;

/// Result of a player action
#[derive(Debug, Clone, Default)]
pub struct ActionReport {
    pub outcome: AbilityOutcome,
    /// Set when the action was refused; the turn is not consumed
    pub rejected: Option<ActionError>,
    pub assists: Vec<AbilityOutcome>,
    pub ended: Option<BattleOutcome>,
}

/// Result of a full round
#[derive(Debug, Clone, Default)]
pub struct RoundReport {
    pub action: ActionReport,
    pub enemy_turns: Vec<EnemyTurn>,
    pub ended: Option<BattleOutcome>,
}

/// Start a battle against `enemies`
///
/// Resets every participant's fight-scoped status. Returns an outcome only if
/// the battle is over before it starts (no living enemies).
pub fn start_battle(
    ctx: &mut BattleContext,
    state: &mut BattleState,
    player: &mut Player,
    enemies: Vec<Enemy>,
) -> Option<BattleOutcome> {
    state.clear();
    state.in_combat = true;
    state.round = 1;
    state.enemies = enemies;

    reset_combat_status(&mut player.actor, &mut ctx.log);
    for companion in &mut player.companions {
        reset_combat_status(&mut companion.actor, &mut ctx.log);
        companion.cooldown = 0;
    }
    player.cooldowns.clear();
    for enemy in &mut state.enemies {
        reset_combat_status(&mut enemy.actor, &mut ctx.log);
        enemy.actor.posture = enemy.actor.max_posture;
        enemy.intent.clear();
        enemy.cooldowns.clear();
    }
    state.retarget();

    let names: Vec<&str> = state.enemies.iter().map(|e| e.name()).collect();
    ctx.log.log_with_meta(
        format!("Battle begins: {}.", names.join(", ")),
        Severity::System,
        json!({ "enemies": names, "draw_index": ctx.rng.draw_index() }),
    );
    tracing::info!(enemies = state.enemies.len(), "battle started");

    if state.all_enemies_defeated() {
        return Some(resolve_victory(ctx, state, player));
    }
    None
}

/// Apply the player's start-of-turn DOT, at most once per round
pub fn begin_player_turn(
    ctx: &mut BattleContext,
    state: &mut BattleState,
    player: &mut Player,
) -> Option<BattleOutcome> {
    if !state.in_combat || state.player_dot_round == Some(state.round) {
        return None;
    }
    state.player_dot_round = Some(state.round);

    tick_start_of_turn(&mut player.actor, &mut ctx.log);
    check_player_defeat(ctx, state, player)
}

/// Resolve the player's chosen ability against the current target
pub fn player_action(
    ctx: &mut BattleContext,
    state: &mut BattleState,
    player: &mut Player,
    ability_id: &str,
) -> ActionReport {
    let mut report = ActionReport {
        outcome: AbilityOutcome::skipped(),
        ..Default::default()
    };

    if !state.in_combat || state.busy {
        ctx.log.log("No action possible right now.", Severity::Warn);
        return report;
    }
    if !player.actor.is_alive() {
        return report;
    }

    if player.actor.status.stunned > 0 {
        player.actor.status.stunned -= 1;
        ctx.log.log(
            format!("{} is stunned and loses the turn.", player.actor.name),
            Severity::Danger,
        );
    } else {
        let ability = match lookup(ctx, ability_id) {
            Some(ability) => ability,
            None => {
                let err = ActionError::UnknownAbility(ability_id.to_string());
                ctx.log.log(err.to_string(), Severity::Warn);
                report.rejected = Some(err);
                return report;
            }
        };
        if let Err(err) = player.check_action(&ability) {
            ctx.log.log(err.to_string(), Severity::Warn);
            report.rejected = Some(err);
            return report;
        }

        let Some(index) = state.retarget() else {
            return report;
        };
        player.commit_action(&ability);
        if let Some(enemy) = state.enemies.get_mut(index) {
            report.outcome = apply_resolved(ctx, &mut player.actor, &mut enemy.actor, &ability);
        }
    }
    state.busy = true;

    settle_enemy_defeats(ctx, state);
    if let Some(end) = check_end(ctx, state, player) {
        report.ended = Some(end);
        return report;
    }

    report.assists = companion_assists(ctx, state, player);
    report.ended = check_end(ctx, state, player);
    state.busy = false;
    report
}

/// Ready companions act against the current target, in order
fn companion_assists(
    ctx: &mut BattleContext,
    state: &mut BattleState,
    player: &mut Player,
) -> Vec<AbilityOutcome> {
    let mut assists = Vec::new();

    for companion in &mut player.companions {
        if !companion.is_ready() {
            continue;
        }
        let Some(index) = state.retarget() else {
            break;
        };
        let Some(enemy) = state.enemies.get_mut(index) else {
            break;
        };

        let ability_id = companion.ability.clone();
        let outcome = apply_ability(ctx, &mut companion.actor, &mut enemy.actor, &ability_id);
        companion.cooldown = ctx.catalog.get(&ability_id).map_or(0, |a| a.cooldown);
        assists.push(outcome);
        settle_enemy_defeats(ctx, state);
    }

    assists
}

/// Run one enemy's AI turn
pub fn run_enemy_turn(
    ctx: &mut BattleContext,
    state: &mut BattleState,
    player: &mut Player,
    index: usize,
) -> (EnemyTurn, Option<BattleOutcome>) {
    if !state.in_combat {
        return (EnemyTurn::Inactive, None);
    }
    let Some(enemy) = state.enemies.get_mut(index) else {
        ctx.log.log(format!("No enemy at position {}.", index), Severity::Warn);
        return (EnemyTurn::Inactive, None);
    };

    let turn = take_enemy_turn(ctx, enemy, &mut player.actor);
    tracing::debug!(index, ?turn, "enemy turn");

    settle_enemy_defeats(ctx, state);
    if let Some(end) = check_player_defeat(ctx, state, player) {
        return (turn, Some(end));
    }
    if state.all_enemies_defeated() {
        return (turn, Some(resolve_victory(ctx, state, player)));
    }
    (turn, None)
}

/// Every living enemy takes its turn, fastest first
pub fn run_enemy_phase(
    ctx: &mut BattleContext,
    state: &mut BattleState,
    player: &mut Player,
) -> (Vec<EnemyTurn>, Option<BattleOutcome>) {
    let mut turns = Vec::new();
    for index in state.turn_order() {
        if !state.in_combat {
            break;
        }
        if !state.enemies.get(index).map_or(false, |e| e.is_alive()) {
            continue;
        }
        let (turn, ended) = run_enemy_turn(ctx, state, player, index);
        turns.push(turn);
        if ended.is_some() {
            return (turns, ended);
        }
    }
    (turns, None)
}

/// Regen, round-boundary tick, then the player defeat check
pub fn post_enemy_turn(
    ctx: &mut BattleContext,
    state: &mut BattleState,
    player: &mut Player,
) -> Option<BattleOutcome> {
    if !state.in_combat {
        return None;
    }

    let actor = &mut player.actor;
    if actor.is_alive() {
        let haste = 1.0 + actor.status.haste.value().max(0.0);
        let regen = (player.resource_regen as f64 * haste).round() as u32;
        actor.restore_resource(regen);

        let hp_regen = actor.stats.hp_regen.round().max(0.0) as u32;
        let healed = actor.heal(hp_regen);
        if healed > 0 {
            ctx.log
                .log(format!("{} regenerates {} HP.", actor.name, healed), Severity::Good);
        }
    }

    tick_battle_round(ctx, state, player);
    check_player_defeat(ctx, state, player)
}

/// Round boundary for the whole battle
///
/// Ticks the player's and companions' round timers, decrements every
/// cooldown, applies enemy HP regen and advances the round counter. Enemy
/// timers tick at their own turn start instead.
pub fn tick_battle_round(ctx: &mut BattleContext, state: &mut BattleState, player: &mut Player) {
    if !state.in_combat {
        return;
    }

    tick_round_boundary(&mut player.actor, &mut ctx.log);
    player.tick_cooldowns();
    for companion in &mut player.companions {
        tick_round_boundary(&mut companion.actor, &mut ctx.log);
        companion.cooldown = companion.cooldown.saturating_sub(1);
    }

    for enemy in state.enemies.iter_mut().filter(|e| e.is_alive()) {
        enemy.tick_cooldowns();
        let regen = enemy.actor.stats.hp_regen.round().max(0.0) as u32;
        if regen > 0 {
            let healed = enemy.actor.heal(regen);
            if healed > 0 {
                ctx.log.log(
                    format!("{} regenerates {} HP.", enemy.actor.name, healed),
                    Severity::Info,
                );
            }
        }
    }

    state.round += 1;
}

/// Play a full round with the player using `ability_id`
///
/// A rejected action ends the call early without consuming the round; the
/// player's DOT will not tick again when the round is retried.
pub fn play_round(
    ctx: &mut BattleContext,
    state: &mut BattleState,
    player: &mut Player,
    ability_id: &str,
) -> RoundReport {
    let mut report = RoundReport::default();

    if let Some(end) = begin_player_turn(ctx, state, player) {
        report.ended = Some(end);
        return report;
    }

    report.action = player_action(ctx, state, player, ability_id);
    if report.action.rejected.is_some() || report.action.ended.is_some() {
        report.ended = report.action.ended;
        return report;
    }

    let (turns, ended) = run_enemy_phase(ctx, state, player);
    report.enemy_turns = turns;
    if ended.is_some() {
        report.ended = ended;
        return report;
    }

    report.ended = post_enemy_turn(ctx, state, player);
    report
}

/// Leave the battle immediately
pub fn flee(ctx: &mut BattleContext, state: &mut BattleState, player: &Player) -> BattleOutcome {
    ctx.log.log(
        format!("{} flees from battle.", player.actor.name),
        Severity::System,
    );
    ctx.run_hook("save request", |h| h.request_save(SaveReason::Fled));
    state.clear();
    tracing::info!("battle fled");
    BattleOutcome::Fled
}

fn lookup(ctx: &BattleContext, ability_id: &str) -> Option<Ability> {
    if ability_id == BASELINE_STRIKE {
        return Some(ctx.catalog.baseline());
    }
    ctx.catalog.get(ability_id).cloned()
}

fn check_end(
    ctx: &mut BattleContext,
    state: &mut BattleState,
    player: &mut Player,
) -> Option<BattleOutcome> {
    if let Some(end) = check_player_defeat(ctx, state, player) {
        return Some(end);
    }
    if state.all_enemies_defeated() {
        return Some(resolve_victory(ctx, state, player));
    }
    None
}

/// Stamp and reward every newly defeated enemy, then retarget
fn settle_enemy_defeats(ctx: &mut BattleContext, state: &mut BattleState) {
    let mut any = false;
    for enemy in state.enemies.iter_mut() {
        if !enemy.is_alive() && handle_enemy_defeat(ctx, enemy) {
            any = true;
        }
    }
    if any {
        state.retarget();
    }
}

/// Grant rewards for one enemy exactly once
pub fn handle_enemy_defeat(ctx: &mut BattleContext, enemy: &mut Enemy) -> bool {
    if enemy.defeat_handled {
        return false;
    }
    enemy.defeat_handled = true;
    enemy.intent.clear();

    ctx.log.log_with_meta(
        format!(
            "{} is defeated! (+{} XP, +{} gold)",
            enemy.name(),
            enemy.xp,
            enemy.gold
        ),
        Severity::Good,
        json!({ "enemy": enemy.actor.id, "xp": enemy.xp, "gold": enemy.gold }),
    );

    let defeated: &Enemy = enemy;
    ctx.run_hook("reward hook", |h| h.on_enemy_defeated(defeated));
    ctx.run_hook("save request", |h| h.request_save(SaveReason::EnemyDefeated));
    true
}

fn check_player_defeat(
    ctx: &mut BattleContext,
    state: &mut BattleState,
    player: &mut Player,
) -> Option<BattleOutcome> {
    if !state.in_combat || player.actor.is_alive() {
        return None;
    }
    if player.no_death {
        player.actor.hp = 1;
        ctx.log.log(
            format!("{} refuses to fall!", player.actor.name),
            Severity::Warn,
        );
        return None;
    }
    Some(resolve_defeat(ctx, state, player))
}

fn resolve_victory(ctx: &mut BattleContext, state: &mut BattleState, player: &Player) -> BattleOutcome {
    let xp: u32 = state.enemies.iter().map(|e| e.xp).sum();
    let gold: u32 = state.enemies.iter().map(|e| e.gold).sum();
    ctx.log.log_with_meta(
        format!("Victory! {} XP and {} gold earned.", xp, gold),
        Severity::System,
        json!({ "xp": xp, "gold": gold, "rounds": state.round }),
    );

    let enemies = &state.enemies;
    ctx.run_hook("victory hook", |h| h.on_victory(player, enemies));
    ctx.run_hook("save request", |h| h.request_save(SaveReason::Victory));

    tracing::info!(round = state.round, xp, gold, "battle won");
    state.clear();
    BattleOutcome::Victory
}

fn resolve_defeat(ctx: &mut BattleContext, state: &mut BattleState, player: &Player) -> BattleOutcome {
    ctx.log.log(
        format!("{} has fallen.", player.actor.name),
        Severity::Danger,
    );
    ctx.run_hook("defeat hook", |h| h.on_defeat(player));
    ctx.run_hook("save request", |h| h.request_save(SaveReason::Defeat));

    tracing::info!(round = state.round, "battle lost");
    state.clear();
    BattleOutcome::Defeat
}
