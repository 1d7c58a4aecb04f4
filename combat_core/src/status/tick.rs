//! Status tick processing

use super::Timer;
use crate::actor::Actor;
use crate::log::{CombatLog, Severity};

/// Result of a start-of-turn DOT tick
#[derive(Debug, Clone, Default)]
pub struct DotTickResult {
    /// HP actually removed this tick
    pub total_damage: u32,
    /// DOTs that expired this tick
    pub expired: Vec<Timer>,
    /// Whether the tick left the actor at 0 HP
    pub defeated: bool,
}

/// Process damage-over-time fields at the start of the actor's own turn
///
/// Each active DOT deals its magnitude (unless invulnerable), then loses one
/// turn; on reaching 0 its magnitude resets and a fade message is logged.
pub fn tick_start_of_turn(actor: &mut Actor, log: &mut CombatLog) -> DotTickResult {
    let mut result = DotTickResult::default();

    for timer in Timer::DOTS {
        let dot = *actor.status.timer(timer);
        if !dot.is_active() {
            continue;
        }

        let amount = dot.magnitude.round().max(0.0) as u32;
        if actor.status.invulnerable == 0 && amount > 0 {
            let dealt = actor.take_damage(amount);
            result.total_damage += dealt;
            let label = match timer {
                Timer::Burn => "burns",
                _ => "bleeds",
            };
            log.log(
                format!("{} {} for {}.", actor.name, label, dealt),
                Severity::Danger,
            );
        }

        if actor.status.timer_mut(timer).tick() {
            result.expired.push(timer);
            log.log(timer.expiry_message(&actor.name), Severity::Info);
        }
    }

    result.defeated = !actor.is_alive();
    result
}

/// Decrement every non-DOT timed field by exactly one
///
/// Returns the timers that expired on this call, each logged once.
pub fn tick_round_boundary(actor: &mut Actor, log: &mut CombatLog) -> Vec<Timer> {
    let mut expired = Vec::new();

    for timer in Timer::ROUND {
        if timer == Timer::Enrage && actor.status.enrage_latched {
            continue;
        }
        if actor.status.timer_mut(timer).tick() {
            log.log(timer.expiry_message(&actor.name), Severity::Info);
            expired.push(timer);
        }
    }

    if actor.status.invulnerable > 0 {
        actor.status.invulnerable -= 1;
        if actor.status.invulnerable == 0 {
            log.log(format!("{} is no longer invulnerable.", actor.name), Severity::Info);
        }
    }

    expired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;

    fn make_actor(hp: u32) -> Actor {
        let mut actor = Actor::new("a", "Goblin", Side::Enemy, 1, 100);
        actor.hp = hp;
        actor
    }

    #[test]
    fn test_bleed_kills_over_two_ticks() {
        let mut actor = make_actor(10);
        actor.status.bleed.set(5.0, 2);
        let mut log = CombatLog::new();

        let first = tick_start_of_turn(&mut actor, &mut log);
        assert_eq!(first.total_damage, 5);
        assert_eq!(actor.hp, 5);
        assert!(!first.defeated);

        let second = tick_start_of_turn(&mut actor, &mut log);
        assert_eq!(actor.hp, 0);
        assert!(second.defeated);
        assert!(!actor.is_alive());
        assert!(!actor.status.bleed.is_active());
        assert_eq!(actor.status.bleed.magnitude, 0.0);
        assert_eq!(second.expired, vec![Timer::Bleed]);
        assert_eq!(log.count_containing("bleeding fades"), 1);
    }

    #[test]
    fn test_invulnerable_blocks_dot_but_still_decays() {
        let mut actor = make_actor(20);
        actor.status.bleed.set(5.0, 1);
        actor.status.invulnerable = 1;
        let mut log = CombatLog::new();

        let result = tick_start_of_turn(&mut actor, &mut log);
        assert_eq!(result.total_damage, 0);
        assert_eq!(actor.hp, 20);
        assert!(!actor.status.bleed.is_active());
    }

    #[test]
    fn test_start_of_turn_leaves_round_timers_alone() {
        let mut actor = make_actor(50);
        actor.status.vulnerable.set(0.2, 1);
        let mut log = CombatLog::new();

        tick_start_of_turn(&mut actor, &mut log);
        assert!(actor.status.vulnerable.is_active());
    }

    #[test]
    fn test_round_boundary_decrements_each_once() {
        let mut actor = make_actor(50);
        actor.status.guard.set(0.5, 1);
        actor.status.atk_down.set(3.0, 2);
        actor.status.chill.set(0.2, 3);
        actor.status.bleed.set(4.0, 2);
        let mut log = CombatLog::new();

        let expired = tick_round_boundary(&mut actor, &mut log);
        assert_eq!(expired, vec![Timer::Guard]);
        assert_eq!(actor.status.guard.magnitude, 0.0);
        assert_eq!(actor.status.atk_down.turns, 1);
        assert_eq!(actor.status.chill.turns, 2);
        // DOTs are not touched at the round boundary
        assert_eq!(actor.status.bleed.turns, 2);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_latched_enrage_does_not_decay() {
        let mut actor = make_actor(50);
        actor.status.enrage.set(0.4, 1);
        actor.status.enrage_latched = true;
        let mut log = CombatLog::new();

        tick_round_boundary(&mut actor, &mut log);
        tick_round_boundary(&mut actor, &mut log);
        assert!(actor.status.is_enraged());
        assert!((actor.status.enrage_multiplier() - 1.4).abs() < f64::EPSILON);
    }
}
