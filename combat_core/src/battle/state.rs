//! BattleState - shared state for one battle

use crate::actor::Enemy;
use serde::{Deserialize, Serialize};

/// How a battle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleOutcome {
    Victory,
    Defeat,
    Fled,
}

/// Single-writer battle state owned by the sequencer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BattleState {
    pub in_combat: bool,
    pub enemies: Vec<Enemy>,
    pub target_index: usize,
    pub round: u32,
    /// Set while an action resolves; input is rejected meanwhile
    pub busy: bool,
    /// Round in which the player's start-of-turn DOT last ticked
    pub player_dot_round: Option<u32>,
}

impl BattleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything in one step (enemies, pending intents, target)
    pub fn clear(&mut self) {
        *self = BattleState::default();
    }

    pub fn living_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_alive()).count()
    }

    pub fn all_enemies_defeated(&self) -> bool {
        self.enemies.iter().all(|e| !e.is_alive())
    }

    pub fn target(&self) -> Option<&Enemy> {
        self.enemies.get(self.target_index)
    }

    /// Select a target by index if it is alive
    pub fn set_target(&mut self, index: usize) -> bool {
        match self.enemies.get(index) {
            Some(enemy) if enemy.is_alive() => {
                self.target_index = index;
                true
            }
            _ => false,
        }
    }

    /// Enemy indices in acting order: fastest first, roster order on ties
    pub fn turn_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.enemies.len()).collect();
        order.sort_by(|a, b| {
            let speed = |i: usize| self.enemies[i].actor.stats.speed;
            speed(*b).total_cmp(&speed(*a))
        });
        order
    }

    /// Move the target to the first living enemy if the current one is dead
    pub fn retarget(&mut self) -> Option<usize> {
        if self.target().map_or(false, |e| e.is_alive()) {
            return Some(self.target_index);
        }
        let next = self.enemies.iter().position(|e| e.is_alive())?;
        self.target_index = next;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Actor;
    use crate::ai::Intent;
    use crate::types::Side;

    fn make_enemy(id: &str, hp: u32) -> Enemy {
        let mut actor = Actor::new(id, id, Side::Enemy, 1, 50);
        actor.hp = hp;
        Enemy::new(actor, id)
    }

    #[test]
    fn test_retarget_skips_dead() {
        let mut state = BattleState::new();
        state.enemies = vec![make_enemy("a", 0), make_enemy("b", 0), make_enemy("c", 10)];
        assert_eq!(state.retarget(), Some(2));
        assert_eq!(state.target_index, 2);
        assert!(!state.set_target(0));
        assert_eq!(state.living_enemies(), 1);
    }

    #[test]
    fn test_turn_order_by_speed_then_roster() {
        let mut state = BattleState::new();
        state.enemies = vec![make_enemy("a", 10), make_enemy("b", 10), make_enemy("c", 10)];
        state.enemies[1].actor.stats.speed = 8.0;
        state.enemies[2].actor.stats.speed = 8.0;
        assert_eq!(state.turn_order(), vec![1, 2, 0]);
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut state = BattleState::new();
        let mut enemy = make_enemy("a", 10);
        enemy.intent = Intent::declare("heavy_slam", 1);
        state.enemies.push(enemy);
        state.in_combat = true;
        state.round = 4;
        state.target_index = 0;
        state.player_dot_round = Some(4);

        state.clear();
        assert!(!state.in_combat);
        assert!(state.enemies.is_empty());
        assert_eq!(state.round, 0);
        assert_eq!(state.player_dot_round, None);
    }
}
