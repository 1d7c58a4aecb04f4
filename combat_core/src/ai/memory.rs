//! Per-enemy learned ability preferences

use crate::config::LearningConstants;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Learned value of one ability
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AbilityStat {
    /// Exponential moving average of observed rewards
    pub value: f64,
    pub uses: u32,
}

/// Learning state owned by a single enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    pub ability_stats: BTreeMap<String, AbilityStat>,
    /// Base exploration rate, decays toward a floor with every action
    pub exploration: f64,
}

impl Default for Memory {
    fn default() -> Self {
        Memory::new(LearningConstants::default().initial_exploration)
    }
}

impl Memory {
    pub fn new(exploration: f64) -> Self {
        Memory {
            ability_stats: BTreeMap::new(),
            exploration,
        }
    }

    /// Learned value for an ability, 0 when never used
    pub fn learned_value(&self, ability_id: &str) -> f64 {
        self.ability_stats
            .get(ability_id)
            .map(|s| s.value)
            .unwrap_or(0.0)
    }

    pub fn uses(&self, ability_id: &str) -> u32 {
        self.ability_stats
            .get(ability_id)
            .map(|s| s.uses)
            .unwrap_or(0)
    }

    /// Blend `reward` into the ability's value and decay exploration
    ///
    /// `value = prev * (1 - rate) + reward * rate`. Abilities beyond the
    /// memory capacity are not tracked. Returns the new value.
    pub fn learn(&mut self, ability_id: &str, reward: f64, constants: &LearningConstants) -> f64 {
        self.decay_exploration(constants);

        let reward = if reward.is_finite() { reward } else { 0.0 };
        if !self.ability_stats.contains_key(ability_id)
            && self.ability_stats.len() >= constants.memory_capacity
        {
            return 0.0;
        }

        let rate = constants.rate.clamp(0.0, 1.0);
        let stat = self.ability_stats.entry(ability_id.to_string()).or_default();
        let blended = stat.value * (1.0 - rate) + reward * rate;
        // Rounding must never carry the average past the reward
        stat.value = if reward >= stat.value {
            blended.clamp(stat.value, reward)
        } else {
            blended.clamp(reward, stat.value)
        };
        stat.uses = stat.uses.saturating_add(1);
        stat.value
    }

    pub fn decay_exploration(&mut self, constants: &LearningConstants) {
        self.exploration = (self.exploration * constants.exploration_decay)
            .max(constants.exploration_floor);
    }
}
