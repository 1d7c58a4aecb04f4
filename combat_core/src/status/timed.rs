//! Timed - a (magnitude, turns remaining) modifier

use serde::{Deserialize, Serialize};

/// A timed modifier
///
/// When `turns` reaches 0 the magnitude is reset to 0 in the same tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Timed {
    pub magnitude: f64,
    pub turns: u32,
}

impl Timed {
    pub fn new(magnitude: f64, turns: u32) -> Self {
        if turns == 0 {
            return Timed::default();
        }
        Timed { magnitude, turns }
    }

    /// Check if the modifier is still active
    pub fn is_active(&self) -> bool {
        self.turns > 0
    }

    /// Magnitude while active, 0 otherwise
    pub fn value(&self) -> f64 {
        if self.is_active() {
            self.magnitude
        } else {
            0.0
        }
    }

    /// Overwrite with a new application
    pub fn set(&mut self, magnitude: f64, turns: u32) {
        *self = Timed::new(magnitude, turns);
    }

    /// Reapplication keeps the stronger magnitude and the longer duration
    pub fn refresh(&mut self, magnitude: f64, turns: u32) {
        if turns == 0 {
            return;
        }
        if !self.is_active() {
            self.set(magnitude, turns);
            return;
        }
        self.magnitude = self.magnitude.max(magnitude);
        self.turns = self.turns.max(turns);
    }

    /// Decrement by one turn
    ///
    /// Returns true exactly when this call expired the modifier.
    pub fn tick(&mut self) -> bool {
        if self.turns == 0 {
            return false;
        }
        self.turns -= 1;
        if self.turns == 0 {
            self.magnitude = 0.0;
            return true;
        }
        false
    }

    /// Reset to neutral
    pub fn clear(&mut self) {
        *self = Timed::default();
    }
}
