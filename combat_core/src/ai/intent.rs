//! Telegraphed enemy intent

use serde::{Deserialize, Serialize};

/// A declared but not yet resolved ability
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Intent {
    #[default]
    None,
    Pending {
        ability_id: String,
        turns_remaining: u32,
    },
}

/// What advancing an intent by one enemy turn produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentStep {
    /// No intent was pending
    Idle,
    /// Still readying, turns left after this one
    Readying(u32),
    /// Countdown reached 0; the ability resolves now
    Resolve(String),
}

impl Intent {
    pub fn declare(ability_id: impl Into<String>, turns: u32) -> Self {
        Intent::Pending {
            ability_id: ability_id.into(),
            turns_remaining: turns,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Intent::Pending { .. })
    }

    pub fn ability_id(&self) -> Option<&str> {
        match self {
            Intent::Pending { ability_id, .. } => Some(ability_id),
            Intent::None => None,
        }
    }

    pub fn clear(&mut self) {
        *self = Intent::None;
    }

    /// Decrement the countdown; clears the intent when it resolves
    pub fn advance(&mut self) -> IntentStep {
        let step = match self {
            Intent::None => return IntentStep::Idle,
            Intent::Pending {
                ability_id,
                turns_remaining,
            } => {
                *turns_remaining = turns_remaining.saturating_sub(1);
                if *turns_remaining > 0 {
                    return IntentStep::Readying(*turns_remaining);
                }
                IntentStep::Resolve(std::mem::take(ability_id))
            }
        };
        self.clear();
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_turn_countdown() {
        let mut intent = Intent::declare("crushing_blow", 2);
        assert_eq!(intent.advance(), IntentStep::Readying(1));
        assert!(intent.is_pending());
        assert_eq!(
            intent.advance(),
            IntentStep::Resolve("crushing_blow".to_string())
        );
        assert_eq!(intent, Intent::None);
        assert_eq!(intent.advance(), IntentStep::Idle);
    }

    #[test]
    fn test_one_turn_resolves_next_turn() {
        let mut intent = Intent::declare("heavy_slam", 1);
        assert_eq!(intent.advance(), IntentStep::Resolve("heavy_slam".to_string()));
    }
}
