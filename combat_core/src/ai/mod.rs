//! Enemy AI - heuristic scoring blended with a learned preference
//!
//! Each enemy owns its [`Memory`]; nothing is shared between enemies or
//! carried across battles.

mod decision;
mod intent;
mod memory;
mod scoring;
mod turn;

pub use decision::{choose_ability, exploration_epsilon, usable_abilities};
pub use intent::{Intent, IntentStep};
pub use memory::{AbilityStat, Memory};
pub use scoring::{heuristic_score, score_ability, ScoreInputs};
pub use turn::{take_enemy_turn, EnemyTurn};
