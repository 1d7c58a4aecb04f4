//! Combat - applying an ability from one actor to another

mod apply;
mod outcome;

pub use apply::{apply_ability, apply_resolved};
pub use outcome::AbilityOutcome;
