//! Defense system - Armor/magic resist, elemental resistance, dodge

mod armour;
mod evasion;
mod resistance;

pub use armour::{defense_reduction_percent, mitigate_by_defense};
pub use evasion::{roll_crit, roll_dodge};
pub use resistance::{apply_affinity, apply_element_resist, clamp_resistance};

/// Defense calculation constants
pub mod constants {
    /// Upper bound on dodge chance in percent
    pub const MAX_DODGE: f64 = 75.0;
}
