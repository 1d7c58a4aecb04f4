//! Resistance - Elemental affinity and flat resistance
//!
//! Affinity is a multiplier (weak > 1.0, resist < 1.0, neutral = 1.0).
//! Flat resistance is a percentage clamped to `[-cap, cap]`:
//! - damage_taken = damage * (1 - resist / 100)

/// Clamp a resistance percentage to the configured cap
pub fn clamp_resistance(resistance: f64, cap: f64) -> f64 {
    let cap = cap.abs();
    resistance.clamp(-cap, cap)
}

/// Apply an elemental affinity multiplier
pub fn apply_affinity(damage: f64, affinity: f64) -> f64 {
    if damage <= 0.0 {
        return 0.0;
    }
    (damage * affinity.max(0.0)).max(0.0)
}

/// Calculate damage after flat resistance
///
/// # Arguments
/// * `damage` - The incoming damage
/// * `resistance` - Resistance percentage (can be negative)
/// * `cap` - Maximum absolute resistance
pub fn apply_element_resist(damage: f64, resistance: f64, cap: f64) -> f64 {
    if damage <= 0.0 {
        return 0.0;
    }
    let effective = clamp_resistance(resistance, cap);
    (damage * (1.0 - effective / 100.0)).max(0.0)
}
