//! Defense stat mitigation (armor vs physical, magic resist vs magic)

/// Calculate damage after defense mitigation
///
/// Uses a diminishing returns formula:
/// `Damage taken = Damage * scale / (scale + Defense * (1 - Penetration))`
///
/// Penetration is a fraction of the defender's stat that is ignored.
///
/// # Arguments
/// * `damage` - The incoming damage
/// * `defense` - The defender's armor or magic resist
/// * `penetration` - Fraction of defense ignored (0.0 to 1.0)
/// * `scale` - Formula constant
pub fn mitigate_by_defense(damage: f64, defense: f64, penetration: f64, scale: f64) -> f64 {
    if damage <= 0.0 {
        return 0.0;
    }
    let effective = defense.max(0.0) * (1.0 - penetration.clamp(0.0, 1.0));
    if effective <= 0.0 || scale <= 0.0 {
        return damage;
    }

    (damage * scale / (scale + effective)).max(0.0)
}

/// Percentage of damage removed by a given defense value
pub fn defense_reduction_percent(defense: f64, penetration: f64, scale: f64) -> f64 {
    let effective = defense.max(0.0) * (1.0 - penetration.clamp(0.0, 1.0));
    if effective <= 0.0 || scale <= 0.0 {
        return 0.0;
    }
    (effective / (scale + effective) * 100.0).clamp(0.0, 100.0)
}
