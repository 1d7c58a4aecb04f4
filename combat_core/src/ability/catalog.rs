//! Ability catalog - static ability data keyed by id

use super::{Ability, BASELINE_STRIKE};
use crate::config::{load_toml, parse_toml, ConfigError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Container for ability configurations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilitiesConfig {
    #[serde(rename = "abilities")]
    pub abilities: Vec<Ability>,
}

/// Ability registry
#[derive(Debug, Clone, Default)]
pub struct AbilityCatalog {
    abilities: HashMap<String, Ability>,
}

impl AbilityCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        AbilityCatalog {
            abilities: HashMap::new(),
        }
    }

    /// Register an ability, replacing any previous entry with the same id
    pub fn register(&mut self, ability: Ability) {
        self.abilities.insert(ability.id.clone(), ability);
    }

    /// Get an ability by id
    pub fn get(&self, id: &str) -> Option<&Ability> {
        self.abilities.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.abilities.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }

    /// The fallback strike, from the catalog if overridden there
    pub fn baseline(&self) -> Ability {
        self.get(BASELINE_STRIKE)
            .cloned()
            .unwrap_or_else(Ability::baseline_strike)
    }

    fn from_config(config: AbilitiesConfig) -> Result<Self, ConfigError> {
        let mut catalog = AbilityCatalog::new();
        for ability in config.abilities {
            if ability.potency < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "ability '{}' has negative potency",
                    ability.id
                )));
            }
            catalog.register(ability);
        }
        Ok(catalog)
    }
}

/// Load the ability catalog from a TOML file
pub fn load_ability_catalog(path: &Path) -> Result<AbilityCatalog, ConfigError> {
    let config: AbilitiesConfig = load_toml(path)?;
    AbilityCatalog::from_config(config)
}

/// Load the ability catalog from a TOML string
pub fn parse_ability_catalog(content: &str) -> Result<AbilityCatalog, ConfigError> {
    let config: AbilitiesConfig = parse_toml(content)?;
    AbilityCatalog::from_config(config)
}

/// Get the built-in ability catalog
pub fn default_abilities() -> AbilityCatalog {
    let toml = include_str!("../../config/abilities.toml");
    parse_ability_catalog(toml).unwrap_or_else(|err| {
        tracing::warn!(%err, "built-in ability table failed to parse, using baseline only");
        let mut catalog = AbilityCatalog::new();
        catalog.register(Ability::baseline_strike());
        catalog
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DamageKind, Element};

    #[test]
    fn test_parse_abilities() {
        let toml = r#"
[[abilities]]
id = "scorch"
name = "Scorch"
kind = "magic"
potency = 1.2
element = "fire"
cooldown = 2
bleed = { magnitude = 3.0, turns = 2 }
"#;

        let catalog = parse_ability_catalog(toml).unwrap();
        let scorch = catalog.get("scorch").unwrap();
        assert_eq!(scorch.kind, DamageKind::Magic);
        assert_eq!(scorch.element, Some(Element::Fire));
        assert_eq!(scorch.bleed.unwrap().turns, 2);
        assert_eq!(scorch.telegraph_turns, 0);
    }

    #[test]
    fn test_negative_potency_rejected() {
        let toml = r#"
[[abilities]]
id = "bad"
name = "Bad"
kind = "physical"
potency = -1.0
"#;
        assert!(matches!(
            parse_ability_catalog(toml),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_default_abilities_loads_all() {
        let catalog = default_abilities();
        assert_eq!(catalog.len(), 26, "Expected 26 abilities from config");

        let expected = [
            "strike",
            "slash",
            "rend",
            "fireball",
            "ward",
            "heavy_slam",
            "crushing_blow",
            "shield_breaker",
            "guard",
            "war_cry",
            "life_drain",
            "mend",
        ];
        for id in expected {
            assert!(catalog.contains(id), "Missing ability: {}", id);
        }

        let crushing = catalog.get("crushing_blow").unwrap();
        assert_eq!(crushing.telegraph_turns, 2);
        assert!(crushing.undodgeable);
    }

    #[test]
    fn test_baseline_fallback() {
        let catalog = AbilityCatalog::new();
        assert_eq!(catalog.baseline().id, BASELINE_STRIKE);
    }
}
