//! Enemy templates - base stats at a reference level

use crate::config::{load_toml, parse_toml, ConfigError};
use crate::types::Element;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Static description of an enemy kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyTemplate {
    pub id: String,
    pub name: String,
    /// Level the stats below are given at
    pub base_level: u32,
    pub max_hp: u32,
    #[serde(default)]
    pub attack: f64,
    #[serde(default)]
    pub magic: f64,
    #[serde(default)]
    pub armor: f64,
    #[serde(default)]
    pub magic_res: f64,
    #[serde(default)]
    pub speed: f64,
    /// Crit chance in percent
    #[serde(default)]
    pub crit: f64,
    /// Dodge chance in percent
    #[serde(default)]
    pub dodge: f64,
    #[serde(default)]
    pub resist_all: f64,
    #[serde(default)]
    pub xp: u32,
    #[serde(default)]
    pub gold: u32,
    /// Default ability kit
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(default)]
    pub boss: bool,
    /// Damage-taken multipliers per element
    #[serde(default)]
    pub affinities: BTreeMap<Element, f64>,
}

impl EnemyTemplate {
    pub fn new(id: impl Into<String>, name: impl Into<String>, base_level: u32, max_hp: u32) -> Self {
        EnemyTemplate {
            id: id.into(),
            name: name.into(),
            base_level,
            max_hp,
            attack: 0.0,
            magic: 0.0,
            armor: 0.0,
            magic_res: 0.0,
            speed: 0.0,
            crit: 0.0,
            dodge: 0.0,
            resist_all: 0.0,
            xp: 0,
            gold: 0,
            abilities: Vec::new(),
            boss: false,
            affinities: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TemplatesConfig {
    templates: Vec<EnemyTemplate>,
}

/// Template registry keyed by id
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, EnemyTemplate>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, template: EnemyTemplate) {
        self.templates.insert(template.id.clone(), template);
    }

    pub fn get(&self, id: &str) -> Option<&EnemyTemplate> {
        self.templates.get(id)
    }

    /// Templates in id order
    pub fn iter(&self) -> impl Iterator<Item = &EnemyTemplate> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    fn from_config(config: TemplatesConfig) -> Result<Self, ConfigError> {
        let mut registry = TemplateRegistry::new();
        for template in config.templates {
            if template.max_hp == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "template '{}' has zero max_hp",
                    template.id
                )));
            }
            if template.base_level == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "template '{}' has base_level 0",
                    template.id
                )));
            }
            registry.register(template);
        }
        Ok(registry)
    }
}

/// Load enemy templates from a TOML file
pub fn load_templates(path: &Path) -> Result<TemplateRegistry, ConfigError> {
    let config: TemplatesConfig = load_toml(path)?;
    TemplateRegistry::from_config(config)
}

/// Load enemy templates from a TOML string
pub fn parse_templates(content: &str) -> Result<TemplateRegistry, ConfigError> {
    let config: TemplatesConfig = parse_toml(content)?;
    TemplateRegistry::from_config(config)
}

/// Get the built-in templates
pub fn default_templates() -> TemplateRegistry {
    let toml = include_str!("../../config/templates.toml");
    parse_templates(toml).unwrap_or_else(|err| {
        tracing::warn!(%err, "built-in template table failed to parse");
        TemplateRegistry::new()
    })
}
