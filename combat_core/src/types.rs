//! Core types shared across the combat modules

use serde::{Deserialize, Serialize};

/// Elemental tag carried by abilities, affinities and resistances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Fire,
    Frost,
    Lightning,
    Poison,
    Holy,
    Shadow,
    Arcane,
}

impl Element {
    /// Get all elements
    pub fn all() -> &'static [Element] {
        &[
            Element::Fire,
            Element::Frost,
            Element::Lightning,
            Element::Poison,
            Element::Holy,
            Element::Shadow,
            Element::Arcane,
        ]
    }
}

/// How an ability resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageKind {
    /// Scales off attack, mitigated by armor
    Physical,
    /// Scales off magic, mitigated by magic resist
    Magic,
    /// Self-targeted damage reduction window
    Guard,
    /// Self-targeted enhancement
    Buff,
    /// Target debuff with no direct damage
    Debuff,
    /// Magic damage that also heals the user
    DamageHeal,
}

impl DamageKind {
    /// Whether the ability goes through the damage pipeline
    pub fn deals_damage(&self) -> bool {
        matches!(self, DamageKind::Physical | DamageKind::Magic | DamageKind::DamageHeal)
    }

    /// Whether the ability is aimed at the opposing side (and can be dodged)
    pub fn is_offensive(&self) -> bool {
        matches!(
            self,
            DamageKind::Physical | DamageKind::Magic | DamageKind::Debuff | DamageKind::DamageHeal
        )
    }

    /// Whether defense uses armor (physical) or magic resist
    pub fn uses_armor(&self) -> bool {
        matches!(self, DamageKind::Physical)
    }
}

/// Which side of the battle an actor fights on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Enemy,
}

/// Discrete enemy power band, lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RarityTier {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
}

impl RarityTier {
    /// Get all tiers in ascending order
    pub fn all() -> &'static [RarityTier] {
        &[
            RarityTier::Common,
            RarityTier::Uncommon,
            RarityTier::Rare,
            RarityTier::Epic,
            RarityTier::Legendary,
            RarityTier::Mythic,
        ]
    }

    /// The lowest configured tier
    pub fn lowest() -> RarityTier {
        RarityTier::Common
    }

    /// The top configured tier (forced onto bosses)
    pub fn top() -> RarityTier {
        RarityTier::Mythic
    }

    /// Zero-based rank, used by affix stat generators
    pub fn rank(&self) -> u32 {
        match self {
            RarityTier::Common => 0,
            RarityTier::Uncommon => 1,
            RarityTier::Rare => 2,
            RarityTier::Epic => 3,
            RarityTier::Legendary => 4,
            RarityTier::Mythic => 5,
        }
    }

    /// Display fragment used when composing enemy names
    pub fn display_name(&self) -> &'static str {
        match self {
            RarityTier::Common => "Common",
            RarityTier::Uncommon => "Uncommon",
            RarityTier::Rare => "Rare",
            RarityTier::Epic => "Epic",
            RarityTier::Legendary => "Legendary",
            RarityTier::Mythic => "Mythic",
        }
    }
}

/// Difficulty identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
    Nightmare,
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            "nightmare" => Ok(Difficulty::Nightmare),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}
