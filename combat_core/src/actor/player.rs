//! Player and companions

use super::Actor;
use crate::ability::Ability;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Why a player action was rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    #[error("{0} is not in the ability kit")]
    NotInKit(String),
    #[error("{ability} is on cooldown ({turns} turns)")]
    OnCooldown { ability: String, turns: u32 },
    #[error("not enough resource for {ability} (need {cost}, have {have})")]
    NotEnoughResource { ability: String, cost: u32, have: u32 },
    #[error("unknown ability {0}")]
    UnknownAbility(String),
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub actor: Actor,
    /// Ability ids the player can use
    pub abilities: Vec<String>,
    pub cooldowns: BTreeMap<String, u32>,
    /// Resource restored per round before haste
    pub resource_regen: u32,
    /// Keeps the player at 1 HP instead of dying
    pub no_death: bool,
    pub companions: Vec<Companion>,
}

impl Player {
    pub fn new(actor: Actor) -> Self {
        Player {
            actor,
            abilities: Vec::new(),
            cooldowns: BTreeMap::new(),
            resource_regen: 0,
            no_death: false,
            companions: Vec::new(),
        }
    }

    pub fn with_abilities<I, S>(mut self, abilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.abilities = abilities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_companion(mut self, companion: Companion) -> Self {
        self.companions.push(companion);
        self
    }

    pub fn cooldown(&self, ability_id: &str) -> u32 {
        self.cooldowns.get(ability_id).copied().unwrap_or(0)
    }

    /// Check whether `ability` can be used right now
    pub fn check_action(&self, ability: &Ability) -> Result<(), ActionError> {
        if !self.abilities.iter().any(|id| *id == ability.id) {
            return Err(ActionError::NotInKit(ability.id.clone()));
        }
        let turns = self.cooldown(&ability.id);
        if turns > 0 {
            return Err(ActionError::OnCooldown {
                ability: ability.id.clone(),
                turns,
            });
        }
        if self.actor.resource < ability.cost {
            return Err(ActionError::NotEnoughResource {
                ability: ability.id.clone(),
                cost: ability.cost,
                have: self.actor.resource,
            });
        }
        Ok(())
    }

    /// Pay the resource cost and start the cooldown
    pub fn commit_action(&mut self, ability: &Ability) {
        self.actor.spend_resource(ability.cost);
        if ability.cooldown > 0 {
            self.cooldowns.insert(ability.id.clone(), ability.cooldown);
        }
    }

    pub fn tick_cooldowns(&mut self) {
        for turns in self.cooldowns.values_mut() {
            *turns = turns.saturating_sub(1);
        }
        self.cooldowns.retain(|_, turns| *turns > 0);
    }
}

/// An ally that assists after the player's action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Companion {
    pub actor: Actor,
    pub ability: String,
    pub cooldown: u32,
}

impl Companion {
    pub fn new(actor: Actor, ability: impl Into<String>) -> Self {
        Companion {
            actor,
            ability: ability.into(),
            cooldown: 0,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.actor.is_alive() && self.cooldown == 0
    }
}
