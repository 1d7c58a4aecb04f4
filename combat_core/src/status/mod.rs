//! Status engine - per-actor timed effects
//!
//! DOT fields (bleed, burn) tick at the start of the afflicted actor's own
//! turn; every other timed field ticks at the round boundary. The two phases
//! are separate functions and must stay separate or DOT damage double-applies.

mod synergy;
mod tick;
mod timed;

pub use synergy::{apply_synergy_on_hit, SynergyResult};
pub use tick::{tick_round_boundary, tick_start_of_turn, DotTickResult};
pub use timed::Timed;

use crate::actor::Actor;
use crate::log::{CombatLog, Severity};
use serde::{Deserialize, Serialize};

/// Named timed fields of a [`StatusContainer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timer {
    Bleed,
    Burn,
    Guard,
    Vulnerable,
    ArmorDown,
    MagicResDown,
    Chill,
    AtkDown,
    MagDown,
    AtkBuff,
    MagBuff,
    ExtBuff,
    Evasion,
    Haste,
    Enrage,
}

impl Timer {
    /// Fields ticked at the start of the afflicted actor's turn
    pub const DOTS: [Timer; 2] = [Timer::Bleed, Timer::Burn];

    /// Fields ticked at the round boundary
    pub const ROUND: [Timer; 13] = [
        Timer::Guard,
        Timer::Vulnerable,
        Timer::ArmorDown,
        Timer::MagicResDown,
        Timer::Chill,
        Timer::AtkDown,
        Timer::MagDown,
        Timer::AtkBuff,
        Timer::MagBuff,
        Timer::ExtBuff,
        Timer::Evasion,
        Timer::Haste,
        Timer::Enrage,
    ];

    /// Expiry message for an actor named `name`
    pub fn expiry_message(&self, name: &str) -> String {
        match self {
            Timer::Bleed => format!("{}'s bleeding fades.", name),
            Timer::Burn => format!("The flames on {} die out.", name),
            Timer::Guard => format!("{} lowers their guard.", name),
            Timer::Vulnerable => format!("{} is no longer vulnerable.", name),
            Timer::ArmorDown => format!("{}'s armor recovers.", name),
            Timer::MagicResDown => format!("{}'s magic resistance recovers.", name),
            Timer::Chill => format!("{} thaws out.", name),
            Timer::AtkDown => format!("{}'s strength returns.", name),
            Timer::MagDown => format!("{}'s focus returns.", name),
            Timer::AtkBuff => format!("{}'s power surge fades.", name),
            Timer::MagBuff => format!("{}'s arcane surge fades.", name),
            Timer::ExtBuff => format!("{}'s blessing wears off.", name),
            Timer::Evasion => format!("{} is no longer evasive.", name),
            Timer::Haste => format!("{} slows back down.", name),
            Timer::Enrage => format!("{} calms down.", name),
        }
    }
}

/// Fight-scoped status of an actor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusContainer {
    // === Damage Over Time ===
    pub bleed: Timed,
    pub burn: Timed,

    // === Round Timers ===
    /// Damage reduction fraction
    pub guard: Timed,
    /// Extra damage taken fraction
    pub vulnerable: Timed,
    /// Armor reduction fraction
    pub armor_down: Timed,
    pub magic_res_down: Timed,
    /// Slow; consumed by a physical hit for a bonus burst
    pub chill: Timed,
    /// Flat attack removed
    pub atk_down: Timed,
    /// Flat magic removed
    pub mag_down: Timed,
    pub atk_buff: Timed,
    pub mag_buff: Timed,
    /// Buff granted from outside the battle
    pub ext_buff: Timed,
    /// Added dodge, in percent points
    pub evasion: Timed,
    /// Resource regen multiplier bonus
    pub haste: Timed,
    /// Attack multiplier bonus
    pub enrage: Timed,
    /// Enrage latched by a berserk affix; never decays during the fight
    pub enrage_latched: bool,

    // === Counters ===
    pub shield: u32,
    pub stunned: u32,
    pub broken: u32,
    pub forced_guard: u32,
    pub invulnerable: u32,
}

impl StatusContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow a timed field
    pub fn timer(&self, timer: Timer) -> &Timed {
        match timer {
            Timer::Bleed => &self.bleed,
            Timer::Burn => &self.burn,
            Timer::Guard => &self.guard,
            Timer::Vulnerable => &self.vulnerable,
            Timer::ArmorDown => &self.armor_down,
            Timer::MagicResDown => &self.magic_res_down,
            Timer::Chill => &self.chill,
            Timer::AtkDown => &self.atk_down,
            Timer::MagDown => &self.mag_down,
            Timer::AtkBuff => &self.atk_buff,
            Timer::MagBuff => &self.mag_buff,
            Timer::ExtBuff => &self.ext_buff,
            Timer::Evasion => &self.evasion,
            Timer::Haste => &self.haste,
            Timer::Enrage => &self.enrage,
        }
    }

    /// Mutably borrow a timed field
    pub fn timer_mut(&mut self, timer: Timer) -> &mut Timed {
        match timer {
            Timer::Bleed => &mut self.bleed,
            Timer::Burn => &mut self.burn,
            Timer::Guard => &mut self.guard,
            Timer::Vulnerable => &mut self.vulnerable,
            Timer::ArmorDown => &mut self.armor_down,
            Timer::MagicResDown => &mut self.magic_res_down,
            Timer::Chill => &mut self.chill,
            Timer::AtkDown => &mut self.atk_down,
            Timer::MagDown => &mut self.mag_down,
            Timer::AtkBuff => &mut self.atk_buff,
            Timer::MagBuff => &mut self.mag_buff,
            Timer::ExtBuff => &mut self.ext_buff,
            Timer::Evasion => &mut self.evasion,
            Timer::Haste => &mut self.haste,
            Timer::Enrage => &mut self.enrage,
        }
    }

    pub fn is_guarding(&self) -> bool {
        self.guard.is_active()
    }

    pub fn is_enraged(&self) -> bool {
        self.enrage_latched || self.enrage.is_active()
    }

    /// Attack multiplier from enrage
    pub fn enrage_multiplier(&self) -> f64 {
        if self.is_enraged() {
            1.0 + self.enrage.magnitude.max(0.0)
        } else {
            1.0
        }
    }

    /// Whether the actor loses its next turn
    pub fn is_incapacitated(&self) -> bool {
        self.stunned > 0 || self.broken > 0
    }
}

/// Zero every fight-scoped field and re-apply combat-start passives
pub fn reset_combat_status(actor: &mut Actor, log: &mut CombatLog) {
    actor.status = StatusContainer::default();
    if actor.combat_start_shield > 0 {
        actor.status.shield = actor.combat_start_shield;
        log.log(
            format!("{} starts the fight shielded ({}).", actor.name, actor.combat_start_shield),
            Severity::Good,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;

    #[test]
    fn test_reset_clears_and_reapplies_shield() {
        let mut actor = Actor::new("hero", "Hero", Side::Player, 5, 100);
        actor.status.bleed.set(5.0, 3);
        actor.status.stunned = 2;
        actor.status.shield = 3;
        actor.combat_start_shield = 12;

        let mut log = CombatLog::new();
        reset_combat_status(&mut actor, &mut log);

        assert!(!actor.status.bleed.is_active());
        assert_eq!(actor.status.stunned, 0);
        assert_eq!(actor.status.shield, 12);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_enrage_multiplier() {
        let mut status = StatusContainer::new();
        assert!((status.enrage_multiplier() - 1.0).abs() < f64::EPSILON);
        status.enrage.set(0.35, 2);
        assert!((status.enrage_multiplier() - 1.35).abs() < f64::EPSILON);
    }

    #[test]
    fn test_timer_accessors_agree() {
        let mut status = StatusContainer::new();
        status.timer_mut(Timer::Chill).set(0.2, 2);
        assert!(status.chill.is_active());
        assert_eq!(status.timer(Timer::Chill).turns, 2);
    }
}
