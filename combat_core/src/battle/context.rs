//! BattleContext - services threaded through every combat call

use super::hooks::{BattleHooks, HookError, NoopHooks};
use crate::ability::{default_abilities, AbilityCatalog};
use crate::config::{CombatConstants, DifficultyConfig};
use crate::log::{CombatLog, Severity};
use crate::rng::{BattleRng, SeededRng};

/// Shared services for one battle (or a whole session)
///
/// Built once and passed by reference; there is no global state.
pub struct BattleContext {
    pub rng: Box<dyn BattleRng>,
    pub log: CombatLog,
    pub catalog: AbilityCatalog,
    pub difficulty: DifficultyConfig,
    pub constants: CombatConstants,
    pub hooks: Box<dyn BattleHooks>,
}

impl std::fmt::Debug for BattleContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleContext")
            .field("draw_index", &self.rng.draw_index())
            .field("log", &self.log)
            .field("abilities", &self.catalog.len())
            .field("difficulty", &self.difficulty.id)
            .finish()
    }
}

impl BattleContext {
    /// Create a context with default constants, an empty log and no-op hooks
    pub fn new(rng: Box<dyn BattleRng>, catalog: AbilityCatalog, difficulty: DifficultyConfig) -> Self {
        BattleContext {
            rng,
            log: CombatLog::new(),
            catalog,
            difficulty,
            constants: CombatConstants::default(),
            hooks: Box::new(NoopHooks),
        }
    }

    /// Seeded context using the built-in ability table
    pub fn seeded(seed: u64, difficulty: DifficultyConfig) -> Self {
        Self::new(Box::new(SeededRng::new(seed)), default_abilities(), difficulty)
    }

    pub fn with_constants(mut self, constants: CombatConstants) -> Self {
        self.constants = constants;
        self
    }

    pub fn with_hooks(mut self, hooks: Box<dyn BattleHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_log(mut self, log: CombatLog) -> Self {
        self.log = log;
        self
    }

    /// Invoke a hook, logging and swallowing any failure
    pub(crate) fn run_hook<F>(&mut self, label: &str, call: F) -> bool
    where
        F: FnOnce(&mut dyn BattleHooks) -> Result<(), HookError>,
    {
        match call(self.hooks.as_mut()) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(hook = label, %err, "battle hook failed");
                self.log
                    .log(format!("{} failed: {}", label, err), Severity::Warn);
                false
            }
        }
    }
}
