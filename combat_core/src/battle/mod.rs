//! Battle orchestration - context, shared state, collaborator hooks and the
//! turn sequencer

mod context;
mod hooks;
mod sequencer;
mod state;

pub use context::BattleContext;
pub use hooks::{BattleHooks, HookError, NoopHooks, SaveReason};
pub use sequencer::{
    begin_player_turn, flee, handle_enemy_defeat, play_round, player_action, post_enemy_turn,
    run_enemy_phase, run_enemy_turn, start_battle, tick_battle_round, ActionReport, RoundReport,
};
pub use state::{BattleOutcome, BattleState};
