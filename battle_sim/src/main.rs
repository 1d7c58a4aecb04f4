//! Battle Sim - headless seeded battle runner for combat_core
//!
//! Spawns a zone's enemies from the built-in templates, plays a full battle
//! with a simple player policy and prints the combat log plus a JSON summary.
//! The same seed and arguments always replay the same battle.

use anyhow::{bail, Context, Result};
use clap::Parser;
use combat_core::ability::default_abilities;
use combat_core::actor::{Actor, Companion, Enemy, Player, Stats};
use combat_core::battle::{
    play_round, start_battle, BattleContext, BattleHooks, BattleOutcome, BattleState, HookError,
    SaveReason,
};
use combat_core::config::{load_toml, CombatConstants, DifficultyConfig};
use combat_core::log::Severity;
use combat_core::rng::SeededRng;
use combat_core::spawn::{default_templates, spawn_group, SpawnContext, SpawnTables};
use combat_core::types::{Difficulty, RarityTier, Side};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Run one seeded battle
#[derive(Parser, Debug)]
#[command(name = "battle_sim")]
#[command(about = "Headless seeded battle runner", long_about = None)]
#[command(version)]
struct Cli {
    /// RNG seed (spawn and battle share one stream)
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// easy, normal, hard or nightmare
    #[arg(long, default_value = "normal")]
    difficulty: Difficulty,

    #[arg(long, default_value_t = 3)]
    zone_min: u32,

    #[arg(long, default_value_t = 6)]
    zone_max: u32,

    /// Enemy template ids, comma separated
    #[arg(long, value_delimiter = ',', default_value = "cave_rat,goblin_cutter")]
    enemies: Vec<String>,

    /// Spawn every enemy as an elite
    #[arg(long)]
    elite: bool,

    /// Give the player a companion
    #[arg(long)]
    companion: bool,

    /// Stop after this many rounds
    #[arg(long, default_value_t = 50)]
    max_rounds: u32,

    /// TOML file overriding combat constants
    #[arg(long)]
    constants: Option<PathBuf>,

    /// Print only the JSON summary
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Serialize)]
struct EnemySummary {
    id: String,
    name: String,
    level: u32,
    rarity: RarityTier,
    affixes: Vec<String>,
    max_hp: u32,
    attack: f64,
}

impl EnemySummary {
    fn from_enemy(enemy: &Enemy) -> Self {
        EnemySummary {
            id: enemy.actor.id.clone(),
            name: enemy.actor.name.clone(),
            level: enemy.actor.level,
            rarity: enemy.rarity,
            affixes: enemy.affixes.iter().map(|a| a.id.clone()).collect(),
            max_hp: enemy.actor.max_hp,
            attack: enemy.actor.stats.attack,
        }
    }
}

#[derive(Debug, Serialize)]
struct Summary {
    seed: u64,
    difficulty: Difficulty,
    outcome: Option<BattleOutcome>,
    rounds: u32,
    draws: u64,
    player_hp: u32,
    saves: Vec<SaveReason>,
    enemies: Vec<EnemySummary>,
}

/// Records save requests and reward events
#[derive(Debug, Default)]
struct SimHooks {
    saves: std::rc::Rc<std::cell::RefCell<Vec<SaveReason>>>,
}

impl BattleHooks for SimHooks {
    fn on_enemy_defeated(&mut self, enemy: &Enemy) -> Result<(), HookError> {
        tracing::info!(
            enemy = %enemy.actor.id,
            drop_mult = enemy.drop_mult,
            "reward roll requested"
        );
        Ok(())
    }

    fn request_save(&mut self, reason: SaveReason) -> Result<(), HookError> {
        self.saves.borrow_mut().push(reason);
        Ok(())
    }
}

fn make_player(companion: bool) -> Player {
    let actor = Actor::new("hero", "Hero", Side::Player, 6, 260)
        .with_stats(Stats {
            attack: 24.0,
            magic: 20.0,
            armor: 14.0,
            magic_res: 10.0,
            crit_chance: 8.0,
            dodge_chance: 5.0,
            lifesteal: 4.0,
            ..Default::default()
        })
        .with_resource(40);

    let mut player = Player::new(actor).with_abilities([
        "strike",
        "power_strike",
        "rend",
        "fireball",
        "frost_nova",
        "ward",
    ]);
    player.resource_regen = 6;

    if companion {
        let pup = Actor::new("pup", "Ember Pup", Side::Player, 4, 80).with_stats(Stats {
            attack: 8.0,
            magic: 12.0,
            ..Default::default()
        });
        player = player.with_companion(Companion::new(pup, "companion_spark"));
    }
    player
}

/// Ward when low, otherwise the last usable damaging ability in the kit
fn choose_action(player: &Player, ctx: &BattleContext) -> String {
    let usable = |id: &str| {
        ctx.catalog
            .get(id)
            .filter(|a| player.check_action(a).is_ok())
            .cloned()
    };

    if player.actor.hp_ratio() < 0.4 {
        if let Some(ward) = usable("ward") {
            return ward.id;
        }
    }

    player
        .abilities
        .iter()
        .rev()
        .filter_map(|id| usable(id.as_str()))
        .find(|a| a.kind.deals_damage())
        .map(|a| a.id)
        .unwrap_or_else(|| "strike".to_string())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let constants = match &cli.constants {
        Some(path) => load_toml::<CombatConstants>(path)
            .with_context(|| format!("loading constants from {}", path.display()))?,
        None => CombatConstants::default(),
    };
    let difficulty = DifficultyConfig::preset(cli.difficulty);

    let templates = default_templates();
    let mut picked = Vec::with_capacity(cli.enemies.len());
    for id in &cli.enemies {
        match templates.get(id) {
            Some(template) => picked.push(template),
            None => bail!("unknown enemy template '{}'", id),
        }
    }

    let hooks = SimHooks::default();
    let saves = std::rc::Rc::clone(&hooks.saves);
    let mut ctx = BattleContext::new(
        Box::new(SeededRng::new(cli.seed)),
        default_abilities(),
        difficulty.clone(),
    )
    .with_constants(constants.clone())
    .with_hooks(Box::new(hooks));

    let tables = SpawnTables::default();
    let spawn_ctx = SpawnContext::new(cli.zone_min, cli.zone_max, &difficulty, &constants, &tables)
        .with_elite(cli.elite);
    let enemies = spawn_group(&picked, &spawn_ctx, ctx.rng.as_mut());
    let spawned: Vec<EnemySummary> = enemies.iter().map(EnemySummary::from_enemy).collect();
    tracing::info!(seed = cli.seed, enemies = enemies.len(), "zone spawned");

    let mut player = make_player(cli.companion);
    let mut state = BattleState::new();
    let mut outcome = start_battle(&mut ctx, &mut state, &mut player, enemies);
    let mut rounds = 0;

    while outcome.is_none() && rounds < cli.max_rounds {
        let ability = choose_action(&player, &ctx);
        let report = play_round(&mut ctx, &mut state, &mut player, &ability);
        if let Some(err) = &report.action.rejected {
            // choose_action only returns usable abilities
            bail!("player action rejected: {}", err);
        }
        outcome = report.ended;
        rounds += 1;
    }
    if outcome.is_none() {
        tracing::warn!(rounds, "round limit reached without a result");
    }

    if !cli.quiet {
        for entry in ctx.log.entries() {
            let tag = match entry.severity {
                Severity::Info => "    ",
                Severity::Good => " +  ",
                Severity::Warn => " !  ",
                Severity::Danger => " !! ",
                Severity::System => "==  ",
            };
            println!("{}{}", tag, entry.message);
        }
        println!();
    }

    let summary = Summary {
        seed: cli.seed,
        difficulty: cli.difficulty,
        outcome,
        rounds,
        draws: ctx.rng.draw_index(),
        player_hp: player.actor.hp,
        saves: saves.borrow().clone(),
        enemies: spawned,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
