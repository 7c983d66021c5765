#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a Lawn Defence level to its outcome.

mod scenario;

use std::{io, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use lawn_defence_core::{Command, Event, Outcome};
use lawn_defence_rendering::{FrameCadence, RenderingBackend, Scene, TextBackend};
use lawn_defence_system_bootstrap::{Bootstrap, LevelSetup};
use lawn_defence_system_planting::{Planting, PlayerIntent};
use lawn_defence_world::{self as world, query, Level, LevelConfig};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use scenario::Scenario;

const LOSS_EXIT_CODE: u8 = 2;

/// Plays a Lawn Defence level from the command line.
#[derive(Debug, Parser)]
#[command(name = "lawn-defence", version, about)]
struct Cli {
    /// TOML scenario describing the level and scripted player actions.
    #[arg(long)]
    scenario: Option<PathBuf>,
    /// Level number; larger numbers bring a bigger final hoard.
    #[arg(long)]
    level: Option<u32>,
    /// Time at which the level is won regardless of remaining zombies.
    #[arg(long)]
    time_length: Option<u32>,
    /// Number of lanes.
    #[arg(long)]
    rows: Option<u32>,
    /// Number of lawn columns.
    #[arg(long)]
    columns: Option<u32>,
    /// Seed of the level's random source.
    #[arg(long)]
    seed: Option<u64>,
    /// Print the lawn every N ticks.
    #[arg(long, value_name = "N")]
    frames: Option<u32>,
    /// Only log warnings and errors unless RUST_LOG says otherwise.
    #[arg(long)]
    quiet: bool,
}

/// Entry point for the Lawn Defence command-line interface.
fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    match run(&cli) {
        Ok(Outcome::Won) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(LOSS_EXIT_CODE),
        Err(err) => {
            error!(error = %format!("{err:#}"), "lawn_defence_failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(quiet: bool) {
    let fallback = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn run(cli: &Cli) -> Result<Outcome> {
    let scenario = match &cli.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::default(),
    };
    let setup = level_setup(cli, &scenario)?;
    let cadence = cli
        .frames
        .map(FrameCadence::new)
        .transpose()
        .context("invalid --frames")?;

    let bootstrap = Bootstrap;
    let mut events = Vec::new();
    let mut level = bootstrap.prepare(&setup, &mut events);
    log_events(&events);
    if !cli.quiet {
        println!("{}", bootstrap.welcome_banner(&level));
    }

    let mut backend = TextBackend::new(io::stdout().lock());
    let planting = Planting::new();
    let mut time = level.current_time();

    while level.outcome(time) == Outcome::Running {
        time = time
            .checked_add(1)
            .context("simulation clock overflowed")?;
        events.clear();

        for intent in scenario.intents_at(time) {
            submit(&planting, &mut level, intent?, &mut events);
        }
        world::apply(&mut level, Command::Tick { time }, &mut events);
        if scenario.auto_collect {
            submit(&planting, &mut level, PlayerIntent::CollectAllSuns, &mut events);
        }
        log_events(&events);

        if cadence.is_some_and(|cadence| cadence.is_due(time)) {
            backend.present(&Scene::from_snapshot(&query::snapshot(&level)))?;
        }
    }

    let outcome = level.outcome(time);
    info!(
        time,
        outcome = ?outcome,
        unclaimed_suns = level.unclaimed_suns(),
        zombies = level.enemies().len(),
        "level finished"
    );
    if cadence.is_some() {
        backend.present(&Scene::from_snapshot(&query::snapshot(&level)))?;
    }
    Ok(outcome)
}

fn level_setup(cli: &Cli, scenario: &Scenario) -> Result<LevelSetup> {
    let table = &scenario.level;
    let mut config = LevelConfig::new(
        cli.level.or(table.number).unwrap_or(1),
        cli.time_length.or(table.time_length).unwrap_or(100),
        cli.rows.or(table.rows).unwrap_or(5),
        cli.columns.or(table.columns).unwrap_or(9),
        table.start_time.unwrap_or(0),
    );
    if let Some(seed) = cli.seed.or(table.seed) {
        config = config.with_seed(seed);
    }

    let mut setup = LevelSetup::new(config);
    setup.plants = scenario.seed_tray().context("invalid seed tray")?;
    setup.tombstones = scenario.tombstone_cells();
    setup.starting_sun = scenario.starting_sun();
    Ok(setup)
}

fn submit(planting: &Planting, level: &mut Level, intent: PlayerIntent, events: &mut Vec<Event>) {
    let mut commands = Vec::new();
    if let Err(rejection) = planting.handle(intent, &query::snapshot(level), &mut commands) {
        warn!(?intent, %rejection, "intent rejected");
        return;
    }
    for command in commands {
        world::apply(level, command, events);
    }
}

fn log_events(events: &[Event]) {
    for event in events {
        match event {
            Event::HoardTriggered { zombies } => {
                info!(zombies, "a huge wave of zombies is approaching");
            }
            Event::ZombieReachedHouse { zombie, row } => {
                warn!(zombie = zombie.get(), row, "a zombie reached the house");
            }
            Event::PlantPlacementRejected { kind, cell, reason } => warn!(
                plant = kind.name(),
                row = cell.row(),
                column = cell.column(),
                %reason,
                "plant placement rejected"
            ),
            Event::PlantPlaced { kind, cell } => info!(
                plant = kind.name(),
                row = cell.row(),
                column = cell.column(),
                "plant placed"
            ),
            Event::ZombieDefeated { zombie, kind } => {
                info!(zombie = zombie.get(), kind = kind.name(), "zombie defeated");
            }
            other => debug!(event = ?other),
        }
    }
}
