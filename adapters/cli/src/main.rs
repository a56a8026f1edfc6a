#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Maze Chase in the terminal.

mod config;
mod input;
mod session;
mod terminal;

use std::{
    fs::File,
    io,
    path::Path,
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::Parser;
use maze_chase_core::IntentSlot;
use maze_chase_system_clock::{
    run_loop, FixedStep, IterationClock, LoopStats, MonotonicClock, ThreadSleeper,
};
use maze_chase_world::World;
use tracing_subscriber::EnvFilter;

use crate::{
    config::{CliArgs, Pacing, Settings},
    session::GameSession,
    terminal::{TerminalGuard, TerminalPresenter},
};

const DEFAULT_LOG_FILTER: &str = "maze_chase=info";

/// Entry point for the Maze Chase command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    let settings = Settings::resolve(&args)?;
    if let Some(path) = settings.log_file.as_deref() {
        init_logging(path)?;
    }

    let score = play(&settings)?;
    println!("FINAL SCORE: {score}");
    Ok(())
}

/// Sends structured logs to `path`; the terminal itself belongs to the maze.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
        .context("failed to install log subscriber")
}

fn play(settings: &Settings) -> Result<u32> {
    let world = World::new(settings.game).context("failed to build the maze")?;
    let slot = Arc::new(IntentSlot::new());

    let guard = TerminalGuard::enter()?;
    let input = input::spawn(Arc::clone(&slot))?;

    let presenter = TerminalPresenter::new(io::stdout(), settings.glyphs);
    let mut session = GameSession::new(world, Arc::clone(&slot), presenter);
    session.start();

    let mut scheduler = FixedStep::new(settings.game.step());
    let mut sleeper = ThreadSleeper;
    tracing::info!(
        ticks_per_second = settings.game.ticks_per_second,
        pacing = ?settings.pacing,
        seed = settings.game.rng_seed,
        "game loop starting"
    );
    let outcome = match settings.pacing {
        Pacing::Wall => run_loop(
            &mut MonotonicClock::start(),
            &mut sleeper,
            &mut scheduler,
            &mut session,
        ),
        Pacing::Iteration => run_loop(
            &mut IterationClock::new(Duration::from_millis(1)),
            &mut sleeper,
            &mut scheduler,
            &mut session,
        ),
    };

    slot.request_quit();
    let joined = input.join();
    drop(guard);

    let stats: LoopStats = outcome?;
    joined?;
    tracing::info!(
        iterations = stats.iterations,
        updates = stats.updates,
        "game loop finished"
    );
    Ok(session.finish())
}
