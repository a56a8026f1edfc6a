//! Command-line flags layered over an optional TOML file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, ensure, Context, Result};
use clap::{Parser, ValueEnum};
use maze_chase_core::{EdgePolicy, GameConfig};
use maze_chase_rendering::GlyphSet;
use serde::Deserialize;

const MAX_TICKS_PER_SECOND: u32 = 1_000;

/// How the loop measures time between updates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Pacing {
    /// Real elapsed time.
    #[default]
    Wall,
    /// One millisecond per loop iteration regardless of real time.
    Iteration,
}

/// Terminal maze chase: eat every dot, dodge the four pursuers.
#[derive(Debug, Default, Parser)]
#[command(name = "maze-chase", version)]
pub(crate) struct CliArgs {
    /// TOML file providing defaults for the options below.
    #[arg(long, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,
    /// Seed of the pursuers' random wandering.
    #[arg(long)]
    pub(crate) seed: Option<u32>,
    /// Let actors leaving one edge reappear on the opposite edge.
    #[arg(long)]
    pub(crate) wrap_edges: bool,
    /// Simulation updates per second.
    #[arg(
        long,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_TICKS_PER_SECOND))
    )]
    pub(crate) ticks_per_second: Option<u32>,
    /// Time source used to pace updates.
    #[arg(long, value_enum)]
    pub(crate) pacing: Option<Pacing>,
    /// Write structured logs to this file.
    #[arg(long, value_name = "PATH")]
    pub(crate) log_file: Option<PathBuf>,
    /// Four letters drawn for the pursuers, in update order.
    #[arg(long, value_name = "LETTERS")]
    pub(crate) pursuer_glyphs: Option<String>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    pacing: Option<Pacing>,
    log_file: Option<PathBuf>,
    pursuer_glyphs: Option<String>,
    game: GameConfig,
}

/// Fully resolved launch options.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Settings {
    pub(crate) game: GameConfig,
    pub(crate) pacing: Pacing,
    pub(crate) log_file: Option<PathBuf>,
    pub(crate) glyphs: GlyphSet,
}

impl Settings {
    /// Reads the configuration file, if any, and applies the flags on top.
    pub(crate) fn resolve(args: &CliArgs) -> Result<Self> {
        let file = match args.config.as_deref() {
            Some(path) => load_file(path)?,
            None => FileConfig::default(),
        };
        Self::merge(args, file)
    }

    fn merge(args: &CliArgs, file: FileConfig) -> Result<Self> {
        let glyphs = match args.pursuer_glyphs.as_deref().or(file.pursuer_glyphs.as_deref()) {
            Some(letters) => parse_glyphs(letters)?,
            None => GlyphSet::CLASSIC,
        };

        let mut game = file.game;
        if let Some(seed) = args.seed {
            game.rng_seed = seed;
        }
        if args.wrap_edges {
            game.edge_policy = EdgePolicy::Wrap;
        }
        if let Some(ticks_per_second) = args.ticks_per_second {
            game.ticks_per_second = ticks_per_second;
        }
        ensure!(
            (1..=MAX_TICKS_PER_SECOND).contains(&game.ticks_per_second),
            "ticks_per_second must be between 1 and {MAX_TICKS_PER_SECOND}, got {}",
            game.ticks_per_second
        );

        Ok(Self {
            game,
            pacing: args.pacing.or(file.pacing).unwrap_or_default(),
            log_file: args.log_file.clone().or(file.log_file),
            glyphs,
        })
    }
}

fn parse_glyphs(letters: &str) -> Result<GlyphSet> {
    let pursuers: [char; 4] = letters
        .chars()
        .collect::<Vec<_>>()
        .try_into()
        .map_err(|chars: Vec<char>| anyhow!("expected 4 pursuer glyphs, got {}", chars.len()))?;
    GlyphSet::with_pursuers(pursuers).context("invalid pursuer glyphs")
}

fn load_file(path: &Path) -> Result<FileConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse_file(&contents).with_context(|| format!("invalid config file {}", path.display()))
}

fn parse_file(contents: &str) -> Result<FileConfig> {
    toml::from_str(contents).context("failed to parse config toml contents")
}
