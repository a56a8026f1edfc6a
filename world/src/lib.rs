#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Maze Chase.
//!
//! The [`World`] owns the tile grid, the session counters and every actor
//! record. Adapters mutate it exclusively through [`apply`], read it through
//! [`query`] and collect redraws through [`drain_changes`].

use std::collections::TryReserveError;

use maze_chase_core::{
    Command, Difficulty, EntityState, Event, GameConfig, MazeLayout, PursuerKind,
    SessionOutcome, TileChange, TileKind, Vector2D, Xorshift32, CLASSIC,
};
use maze_chase_system_pursuers::{release_threshold, Pursuer};
use thiserror::Error;

mod grid;
mod player;
mod pursuers;

pub use grid::Tile;

use grid::TileGrid;

/// Failures raised while building a world from a layout.
#[derive(Debug, Error)]
pub enum WorldError {
    /// The layout declares a different number of rows than it provides.
    #[error("layout declares {expected} rows but provides {actual}")]
    LayoutHeight {
        /// Declared row count.
        expected: u32,
        /// Rows present in the layout.
        actual: usize,
    },
    /// A row does not match the declared width.
    #[error("layout row {row} has {actual} columns, expected {expected}")]
    LayoutWidth {
        /// Offending row index.
        row: usize,
        /// Declared column count.
        expected: u32,
        /// Columns present in the row.
        actual: usize,
    },
    /// An actor start or spawn cell is a wall or lies outside the grid.
    #[error("placement {position:?} is not an open cell")]
    BlockedPlacement {
        /// Offending cell.
        position: Vector2D,
    },
    /// Grid storage could not be reserved.
    #[error("failed to allocate grid storage")]
    Allocation(#[from] TryReserveError),
}

#[derive(Clone, Debug)]
struct Session {
    score: u32,
    lives: u8,
    level: u32,
    difficulty: Difficulty,
    remaining: u32,
    tick: u64,
    rng: Xorshift32,
    outcome: Option<SessionOutcome>,
}

impl Session {
    fn fresh(lives: u8, config: &GameConfig) -> Self {
        Self {
            score: 0,
            lives,
            level: 0,
            difficulty: Difficulty::for_level(0),
            remaining: 0,
            tick: 0,
            rng: Xorshift32::new(config.rng_seed),
            outcome: None,
        }
    }
}

/// Represents the authoritative Maze Chase world state.
#[derive(Debug)]
pub struct World {
    layout: &'static MazeLayout,
    config: GameConfig,
    grid: TileGrid,
    session: Session,
    player: EntityState,
    pursuers: [Pursuer; 4],
}

impl World {
    /// Creates a world on the classic maze, ready at level zero.
    pub fn new(config: GameConfig) -> Result<Self, WorldError> {
        Self::with_layout(&CLASSIC, config)
    }

    /// Creates a world on the provided maze, ready at level zero.
    pub fn with_layout(layout: &'static MazeLayout, config: GameConfig) -> Result<Self, WorldError> {
        let grid = TileGrid::load(layout)?;
        for position in std::iter::once(layout.player_start).chain(
            layout
                .pursuers
                .iter()
                .flat_map(|placement| [placement.start, placement.spawn]),
        ) {
            if grid.is_wall(position) {
                return Err(WorldError::BlockedPlacement { position });
            }
        }

        let lives = u8::try_from(grid.hearts().len()).unwrap_or(u8::MAX);
        let difficulty = Difficulty::for_level(0);
        let mut world = Self {
            layout,
            config,
            session: Session::fresh(lives, &config),
            player: EntityState::new(layout.player_start, Vector2D::ZERO),
            pursuers: PursuerKind::ALL.map(|kind| {
                Pursuer::at_level_start(
                    layout.placement(kind),
                    release_threshold(kind, difficulty, 0),
                )
            }),
            grid,
        };
        let mut scratch = Vec::new();
        world.start_level(&mut scratch);
        Ok(world)
    }

    fn start_session(&mut self, out_events: &mut Vec<Event>) {
        let lives = u8::try_from(self.grid.hearts().len()).unwrap_or(u8::MAX);
        self.session = Session::fresh(lives, &self.config);
        self.start_level(out_events);
    }

    /// Re-seeds the grid and every actor for the current level number while
    /// keeping score and lives.
    fn start_level(&mut self, out_events: &mut Vec<Event>) {
        let session = &mut self.session;
        session.difficulty = Difficulty::for_level(session.level);
        session.remaining = self.grid.total_collectibles();

        self.grid.reset();
        for index in usize::from(session.lives)..self.grid.hearts().len() {
            self.grid.deactivate_heart(index);
        }

        self.player = EntityState::new(self.layout.player_start, Vector2D::ZERO);
        for kind in PursuerKind::ALL {
            let threshold = release_threshold(kind, session.difficulty, session.score);
            self.pursuers[kind.index()] =
                Pursuer::at_level_start(self.layout.placement(kind), threshold);
        }

        for pursuer in &self.pursuers {
            self.grid
                .set_occupant(pursuer.position(), TileKind::Pursuer(pursuer.kind()));
        }
        self.grid.set_occupant(self.player.position, TileKind::Player);

        tracing::info!(
            level = session.level,
            score = session.score,
            lives = session.lives,
            "level started"
        );
        out_events.push(Event::LevelStarted {
            level: session.level,
        });
    }

    fn advance_level(&mut self, out_events: &mut Vec<Event>) {
        self.session.level = self.session.level.saturating_add(1);
        self.start_level(out_events);
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        if self.is_finished() {
            return;
        }

        self.session.tick = self.session.tick.saturating_add(1);
        out_events.push(Event::TimeAdvanced {
            tick: self.session.tick,
        });

        for kind in PursuerKind::ALL {
            self.update_pursuer(kind, out_events);
            if self.is_finished() {
                return;
            }
        }

        self.update_player(out_events);
    }

    /// Takes a life and respawns the player, or ends the session once none
    /// remain.
    fn lose_life(&mut self, out_events: &mut Vec<Event>) {
        if self.session.lives == 0 {
            self.end_session(SessionOutcome::LivesExhausted, out_events);
            return;
        }

        self.session.lives -= 1;
        self.grid.deactivate_heart(usize::from(self.session.lives));
        tracing::debug!(remaining = self.session.lives, "life lost");
        out_events.push(Event::LifeLost {
            remaining: self.session.lives,
        });

        if self.session.lives == 0 {
            self.end_session(SessionOutcome::LivesExhausted, out_events);
            return;
        }

        let from = self.player.position;
        self.player.position = self.layout.player_start;
        self.vacate(from);
        self.grid.set_occupant(self.player.position, TileKind::Player);
    }

    fn end_session(&mut self, outcome: SessionOutcome, out_events: &mut Vec<Event>) {
        if self.session.outcome.is_some() {
            return;
        }

        self.session.outcome = Some(outcome);
        tracing::info!(?outcome, score = self.session.score, "session ended");
        out_events.push(Event::SessionEnded {
            outcome,
            score: self.session.score,
        });
    }

    /// Restores a cell after an actor leaves it, keeping the marker of any
    /// other actor still standing there. The player's marker beats any
    /// pursuer's; among pursuers the one updated last in a tick wins.
    fn vacate(&mut self, cell: Vector2D) {
        if self.player.position == cell {
            self.grid.set_occupant(cell, TileKind::Player);
            return;
        }

        let remaining = self
            .pursuers
            .iter()
            .rev()
            .find(|pursuer| pursuer.position() == cell)
            .map(Pursuer::kind);
        match remaining {
            Some(kind) => self.grid.set_occupant(cell, TileKind::Pursuer(kind)),
            None => self.grid.clear_occupant(cell),
        }
    }

    fn is_finished(&self) -> bool {
        self.session.outcome.is_some()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartGame => world.start_session(out_events),
        Command::SetPlayerHeading { direction } => {
            if !world.is_finished() {
                world.player.heading = direction.vector();
            }
        }
        Command::Tick => world.tick(out_events),
        Command::Quit => world.end_session(SessionOutcome::Quit, out_events),
    }
}

/// Moves every cell changed since the previous call into `out`, in the order
/// the changes happened.
pub fn drain_changes(world: &mut World, out: &mut Vec<TileChange>) {
    world.grid.drain_changes(out);
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Tile, World};
    use maze_chase_core::{
        Difficulty, EntityState, GridBounds, MazeLayout, PursuerKind, SessionOutcome, TileChange,
        Vector2D,
    };
    use maze_chase_system_pursuers::Pursuer;

    /// Current session score.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.session.score
    }

    /// Lives the player still holds.
    #[must_use]
    pub fn lives(world: &World) -> u8 {
        world.session.lives
    }

    /// Zero-based level number.
    #[must_use]
    pub fn level(world: &World) -> u32 {
        world.session.level
    }

    /// Difficulty of the running level.
    #[must_use]
    pub fn difficulty(world: &World) -> Difficulty {
        world.session.difficulty
    }

    /// Collectibles left before the level advances.
    #[must_use]
    pub fn remaining_collectibles(world: &World) -> u32 {
        world.session.remaining
    }

    /// Collectibles the layout holds in total.
    #[must_use]
    pub fn total_collectibles(world: &World) -> u32 {
        world.grid.total_collectibles()
    }

    /// Number of updates run since the session started.
    #[must_use]
    pub fn tick(world: &World) -> u64 {
        world.session.tick
    }

    /// Why the session ended, if it has.
    #[must_use]
    pub fn outcome(world: &World) -> Option<SessionOutcome> {
        world.session.outcome
    }

    /// Reports whether the session has ended.
    #[must_use]
    pub fn is_finished(world: &World) -> bool {
        world.is_finished()
    }

    /// Player position and heading.
    #[must_use]
    pub fn player(world: &World) -> EntityState {
        world.player
    }

    /// Every pursuer record in update order.
    #[must_use]
    pub fn pursuers(world: &World) -> &[Pursuer] {
        &world.pursuers
    }

    /// Record of a single pursuer.
    #[must_use]
    pub fn pursuer(world: &World, kind: PursuerKind) -> &Pursuer {
        &world.pursuers[kind.index()]
    }

    /// Tile stored at the position, `None` outside the grid.
    #[must_use]
    pub fn tile(world: &World, position: Vector2D) -> Option<Tile> {
        world.grid.tile(position).copied()
    }

    /// Grid dimensions.
    #[must_use]
    pub fn bounds(world: &World) -> GridBounds {
        world.grid.bounds()
    }

    /// Maze the world was built from.
    #[must_use]
    pub fn layout(world: &World) -> &'static MazeLayout {
        world.layout
    }

    /// Every cell with its current symbol, row by row.
    #[must_use]
    pub fn frame(world: &World) -> Vec<TileChange> {
        world.grid.snapshot()
    }
}
