#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Chase engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then reports [`Event`] values describing what the
//! simulation did. Geometry ([`Vector2D`], [`GridBounds`]), the compile-time
//! maze ([`layout::CLASSIC`]) and the tunables ([`GameConfig`]) live here so
//! every crate agrees on them.

use std::{
    ops::{Add, Mul, Neg, Sub},
    sync::atomic::{AtomicBool, AtomicU8, Ordering},
    time::Duration,
};

use serde::{Deserialize, Serialize};

pub mod layout;

pub use layout::{MazeLayout, PursuerPlacement, Zone, CLASSIC};

/// Seed used by the pursuer random stream unless configured otherwise.
pub const DEFAULT_RNG_SEED: u32 = 0x1234_5678;

/// Simulated seconds a pursuer stays frightened.
pub const FRIGHTENED_SECONDS: f32 = 6.0;

/// Simulated seconds an eaten pursuer waits before leaving the den again.
pub const EATEN_COOLDOWN_SECONDS: f32 = 6.0;

/// Score awarded for eating a frightened pursuer.
pub const PURSUER_EATEN_SCORE: u32 = 10;

/// Integer 2D vector used for cells, headings and targets.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Vector2D {
    x: i32,
    y: i32,
}

impl Vector2D {
    /// The zero vector, also used as "no heading".
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a vector from its components.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal component; grows to the right.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical component; grows downward.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Reports whether both components are zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.x == 0 && self.y == 0
    }

    /// Vector pointing the opposite way.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self::new(-self.x, -self.y)
    }

    /// Squared Euclidean distance between two vectors.
    #[must_use]
    pub const fn squared_distance(self, other: Self) -> i64 {
        let dx = self.x as i64 - other.x as i64;
        let dy = self.y as i64 - other.y as i64;
        dx * dx + dy * dy
    }
}

impl Add for Vector2D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2D {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<i32> for Vector2D {
    type Output = Self;

    fn mul(self, scalar: i32) -> Self {
        Self::new(self.x * scalar, self.y * scalar)
    }
}

impl Neg for Vector2D {
    type Output = Self;

    fn neg(self) -> Self {
        self.reversed()
    }
}

/// Position and heading shared by the player and the pursuers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityState {
    /// Cell currently occupied.
    pub position: Vector2D,
    /// Per-tick displacement before any speed scaling; zero when idle.
    pub heading: Vector2D,
}

impl EntityState {
    /// Creates a state at the position with the given heading.
    #[must_use]
    pub const fn new(position: Vector2D, heading: Vector2D) -> Self {
        Self { position, heading }
    }
}

/// Cardinal directions, listed in steering tie-break order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    Up,
    /// Toward increasing row indices.
    Down,
    /// Toward decreasing column indices.
    Left,
    /// Toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in enumeration order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Unit vector pointing in the direction.
    #[must_use]
    pub const fn vector(self) -> Vector2D {
        match self {
            Self::Up => Vector2D::new(0, -1),
            Self::Down => Vector2D::new(0, 1),
            Self::Left => Vector2D::new(-1, 0),
            Self::Right => Vector2D::new(1, 0),
        }
    }

    const fn encode(self) -> u8 {
        match self {
            Self::Up => 1,
            Self::Down => 2,
            Self::Left => 3,
            Self::Right => 4,
        }
    }

    const fn decode(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Up),
            2 => Some(Self::Down),
            3 => Some(Self::Left),
            4 => Some(Self::Right),
            _ => None,
        }
    }
}

/// How positions that leave the grid are brought back inside.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// Pin each axis to the nearest edge.
    #[default]
    Clamp,
    /// Re-enter from the opposite edge.
    Wrap,
}

/// Dimensions of the tile lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridBounds {
    width: u32,
    height: u32,
}

impl GridBounds {
    /// Creates bounds for a grid of the given size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells.
    #[must_use]
    pub const fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Reports whether the position addresses a cell.
    #[must_use]
    pub const fn contains(&self, position: Vector2D) -> bool {
        position.x() >= 0
            && position.y() >= 0
            && (position.x() as u32) < self.width
            && (position.y() as u32) < self.height
    }

    /// Row-major index of the position, if it lies inside the grid.
    #[must_use]
    pub fn index(&self, position: Vector2D) -> Option<usize> {
        if !self.contains(position) {
            return None;
        }
        let row = usize::try_from(position.y()).ok()?;
        let column = usize::try_from(position.x()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        Some(row * width + column)
    }

    /// Brings an arbitrary position back inside the grid.
    ///
    /// A zero-sized grid leaves the position untouched; callers never address
    /// cells in such a grid.
    #[must_use]
    pub fn constrain(&self, position: Vector2D, policy: EdgePolicy) -> Vector2D {
        if self.width == 0 || self.height == 0 {
            return position;
        }
        let width = i32::try_from(self.width).unwrap_or(i32::MAX);
        let height = i32::try_from(self.height).unwrap_or(i32::MAX);
        match policy {
            EdgePolicy::Clamp => Vector2D::new(
                position.x().clamp(0, width - 1),
                position.y().clamp(0, height - 1),
            ),
            EdgePolicy::Wrap => Vector2D::new(
                position.x().rem_euclid(width),
                position.y().rem_euclid(height),
            ),
        }
    }
}

/// Per-level scalar that speeds pursuers up and shortens scatter windows.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    multiplier: f32,
}

impl Difficulty {
    /// Difficulty derived from the zero-based level number.
    #[must_use]
    pub fn for_level(level: u32) -> Self {
        Self {
            multiplier: 1.0 + level as f32 * 0.1,
        }
    }

    /// Raw multiplier, `1.0` on the first level.
    #[must_use]
    pub const fn multiplier(&self) -> f32 {
        self.multiplier
    }

    /// Number of cells a pursuer covers per tick.
    #[must_use]
    pub fn pursuer_step(&self) -> i32 {
        self.multiplier.round() as i32
    }

    /// Divides a base quantity by the multiplier.
    #[must_use]
    pub fn scale_down(&self, value: f32) -> f32 {
        value / self.multiplier
    }
}

/// 32-bit xorshift generator driving frightened wandering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    /// Creates a generator. A zero seed would lock the stream at zero, so it is
    /// replaced by [`DEFAULT_RNG_SEED`].
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        let state = if seed == 0 { DEFAULT_RNG_SEED } else { seed };
        Self { state }
    }

    /// Advances the stream and returns the new state.
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Draws a cell inside the bounds: one draw per axis, x first.
    pub fn next_cell(&mut self, bounds: GridBounds) -> Vector2D {
        let x = self.next_u32() % bounds.width().max(1);
        let y = self.next_u32() % bounds.height().max(1);
        Vector2D::new(x as i32, y as i32)
    }
}

/// The four autonomous pursuers, in update order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PursuerKind {
    /// Heads straight for the player.
    Chaser,
    /// Aims ahead of the player.
    Ambusher,
    /// Pincers the player using the chaser's position.
    Flanker,
    /// Chases from afar and retreats when close.
    Wanderer,
}

impl PursuerKind {
    /// Every pursuer in update order.
    pub const ALL: [Self; 4] = [Self::Chaser, Self::Ambusher, Self::Flanker, Self::Wanderer];

    /// Zero-based position of the pursuer in [`Self::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Chaser => 0,
            Self::Ambusher => 1,
            Self::Flanker => 2,
            Self::Wanderer => 3,
        }
    }
}

/// Behavioral state of a pursuer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PursuerMode {
    /// Parked in the den; neither targets nor moves.
    Inactive,
    /// Heads for its fixed corner.
    Scatter,
    /// Hunts the player with its per-type heuristic.
    Chase,
    /// Wanders randomly and can be eaten.
    Frightened,
}

impl PursuerMode {
    /// Reports whether the mode belongs to the timed scatter/chase cycle.
    #[must_use]
    pub const fn is_cycling(self) -> bool {
        matches!(self, Self::Scatter | Self::Chase)
    }
}

/// Logical contents of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Open floor.
    Empty,
    /// Permanent obstacle.
    Wall,
    /// Collectible worth one point.
    Point,
    /// Collectible that frightens every active pursuer.
    Energizer,
    /// Remaining-life indicator.
    Heart,
    /// The player.
    Player,
    /// A pursuer.
    Pursuer(PursuerKind),
}

/// Symbol the render collaborator shows for a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Glyph {
    /// Nothing visible, including consumed collectibles and lost hearts.
    Empty,
    /// Wall segment.
    Wall,
    /// Uneaten collectible.
    Point,
    /// Uneaten energizer.
    Energizer,
    /// Life still available.
    Heart,
    /// The player.
    Player,
    /// A pursuer of the given kind.
    Pursuer(PursuerKind),
}

/// Collectible classes the player can consume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collectible {
    /// Plain point.
    Point,
    /// Energizer.
    Energizer,
}

/// Why a session stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionOutcome {
    /// The player ran out of lives.
    LivesExhausted,
    /// The input collaborator asked to stop.
    Quit,
}

/// Cell whose displayed symbol changed since the previous flush.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileChange {
    /// Cell that changed.
    pub position: Vector2D,
    /// Symbol the cell now shows.
    pub glyph: Glyph,
}

/// Tunables supplied at world construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Simulation updates per simulated second.
    pub ticks_per_second: u32,
    /// Behavior of movement that leaves the grid.
    pub edge_policy: EdgePolicy,
    /// Seed of the pursuer random stream.
    pub rng_seed: u32,
}

impl GameConfig {
    /// Real duration of one simulation update.
    #[must_use]
    pub fn step(&self) -> Duration {
        Duration::from_secs(1) / self.ticks_per_second.max(1)
    }

    /// Converts simulated seconds into a whole number of ticks.
    #[must_use]
    pub fn seconds_to_ticks(&self, seconds: f32) -> u64 {
        (seconds.max(0.0) * self.ticks_per_second as f32) as u64
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: 60,
            edge_policy: EdgePolicy::Clamp,
            rng_seed: DEFAULT_RNG_SEED,
        }
    }
}

/// Single-slot mailbox written by the input activity and read by the loop.
///
/// Headings are last-write-wins; the loop only ever observes the most recent
/// intent, and each intent is handed out once.
#[derive(Debug, Default)]
pub struct IntentSlot {
    heading: AtomicU8,
    quit: AtomicBool,
}

impl IntentSlot {
    /// Creates an empty slot with no heading and no quit request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the desired player heading.
    pub fn set_player_heading(&self, direction: Direction) {
        self.heading.store(direction.encode(), Ordering::Release);
    }

    /// Takes the latest heading written since the previous take, if any.
    #[must_use]
    pub fn take_heading(&self) -> Option<Direction> {
        Direction::decode(self.heading.swap(0, Ordering::AcqRel))
    }

    /// Raises the termination flag.
    pub fn request_quit(&self) {
        self.quit.store(true, Ordering::Release);
    }

    /// Reports whether termination was requested.
    #[must_use]
    pub fn quit_requested(&self) -> bool {
        self.quit.load(Ordering::Acquire)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Starts a fresh session on level zero, discarding score and lives.
    StartGame,
    /// Replaces the player's heading.
    SetPlayerHeading {
        /// New heading for the player.
        direction: Direction,
    },
    /// Advances the simulation by exactly one update.
    Tick,
    /// Ends the session at the player's request.
    Quit,
}

/// Events reported by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// The simulation completed an update.
    TimeAdvanced {
        /// Tick number of the completed update.
        tick: u64,
    },
    /// A pursuer switched behavioral mode.
    PursuerModeChanged {
        /// Pursuer that changed mode.
        pursuer: PursuerKind,
        /// Mode before the change.
        from: PursuerMode,
        /// Mode after the change.
        to: PursuerMode,
    },
    /// An energizer frightened the active pursuers.
    PursuersFrightened {
        /// Number of pursuers that became frightened.
        count: usize,
    },
    /// A frightened pursuer was eaten and sent back to its spawn cell.
    PursuerEaten {
        /// Pursuer that was eaten.
        pursuer: PursuerKind,
        /// Cell where the pursuer was caught.
        cell: Vector2D,
    },
    /// The player consumed a collectible.
    CollectibleConsumed {
        /// Cell that held the collectible.
        cell: Vector2D,
        /// Class of collectible consumed.
        kind: Collectible,
    },
    /// The player lost a life.
    LifeLost {
        /// Lives left after the loss.
        remaining: u8,
    },
    /// A level was initialized; the whole grid should be redrawn.
    LevelStarted {
        /// Zero-based level number.
        level: u32,
    },
    /// The session ended.
    SessionEnded {
        /// Reason the session ended.
        outcome: SessionOutcome,
        /// Final score.
        score: u32,
    },
}
