//! Per-type target selection.

use maze_chase_core::{
    Difficulty, EntityState, GridBounds, MazeLayout, PursuerKind, PursuerMode, Vector2D,
    Xorshift32,
};

use crate::Pursuer;

/// How a pursuer picks its target while chasing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChaseStrategy {
    /// The player's cell.
    Direct,
    /// A cell `tiles` ahead of the player along its heading.
    Lead {
        /// Look-ahead distance in cells.
        tiles: i32,
    },
    /// The vector from the chaser to a point `ahead` cells in front of the
    /// player, scaled by `scale` and anchored at the chaser.
    Pincer {
        /// Look-ahead distance in cells.
        ahead: i32,
        /// Factor applied to the chaser-relative offset.
        scale: i32,
    },
    /// The player while farther than the radius, its own corner otherwise.
    Shy {
        /// Squared radius inside which the pursuer retreats.
        radius_squared: i64,
    },
}

impl ChaseStrategy {
    /// Resolves the chase target for a pursuer at `own` with scatter `corner`.
    #[must_use]
    pub fn target(self, own: Vector2D, corner: Vector2D, ctx: &TargetContext<'_>) -> Vector2D {
        let player = ctx.player;
        match self {
            Self::Direct => player.position,
            Self::Lead { tiles } => player.position + player.heading * tiles,
            Self::Pincer { ahead, scale } => {
                let pivot = player.position + player.heading * ahead;
                ctx.chaser + (pivot - ctx.chaser) * scale
            }
            Self::Shy { radius_squared } => {
                if own.squared_distance(player.position) > radius_squared {
                    player.position
                } else {
                    corner
                }
            }
        }
    }
}

/// Static per-type behavior data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Profile {
    /// Chase heuristic.
    pub strategy: ChaseStrategy,
    /// Score, before difficulty scaling, that must be earned during a level
    /// before the pursuer is released.
    pub release_offset: f32,
}

impl Profile {
    /// Profile of the given pursuer type.
    #[must_use]
    pub const fn of(kind: PursuerKind) -> Self {
        match kind {
            PursuerKind::Chaser => Self {
                strategy: ChaseStrategy::Direct,
                release_offset: 0.0,
            },
            PursuerKind::Ambusher => Self {
                strategy: ChaseStrategy::Lead { tiles: 4 },
                release_offset: 0.0,
            },
            PursuerKind::Flanker => Self {
                strategy: ChaseStrategy::Pincer { ahead: 2, scale: 4 },
                release_offset: 30.0,
            },
            PursuerKind::Wanderer => Self {
                strategy: ChaseStrategy::Shy { radius_squared: 64 },
                release_offset: 60.0,
            },
        }
    }
}

/// Release threshold fixed at level start from the score at that moment.
#[must_use]
pub fn release_threshold(kind: PursuerKind, difficulty: Difficulty, score: u32) -> u32 {
    let offset = difficulty.scale_down(Profile::of(kind).release_offset) as u32;
    offset.saturating_add(score)
}

/// World facts a target computation may read.
#[derive(Clone, Copy, Debug)]
pub struct TargetContext<'a> {
    /// Maze geometry: corners, den and its exit.
    pub layout: &'a MazeLayout,
    /// Grid dimensions for random targets.
    pub bounds: GridBounds,
    /// Player position and heading.
    pub player: EntityState,
    /// Position of the [`PursuerKind::Chaser`], the pincer anchor.
    pub chaser: Vector2D,
}

/// Chooses this tick's target.
///
/// A pursuer inside the den always heads for the den exit. Otherwise the mode
/// decides; frightened pursuers draw a fresh random cell every tick, and an
/// inactive pursuer keeps whatever target it had.
pub fn compute_target(
    pursuer: &Pursuer,
    ctx: &TargetContext<'_>,
    rng: &mut Xorshift32,
) -> Vector2D {
    if ctx.layout.den.contains(pursuer.position()) {
        return ctx.layout.den_exit;
    }

    let corner = ctx.layout.placement(pursuer.kind()).scatter_corner;
    match pursuer.mode() {
        PursuerMode::Scatter => corner,
        PursuerMode::Chase => {
            Profile::of(pursuer.kind())
                .strategy
                .target(pursuer.position(), corner, ctx)
        }
        PursuerMode::Frightened => rng.next_cell(ctx.bounds),
        PursuerMode::Inactive => pursuer.target(),
    }
}
