//! Greedy one-step steering.

use maze_chase_core::{Direction, EdgePolicy, GridBounds, Vector2D};

use crate::Pursuer;

/// Geometry and speed used to project candidate moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SteeringContext {
    /// Grid dimensions.
    pub bounds: GridBounds,
    /// How projections that leave the grid are brought back.
    pub edge_policy: EdgePolicy,
    /// Cells covered per tick.
    pub stride: i32,
    /// Whether the pursuer stands in a corridor that forbids heading up.
    pub one_way: bool,
}

impl SteeringContext {
    fn project(&self, position: Vector2D, heading: Vector2D) -> Vector2D {
        self.bounds
            .constrain(position + heading * self.stride, self.edge_policy)
    }
}

/// Cell the pursuer would reach this tick if nothing stopped it.
#[must_use]
pub fn propose_step(pursuer: &Pursuer, ctx: &SteeringContext) -> Vector2D {
    ctx.project(pursuer.position(), pursuer.heading())
}

/// Picks the heading whose projected cell lies closest to `target`.
///
/// The reverse of `heading` is never considered, nor is [`Direction::Up`] in
/// a one-way corridor. Candidates whose projected cell is blocked are
/// discarded. Ties keep the earliest direction in [`Direction::ALL`]. Returns
/// `None` when every candidate is excluded.
pub fn choose_heading<F>(
    position: Vector2D,
    heading: Vector2D,
    target: Vector2D,
    ctx: &SteeringContext,
    is_blocked: F,
) -> Option<Direction>
where
    F: Fn(Vector2D) -> bool,
{
    let reverse = heading.reversed();
    let mut best: Option<(Direction, i64)> = None;

    for direction in Direction::ALL {
        let vector = direction.vector();
        if vector == reverse {
            continue;
        }
        if ctx.one_way && direction == Direction::Up {
            continue;
        }

        let probe = ctx.project(position, vector);
        if is_blocked(probe) {
            continue;
        }

        let distance = probe.squared_distance(target);
        if best.map_or(true, |(_, shortest)| distance < shortest) {
            best = Some((direction, distance));
        }
    }

    best.map(|(direction, _)| direction)
}

/// Re-aims the pursuer from its current cell toward its stored target.
///
/// Leaves the heading unchanged when no candidate qualifies.
pub fn steer<F>(pursuer: &mut Pursuer, ctx: &SteeringContext, is_blocked: F)
where
    F: Fn(Vector2D) -> bool,
{
    if let Some(direction) = choose_heading(
        pursuer.position(),
        pursuer.heading(),
        pursuer.target(),
        ctx,
        is_blocked,
    ) {
        pursuer.state.heading = direction.vector();
    }
}
