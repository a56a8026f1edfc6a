//! Behavioral mode state machine.
//!
//! `Inactive` pursuers wait for the score-gated release, then alternate
//! between `Scatter` and `Chase` on a timetable indexed by the number of
//! completed cycles. Energizers push every active pursuer into `Frightened`,
//! which suspends the timetable until it wears off.

use maze_chase_core::{
    Difficulty, GameConfig, PursuerMode, Vector2D, EATEN_COOLDOWN_SECONDS, FRIGHTENED_SECONDS,
};

use crate::Pursuer;

/// Read-only inputs of a mode update.
#[derive(Clone, Copy, Debug)]
pub struct ModeContext {
    /// Current tick number.
    pub tick: u64,
    /// Current session score.
    pub score: u32,
    /// Difficulty of the running level.
    pub difficulty: Difficulty,
    /// Tunables, used for tick conversion.
    pub config: GameConfig,
}

impl ModeContext {
    fn ticks(&self, seconds: f32) -> u64 {
        self.config.seconds_to_ticks(seconds)
    }

    fn elapsed_since(&self, stamp: Option<u64>) -> Option<u64> {
        stamp.map(|tick| self.tick.saturating_sub(tick))
    }
}

/// Mode change reported by [`advance_mode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeTransition {
    /// Mode before the update.
    pub from: PursuerMode,
    /// Mode after the update.
    pub to: PursuerMode,
}

#[derive(Clone, Copy, Debug)]
struct Phase {
    scatter_seconds: f32,
    chase_seconds: Option<f32>,
}

fn phase(cycles_completed: u8) -> Option<Phase> {
    match cycles_completed {
        0 | 1 => Some(Phase {
            scatter_seconds: 7.0,
            chase_seconds: Some(20.0),
        }),
        2 => Some(Phase {
            scatter_seconds: 5.0,
            chase_seconds: Some(20.0),
        }),
        3 => Some(Phase {
            scatter_seconds: 5.0,
            chase_seconds: None,
        }),
        _ => None,
    }
}

/// Runs one tick of the mode state machine.
///
/// Returns the net transition when the mode changed. A Scatter/Chase swap
/// reverses the heading; leaving `Inactive` or `Frightened` does not.
pub fn advance_mode(pursuer: &mut Pursuer, ctx: &ModeContext) -> Option<ModeTransition> {
    if ctx.score < pursuer.release_threshold {
        return None;
    }

    let from = pursuer.mode;
    match from {
        PursuerMode::Inactive => {
            let rested = ctx
                .elapsed_since(pursuer.timers.last_eaten)
                .map_or(true, |elapsed| elapsed >= ctx.ticks(EATEN_COOLDOWN_SECONDS));
            if !rested {
                return None;
            }
            pursuer.mode = PursuerMode::Scatter;
            pursuer.timers.last_scatter = Some(ctx.tick);
            return Some(ModeTransition {
                from,
                to: PursuerMode::Scatter,
            });
        }
        PursuerMode::Frightened => {
            let elapsed = ctx.elapsed_since(pursuer.timers.last_frightened).unwrap_or(0);
            if elapsed < ctx.ticks(FRIGHTENED_SECONDS) {
                return None;
            }
            pursuer.shift_cycle_timers(elapsed);
            pursuer.mode = pursuer.resume_mode;
        }
        PursuerMode::Scatter | PursuerMode::Chase => {}
    }

    run_cycle(pursuer, ctx);
    if from.is_cycling() && pursuer.mode != from {
        pursuer.reverse_heading();
    }

    (pursuer.mode != from).then_some(ModeTransition {
        from,
        to: pursuer.mode,
    })
}

fn run_cycle(pursuer: &mut Pursuer, ctx: &ModeContext) {
    let Some(phase) = phase(pursuer.cycles_completed) else {
        return;
    };

    match pursuer.mode {
        PursuerMode::Scatter => {
            let limit = ctx.ticks(ctx.difficulty.scale_down(phase.scatter_seconds));
            let elapsed = ctx.elapsed_since(pursuer.timers.last_scatter).unwrap_or(0);
            if elapsed >= limit {
                pursuer.mode = PursuerMode::Chase;
                pursuer.timers.last_chase = Some(ctx.tick);
            }
        }
        PursuerMode::Chase => {
            let Some(chase_seconds) = phase.chase_seconds else {
                return;
            };
            let elapsed = ctx.elapsed_since(pursuer.timers.last_chase).unwrap_or(0);
            if elapsed >= ctx.ticks(chase_seconds) {
                pursuer.mode = PursuerMode::Scatter;
                pursuer.timers.last_scatter = Some(ctx.tick);
                pursuer.cycles_completed = pursuer.cycles_completed.saturating_add(1);
            }
        }
        PursuerMode::Inactive | PursuerMode::Frightened => {}
    }
}

/// Pushes an active pursuer into `Frightened`.
///
/// Returns `false` for inactive pursuers, which ignore energizers. A pursuer
/// that is already frightened restarts its window and banks the time spent so
/// far into its cycle timestamps.
pub fn frighten(pursuer: &mut Pursuer, tick: u64) -> bool {
    match pursuer.mode {
        PursuerMode::Inactive => return false,
        PursuerMode::Scatter | PursuerMode::Chase => {
            pursuer.reverse_heading();
            pursuer.resume_mode = pursuer.mode;
            pursuer.mode = PursuerMode::Frightened;
        }
        PursuerMode::Frightened => {
            if let Some(since) = pursuer.timers.last_frightened {
                pursuer.shift_cycle_timers(tick.saturating_sub(since));
            }
        }
    }
    pursuer.timers.last_frightened = Some(tick);
    true
}

/// Sends an eaten pursuer back to its spawn cell and parks it.
pub fn mark_eaten(pursuer: &mut Pursuer, tick: u64, spawn: Vector2D) {
    pursuer.mode = PursuerMode::Inactive;
    pursuer.state.heading = Vector2D::ZERO;
    pursuer.state.position = spawn;
    pursuer.timers.last_eaten = Some(tick);
}
