#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure behavior engine for the four maze pursuers.
//!
//! The engine never touches the grid. The world hands it a [`Pursuer`] record
//! plus read-only context and applies whatever the engine decides: the mode
//! state machine lives in [`mode`], per-type targeting in [`target`] and the
//! greedy heading choice in [`steering`].

use maze_chase_core::{EntityState, PursuerKind, PursuerMode, PursuerPlacement, Vector2D};

pub mod mode;
pub mod steering;
pub mod target;

pub use mode::{advance_mode, frighten, mark_eaten, ModeContext, ModeTransition};
pub use steering::{choose_heading, propose_step, steer, SteeringContext};
pub use target::{compute_target, release_threshold, ChaseStrategy, Profile, TargetContext};

/// Tick numbers of the last entry into each timed state; `None` means never.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ModeTimers {
    /// Most recent entry into `Frightened`.
    pub last_frightened: Option<u64>,
    /// Most recent time the pursuer was eaten.
    pub last_eaten: Option<u64>,
    /// Most recent entry into `Chase`.
    pub last_chase: Option<u64>,
    /// Most recent entry into `Scatter`.
    pub last_scatter: Option<u64>,
}

/// Complete behavioral record of one pursuer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pursuer {
    kind: PursuerKind,
    state: EntityState,
    mode: PursuerMode,
    resume_mode: PursuerMode,
    target: Vector2D,
    release_threshold: u32,
    timers: ModeTimers,
    cycles_completed: u8,
}

impl Pursuer {
    /// Record for a pursuer at the start of a level.
    #[must_use]
    pub fn at_level_start(placement: &PursuerPlacement, release_threshold: u32) -> Self {
        Self {
            kind: placement.kind,
            state: EntityState::new(placement.start, placement.start_heading),
            mode: PursuerMode::Inactive,
            resume_mode: PursuerMode::Scatter,
            target: placement.scatter_corner,
            release_threshold,
            timers: ModeTimers::default(),
            cycles_completed: 0,
        }
    }

    /// Which pursuer this record describes.
    #[must_use]
    pub const fn kind(&self) -> PursuerKind {
        self.kind
    }

    /// Cell currently occupied.
    #[must_use]
    pub const fn position(&self) -> Vector2D {
        self.state.position
    }

    /// Current heading.
    #[must_use]
    pub const fn heading(&self) -> Vector2D {
        self.state.heading
    }

    /// Current behavioral mode.
    #[must_use]
    pub const fn mode(&self) -> PursuerMode {
        self.mode
    }

    /// Cycling mode restored when a frightened spell ends.
    #[must_use]
    pub const fn resume_mode(&self) -> PursuerMode {
        self.resume_mode
    }

    /// Target selected on the most recent tick.
    #[must_use]
    pub const fn target(&self) -> Vector2D {
        self.target
    }

    /// Score required before the pursuer first leaves `Inactive`.
    #[must_use]
    pub const fn release_threshold(&self) -> u32 {
        self.release_threshold
    }

    /// Timestamps of the timed states.
    #[must_use]
    pub const fn timers(&self) -> ModeTimers {
        self.timers
    }

    /// Number of chase phases that timed out into scatter.
    #[must_use]
    pub const fn cycles_completed(&self) -> u8 {
        self.cycles_completed
    }

    /// Moves the pursuer without touching its heading or mode.
    pub fn relocate(&mut self, position: Vector2D) {
        self.state.position = position;
    }

    /// Records the target chosen for this tick.
    pub fn set_target(&mut self, target: Vector2D) {
        self.target = target;
    }

    fn reverse_heading(&mut self) {
        self.state.heading = self.state.heading.reversed();
    }

    fn shift_cycle_timers(&mut self, elapsed: u64) {
        for stamp in [&mut self.timers.last_scatter, &mut self.timers.last_chase] {
            if let Some(tick) = stamp.as_mut() {
                *tick = tick.saturating_add(elapsed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::CLASSIC;

    #[test]
    fn level_start_record_is_inactive_and_aims_at_its_corner() {
        let placement = CLASSIC.placement(PursuerKind::Chaser);
        let pursuer = Pursuer::at_level_start(placement, 0);
        assert_eq!(pursuer.mode(), PursuerMode::Inactive);
        assert_eq!(pursuer.position(), placement.start);
        assert_eq!(pursuer.heading(), placement.start_heading);
        assert_eq!(pursuer.target(), placement.scatter_corner);
        assert_eq!(pursuer.timers(), ModeTimers::default());
        assert_eq!(pursuer.cycles_completed(), 0);
    }

    #[test]
    fn shifting_timers_skips_states_never_entered() {
        let mut pursuer = Pursuer::at_level_start(CLASSIC.placement(PursuerKind::Ambusher), 0);
        pursuer.timers.last_scatter = Some(10);
        pursuer.shift_cycle_timers(5);
        assert_eq!(pursuer.timers.last_scatter, Some(15));
        assert_eq!(pursuer.timers.last_chase, None);
    }
}
