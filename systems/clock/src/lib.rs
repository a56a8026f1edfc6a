#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-timestep scheduler that paces the simulation loop.
//!
//! Time sources and sleeping are injected through [`Clock`] and [`Sleeper`],
//! so catch-up and pacing can be driven by scripted clocks in tests.

use std::time::{Duration, Instant};

/// Source of elapsed time since the loop started.
pub trait Clock {
    /// Time elapsed since the clock's origin.
    fn now(&mut self) -> Duration;
}

/// Blocks the calling thread between loop iterations.
pub trait Sleeper {
    /// Suspends execution for roughly `duration`.
    fn sleep(&mut self, duration: Duration);
}

/// Wall-clock time measured from construction.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Starts a clock whose origin is the current instant.
    #[must_use]
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now(&mut self) -> Duration {
        self.origin.elapsed()
    }
}

/// Logical clock that advances by a fixed unit on every read.
///
/// Each loop iteration reads the clock once, so time is counted in
/// iterations rather than measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IterationClock {
    unit: Duration,
    elapsed: Duration,
}

impl IterationClock {
    /// Creates a clock at zero that moves forward by `unit` per read.
    #[must_use]
    pub const fn new(unit: Duration) -> Self {
        Self {
            unit,
            elapsed: Duration::ZERO,
        }
    }
}

impl Clock for IterationClock {
    fn now(&mut self) -> Duration {
        self.elapsed = self.elapsed.saturating_add(self.unit);
        self.elapsed
    }
}

/// Sleeps the current OS thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Accumulator that releases one update per elapsed step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedStep {
    step: Duration,
    next_due: Duration,
}

impl FixedStep {
    /// Creates a scheduler whose first update is due immediately.
    ///
    /// A zero step is raised to one nanosecond.
    #[must_use]
    pub fn new(step: Duration) -> Self {
        Self {
            step: step.max(Duration::from_nanos(1)),
            next_due: Duration::ZERO,
        }
    }

    /// Length of one update.
    #[must_use]
    pub const fn step(&self) -> Duration {
        self.step
    }

    /// Time at which the next update becomes due.
    #[must_use]
    pub const fn next_due(&self) -> Duration {
        self.next_due
    }

    /// Runs `update` once for every step that `now` has passed.
    ///
    /// `update` returns `false` to stop catching up early, for example when
    /// the session ended mid-burst. Returns the number of updates run.
    pub fn catch_up<F>(&mut self, now: Duration, mut update: F) -> u64
    where
        F: FnMut() -> bool,
    {
        let mut ran = 0;
        while now > self.next_due {
            self.next_due = self.next_due.saturating_add(self.step);
            ran += 1;
            if !update() {
                break;
            }
        }
        ran
    }

    /// Time left until the next update is due, zero when already late.
    #[must_use]
    pub fn remaining(&self, now: Duration) -> Duration {
        self.next_due.saturating_sub(now)
    }
}

/// Loop participant driven by [`run_loop`].
pub trait Simulation {
    /// Error raised while presenting a frame.
    type Error;

    /// Reports whether the loop should stop.
    fn finished(&self) -> bool;

    /// Advances the simulation by exactly one step.
    fn update(&mut self);

    /// Publishes whatever changed since the previous call.
    fn present(&mut self) -> Result<(), Self::Error>;
}

/// Counters collected by [`run_loop`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Loop iterations executed.
    pub iterations: u64,
    /// Simulation updates executed.
    pub updates: u64,
}

/// Runs the simulation until it reports completion.
///
/// Each iteration catches up on due updates, presents once, then sleeps for
/// whatever is left of the current step. A zero remainder skips the sleep.
pub fn run_loop<C, S, M>(
    clock: &mut C,
    sleeper: &mut S,
    scheduler: &mut FixedStep,
    simulation: &mut M,
) -> Result<LoopStats, M::Error>
where
    C: Clock,
    S: Sleeper,
    M: Simulation,
{
    let mut stats = LoopStats::default();
    while !simulation.finished() {
        stats.iterations += 1;
        let now = clock.now();
        let ran = scheduler.catch_up(now, || {
            simulation.update();
            !simulation.finished()
        });
        if ran > 1 {
            tracing::debug!(updates = ran, "simulation catching up");
        }
        stats.updates += ran;

        simulation.present()?;
        if simulation.finished() {
            break;
        }

        let remaining = scheduler.remaining(now);
        if !remaining.is_zero() {
            sleeper.sleep(remaining);
        }
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_update_runs_as_soon_as_time_moves() {
        let mut scheduler = FixedStep::new(Duration::from_millis(16));
        assert_eq!(scheduler.catch_up(Duration::ZERO, || true), 0);
        assert_eq!(scheduler.catch_up(Duration::from_millis(1), || true), 1);
        assert_eq!(scheduler.next_due(), Duration::from_millis(16));
        assert_eq!(
            scheduler.remaining(Duration::from_millis(1)),
            Duration::from_millis(15)
        );
    }

    #[test]
    fn late_iterations_run_every_missed_step() {
        let mut scheduler = FixedStep::new(Duration::from_millis(10));
        let mut count = 0;
        let ran = scheduler.catch_up(Duration::from_millis(35), || {
            count += 1;
            true
        });
        assert_eq!(ran, 4);
        assert_eq!(count, 4);
        assert_eq!(scheduler.next_due(), Duration::from_millis(40));
        assert_eq!(
            scheduler.remaining(Duration::from_millis(35)),
            Duration::from_millis(5)
        );
    }

    #[test]
    fn catch_up_stops_when_update_declines() {
        let mut scheduler = FixedStep::new(Duration::from_millis(10));
        let ran = scheduler.catch_up(Duration::from_millis(100), || false);
        assert_eq!(ran, 1);
        assert_eq!(scheduler.next_due(), Duration::from_millis(10));
    }

    #[test]
    fn remaining_saturates_when_behind() {
        let scheduler = FixedStep::new(Duration::from_millis(10));
        assert_eq!(scheduler.remaining(Duration::from_secs(1)), Duration::ZERO);
    }

    #[test]
    fn zero_step_is_raised() {
        let scheduler = FixedStep::new(Duration::ZERO);
        assert_eq!(scheduler.step(), Duration::from_nanos(1));
    }

    #[test]
    fn iteration_clock_counts_reads() {
        let mut clock = IterationClock::new(Duration::from_millis(1));
        assert_eq!(clock.now(), Duration::from_millis(1));
        assert_eq!(clock.now(), Duration::from_millis(2));
    }
}
