//! Glue between the world, the keyboard slot and a presenter.

use std::sync::Arc;

use anyhow::Result;
use maze_chase_core::{Command, Event, IntentSlot, TileChange};
use maze_chase_rendering::{Frame, Presenter};
use maze_chase_system_clock::Simulation;
use maze_chase_world::{apply, drain_changes, query, World};

/// One game driven by the fixed-step loop.
#[derive(Debug)]
pub(crate) struct GameSession<P> {
    world: World,
    slot: Arc<IntentSlot>,
    presenter: P,
    events: Vec<Event>,
    changes: Vec<TileChange>,
}

impl<P: Presenter> GameSession<P> {
    pub(crate) fn new(world: World, slot: Arc<IntentSlot>, presenter: P) -> Self {
        Self {
            world,
            slot,
            presenter,
            events: Vec::new(),
            changes: Vec::new(),
        }
    }

    /// Begins a fresh session so the first present draws the whole maze.
    pub(crate) fn start(&mut self) {
        apply(&mut self.world, Command::StartGame, &mut self.events);
    }

    /// Ends the session if it is still running and returns the final score.
    pub(crate) fn finish(mut self) -> u32 {
        if !query::is_finished(&self.world) {
            apply(&mut self.world, Command::Quit, &mut self.events);
        }
        query::score(&self.world)
    }

    #[cfg(test)]
    fn world(&self) -> &World {
        &self.world
    }

    #[cfg(test)]
    fn presenter(&self) -> &P {
        &self.presenter
    }
}

impl<P: Presenter> Simulation for GameSession<P> {
    type Error = anyhow::Error;

    fn finished(&self) -> bool {
        query::is_finished(&self.world) || self.slot.quit_requested()
    }

    fn update(&mut self) {
        if let Some(direction) = self.slot.take_heading() {
            apply(
                &mut self.world,
                Command::SetPlayerHeading { direction },
                &mut self.events,
            );
        }
        apply(&mut self.world, Command::Tick, &mut self.events);
    }

    fn present(&mut self) -> Result<()> {
        let redraw = self
            .events
            .iter()
            .any(|event| matches!(event, Event::LevelStarted { .. }));
        self.events.clear();

        self.changes.clear();
        drain_changes(&mut self.world, &mut self.changes);
        if redraw {
            let bounds = query::bounds(&self.world);
            let cells = query::frame(&self.world);
            return self.presenter.present(Frame::Full {
                width: bounds.width(),
                height: bounds.height(),
                cells: &cells,
            });
        }

        if self.changes.is_empty() {
            return Ok(());
        }
        self.presenter.present(Frame::Partial(&self.changes))
    }
}
