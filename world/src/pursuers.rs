//! Per-tick pursuer update: mode, target, movement and collision.

use maze_chase_core::{
    Event, PursuerKind, PursuerMode, TileKind, Vector2D, PURSUER_EATEN_SCORE,
};
use maze_chase_system_pursuers::{
    advance_mode, compute_target, mark_eaten, propose_step, steer, ModeContext, SteeringContext,
    TargetContext,
};

use crate::World;

impl World {
    pub(crate) fn update_pursuer(&mut self, kind: PursuerKind, out_events: &mut Vec<Event>) {
        let index = kind.index();
        let mode_ctx = ModeContext {
            tick: self.session.tick,
            score: self.session.score,
            difficulty: self.session.difficulty,
            config: self.config,
        };
        if let Some(transition) = advance_mode(&mut self.pursuers[index], &mode_ctx) {
            tracing::trace!(?kind, from = ?transition.from, to = ?transition.to, "mode changed");
            out_events.push(Event::PursuerModeChanged {
                pursuer: kind,
                from: transition.from,
                to: transition.to,
            });
        }

        if self.pursuers[index].mode() == PursuerMode::Inactive {
            return;
        }

        let target_ctx = TargetContext {
            layout: self.layout,
            bounds: self.grid.bounds(),
            player: self.player,
            chaser: self.pursuers[PursuerKind::Chaser.index()].position(),
        };
        let target = compute_target(&self.pursuers[index], &target_ctx, &mut self.session.rng);
        self.pursuers[index].set_target(target);

        let mut steering = SteeringContext {
            bounds: self.grid.bounds(),
            edge_policy: self.config.edge_policy,
            stride: self.session.difficulty.pursuer_step(),
            one_way: false,
        };
        let from = self.pursuers[index].position();
        let proposed = propose_step(&self.pursuers[index], &steering);
        if self.grid.is_wall(proposed) {
            return;
        }

        if proposed == self.player.position {
            if self.pursuers[index].mode() == PursuerMode::Frightened {
                self.eat_pursuer(kind, proposed, out_events);
                return;
            }
            self.lose_life(out_events);
            return;
        }

        self.pursuers[index].relocate(proposed);
        self.vacate(from);
        self.grid.set_occupant(proposed, TileKind::Pursuer(kind));

        steering.one_way = self.layout.is_one_way(proposed);
        let frightened = self.pursuers[index].mode() == PursuerMode::Frightened;
        let grid = &self.grid;
        let player = self.player.position;
        steer(&mut self.pursuers[index], &steering, |cell| {
            grid.is_wall(cell) || (frightened && cell == player)
        });
    }

    /// Sends a frightened pursuer back to its spawn cell and pays out.
    pub(crate) fn eat_pursuer(
        &mut self,
        kind: PursuerKind,
        cell: Vector2D,
        out_events: &mut Vec<Event>,
    ) {
        let index = kind.index();
        let from = self.pursuers[index].position();
        let spawn = self.layout.placement(kind).spawn;
        mark_eaten(&mut self.pursuers[index], self.session.tick, spawn);
        self.vacate(from);
        self.grid.set_occupant(spawn, TileKind::Pursuer(kind));

        self.session.score = self.session.score.saturating_add(PURSUER_EATEN_SCORE);
        tracing::debug!(?kind, ?cell, score = self.session.score, "pursuer eaten");
        out_events.push(Event::PursuerEaten { pursuer: kind, cell });
        out_events.push(Event::PursuerModeChanged {
            pursuer: kind,
            from: PursuerMode::Frightened,
            to: PursuerMode::Inactive,
        });
    }
}
