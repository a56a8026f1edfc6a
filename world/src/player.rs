//! Player movement and the collisions it resolves.

use maze_chase_core::{Collectible, Event, PursuerMode, TileKind, Vector2D};
use maze_chase_system_pursuers::frighten;

use crate::World;

impl World {
    pub(crate) fn update_player(&mut self, out_events: &mut Vec<Event>) {
        let from = self.player.position;
        let proposed = self
            .grid
            .bounds()
            .constrain(from + self.player.heading, self.config.edge_policy);
        if proposed == from {
            return;
        }
        let Some(tile) = self.grid.tile(proposed).copied() else {
            return;
        };

        match tile.kind() {
            TileKind::Wall => return,
            TileKind::Point | TileKind::Energizer if tile.is_active() => {
                let kind = if tile.kind() == TileKind::Energizer {
                    Collectible::Energizer
                } else {
                    Collectible::Point
                };
                if self.consume(proposed, kind, out_events) {
                    return;
                }
            }
            TileKind::Pursuer(kind) => {
                let pursuer = &self.pursuers[kind.index()];
                if pursuer.position() == proposed && pursuer.mode() == PursuerMode::Frightened {
                    self.eat_pursuer(kind, proposed, out_events);
                    self.session.score = self.session.score.saturating_add(1);
                } else {
                    self.lose_life(out_events);
                    return;
                }
            }
            _ => {}
        }

        self.place_player(from, proposed);
    }

    /// Takes the collectible on `cell`. Returns `true` when it was the last one
    /// and the level advanced.
    fn consume(&mut self, cell: Vector2D, kind: Collectible, out_events: &mut Vec<Event>) -> bool {
        self.grid.deactivate(cell);
        self.session.score = self.session.score.saturating_add(1);
        self.session.remaining = self.session.remaining.saturating_sub(1);
        out_events.push(Event::CollectibleConsumed { cell, kind });

        if kind == Collectible::Energizer {
            self.frighten_pursuers(out_events);
        }

        if self.session.remaining == 0 {
            self.advance_level(out_events);
            return true;
        }
        false
    }

    fn frighten_pursuers(&mut self, out_events: &mut Vec<Event>) {
        let tick = self.session.tick;
        let mut count = 0;
        for pursuer in &mut self.pursuers {
            let from = pursuer.mode();
            if !frighten(pursuer, tick) {
                continue;
            }
            count += 1;
            if from != PursuerMode::Frightened {
                tracing::trace!(kind = ?pursuer.kind(), ?from, "frightened");
                out_events.push(Event::PursuerModeChanged {
                    pursuer: pursuer.kind(),
                    from,
                    to: PursuerMode::Frightened,
                });
            }
        }
        out_events.push(Event::PursuersFrightened { count });
    }

    fn place_player(&mut self, from: Vector2D, to: Vector2D) {
        self.player.position = to;
        self.vacate(from);
        self.grid.set_occupant(to, TileKind::Player);
    }
}
