use maze_chase_core::{
    Command, Direction, EdgePolicy, Event, GameConfig, PursuerMode, TileKind,
};
use maze_chase_world::{self as world, query, World};
use proptest::prelude::*;

fn direction() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::ALL.to_vec())
}

fn script() -> impl Strategy<Value = Vec<(Direction, u8)>> {
    prop::collection::vec((direction(), 1u8..24), 1..40)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn player_stays_on_open_cells(script in script(), wrap in any::<bool>()) {
        let config = GameConfig {
            edge_policy: if wrap { EdgePolicy::Wrap } else { EdgePolicy::Clamp },
            ..GameConfig::default()
        };
        let mut world = World::new(config).expect("world");
        let bounds = query::bounds(&world);
        let mut events = Vec::new();

        for (direction, ticks) in script {
            world::apply(&mut world, Command::SetPlayerHeading { direction }, &mut events);
            for _ in 0..ticks {
                world::apply(&mut world, Command::Tick, &mut events);
                let position = query::player(&world).position;
                prop_assert!(bounds.contains(position));
                let tile = query::tile(&world, position).expect("player cell in bounds");
                prop_assert_ne!(tile.default_kind(), TileKind::Wall);
            }
        }
    }

    #[test]
    fn gated_pursuers_never_move(script in script()) {
        let mut world = World::new(GameConfig::default()).expect("world");
        let mut events = Vec::new();

        for (direction, ticks) in script {
            world::apply(&mut world, Command::SetPlayerHeading { direction }, &mut events);
            for _ in 0..ticks {
                let level = query::level(&world);
                let score = query::score(&world);
                let gated: Vec<_> = query::pursuers(&world)
                    .iter()
                    .filter(|pursuer| {
                        pursuer.mode() == PursuerMode::Inactive
                            && score < pursuer.release_threshold()
                    })
                    .map(|pursuer| (pursuer.kind(), pursuer.position()))
                    .collect();

                events.clear();
                world::apply(&mut world, Command::Tick, &mut events);
                if query::level(&world) != level {
                    continue;
                }
                for (kind, position) in gated {
                    prop_assert_eq!(query::pursuer(&world, kind).position(), position);
                }
            }
        }
    }

    #[test]
    fn remaining_tracks_consumed_collectibles(script in script()) {
        let mut world = World::new(GameConfig::default()).expect("world");
        let mut events = Vec::new();

        for (direction, ticks) in script {
            world::apply(&mut world, Command::SetPlayerHeading { direction }, &mut events);
            for _ in 0..ticks {
                let before = query::remaining_collectibles(&world);
                events.clear();
                world::apply(&mut world, Command::Tick, &mut events);
                if events.iter().any(|event| matches!(event, Event::LevelStarted { .. })) {
                    prop_assert_eq!(before, 1);
                    continue;
                }
                let consumed = events
                    .iter()
                    .filter(|event| matches!(event, Event::CollectibleConsumed { .. }))
                    .count() as u32;
                prop_assert!(consumed <= 1);
                prop_assert_eq!(query::remaining_collectibles(&world), before - consumed);
            }
        }
    }
}
