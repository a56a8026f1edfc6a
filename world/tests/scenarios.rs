use maze_chase_core::{
    Collectible, Command, Direction, Event, GameConfig, Glyph, MazeLayout, PursuerKind,
    PursuerMode, PursuerPlacement, SessionOutcome, Vector2D, Zone,
};
use maze_chase_world::{self as world, query, World, WorldError};

const fn parked(kind: PursuerKind, x: i32, y: i32) -> PursuerPlacement {
    PursuerPlacement {
        kind,
        start: Vector2D::new(x, y),
        start_heading: Vector2D::ZERO,
        spawn: Vector2D::new(x, y),
        scatter_corner: Vector2D::new(x, y),
    }
}

/// Two collectibles in an open room, every pursuer sealed in its own pocket.
const PANTRY: MazeLayout = MazeLayout {
    rows: &[
        "#########",
        "#.@    ##",
        "#      ##",
        "#########",
        "# # # # #",
        "#########",
        "ooo      ",
    ],
    width: 9,
    height: 7,
    max_lives: 3,
    player_start: Vector2D::new(3, 1),
    pursuers: [
        parked(PursuerKind::Chaser, 1, 4),
        parked(PursuerKind::Ambusher, 3, 4),
        parked(PursuerKind::Flanker, 5, 4),
        parked(PursuerKind::Wanderer, 7, 4),
    ],
    den: Zone::new(7, 4, 7, 4),
    den_exit: Vector2D::new(7, 3),
    one_way: &[],
};

/// A single corridor shared by the player and the chaser.
const CORRIDOR: MazeLayout = MazeLayout {
    rows: &[
        "#######",
        "#     #",
        "#######",
        "# # # #",
        "#######",
        "ooo    ",
    ],
    width: 7,
    height: 6,
    max_lives: 3,
    player_start: Vector2D::new(1, 1),
    pursuers: [
        PursuerPlacement {
            kind: PursuerKind::Chaser,
            start: Vector2D::new(3, 1),
            start_heading: Vector2D::new(-1, 0),
            spawn: Vector2D::new(3, 1),
            scatter_corner: Vector2D::new(1, 1),
        },
        parked(PursuerKind::Ambusher, 1, 3),
        parked(PursuerKind::Flanker, 3, 3),
        parked(PursuerKind::Wanderer, 5, 3),
    ],
    den: Zone::new(5, 3, 5, 3),
    den_exit: Vector2D::new(5, 2),
    one_way: &[],
};

const WALLED_START: MazeLayout = MazeLayout {
    player_start: Vector2D::new(0, 0),
    ..CORRIDOR
};

fn tick(world: &mut World) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick, &mut events);
    events
}

fn steer(world: &mut World, direction: Direction) {
    let mut events = Vec::new();
    world::apply(world, Command::SetPlayerHeading { direction }, &mut events);
}

#[test]
fn fresh_session_counts_every_collectible() {
    let world = World::with_layout(&PANTRY, GameConfig::default()).expect("world");
    assert_eq!(query::remaining_collectibles(&world), 2);
    assert_eq!(query::total_collectibles(&world), 2);
    assert_eq!(query::lives(&world), 3);
}

#[test]
fn energizer_then_last_point_advances_the_level_once() {
    let mut world = World::with_layout(&PANTRY, GameConfig::default()).expect("world");
    steer(&mut world, Direction::Left);

    let first = tick(&mut world);
    assert!(first.contains(&Event::CollectibleConsumed {
        cell: Vector2D::new(2, 1),
        kind: Collectible::Energizer,
    }));
    assert!(first.contains(&Event::PursuersFrightened { count: 2 }));
    assert_eq!(
        query::pursuer(&world, PursuerKind::Chaser).mode(),
        PursuerMode::Frightened
    );
    assert_eq!(
        query::pursuer(&world, PursuerKind::Flanker).mode(),
        PursuerMode::Inactive
    );
    assert_eq!(query::remaining_collectibles(&world), 1);

    let second = tick(&mut world);
    let starts = second
        .iter()
        .filter(|event| matches!(event, Event::LevelStarted { .. }))
        .count();
    assert_eq!(starts, 1);
    assert!(second.contains(&Event::LevelStarted { level: 1 }));

    assert_eq!(query::level(&world), 1);
    assert_eq!(query::score(&world), 2);
    assert_eq!(query::lives(&world), 3);
    assert_eq!(query::remaining_collectibles(&world), 2);
    assert_eq!(query::player(&world).position, PANTRY.player_start);
    assert!(query::pursuers(&world)
        .iter()
        .all(|pursuer| pursuer.mode() == PursuerMode::Inactive));
    assert_eq!(
        query::tile(&world, Vector2D::new(2, 1)).map(|tile| tile.glyph()),
        Some(Glyph::Energizer)
    );
}

#[test]
fn level_advance_requests_a_full_redraw() {
    let mut world = World::with_layout(&PANTRY, GameConfig::default()).expect("world");
    steer(&mut world, Direction::Left);
    let _ = tick(&mut world);
    let _ = tick(&mut world);

    let mut changes = Vec::new();
    world::drain_changes(&mut world, &mut changes);
    assert_eq!(changes.len(), 5, "only the freshly placed actors are queued");
    assert_eq!(query::frame(&world).len(), 9 * 7);
}

#[test]
fn collisions_drain_every_life_then_end_the_session() {
    let mut world = World::with_layout(&CORRIDOR, GameConfig::default()).expect("world");
    let mut log = Vec::new();
    for _ in 0..10 {
        log.extend(tick(&mut world));
    }

    let losses: Vec<_> = log
        .iter()
        .filter_map(|event| match event {
            Event::LifeLost { remaining } => Some(*remaining),
            _ => None,
        })
        .collect();
    assert_eq!(losses, vec![2, 1, 0]);
    assert_eq!(
        log.last(),
        Some(&Event::SessionEnded {
            outcome: SessionOutcome::LivesExhausted,
            score: 0,
        })
    );
    assert_eq!(query::outcome(&world), Some(SessionOutcome::LivesExhausted));
    assert_eq!(query::tick(&world), 4);
    for heart in 0..3 {
        assert_eq!(
            query::tile(&world, Vector2D::new(heart, 5)).map(|tile| tile.glyph()),
            Some(Glyph::Empty)
        );
    }
}

#[test]
fn start_game_restores_a_finished_session() {
    let mut world = World::with_layout(&CORRIDOR, GameConfig::default()).expect("world");
    for _ in 0..4 {
        let _ = tick(&mut world);
    }
    assert!(query::is_finished(&world));

    let mut events = Vec::new();
    world::apply(&mut world, Command::StartGame, &mut events);
    assert_eq!(events, vec![Event::LevelStarted { level: 0 }]);
    assert_eq!(query::lives(&world), 3);
    assert_eq!(
        query::tile(&world, Vector2D::new(2, 5)).map(|tile| tile.glyph()),
        Some(Glyph::Heart)
    );
    assert_eq!(
        query::pursuer(&world, PursuerKind::Chaser).position(),
        Vector2D::new(3, 1)
    );
}

#[test]
fn blocked_player_start_is_rejected() {
    let error = World::with_layout(&WALLED_START, GameConfig::default())
        .expect_err("start cell is a wall");
    assert!(matches!(
        error,
        WorldError::BlockedPlacement { position } if position == Vector2D::new(0, 0)
    ));
}
