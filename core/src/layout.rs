//! Compile-time maze descriptions.

use crate::{PursuerKind, Vector2D};

/// Inclusive axis-aligned rectangle of cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Zone {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl Zone {
    /// Creates a zone spanning the inclusive column and row ranges.
    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Reports whether the position lies inside the zone, edges included.
    #[must_use]
    pub const fn contains(&self, position: Vector2D) -> bool {
        position.x() >= self.left
            && position.x() <= self.right
            && position.y() >= self.top
            && position.y() <= self.bottom
    }
}

/// Where a pursuer starts a level, where it respawns and where it scatters to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PursuerPlacement {
    /// Pursuer the placement belongs to.
    pub kind: PursuerKind,
    /// Cell occupied when a level begins.
    pub start: Vector2D,
    /// Heading held when a level begins.
    pub start_heading: Vector2D,
    /// Cell the pursuer returns to after being eaten.
    pub spawn: Vector2D,
    /// Fixed target used while scattering.
    pub scatter_corner: Vector2D,
}

/// Fixed textual maze plus the geometry the simulation needs around it.
///
/// Symbols: `#` wall, `.` collectible, `@` energizer, `o` life icon, anything
/// else is empty floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MazeLayout {
    /// One string per row, top to bottom.
    pub rows: &'static [&'static str],
    /// Declared number of columns.
    pub width: u32,
    /// Declared number of rows.
    pub height: u32,
    /// Upper bound on life icons taken from the layout.
    pub max_lives: u8,
    /// Cell the player occupies at level start and after losing a life.
    pub player_start: Vector2D,
    /// Placement of every pursuer, in update order.
    pub pursuers: [PursuerPlacement; 4],
    /// Spawn enclosure that funnels released pursuers toward `den_exit`.
    pub den: Zone,
    /// Target forced on any pursuer standing inside `den`.
    pub den_exit: Vector2D,
    /// Corridors in which pursuers may not turn upward.
    pub one_way: &'static [Zone],
}

impl MazeLayout {
    /// Placement recorded for the provided pursuer.
    #[must_use]
    pub fn placement(&self, kind: PursuerKind) -> &PursuerPlacement {
        &self.pursuers[kind.index()]
    }

    /// Reports whether pursuers are barred from heading up at the position.
    #[must_use]
    pub fn is_one_way(&self, position: Vector2D) -> bool {
        self.one_way.iter().any(|zone| zone.contains(position))
    }
}

const CLASSIC_WIDTH: i32 = 28;
const CLASSIC_HEIGHT: i32 = 36;

const CLASSIC_ROWS: [&str; 36] = [
    "                            ",
    "                            ",
    "                            ",
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#@#  #.#   #.##.#   #.#  #@#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "     #.##### ## #####.#     ",
    "     #.##          ##.#     ",
    "     #.## ###  ### ##.#     ",
    "######.## #      # ##.######",
    "      .   #      #   .      ",
    "######.## #      # ##.######",
    "     #.## ######## ##.#     ",
    "     #.##          ##.#     ",
    "     #.## ######## ##.#     ",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#@..##.......  .......##..@#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
    " ooo                        ",
    "                            ",
];

const CLASSIC_ONE_WAY: [Zone; 2] = [Zone::new(10, 14, 17, 14), Zone::new(10, 26, 17, 26)];

/// The reference 28x36 maze.
pub const CLASSIC: MazeLayout = MazeLayout {
    rows: &CLASSIC_ROWS,
    width: CLASSIC_WIDTH as u32,
    height: CLASSIC_HEIGHT as u32,
    max_lives: 3,
    player_start: Vector2D::new(13, CLASSIC_HEIGHT - 10),
    pursuers: [
        PursuerPlacement {
            kind: PursuerKind::Chaser,
            start: Vector2D::new(13, 14),
            start_heading: Vector2D::new(-1, 0),
            spawn: Vector2D::new(13, 16),
            scatter_corner: Vector2D::new(CLASSIC_WIDTH - 3, 0),
        },
        PursuerPlacement {
            kind: PursuerKind::Ambusher,
            start: Vector2D::new(13, 17),
            start_heading: Vector2D::ZERO,
            spawn: Vector2D::new(13, 17),
            scatter_corner: Vector2D::new(2, 0),
        },
        PursuerPlacement {
            kind: PursuerKind::Flanker,
            start: Vector2D::new(11, 17),
            start_heading: Vector2D::ZERO,
            spawn: Vector2D::new(11, 17),
            scatter_corner: Vector2D::new(CLASSIC_WIDTH - 1, CLASSIC_HEIGHT - 2),
        },
        PursuerPlacement {
            kind: PursuerKind::Wanderer,
            start: Vector2D::new(15, 17),
            start_heading: Vector2D::ZERO,
            spawn: Vector2D::new(15, 17),
            scatter_corner: Vector2D::new(0, CLASSIC_HEIGHT - 2),
        },
    ],
    den: Zone::new(13, 16, 14, 18),
    den_exit: Vector2D::new(13, 15),
    one_way: &CLASSIC_ONE_WAY,
};
