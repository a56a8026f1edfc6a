//! Tile lattice with incremental dirty-cell tracking.

use maze_chase_core::{Glyph, GridBounds, MazeLayout, TileChange, TileKind, Vector2D};

use crate::WorldError;

/// Single cell of the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    kind: TileKind,
    default_kind: TileKind,
    active: bool,
}

impl Tile {
    const fn from_kind(kind: TileKind) -> Self {
        Self {
            kind,
            default_kind: kind,
            active: true,
        }
    }

    /// What currently occupies the cell.
    #[must_use]
    pub const fn kind(&self) -> TileKind {
        self.kind
    }

    /// What the cell reverts to once vacated.
    #[must_use]
    pub const fn default_kind(&self) -> TileKind {
        self.default_kind
    }

    /// Whether a collectible or heart on this cell is still present.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Reports whether the cell holds a collectible the player can still take.
    #[must_use]
    pub const fn holds_collectible(&self) -> bool {
        self.active && matches!(self.kind, TileKind::Point | TileKind::Energizer)
    }

    /// Symbol the cell shows.
    #[must_use]
    pub const fn glyph(&self) -> Glyph {
        match self.kind {
            TileKind::Empty => Glyph::Empty,
            TileKind::Wall => Glyph::Wall,
            TileKind::Point if self.active => Glyph::Point,
            TileKind::Energizer if self.active => Glyph::Energizer,
            TileKind::Heart if self.active => Glyph::Heart,
            TileKind::Point | TileKind::Energizer | TileKind::Heart => Glyph::Empty,
            TileKind::Player => Glyph::Player,
            TileKind::Pursuer(kind) => Glyph::Pursuer(kind),
        }
    }
}

/// Fixed-size grid plus the queue of cells changed since the last flush.
#[derive(Clone, Debug)]
pub(crate) struct TileGrid {
    bounds: GridBounds,
    tiles: Vec<Tile>,
    hearts: Vec<Vector2D>,
    pending: Vec<Vector2D>,
    total_collectibles: u32,
}

impl TileGrid {
    /// Parses the layout, counting collectibles and indexing life icons in
    /// scan order.
    pub(crate) fn load(layout: &MazeLayout) -> Result<Self, WorldError> {
        let bounds = GridBounds::new(layout.width, layout.height);
        if layout.rows.len() != bounds.height() as usize {
            return Err(WorldError::LayoutHeight {
                expected: bounds.height(),
                actual: layout.rows.len(),
            });
        }

        let mut tiles = Vec::new();
        tiles.try_reserve_exact(bounds.area())?;
        let mut pending = Vec::new();
        pending.try_reserve_exact(bounds.area())?;
        let mut hearts = Vec::new();
        hearts.try_reserve_exact(usize::from(layout.max_lives))?;

        let mut total_collectibles = 0;
        for (row, line) in layout.rows.iter().enumerate() {
            let width = line.chars().count();
            if width != bounds.width() as usize {
                return Err(WorldError::LayoutWidth {
                    row,
                    expected: bounds.width(),
                    actual: width,
                });
            }

            for (column, symbol) in line.chars().enumerate() {
                let kind = match symbol {
                    '#' => TileKind::Wall,
                    '.' => TileKind::Point,
                    '@' => TileKind::Energizer,
                    'o' if hearts.len() < usize::from(layout.max_lives) => {
                        hearts.push(Vector2D::new(column as i32, row as i32));
                        TileKind::Heart
                    }
                    _ => TileKind::Empty,
                };
                if matches!(kind, TileKind::Point | TileKind::Energizer) {
                    total_collectibles += 1;
                }
                tiles.push(Tile::from_kind(kind));
            }
        }

        Ok(Self {
            bounds,
            tiles,
            hearts,
            pending,
            total_collectibles,
        })
    }

    /// Restores every cell to its default kind, reactivates it and drops any
    /// pending changes.
    pub(crate) fn reset(&mut self) {
        for tile in &mut self.tiles {
            tile.kind = tile.default_kind;
            tile.active = true;
        }
        self.pending.clear();
    }

    pub(crate) const fn bounds(&self) -> GridBounds {
        self.bounds
    }

    pub(crate) fn tile(&self, position: Vector2D) -> Option<&Tile> {
        self.bounds
            .index(position)
            .and_then(|index| self.tiles.get(index))
    }

    /// Walls and cells outside the grid both block movement.
    pub(crate) fn is_wall(&self, position: Vector2D) -> bool {
        self.tile(position)
            .map_or(true, |tile| tile.kind == TileKind::Wall)
    }

    pub(crate) const fn total_collectibles(&self) -> u32 {
        self.total_collectibles
    }

    pub(crate) fn hearts(&self) -> &[Vector2D] {
        &self.hearts
    }

    #[cfg(test)]
    pub(crate) fn pending(&self) -> &[Vector2D] {
        &self.pending
    }

    /// Marks an actor on the cell and queues it for redraw.
    pub(crate) fn set_occupant(&mut self, position: Vector2D, kind: TileKind) {
        if let Some(tile) = self.tile_mut(position) {
            if tile.default_kind == TileKind::Wall {
                return;
            }
            tile.kind = kind;
            self.pending.push(position);
        }
    }

    /// Returns the cell to its default kind and queues it for redraw.
    pub(crate) fn clear_occupant(&mut self, position: Vector2D) {
        if let Some(tile) = self.tile_mut(position) {
            tile.kind = tile.default_kind;
            self.pending.push(position);
        }
    }

    /// Consumes whatever collectible lies on the cell.
    pub(crate) fn deactivate(&mut self, position: Vector2D) {
        if let Some(tile) = self.tile_mut(position) {
            tile.active = false;
        }
    }

    /// Hides the life icon with the given index and queues it for redraw.
    pub(crate) fn deactivate_heart(&mut self, index: usize) {
        let Some(position) = self.hearts.get(index).copied() else {
            return;
        };
        if let Some(tile) = self.tile_mut(position) {
            tile.active = false;
            self.pending.push(position);
        }
    }

    /// Moves every pending change into `out` in enqueue order.
    pub(crate) fn drain_changes(&mut self, out: &mut Vec<TileChange>) {
        let bounds = self.bounds;
        let tiles = &self.tiles;
        out.extend(self.pending.drain(..).filter_map(|position| {
            let index = bounds.index(position)?;
            let tile = tiles.get(index)?;
            Some(TileChange {
                position,
                glyph: tile.glyph(),
            })
        }));
    }

    /// Every cell in row-major order.
    pub(crate) fn snapshot(&self) -> Vec<TileChange> {
        let width = self.bounds.width().max(1) as usize;
        self.tiles
            .iter()
            .enumerate()
            .map(|(index, tile)| TileChange {
                position: Vector2D::new((index % width) as i32, (index / width) as i32),
                glyph: tile.glyph(),
            })
            .collect()
    }

    fn tile_mut(&mut self, position: Vector2D) -> Option<&mut Tile> {
        let index = self.bounds.index(position)?;
        self.tiles.get_mut(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::{PursuerKind, CLASSIC};

    fn classic() -> TileGrid {
        TileGrid::load(&CLASSIC).expect("classic layout loads")
    }

    #[test]
    fn counts_points_and_energizers() {
        let grid = classic();
        assert_eq!(grid.total_collectibles(), 244);
    }

    #[test]
    fn life_icons_are_indexed_in_scan_order() {
        let grid = classic();
        assert_eq!(
            grid.hearts(),
            &[
                Vector2D::new(1, 34),
                Vector2D::new(2, 34),
                Vector2D::new(3, 34)
            ]
        );
    }

    #[test]
    fn rejects_mismatched_dimensions() {
        let short = MazeLayout {
            height: 37,
            ..CLASSIC
        };
        assert!(matches!(
            TileGrid::load(&short),
            Err(WorldError::LayoutHeight { expected: 37, .. })
        ));

        let narrow = MazeLayout {
            width: 27,
            ..CLASSIC
        };
        assert!(matches!(
            TileGrid::load(&narrow),
            Err(WorldError::LayoutWidth { row: 0, .. })
        ));
    }

    #[test]
    fn occupancy_changes_queue_one_entry_each() {
        let mut grid = classic();
        let from = Vector2D::new(1, 4);
        let to = Vector2D::new(2, 4);
        grid.set_occupant(from, TileKind::Player);
        grid.clear_occupant(from);
        grid.set_occupant(to, TileKind::Player);
        assert_eq!(grid.pending(), &[from, from, to]);

        let mut changes = Vec::new();
        grid.drain_changes(&mut changes);
        assert!(grid.pending().is_empty());
        assert_eq!(changes[1].glyph, Glyph::Point);
        assert_eq!(changes[2].glyph, Glyph::Player);
    }

    #[test]
    fn walls_are_never_overwritten() {
        let mut grid = classic();
        let wall = Vector2D::new(0, 3);
        grid.set_occupant(wall, TileKind::Pursuer(PursuerKind::Chaser));
        assert_eq!(grid.tile(wall).map(Tile::kind), Some(TileKind::Wall));
        assert!(grid.pending().is_empty());
    }

    #[test]
    fn inactive_collectibles_render_blank() {
        let mut grid = classic();
        let point = Vector2D::new(1, 4);
        grid.deactivate(point);
        let tile = grid.tile(point).copied().expect("tile in bounds");
        assert_eq!(tile.glyph(), Glyph::Empty);
        assert_eq!(tile.default_kind(), TileKind::Point);
        assert!(!tile.holds_collectible());
    }

    #[test]
    fn reset_is_idempotent() {
        let mut grid = classic();
        grid.deactivate(Vector2D::new(1, 4));
        grid.deactivate_heart(2);
        grid.set_occupant(Vector2D::new(13, 26), TileKind::Player);

        grid.reset();
        let once = grid.snapshot();
        grid.reset();
        assert_eq!(grid.snapshot(), once);
        assert!(grid.pending().is_empty());
        assert_eq!(
            grid.tile(Vector2D::new(1, 4)).map(Tile::glyph),
            Some(Glyph::Point)
        );
        assert_eq!(
            grid.tile(Vector2D::new(13, 26)).map(Tile::kind),
            Some(TileKind::Empty)
        );
        assert_eq!(
            grid.tile(Vector2D::new(3, 34)).map(Tile::glyph),
            Some(Glyph::Heart)
        );
    }

    #[test]
    fn out_of_bounds_cells_count_as_walls() {
        let grid = classic();
        assert!(grid.is_wall(Vector2D::new(-1, 0)));
        assert!(grid.is_wall(Vector2D::new(28, 0)));
        assert!(!grid.is_wall(Vector2D::new(1, 4)));
    }
}
