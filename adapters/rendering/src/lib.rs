#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Maze Chase adapters.

use anyhow::Result as AnyResult;
use maze_chase_core::{Glyph, PursuerKind, TileChange};
use std::{error::Error, fmt};

/// Characters used to draw each glyph on a character grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphSet {
    /// Open floor and consumed collectibles.
    pub empty: char,
    /// Wall segments.
    pub wall: char,
    /// Uneaten points.
    pub point: char,
    /// Uneaten energizers.
    pub energizer: char,
    /// Remaining lives.
    pub heart: char,
    /// The player.
    pub player: char,
    /// Pursuers, indexed by [`PursuerKind::index`].
    pub pursuers: [char; 4],
}

impl GlyphSet {
    /// Symbols of the classic terminal maze.
    pub const CLASSIC: Self = Self {
        empty: ' ',
        wall: '#',
        point: '.',
        energizer: '@',
        heart: 'o',
        player: 'O',
        pursuers: ['B', 'P', 'I', 'C'],
    };

    /// Builds a set with custom pursuer letters on top of the classic symbols.
    ///
    /// Rejects letters that collide with another glyph, since the player could
    /// no longer tell the cells apart.
    pub fn with_pursuers(pursuers: [char; 4]) -> Result<Self, RenderingError> {
        let set = Self {
            pursuers,
            ..Self::CLASSIC
        };
        let symbols = set.symbols();
        for (index, symbol) in symbols.iter().enumerate() {
            if symbols[..index].contains(symbol) {
                return Err(RenderingError::AmbiguousSymbol { symbol: *symbol });
            }
        }
        Ok(set)
    }

    /// Character drawn for the glyph.
    #[must_use]
    pub const fn symbol(&self, glyph: Glyph) -> char {
        match glyph {
            Glyph::Empty => self.empty,
            Glyph::Wall => self.wall,
            Glyph::Point => self.point,
            Glyph::Energizer => self.energizer,
            Glyph::Heart => self.heart,
            Glyph::Player => self.player,
            Glyph::Pursuer(kind) => self.pursuer(kind),
        }
    }

    const fn pursuer(&self, kind: PursuerKind) -> char {
        self.pursuers[kind.index()]
    }

    fn symbols(&self) -> [char; 10] {
        let [a, b, c, d] = self.pursuers;
        [
            self.empty,
            self.wall,
            self.point,
            self.energizer,
            self.heart,
            self.player,
            a,
            b,
            c,
            d,
        ]
    }
}

impl Default for GlyphSet {
    fn default() -> Self {
        Self::CLASSIC
    }
}

/// Batch of cells handed to a presenter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Frame<'a> {
    /// Every cell of the grid in row-major order, sent when a level starts.
    Full {
        /// Number of columns.
        width: u32,
        /// Number of rows.
        height: u32,
        /// Cells in row-major order.
        cells: &'a [TileChange],
    },
    /// Cells that changed since the previous frame, in the order they changed.
    Partial(&'a [TileChange]),
}

impl<'a> Frame<'a> {
    /// Cells carried by the frame.
    #[must_use]
    pub const fn cells(&self) -> &'a [TileChange] {
        match self {
            Self::Full { cells, .. } | Self::Partial(cells) => *cells,
        }
    }

    /// Reports whether presenting the frame would draw nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.cells().is_empty()
    }
}

/// Composes a full frame into one string per row.
///
/// Cells outside the declared dimensions are ignored; cells the frame does
/// not mention stay blank.
#[must_use]
pub fn compose_rows(
    width: u32,
    height: u32,
    cells: &[TileChange],
    glyphs: &GlyphSet,
) -> Vec<String> {
    let width = width as usize;
    let mut rows = vec![vec![glyphs.empty; width]; height as usize];
    for change in cells {
        let (Ok(column), Ok(row)) = (
            usize::try_from(change.position.x()),
            usize::try_from(change.position.y()),
        ) else {
            continue;
        };
        if let Some(slot) = rows.get_mut(row).and_then(|line| line.get_mut(column)) {
            *slot = glyphs.symbol(change.glyph);
        }
    }
    rows.into_iter()
        .map(|line| line.into_iter().collect())
        .collect()
}

/// Output device capable of showing Maze Chase frames.
pub trait Presenter {
    /// Draws the frame.
    fn present(&mut self, frame: Frame<'_>) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// Two glyphs would be drawn with the same character.
    AmbiguousSymbol {
        /// Character used more than once.
        symbol: char,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AmbiguousSymbol { symbol } => {
                write!(f, "symbol {symbol:?} is assigned to more than one glyph")
            }
        }
    }
}

impl Error for RenderingError {}
