//! Terminal setup and the character-cell presenter.

use std::io::{self, Write};

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute, queue,
    style::Print,
    terminal::{
        disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use maze_chase_rendering::{compose_rows, Frame, GlyphSet, Presenter};

/// Raw mode and the alternate screen, restored when dropped.
#[derive(Debug)]
pub(crate) struct TerminalGuard;

impl TerminalGuard {
    /// Switches the terminal into raw mode on a cleared alternate screen.
    pub(crate) fn enter() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let guard = Self;
        execute!(io::stdout(), EnterAlternateScreen, Hide, Clear(ClearType::All))
            .context("failed to enter alternate screen")?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = execute!(io::stdout(), LeaveAlternateScreen, Show) {
            tracing::error!(?err, "failed to leave alternate screen");
        }
        if let Err(err) = disable_raw_mode() {
            tracing::error!(?err, "failed to disable raw mode");
        }
    }
}

/// Draws frames as characters at their cell coordinates.
#[derive(Debug)]
pub(crate) struct TerminalPresenter<W: Write> {
    out: W,
    glyphs: GlyphSet,
}

impl<W: Write> TerminalPresenter<W> {
    pub(crate) const fn new(out: W, glyphs: GlyphSet) -> Self {
        Self { out, glyphs }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn present(&mut self, frame: Frame<'_>) -> Result<()> {
        match frame {
            Frame::Full {
                width,
                height,
                cells,
            } => {
                let rows = compose_rows(width, height, cells, &self.glyphs);
                for (row, line) in (0_u16..).zip(rows) {
                    queue!(self.out, MoveTo(0, row), Print(line))?;
                }
            }
            Frame::Partial(cells) => {
                for change in cells {
                    let (Ok(column), Ok(row)) = (
                        u16::try_from(change.position.x()),
                        u16::try_from(change.position.y()),
                    ) else {
                        continue;
                    };
                    let symbol = self.glyphs.symbol(change.glyph);
                    queue!(self.out, MoveTo(column, row), Print(symbol))?;
                }
            }
        }
        self.out.flush().context("failed to flush terminal output")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::{Glyph, TileChange, Vector2D};

    fn change(x: i32, y: i32, glyph: Glyph) -> TileChange {
        TileChange {
            position: Vector2D::new(x, y),
            glyph,
        }
    }

    fn rendered(frame: Frame<'_>) -> String {
        let mut presenter = TerminalPresenter::new(Vec::new(), GlyphSet::CLASSIC);
        presenter.present(frame).expect("write to memory");
        String::from_utf8(presenter.into_inner()).expect("utf-8 output")
    }

    #[test]
    fn partial_frames_draw_each_cell_in_order() {
        let cells = [change(3, 1, Glyph::Empty), change(4, 1, Glyph::Player)];
        let output = rendered(Frame::Partial(&cells));
        // MoveTo is one-based on the wire.
        assert_eq!(output, "\u{1b}[2;4H \u{1b}[2;5HO");
    }

    #[test]
    fn negative_cells_are_skipped() {
        let cells = [change(-1, 0, Glyph::Wall)];
        assert!(rendered(Frame::Partial(&cells)).is_empty());
    }

    #[test]
    fn full_frames_draw_whole_rows() {
        let cells = [change(0, 0, Glyph::Wall), change(1, 1, Glyph::Point)];
        let output = rendered(Frame::Full {
            width: 2,
            height: 2,
            cells: &cells,
        });
        assert_eq!(output, "\u{1b}[1;1H# \u{1b}[2;1H .");
    }
}
