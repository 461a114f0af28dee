// SPDX-License-Identifier: MIT
//
// Grid — the 2D cell buffer one frame is rendered into.
//
// Design:
//
//   - Flat `Vec<Cell>` with row-major indexing: `index = y * width + x`.
//     Rows are contiguous, so the blitter's left-to-right walk is linear.
//
//   - The backing vector only ever grows. Shrinking the terminal keeps the
//     capacity around for the next time it grows; the active region is the
//     first `width × height` cells. Newly grown capacity reads as
//     `Cell::ZERO`.
//
//   - Growth uses `try_reserve_exact`. If the allocation fails, the resize
//     is dropped and the grid keeps its previous dimensions and contents:
//     a stale frame is better than rendering into a buffer of the wrong
//     shape.
//
//   - Writes go through bounds-checked accessors. The line renderer and
//     the chrome helpers below are the only writers; the blitter only reads.

use tracing::{trace, warn};

use crate::cell::{Cell, Style, glyph_len};

/// Largest accepted width, in columns.
pub const MAX_WIDTH: u16 = 1024;
/// Largest accepted height, in rows.
pub const MAX_HEIGHT: u16 = 1024;

/// A resizable row-major grid of [`Cell`]s.
///
/// ```
/// use vsm_term::cell::{Cell, Style};
/// use vsm_term::grid::Grid;
///
/// let mut grid = Grid::new(80, 24);
/// assert_eq!((grid.width(), grid.height()), (80, 24));
///
/// grid.set(5, 3, Cell::from_glyph(b"x", 1, Style::DEFAULT));
/// assert_eq!(grid.get(5, 3).unwrap().glyph(), b"x");
/// assert!(grid.get(80, 0).is_none());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Grid {
    /// A grid of zero cells. Dimensions are clamped like [`resize`](Self::resize).
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let mut grid = Self {
            width: 1,
            height: 1,
            cells: vec![Cell::ZERO],
        };
        grid.resize(width, height);
        grid
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Number of cells in the active region.
    #[inline]
    #[must_use]
    pub const fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Number of cells allocated, active or not.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    const fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// The cell at `(x, y)`, or `None` outside the active region.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// Write a cell. Returns `false` (and writes nothing) out of bounds.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        match self.get_mut(x, y) {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// The active region, row-major.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells[..self.area()]
    }

    /// The active region, one slice per row.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells().chunks_exact(usize::from(self.width))
    }

    /// The raw backing store, including capacity beyond the active region.
    #[cfg(test)]
    fn backing(&self) -> &[Cell] {
        &self.cells
    }

    // ─── Clear & Resize ──────────────────────────────────────────────────

    /// Erase the previous frame: every active cell becomes [`Cell::BLANK`].
    pub fn clear(&mut self) {
        let area = self.area();
        self.cells[..area].fill(Cell::BLANK);
    }

    /// Change the grid dimensions.
    ///
    /// Each axis is clamped to `1..=MAX`. The backing store grows when the
    /// new area needs more cells than it has (new cells are `Cell::ZERO`)
    /// and is kept as is otherwise. Returns `false` when growing failed, in
    /// which case nothing changed.
    pub fn resize(&mut self, width: u16, height: u16) -> bool {
        let width = width.clamp(1, MAX_WIDTH);
        let height = height.clamp(1, MAX_HEIGHT);
        let needed = usize::from(width) * usize::from(height);

        if needed > self.cells.len() {
            let additional = needed - self.cells.len();
            if let Err(err) = self.cells.try_reserve_exact(additional) {
                warn!(width, height, %err, "grid resize dropped");
                return false;
            }
            self.cells.resize(needed, Cell::ZERO);
        }

        trace!(width, height, capacity = self.cells.len(), "grid resized");
        self.width = width;
        self.height = height;
        true
    }

    // ─── Chrome helpers ──────────────────────────────────────────────────

    /// Fill row `y` from column `x` to the right edge with `ch`.
    pub fn draw_line(&mut self, x: u16, y: u16, ch: char, style: Style) {
        if !self.in_bounds(x, y) {
            return;
        }
        let mut enc = [0u8; 4];
        let glyph = ch.encode_utf8(&mut enc).as_bytes();
        for col in x..self.width {
            self.set(col, y, Cell::from_glyph(glyph, 1, style));
        }
    }

    /// Write `text` on row `y` starting at column `x`, one glyph per cell,
    /// until the text or the row runs out. Returns the column after the
    /// last glyph written.
    pub fn draw_string(&mut self, x: u16, y: u16, text: &str, style: Style) -> u16 {
        if !self.in_bounds(x, y) {
            return x;
        }
        let mut rest = text.as_bytes();
        let mut col = x;
        while col < self.width {
            let len = glyph_len(rest);
            if len == 0 {
                break;
            }
            let (glyph, tail) = rest.split_at(len);
            self.set(col, y, Cell::from_glyph(glyph, 1, style));
            rest = tail;
            col += 1;
        }
        col
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grid")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("capacity", &self.cells.len())
            .finish_non_exhaustive()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
