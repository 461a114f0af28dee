//! Column model — how many terminal columns a character takes.
//!
//! One model is shared by the line renderer (which lays glyphs into cells)
//! and the buffer's `line_width_get` / `line_width_set` (which keep the
//! cursor's column across `j` / `k`), so the two always agree.
//!
//! - A tab advances to the next multiple of the tab width.
//! - Every other character takes one column, unless `wide_glyphs` is on, in
//!   which case it takes its Unicode display width (at least one). Off is
//!   the single-cell-per-glyph layout; on lets CJK and emoji occupy the two
//!   cells a terminal draws them in.
//! - Control characters take one column; the renderer shows them as U+FFFD.

use unicode_width::UnicodeWidthChar;

/// Smallest accepted tab width.
pub const MIN_TAB_WIDTH: usize = 1;
/// Largest accepted tab width.
pub const MAX_TAB_WIDTH: usize = 32;
/// Tab width when none is configured.
pub const DEFAULT_TAB_WIDTH: usize = 8;

/// Display-width rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Columns {
    tab_width: usize,
    wide_glyphs: bool,
}

impl Columns {
    /// `tab_width` is clamped to `1..=32`.
    #[must_use]
    pub fn new(tab_width: usize, wide_glyphs: bool) -> Self {
        Self {
            tab_width: tab_width.clamp(MIN_TAB_WIDTH, MAX_TAB_WIDTH),
            wide_glyphs,
        }
    }

    #[inline]
    #[must_use]
    pub const fn tab_width(self) -> usize {
        self.tab_width
    }

    #[inline]
    #[must_use]
    pub const fn wide_glyphs(self) -> bool {
        self.wide_glyphs
    }

    /// Cells a tab starting at column `col` expands to.
    #[inline]
    #[must_use]
    pub const fn tab_at(self, col: usize) -> usize {
        self.tab_width - col % self.tab_width
    }

    /// Columns a non-tab character occupies.
    #[must_use]
    pub fn glyph_width(self, ch: char) -> usize {
        if self.wide_glyphs && !ch.is_control() {
            ch.width().unwrap_or(1).max(1)
        } else {
            1
        }
    }

    /// Columns `ch` occupies when it starts at column `col`.
    #[must_use]
    pub fn width_at(self, col: usize, ch: char) -> usize {
        if ch == '\t' {
            self.tab_at(col)
        } else {
            self.glyph_width(ch)
        }
    }
}

impl Default for Columns {
    fn default() -> Self {
        Self::new(DEFAULT_TAB_WIDTH, false)
    }
}
