//! View — a window onto one buffer: the top visible line, the cursor, and
//! the column model used to lay the text out.
//!
//! Every motion reads the cursor, asks the [`Buffer`] for a new position,
//! and writes it back. Motions never touch the grid; the next frame's
//! [`LineRenderer`](crate::render::LineRenderer) picks the new cursor up.
//! Buffer primitives are total, so a motion at an edge of the buffer simply
//! leaves the cursor where it is.
//!
//! | Keys | Motion |
//! |------|--------|
//! | `h` `l` | [`char_prev`](View::char_prev), [`char_next`](View::char_next) |
//! | `j` `k` | [`line_down`](View::line_down), [`line_up`](View::line_up) |
//! | `w` `b` `e` | [`word_start_next`](View::word_start_next), [`word_start_prev`](View::word_start_prev), [`word_end_next`](View::word_end_next) |
//! | `W` `B` `E` | the `bigword_*` variants |
//! | `0` `$` | [`line_begin`](View::line_begin), [`line_end`](View::line_end) |
//! | `{` `}` | [`paragraph_prev`](View::paragraph_prev), [`paragraph_next`](View::paragraph_next) |

use crate::buffer::Buffer;
use crate::columns::Columns;
use crate::word::{is_space, is_word_boundary};

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// Visible window state over a [`Buffer`].
#[derive(Debug)]
pub struct View {
    buffer: Buffer,

    /// First visible buffer line (0-indexed).
    top_line: usize,

    /// Cursor byte position. Always on a char boundary inside the buffer.
    cursor: usize,

    /// Display column `j`/`k` aim for. Set by the first vertical motion in
    /// a run, cleared by every other motion, so moving through a short line
    /// does not lose the column.
    desired_col: Option<usize>,

    columns: Columns,
}

impl View {
    /// A view at the top of `buffer` with the cursor on the first byte.
    #[must_use]
    pub const fn new(buffer: Buffer, columns: Columns) -> Self {
        Self {
            buffer,
            top_line: 0,
            cursor: 0,
            desired_col: None,
            columns,
        }
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// First visible buffer line (0-indexed).
    #[inline]
    #[must_use]
    pub const fn top_line(&self) -> usize {
        self.top_line
    }

    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    #[must_use]
    pub const fn columns(&self) -> Columns {
        self.columns
    }

    /// Line the cursor is on (0-indexed).
    #[must_use]
    pub fn cursor_line(&self) -> usize {
        self.buffer.line_number(self.cursor)
    }

    /// Display column of the cursor within its line (0-indexed).
    #[must_use]
    pub fn cursor_col(&self) -> usize {
        self.buffer.line_width_get(self.cursor, self.columns)
    }

    /// Byte position of the first visible line.
    #[must_use]
    pub fn top_pos(&self) -> usize {
        self.buffer.pos_by_line_number(self.top_line)
    }

    // -- Positioning --------------------------------------------------------

    /// Move the cursor to `pos`, clamped into the buffer.
    pub fn set_cursor(&mut self, pos: usize) {
        self.cursor = self.buffer.clamp(pos);
        self.desired_col = None;
    }

    /// Move the cursor to the start of `line` (0-indexed, clamped to the
    /// last line).
    pub fn goto_line(&mut self, line: usize) {
        self.set_cursor(self.buffer.pos_by_line_number(line));
    }

    /// Set the first visible line, clamped to the last line.
    pub fn set_top_line(&mut self, line: usize) {
        self.top_line = line.min(self.buffer.line_count().saturating_sub(1));
    }

    // -- Scrolling ----------------------------------------------------------

    /// Scroll so the cursor's line lies within the `rows` visible lines.
    ///
    /// Lines are counted, not rows, so a soft-wrapped line above the cursor
    /// can still push it off the bottom. The caller re-renders with a
    /// later top line when the renderer reports the cursor was not drawn.
    pub const fn scroll_to_line(&mut self, line: usize, rows: usize) {
        if rows == 0 {
            return;
        }
        if line < self.top_line {
            self.top_line = line;
        } else if line >= self.top_line + rows {
            self.top_line = line + 1 - rows;
        }
    }

    /// [`scroll_to_line`](Self::scroll_to_line) for the cursor's line.
    pub fn scroll_to_cursor(&mut self, rows: usize) {
        self.scroll_to_line(self.cursor_line(), rows);
    }

    // -- Vertical motions ---------------------------------------------------

    /// `j`: same display column on the next line. No-op on the last line.
    pub fn line_down(&mut self) {
        let line = self.cursor_line();
        if line + 1 >= self.buffer.line_count() {
            return;
        }
        let col = self.vertical_col();
        let next = self.buffer.line_next(self.cursor);
        self.cursor = self.buffer.line_width_set(next, col, self.columns);
    }

    /// `k`: same display column on the previous line. No-op on the first
    /// line.
    pub fn line_up(&mut self) {
        if self.cursor_line() == 0 {
            return;
        }
        let col = self.vertical_col();
        let prev = self.buffer.line_prev(self.cursor);
        self.cursor = self.buffer.line_width_set(prev, col, self.columns);
    }

    fn vertical_col(&mut self) -> usize {
        match self.desired_col {
            Some(col) => col,
            None => {
                let col = self.cursor_col();
                self.desired_col = Some(col);
                col
            }
        }
    }

    // -- Horizontal motions -------------------------------------------------

    /// `h`
    pub fn char_prev(&mut self) {
        self.set_cursor(self.buffer.char_prev(self.cursor));
    }

    /// `l`
    pub fn char_next(&mut self) {
        self.set_cursor(self.buffer.char_next(self.cursor));
    }

    /// `0`
    pub fn line_begin(&mut self) {
        self.set_cursor(self.buffer.line_begin(self.cursor));
    }

    /// `$`: onto the line terminator.
    pub fn line_end(&mut self) {
        self.set_cursor(self.buffer.line_end(self.cursor));
    }

    // -- Word motions -------------------------------------------------------

    /// `w`
    pub fn word_start_next(&mut self) {
        self.set_cursor(self.buffer.customword_start_next(self.cursor, is_word_boundary));
    }

    /// `b`
    pub fn word_start_prev(&mut self) {
        self.set_cursor(self.buffer.customword_start_prev(self.cursor, is_word_boundary));
    }

    /// `e`
    pub fn word_end_next(&mut self) {
        self.set_cursor(self.buffer.customword_end_next(self.cursor, is_word_boundary));
    }

    /// `W`
    pub fn bigword_start_next(&mut self) {
        self.set_cursor(self.buffer.customword_start_next(self.cursor, is_space));
    }

    /// `B`
    pub fn bigword_start_prev(&mut self) {
        self.set_cursor(self.buffer.customword_start_prev(self.cursor, is_space));
    }

    /// `E`
    pub fn bigword_end_next(&mut self) {
        self.set_cursor(self.buffer.customword_end_next(self.cursor, is_space));
    }

    // -- Paragraph motions --------------------------------------------------

    /// `{`
    pub fn paragraph_prev(&mut self) {
        self.set_cursor(self.buffer.paragraph_prev(self.cursor));
    }

    /// `}`
    pub fn paragraph_next(&mut self) {
        self.set_cursor(self.buffer.paragraph_next(self.cursor));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
