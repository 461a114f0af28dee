//! Line renderer — lays one screenful of buffer text into a [`Grid`].
//!
//! Starting at the view's top line, the renderer fetches up to
//! `cols × rows × 4` bytes (enough for every cell to hold a four-byte
//! glyph) and walks them glyph by glyph, left to right and top to bottom:
//!
//! | Source | Cells |
//! |--------|-------|
//! | `\n` or `\r\n` | one blank placeholder, then column 0 of the next row |
//! | `\t` | blanks up to the next tab stop, clipped at the right edge |
//! | other control character | one U+FFFD cell |
//! | other glyph | one cell, plus continuation cells when the column model says it is wide |
//!
//! A glyph is the span from one UTF-8 lead byte to the next. The glyph
//! starting at the cursor gets [`StyleId::Cursor`]; everything else gets
//! whatever style the caller assigns to its byte position.
//!
//! Text past the right edge soft-wraps onto the next row. The last grid row
//! is never written; it belongs to the info line ([`draw_info`]). Rendering
//! stops at the end of the text, at the row limit, or at a span that is not
//! valid UTF-8, whichever comes first.
//!
//! The renderer never clears the grid. The frame loop clears it before
//! painting, and rendering the same view into a cleared grid always yields
//! the same cells.

use tracing::{debug, trace};
use vsm_term::cell::{Cell, REPLACEMENT, glyph_len};
use vsm_term::grid::Grid;
use vsm_term::style::{StyleId, StyleTable};

use crate::columns::Columns;
use crate::view::View;

/// Worst-case UTF-8 bytes per cell.
const BYTES_PER_CELL: usize = 4;

// ---------------------------------------------------------------------------
// RenderOutcome
// ---------------------------------------------------------------------------

/// What one render pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOutcome {
    /// Whether a cell carries the cursor style. `false` means the cursor is
    /// above or below the rendered window.
    pub cursor_drawn: bool,

    /// Source bytes laid out, counted from the top line.
    pub bytes_consumed: usize,
}

// ---------------------------------------------------------------------------
// LineRenderer
// ---------------------------------------------------------------------------

/// Fills a grid from a [`View`]. Holds on to its fetch buffer between
/// frames.
#[derive(Debug, Default)]
pub struct LineRenderer {
    fetch: Vec<u8>,
}

impl LineRenderer {
    #[must_use]
    pub const fn new() -> Self {
        Self { fetch: Vec::new() }
    }

    /// Render `view` with every byte in [`StyleId::Default`].
    pub fn render(&mut self, view: &View, grid: &mut Grid, styles: &StyleTable) -> RenderOutcome {
        self.render_with(view, grid, styles, |_| StyleId::Default)
    }

    /// Render `view`, asking `style_at` for the style of the glyph starting
    /// at each absolute byte position (a lexer's pre-assigned style, say).
    /// The cursor style overrides it.
    pub fn render_with(
        &mut self,
        view: &View,
        grid: &mut Grid,
        styles: &StyleTable,
        style_at: impl FnMut(usize) -> StyleId,
    ) -> RenderOutcome {
        let rows = grid.height().saturating_sub(1);
        if rows == 0 {
            return RenderOutcome::default();
        }

        let wanted = usize::from(grid.width()) * usize::from(rows) * BYTES_PER_CELL;
        self.fetch.resize(wanted, 0);

        let buffer = view.buffer();
        let base = view.top_pos();
        let len = buffer.bytes_get(base, &mut self.fetch);

        let source = Source {
            text: &self.fetch[..len],
            base,
            cursor: view.cursor(),
            columns: view.columns(),
            ends_buffer: base + len >= buffer.len(),
        };
        layout(&source, grid, rows, styles, style_at)
    }
}

/// Draw `message` on the bottom row in the info style, over a row of blanks
/// in the same style.
pub fn draw_info(grid: &mut Grid, styles: &StyleTable, message: &str) {
    let y = grid.height().saturating_sub(1);
    let style = styles.style_of(StyleId::Info);
    grid.draw_line(0, y, ' ', style);
    grid.draw_string(0, y, message, style);
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Text fetched for one pass, and where it sits in the buffer.
struct Source<'a> {
    text: &'a [u8],
    /// Buffer position of `text[0]`.
    base: usize,
    cursor: usize,
    columns: Columns,
    /// Whether `text` runs to the end of the buffer. Only then can a cursor
    /// just past the text be drawn.
    ends_buffer: bool,
}

fn layout(
    src: &Source<'_>,
    grid: &mut Grid,
    rows: u16,
    styles: &StyleTable,
    mut style_at: impl FnMut(usize) -> StyleId,
) -> RenderOutcome {
    let width = grid.width();
    let blank = |id| Cell::blank(styles.style_of(id));

    let (mut x, mut y) = (0u16, 0u16);
    let mut off = 0;
    let mut cursor_drawn = false;

    loop {
        if x >= width {
            x = 0;
            y += 1;
        }
        if y >= rows {
            break;
        }

        let len = glyph_len(&src.text[off..]);
        if len == 0 {
            if src.ends_buffer && src.base + off == src.cursor {
                grid.set(x, y, blank(StyleId::Cursor));
                cursor_drawn = true;
            }
            break;
        }
        let glyph = &src.text[off..off + len];
        let Some(ch) = std::str::from_utf8(glyph).ok().and_then(|s| s.chars().next()) else {
            debug!(pos = src.base + off, len, "malformed text, render stopped");
            break;
        };

        // `\r\n` lays out as a single `\n`.
        let crlf = ch == '\r' && src.text.get(off + 1) == Some(&b'\n');
        let (ch, len) = if crlf { ('\n', 2) } else { (ch, len) };

        let w = match ch {
            '\n' | '\t' => 1,
            _ => u16::try_from(src.columns.glyph_width(ch)).unwrap_or(1),
        };
        if x > 0 && x + w > width {
            // Wide glyph at the edge: wrap it whole.
            x = width;
            continue;
        }

        let pos = src.base + off;
        let id = if (pos..pos + len).contains(&src.cursor) {
            cursor_drawn = true;
            StyleId::Cursor
        } else {
            style_at(pos)
        };
        let style = styles.style_of(id);

        match ch {
            '\n' => {
                grid.set(x, y, Cell::blank(style));
                x = 0;
                y += 1;
            }
            '\t' => {
                let room = width - x;
                let n = src.columns.tab_at(usize::from(x));
                let n = u16::try_from(n).map_or(room, |n| n.min(room));
                for col in x..x + n {
                    grid.set(col, y, Cell::blank(style));
                }
                x += n;
            }
            c if c.is_control() => {
                grid.set(x, y, Cell::from_glyph(REPLACEMENT, 1, style));
                x += 1;
            }
            _ => {
                let w = w.min(width - x);
                let cell = Cell::from_glyph(glyph, u8::try_from(w).unwrap_or(1), style);
                if cell.len() < glyph.len() {
                    trace!(pos, len, "glyph truncated");
                }
                grid.set(x, y, cell);
                for col in x + 1..x + w {
                    grid.set(col, y, Cell::continuation(style));
                }
                x += w;
            }
        }
        off += len;
    }

    RenderOutcome {
        cursor_drawn,
        bytes_consumed: off,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
