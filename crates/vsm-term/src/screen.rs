// SPDX-License-Identifier: MIT
//
// Screen — the blitter. The only component that produces terminal output.
//
// One `blit` walks the grid row by row, left to right. For every cell it
// resolves the style to an attribute word (attribute bits plus a color-pair
// slot from the allocator), switches the terminal's rendition if that changed,
// and writes the glyph bytes. Nothing reaches the terminal until `flush`,
// which happens once per frame.
//
// Positioning: each row starts with an explicit CUP. Inside a row the
// terminal's own cursor advance is trusted only after single-byte glyphs.
// After anything wider (multibyte text, whose on-screen width is the
// terminal's call) or a skipped continuation cell, the next glyph gets its own
// CUP so it lands on its cell whatever the terminal did.
//
// Glyph bytes are the only text that reaches the terminal unescaped, so a
// glyph carrying a control character (C0, DEL, or C1) goes out as U+FFFD.

use std::io::{self, Write};
use std::time::Instant;

use tracing::trace;

use crate::ansi;
use crate::cell::{Attr, CellColor, REPLACEMENT, Style};
use crate::grid::Grid;
use crate::output::OutputBuffer;
use crate::pairs::{AnsiPalette, ColorPairs, PairSlot};

/// A style as the terminal sees it: attribute bits and a pair slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttrWord {
    pub attr: Attr,
    pub pair: PairSlot,
}

/// Rendition currently in effect on the terminal.
type Rendition = (Attr, CellColor, CellColor);

/// Owns everything between a finished grid and the terminal: the pair
/// driver, the pair allocator, and the pending-output buffer.
pub struct Screen {
    out: OutputBuffer,
    palette: AnsiPalette,
    pairs: ColorPairs,
}

impl Screen {
    /// A screen drawing through `palette`.
    #[must_use]
    pub fn new(palette: AnsiPalette) -> Self {
        Self {
            out: OutputBuffer::new(),
            palette,
            pairs: ColorPairs::new(),
        }
    }

    /// A screen whose palette depth comes from the environment.
    #[must_use]
    pub fn detect() -> Self {
        Self::new(AnsiPalette::detect())
    }

    #[inline]
    #[must_use]
    pub const fn palette(&self) -> &AnsiPalette {
        &self.palette
    }

    #[inline]
    #[must_use]
    pub const fn pairs(&self) -> &ColorPairs {
        &self.pairs
    }

    /// Output accumulated since the last flush.
    #[inline]
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        self.out.as_bytes()
    }

    /// Resolve `style` to the attribute word the terminal is given.
    pub fn attr_of(&mut self, style: Style) -> AttrWord {
        AttrWord {
            attr: style.attr,
            pair: self.pairs.get(&mut self.palette, style.fg, style.bg),
        }
    }

    /// Queue the whole grid for output.
    ///
    /// # Errors
    ///
    /// Only writer errors, which an in-memory buffer does not produce.
    pub fn blit(&mut self, grid: &Grid) -> io::Result<()> {
        let started = Instant::now();
        ansi::begin_sync(&mut self.out)?;

        let mut current: Option<Rendition> = None;
        for (y, row) in (0u16..).zip(grid.rows()) {
            let mut placed = false;
            for (x, cell) in (0u16..).zip(row) {
                if cell.is_continuation() {
                    placed = false;
                    continue;
                }
                if !placed {
                    ansi::cursor_to(&mut self.out, x, y)?;
                }

                let word = self.attr_of(cell.style);
                let (fg, bg) = self.palette.pair(word.pair);
                let rendition = (word.attr, fg, bg);
                if current != Some(rendition) {
                    ansi::sgr(&mut self.out, word.attr, fg, bg)?;
                    current = Some(rendition);
                }

                let glyph = cell.glyph();
                if is_printable(glyph) {
                    self.out.write_glyph(glyph);
                    placed = glyph.len() == 1;
                } else {
                    trace!(x, y, ?glyph, "control glyph replaced");
                    self.out.write_glyph(REPLACEMENT);
                    placed = false;
                }
            }
        }

        ansi::reset(&mut self.out)?;
        ansi::end_sync(&mut self.out)?;
        trace!(
            bytes = self.out.len(),
            elapsed_us = started.elapsed().as_micros(),
            "frame blitted"
        );
        Ok(())
    }

    /// Write the pending frame to `w`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        self.out.flush_to(w)
    }

    /// Write the pending frame to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush_stdout()
    }

    /// Forget every pair mapping. [`EventLoop::run`](crate::event_loop::EventLoop::run)
    /// does this at the start of each terminal session.
    pub fn reset_pairs(&mut self) {
        self.pairs.reset();
    }
}

/// Whether `glyph` is free of bytes the terminal would act on: C0 controls,
/// DEL, and C1 controls (U+0080..U+009F, encoded `C2 80`..`C2 9F`).
fn is_printable(glyph: &[u8]) -> bool {
    !glyph.iter().any(|&b| b < 0x20 || b == 0x7F)
        && !glyph.windows(2).any(|w| w[0] == 0xC2 && (0x80..=0x9F).contains(&w[1]))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
