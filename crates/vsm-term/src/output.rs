// SPDX-License-Identifier: MIT
//
// Frame output buffer.
//
// The blitter writes a whole frame (cursor moves, SGR changes, glyph bytes)
// into memory, and the frame reaches the terminal in one `write_all` when
// it is flushed. Until then nothing is visible. A flush that fails leaves
// the frame in place.

use std::io::{self, Write};

/// Bytes reserved up front. An 80×24 frame with a color change per cell
/// stays well under this.
const INITIAL_CAPACITY: usize = 16 * 1024;

/// Pending output for one frame.
pub struct OutputBuffer {
    pending: Vec<u8>,
}

impl OutputBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Everything written since the last successful flush.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.pending
    }

    /// Append a cell's glyph bytes as they are.
    #[inline]
    pub fn write_glyph(&mut self, glyph: &[u8]) {
        self.pending.extend_from_slice(glyph);
    }

    /// Hand the frame to `w` and start a new one.
    ///
    /// # Errors
    ///
    /// Returns the writer's error. The frame is kept.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        w.write_all(&self.pending)?;
        w.flush()?;
        self.pending.clear();
        Ok(())
    }

    /// [`flush_to`](Self::flush_to) stdout.
    ///
    /// # Errors
    ///
    /// Returns the error from writing stdout.
    pub fn flush_stdout(&mut self) -> io::Result<()> {
        self.flush_to(&mut io::stdout().lock())
    }
}

/// Escape sequences are written through this. `flush` is a no-op; the frame
/// only leaves through [`OutputBuffer::flush_to`].
impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}
