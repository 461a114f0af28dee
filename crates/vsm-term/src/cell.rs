// SPDX-License-Identifier: MIT
//
// Cell — one screen position's rendered content.
//
// A cell stores the glyph to display as raw UTF-8 bytes, not as a decoded
// codepoint. The glyph may differ from the underlying text: an expanded tab
// is a run of spaces, a newline becomes a single placeholder space. A glyph
// may also be longer than one codepoint (a base character followed by
// combining marks), which is why storage is a small byte array.
//
// Storage is bounded: at most GLYPH_CAPACITY bytes per cell. Anything longer
// is truncated at the last complete UTF-8 sequence that fits. Truncation is
// reported to the caller so it can be logged; it never fails a frame.
//
// Multi-column glyphs: the leftmost cell carries the full byte length and the
// full display width, every trailing cell has length 0 ("continuation, do not
// re-render"). The blitter skips continuation cells.

// ─── Text Attributes ─────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Text attributes stored as a compact bitfield.
    ///
    /// ```
    /// use vsm_term::cell::Attr;
    ///
    /// let status = Attr::REVERSE | Attr::BOLD;
    /// assert!(status.contains(Attr::BOLD));
    /// assert!(!status.contains(Attr::BLINK));
    /// assert!(Attr::NORMAL.is_empty());
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        /// SGR 4.
        const UNDERLINE = 1 << 0;
        /// SGR 7: swap foreground and background.
        const REVERSE   = 1 << 1;
        /// SGR 5.
        const BLINK     = 1 << 2;
        /// SGR 1.
        const BOLD      = 1 << 3;
        /// SGR 3.
        const ITALIC    = 1 << 4;
    }
}

impl Attr {
    /// No attributes.
    pub const NORMAL: Self = Self::empty();
}

// ─── Logical Color ───────────────────────────────────────────────────────────

/// A logical color: a palette index or the terminal's own default.
///
/// The palette index is not checked against the terminal's color count
/// here. The color-pair allocator clamps indices the terminal cannot show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellColor {
    /// Use whatever the terminal considers its default color.
    #[default]
    Default,
    /// Palette index `0..colors`.
    Indexed(u16),
}

/// The eight basic ANSI palette entries.
impl CellColor {
    pub const BLACK: Self = Self::Indexed(0);
    pub const RED: Self = Self::Indexed(1);
    pub const GREEN: Self = Self::Indexed(2);
    pub const YELLOW: Self = Self::Indexed(3);
    pub const BLUE: Self = Self::Indexed(4);
    pub const MAGENTA: Self = Self::Indexed(5);
    pub const CYAN: Self = Self::Indexed(6);
    pub const WHITE: Self = Self::Indexed(7);
}

// ─── Style ───────────────────────────────────────────────────────────────────

/// Attribute bits plus a logical foreground/background pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub attr: Attr,
    pub fg: CellColor,
    pub bg: CellColor,
}

impl Style {
    /// Terminal-default colors, no attributes.
    pub const DEFAULT: Self = Self {
        attr: Attr::NORMAL,
        fg: CellColor::Default,
        bg: CellColor::Default,
    };

    /// Default colors with the given attributes.
    #[inline]
    #[must_use]
    pub const fn attr(attr: Attr) -> Self {
        Self {
            attr,
            fg: CellColor::Default,
            bg: CellColor::Default,
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_fg(self, fg: CellColor) -> Self {
        Self { fg, ..self }
    }

    #[inline]
    #[must_use]
    pub const fn with_bg(self, bg: CellColor) -> Self {
        Self { bg, ..self }
    }
}

// ─── UTF-8 helpers ───────────────────────────────────────────────────────────

/// Whether `byte` starts a UTF-8 sequence (anything but a `10xxxxxx`
/// continuation byte).
#[inline]
#[must_use]
pub const fn is_utf8_lead(byte: u8) -> bool {
    byte & 0xC0 != 0x80
}

/// Length of the glyph starting at `bytes[0]`: the distance to the next
/// UTF-8 lead byte, or to the end of the slice.
///
/// Returns 0 only for an empty slice. Callers treat 0 as end of input.
#[must_use]
pub fn glyph_len(bytes: &[u8]) -> usize {
    if bytes.is_empty() {
        return 0;
    }
    let mut next = 1;
    while next < bytes.len() && !is_utf8_lead(bytes[next]) {
        next += 1;
    }
    next
}

// ─── Cell ────────────────────────────────────────────────────────────────────

/// Maximum number of glyph bytes stored per cell.
pub const GLYPH_CAPACITY: usize = 16;

/// U+FFFD, drawn in place of anything that cannot be shown as it is.
pub const REPLACEMENT: &[u8] = "\u{FFFD}".as_bytes();

/// One screen position: glyph bytes, byte length, display width, style.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    glyph: [u8; GLYPH_CAPACITY],
    len: u8,
    width: u8,
    pub style: Style,
}

impl Cell {
    /// Zero-initialized cell: no glyph, no width, default style.
    ///
    /// Freshly grown grid capacity reads as this.
    pub const ZERO: Self = Self {
        glyph: [0; GLYPH_CAPACITY],
        len: 0,
        width: 0,
        style: Style::DEFAULT,
    };

    /// A single space in the default style. What `Grid::clear` writes.
    pub const BLANK: Self = Self::blank(Style::DEFAULT);

    /// A single space in `style`.
    #[must_use]
    pub const fn blank(style: Style) -> Self {
        let mut glyph = [0; GLYPH_CAPACITY];
        glyph[0] = b' ';
        Self {
            glyph,
            len: 1,
            width: 1,
            style,
        }
    }

    /// A trailing cell of a multi-column glyph.
    #[must_use]
    pub const fn continuation(style: Style) -> Self {
        Self {
            glyph: [0; GLYPH_CAPACITY],
            len: 0,
            width: 0,
            style,
        }
    }

    /// Build a cell from glyph bytes. See [`set_glyph`](Self::set_glyph).
    #[must_use]
    pub fn from_glyph(bytes: &[u8], width: u8, style: Style) -> Self {
        let mut cell = Self::ZERO;
        cell.set_glyph(bytes, width, style);
        cell
    }

    /// Store `bytes` as this cell's glyph.
    ///
    /// At most [`GLYPH_CAPACITY`] bytes are kept. When the glyph is longer,
    /// it is cut back to the last UTF-8 lead byte that still fits, so the
    /// stored bytes never end in a partial sequence. A span with no such
    /// point (one lead byte followed by more stray continuation bytes than
    /// fit) is stored as [`REPLACEMENT`], so the cell never reads as a
    /// continuation. Returns `false` when truncation happened.
    pub fn set_glyph(&mut self, bytes: &[u8], width: u8, style: Style) -> bool {
        let mut len = bytes.len().min(GLYPH_CAPACITY);
        let fits = len == bytes.len();
        let mut bytes = bytes;
        if !fits {
            // bytes[len] is the first byte that did not fit. If it is a
            // continuation byte, back off to the start of its sequence.
            while len > 0 && !is_utf8_lead(bytes[len]) {
                len -= 1;
            }
            if len == 0 {
                bytes = REPLACEMENT;
                len = REPLACEMENT.len();
            }
        }
        self.glyph = [0; GLYPH_CAPACITY];
        self.glyph[..len].copy_from_slice(&bytes[..len]);
        // len <= GLYPH_CAPACITY (16), fits in u8.
        #[allow(clippy::cast_possible_truncation)]
        let len = len as u8;
        self.len = len;
        self.width = width;
        self.style = style;
        fits
    }

    /// The stored glyph bytes. Empty for continuation and zero cells.
    #[inline]
    #[must_use]
    pub fn glyph(&self) -> &[u8] {
        &self.glyph[..usize::from(self.len)]
    }

    /// Byte length of the glyph.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Whether the cell holds no glyph bytes.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Display width in terminal columns.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u8 {
        self.width
    }

    /// Whether this cell trails a multi-column glyph (or was never written).
    #[inline]
    #[must_use]
    pub const fn is_continuation(&self) -> bool {
        self.len == 0
    }
}

impl Default for Cell {
    #[inline]
    fn default() -> Self {
        Self::ZERO
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_continuation() {
            return write!(f, "Cell(continuation)");
        }
        let text = String::from_utf8_lossy(self.glyph());
        write!(f, "Cell({text:?}")?;
        if self.width != 1 {
            write!(f, ", width={}", self.width)?;
        }
        if self.style != Style::DEFAULT {
            write!(f, ", {:?}", self.style)?;
        }
        write!(f, ")")
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
