// SPDX-License-Identifier: MIT
//
// Style table — named styles looked up by a small style id.
//
// The table has one slot per lexer style (pre-assigned by whatever produces
// syntax information) followed by one slot per piece of editor chrome. It is
// built once at startup, optionally customized with `with`, and read-only
// from then on. Lookups are an array index.

use crate::cell::{Attr, Style};

/// Number of style slots reserved for lexer-assigned styles.
pub const LEXER_STYLES: usize = 64;

/// A style id: a lexer slot or a piece of editor chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleId {
    /// Lexer-assigned style `0..LEXER_STYLES`.
    Lexer(u8),
    /// Plain text.
    Default,
    /// A secondary cursor.
    Cursor,
    /// The primary cursor.
    CursorPrimary,
    CursorLine,
    Selection,
    LineNumber,
    LineNumberCursor,
    ColorColumn,
    /// Status bar of an unfocused window.
    Status,
    /// Status bar of the focused window.
    StatusFocused,
    Separator,
    /// The bottom info/message line.
    Info,
    /// Filler past the end of the buffer.
    Eof,
}

impl StyleId {
    /// Every chrome id, in table order.
    pub const CHROME: [Self; 13] = [
        Self::Default,
        Self::Cursor,
        Self::CursorPrimary,
        Self::CursorLine,
        Self::Selection,
        Self::LineNumber,
        Self::LineNumberCursor,
        Self::ColorColumn,
        Self::Status,
        Self::StatusFocused,
        Self::Separator,
        Self::Info,
        Self::Eof,
    ];

    /// Table index of this id.
    ///
    /// A lexer id outside `0..LEXER_STYLES` is a programming error; debug
    /// builds assert, release builds fold it onto the last lexer slot.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Lexer(n) => {
                let n = usize::from(n);
                debug_assert!(n < LEXER_STYLES, "lexer style {n} out of range");
                n.min(LEXER_STYLES - 1)
            }
            Self::Default => LEXER_STYLES,
            Self::Cursor => LEXER_STYLES + 1,
            Self::CursorPrimary => LEXER_STYLES + 2,
            Self::CursorLine => LEXER_STYLES + 3,
            Self::Selection => LEXER_STYLES + 4,
            Self::LineNumber => LEXER_STYLES + 5,
            Self::LineNumberCursor => LEXER_STYLES + 6,
            Self::ColorColumn => LEXER_STYLES + 7,
            Self::Status => LEXER_STYLES + 8,
            Self::StatusFocused => LEXER_STYLES + 9,
            Self::Separator => LEXER_STYLES + 10,
            Self::Info => LEXER_STYLES + 11,
            Self::Eof => LEXER_STYLES + 12,
        }
    }
}

/// Total number of table slots.
pub const STYLE_COUNT: usize = LEXER_STYLES + StyleId::CHROME.len();

/// Fixed-size table of styles indexed by [`StyleId`].
///
/// ```
/// use vsm_term::cell::Attr;
/// use vsm_term::style::{StyleId, StyleTable};
///
/// let styles = StyleTable::new();
/// assert!(styles.style_of(StyleId::Cursor).attr.contains(Attr::REVERSE));
/// assert_eq!(styles.style_of(StyleId::Default).attr, Attr::NORMAL);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleTable {
    styles: [Style; STYLE_COUNT],
}

impl StyleTable {
    /// Every slot gets terminal-default colors and no attributes, then the
    /// chrome styles get their attribute bits.
    #[must_use]
    pub fn new() -> Self {
        let mut styles = [Style::DEFAULT; STYLE_COUNT];
        let mut add = |id: StyleId, attr: Attr| styles[id.index()].attr |= attr;

        add(StyleId::Cursor, Attr::REVERSE);
        add(StyleId::CursorPrimary, Attr::REVERSE | Attr::BLINK);
        add(StyleId::Selection, Attr::REVERSE);
        add(StyleId::ColorColumn, Attr::REVERSE);
        add(StyleId::Status, Attr::REVERSE);
        add(StyleId::StatusFocused, Attr::REVERSE | Attr::BOLD);
        add(StyleId::Info, Attr::BOLD);

        Self { styles }
    }

    /// Replace one entry. Meant for startup customization (lexer colors);
    /// the table is not mutated once rendering begins.
    #[must_use]
    pub fn with(mut self, id: StyleId, style: Style) -> Self {
        self.styles[id.index()] = style;
        self
    }

    /// Look up a style. O(1), total.
    #[inline]
    #[must_use]
    pub fn style_of(&self, id: StyleId) -> Style {
        self.styles[id.index()]
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellColor;
    use pretty_assertions::assert_eq;

    #[test]
    fn indices_are_dense_and_unique() {
        let mut seen = vec![false; STYLE_COUNT];
        for n in 0..LEXER_STYLES {
            #[allow(clippy::cast_possible_truncation)]
            let idx = StyleId::Lexer(n as u8).index();
            assert!(!seen[idx]);
            seen[idx] = true;
        }
        for id in StyleId::CHROME {
            let idx = id.index();
            assert!(!seen[idx], "{id:?} collides");
            seen[idx] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn lexer_slots_default_to_plain_text() {
        let styles = StyleTable::new();
        assert_eq!(styles.style_of(StyleId::Lexer(0)), Style::DEFAULT);
        assert_eq!(styles.style_of(StyleId::Lexer(63)), Style::DEFAULT);
    }

    #[test]
    fn chrome_attributes() {
        let styles = StyleTable::new();
        let attr = |id| styles.style_of(id).attr;

        assert_eq!(attr(StyleId::Default), Attr::NORMAL);
        assert_eq!(attr(StyleId::Cursor), Attr::REVERSE);
        assert_eq!(attr(StyleId::CursorPrimary), Attr::REVERSE | Attr::BLINK);
        assert_eq!(attr(StyleId::Selection), Attr::REVERSE);
        assert_eq!(attr(StyleId::ColorColumn), Attr::REVERSE);
        assert_eq!(attr(StyleId::Status), Attr::REVERSE);
        assert_eq!(attr(StyleId::StatusFocused), Attr::REVERSE | Attr::BOLD);
        assert_eq!(attr(StyleId::Info), Attr::BOLD);
        assert_eq!(attr(StyleId::LineNumber), Attr::NORMAL);
        assert_eq!(attr(StyleId::Eof), Attr::NORMAL);
    }

    #[test]
    fn chrome_uses_terminal_default_colors() {
        let styles = StyleTable::new();
        for id in StyleId::CHROME {
            let s = styles.style_of(id);
            assert_eq!(s.fg, CellColor::Default);
            assert_eq!(s.bg, CellColor::Default);
        }
    }

    #[test]
    fn with_overrides_a_single_entry() {
        let keyword = Style::attr(Attr::BOLD).with_fg(CellColor::YELLOW);
        let styles = StyleTable::new().with(StyleId::Lexer(3), keyword);
        assert_eq!(styles.style_of(StyleId::Lexer(3)), keyword);
        assert_eq!(styles.style_of(StyleId::Lexer(4)), Style::DEFAULT);
        assert_eq!(styles, StyleTable::new().with(StyleId::Lexer(3), keyword));
    }
}
