// SPDX-License-Identifier: MIT
//
// ANSI encoding of the few terminal commands vsm needs.
//
// Stateless writers over any `impl Write`. Deciding when to emit what is
// the `Screen`'s business; this module only knows the bytes. Coordinates
// are 0-indexed here and 1-indexed on the wire.

use std::io::{self, Write};

use crate::cell::{Attr, CellColor};

/// Set (`h`) or reset (`l`) a DEC private mode.
fn dec_mode(w: &mut impl Write, mode: u16, on: bool) -> io::Result<()> {
    write!(w, "\x1b[?{mode}{}", if on { 'h' } else { 'l' })
}

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// CUP to column `x`, row `y`.
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

/// DECTCEM off.
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    dec_mode(w, 25, false)
}

/// DECTCEM on.
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    dec_mode(w, 25, true)
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// ED 2: erase the whole display.
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// SGR 0.
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

// ─── Graphic Rendition ───────────────────────────────────────────────────────

/// SGR parameters in the order they are emitted.
const ATTR_CODES: [(Attr, u8); 5] = [
    (Attr::BOLD, 1),
    (Attr::ITALIC, 3),
    (Attr::UNDERLINE, 4),
    (Attr::BLINK, 5),
    (Attr::REVERSE, 7),
];

/// One color parameter. `base` is 30 for foreground, 40 for background:
/// `base + n` for the eight basic colors, `base + 60 + n` for their bright
/// variants, `base + 8;5;n` beyond, `base + 9` for the default.
fn color_param(w: &mut impl Write, base: u16, color: CellColor) -> io::Result<()> {
    match color {
        CellColor::Default => write!(w, ";{}", base + 9),
        CellColor::Indexed(n @ 0..=7) => write!(w, ";{}", base + n),
        CellColor::Indexed(n @ 8..=15) => write!(w, ";{}", base + 60 + n - 8),
        CellColor::Indexed(n) => write!(w, ";{};5;{}", base + 8, n.min(255)),
    }
}

/// The complete rendition in one sequence: reset, attributes, foreground,
/// background. `\x1b[0;1;7;31;49m` is bold reverse red on default.
pub fn sgr(w: &mut impl Write, attr: Attr, fg: CellColor, bg: CellColor) -> io::Result<()> {
    w.write_all(b"\x1b[0")?;
    for (flag, code) in ATTR_CODES {
        if attr.contains(flag) {
            write!(w, ";{code}")?;
        }
    }
    color_param(w, 30, fg)?;
    color_param(w, 40, bg)?;
    w.write_all(b"m")
}

// ─── Modes ───────────────────────────────────────────────────────────────────

/// Mode 2026: hold drawing until [`end_sync`] so a frame never shows
/// half-written.
#[inline]
pub fn begin_sync(w: &mut impl Write) -> io::Result<()> {
    dec_mode(w, 2026, true)
}

#[inline]
pub fn end_sync(w: &mut impl Write) -> io::Result<()> {
    dec_mode(w, 2026, false)
}

/// Mode 1049: switch to the alternate screen.
#[inline]
pub fn enter_alt_screen(w: &mut impl Write) -> io::Result<()> {
    dec_mode(w, 1049, true)
}

/// Back to the normal screen and its saved contents.
#[inline]
pub fn exit_alt_screen(w: &mut impl Write) -> io::Result<()> {
    dec_mode(w, 1049, false)
}

/// DECCKM and DECKPAM: cursor and keypad keys send application sequences.
#[inline]
pub fn enable_keypad(w: &mut impl Write) -> io::Result<()> {
    dec_mode(w, 1, true)?;
    w.write_all(b"\x1b=")
}

/// DECCKM off, DECKPNM.
#[inline]
pub fn disable_keypad(w: &mut impl Write) -> io::Result<()> {
    dec_mode(w, 1, false)?;
    w.write_all(b"\x1b>")
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Helper: run an ANSI function and return its output as a string.
    fn emit<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    // ── Cursor ──────────────────────────────────────────────────────────

    #[test]
    fn cursor_to_origin() {
        assert_eq!(emit(|w| cursor_to(w, 0, 0)), "\x1b[1;1H");
    }

    #[test]
    fn cursor_to_is_row_then_column() {
        assert_eq!(emit(|w| cursor_to(w, 9, 4)), "\x1b[5;10H");
    }

    #[test]
    fn cursor_to_max_coordinates_do_not_overflow() {
        assert_eq!(emit(|w| cursor_to(w, u16::MAX, u16::MAX)), "\x1b[65536;65536H");
    }

    #[test]
    fn cursor_visibility() {
        assert_eq!(emit(|w| cursor_hide(w)), "\x1b[?25l");
        assert_eq!(emit(|w| cursor_show(w)), "\x1b[?25h");
    }

    // ── SGR ─────────────────────────────────────────────────────────────

    #[test]
    fn sgr_plain_default() {
        assert_eq!(
            emit(|w| sgr(w, Attr::NORMAL, CellColor::Default, CellColor::Default)),
            "\x1b[0;39;49m"
        );
    }

    #[test]
    fn sgr_attributes_in_fixed_order() {
        let attr = Attr::REVERSE | Attr::BOLD | Attr::BLINK;
        assert_eq!(
            emit(|w| sgr(w, attr, CellColor::Default, CellColor::Default)),
            "\x1b[0;1;5;7;39;49m"
        );
    }

    #[test]
    fn sgr_basic_colors() {
        assert_eq!(
            emit(|w| sgr(w, Attr::NORMAL, CellColor::RED, CellColor::BLUE)),
            "\x1b[0;31;44m"
        );
    }

    #[test]
    fn sgr_bright_colors() {
        assert_eq!(
            emit(|w| sgr(w, Attr::NORMAL, CellColor::Indexed(9), CellColor::Indexed(15))),
            "\x1b[0;91;107m"
        );
    }

    #[test]
    fn sgr_extended_colors() {
        assert_eq!(
            emit(|w| sgr(w, Attr::UNDERLINE, CellColor::Indexed(196), CellColor::Indexed(236))),
            "\x1b[0;4;38;5;196;48;5;236m"
        );
    }

    // ── Modes ───────────────────────────────────────────────────────────

    #[test]
    fn sync_and_alt_screen() {
        assert_eq!(emit(|w| begin_sync(w)), "\x1b[?2026h");
        assert_eq!(emit(|w| end_sync(w)), "\x1b[?2026l");
        assert_eq!(emit(|w| enter_alt_screen(w)), "\x1b[?1049h");
        assert_eq!(emit(|w| exit_alt_screen(w)), "\x1b[?1049l");
    }

    #[test]
    fn keypad_modes() {
        assert_eq!(emit(|w| enable_keypad(w)), "\x1b[?1h\x1b=");
        assert_eq!(emit(|w| disable_keypad(w)), "\x1b[?1l\x1b>");
    }

    #[test]
    fn clear_and_reset() {
        assert_eq!(emit(|w| clear_screen(w)), "\x1b[2J");
        assert_eq!(emit(|w| reset(w)), "\x1b[0m");
    }
}
