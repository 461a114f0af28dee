// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into key presses. Covers what a keypad-mode terminal
// sends:
//
// - Legacy CSI sequences (arrows, editing keys, F5-F12, xterm modifiers)
// - SS3 sequences (application-mode arrows, Home/End, F1-F4)
// - Alt+key (ESC followed by a printable or control byte)
// - Control bytes (Ctrl+letter, Enter, Tab, Backspace)
// - UTF-8 multi-byte characters
//
// A sequence may be split across reads, so the parser keeps a small pending
// buffer. After a read has been fully fed, `flush` settles whatever is left:
// a lone ESC is the Escape key.

use bitflags::bitflags;

// ─── Key Types ──────────────────────────────────────────────────────────────

/// One key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl Key {
    /// A key with no modifiers.
    #[inline]
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// Ctrl + `code`.
    #[inline]
    #[must_use]
    pub const fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::CTRL,
        }
    }

    /// Whether this is `ch` with no modifiers.
    #[inline]
    #[must_use]
    pub fn is_char(&self, ch: char) -> bool {
        self.code == KeyCode::Char(ch) && self.modifiers.is_empty()
    }
}

/// Identity of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A printable character.
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    Insert,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    /// F1 through F12.
    F(u8),
}

bitflags! {
    /// Modifier keys, in xterm's `1 + bitmask` parameter order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
    }
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Incremental key parser.
///
/// ```
/// use vsm_term::input::{Key, KeyCode, Parser};
///
/// let mut parser = Parser::new();
/// let keys = parser.advance(b"j\x1b[A");
/// assert_eq!(keys, vec![Key::plain(KeyCode::Char('j')), Key::plain(KeyCode::Up)]);
/// ```
pub struct Parser {
    buf: Vec<u8>,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(32),
        }
    }

    /// Feed raw bytes and return every key that is complete. Incomplete
    /// trailing sequences stay pending for the next call.
    pub fn advance(&mut self, data: &[u8]) -> Vec<Key> {
        self.buf.extend_from_slice(data);
        let mut keys = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match parse(&self.buf[pos..]) {
                Parsed::Key(key, consumed) => {
                    keys.push(key);
                    pos += consumed;
                }
                Parsed::Incomplete => break,
                Parsed::Skip(n) => pos += n,
            }
        }

        self.buf.drain(..pos);
        keys
    }

    /// Whether bytes are waiting for the rest of a sequence.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Settle pending bytes as literal keys: ESC is Escape, the rest of an
    /// unfinished sequence is read as plain characters.
    pub fn flush(&mut self) -> Vec<Key> {
        let keys = self
            .buf
            .iter()
            .filter_map(|&byte| match byte {
                0x1B => Some(Key::plain(KeyCode::Escape)),
                b @ 0x20..=0x7E => Some(Key::plain(KeyCode::Char(char::from(b)))),
                _ => None,
            })
            .collect();
        self.buf.clear();
        keys
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Stateless Parsing ──────────────────────────────────────────────────────

enum Parsed {
    Key(Key, usize),
    Incomplete,
    Skip(usize),
}

fn parse(buf: &[u8]) -> Parsed {
    match buf[0] {
        0x1B => parse_escape(buf),
        0x00 => Parsed::Key(Key::ctrl(KeyCode::Char(' ')), 1),
        0x08 | 0x7F => Parsed::Key(Key::plain(KeyCode::Backspace), 1),
        0x09 => Parsed::Key(Key::plain(KeyCode::Tab), 1),
        0x0A | 0x0D => Parsed::Key(Key::plain(KeyCode::Enter), 1),
        b @ (0x01..=0x1A) => Parsed::Key(Key::ctrl(KeyCode::Char(ctrl_letter(b))), 1),
        b @ 0x20..=0x7E => Parsed::Key(Key::plain(KeyCode::Char(char::from(b))), 1),
        0xC0..=0xFF => parse_utf8(buf),
        // Stray continuation byte or unused control.
        _ => Parsed::Skip(1),
    }
}

fn parse_escape(buf: &[u8]) -> Parsed {
    if buf.len() < 2 {
        return Parsed::Incomplete;
    }

    match buf[1] {
        b'[' => parse_csi(buf),
        b'O' => parse_ss3(buf),
        0x1B => Parsed::Key(
            Key {
                code: KeyCode::Escape,
                modifiers: Modifiers::ALT,
            },
            2,
        ),
        b @ 0x20..=0x7E => Parsed::Key(
            Key {
                code: KeyCode::Char(char::from(b)),
                modifiers: Modifiers::ALT,
            },
            2,
        ),
        b @ 0x01..=0x1A => Parsed::Key(
            Key {
                code: KeyCode::Char(ctrl_letter(b)),
                modifiers: Modifiers::ALT | Modifiers::CTRL,
            },
            2,
        ),
        _ => Parsed::Key(Key::plain(KeyCode::Escape), 1),
    }
}

fn parse_csi(buf: &[u8]) -> Parsed {
    // Parameter bytes 0x30..=0x3F, intermediates 0x20..=0x2F, final 0x40..=0x7E.
    let mut end = 2;
    while end < buf.len() {
        let b = buf[end];
        if (0x40..=0x7E).contains(&b) {
            break;
        }
        if !(0x20..=0x3F).contains(&b) {
            return Parsed::Skip(end + 1);
        }
        end += 1;
    }
    if end >= buf.len() {
        return Parsed::Incomplete;
    }

    let params = parse_params(&buf[2..end]);
    let consumed = end + 1;
    let modifiers = params.get(1).map_or(Modifiers::empty(), |&p| decode_modifiers(p));
    let with = |code| Parsed::Key(Key { code, modifiers }, consumed);

    match buf[end] {
        b'~' => match params.first().copied().unwrap_or(0) {
            1 | 7 => with(KeyCode::Home),
            2 => with(KeyCode::Insert),
            3 => with(KeyCode::Delete),
            4 | 8 => with(KeyCode::End),
            5 => with(KeyCode::PageUp),
            6 => with(KeyCode::PageDown),
            15 => with(KeyCode::F(5)),
            17 => with(KeyCode::F(6)),
            18 => with(KeyCode::F(7)),
            19 => with(KeyCode::F(8)),
            20 => with(KeyCode::F(9)),
            21 => with(KeyCode::F(10)),
            23 => with(KeyCode::F(11)),
            24 => with(KeyCode::F(12)),
            _ => Parsed::Skip(consumed),
        },
        b'A' => with(KeyCode::Up),
        b'B' => with(KeyCode::Down),
        b'C' => with(KeyCode::Right),
        b'D' => with(KeyCode::Left),
        b'H' => with(KeyCode::Home),
        b'F' => with(KeyCode::End),
        b'P' => with(KeyCode::F(1)),
        b'Q' => with(KeyCode::F(2)),
        b'R' => with(KeyCode::F(3)),
        b'S' => with(KeyCode::F(4)),
        b'Z' => Parsed::Key(
            Key {
                code: KeyCode::Tab,
                modifiers: Modifiers::SHIFT,
            },
            consumed,
        ),
        _ => Parsed::Skip(consumed),
    }
}

fn parse_ss3(buf: &[u8]) -> Parsed {
    if buf.len() < 3 {
        return Parsed::Incomplete;
    }

    let code = match buf[2] {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'M' => KeyCode::Enter,
        b'P' => KeyCode::F(1),
        b'Q' => KeyCode::F(2),
        b'R' => KeyCode::F(3),
        b'S' => KeyCode::F(4),
        _ => return Parsed::Skip(3),
    };
    Parsed::Key(Key::plain(code), 3)
}

fn parse_utf8(buf: &[u8]) -> Parsed {
    let expected = match buf[0] {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => return Parsed::Skip(1),
    };
    if buf.len() < expected {
        return Parsed::Incomplete;
    }

    std::str::from_utf8(&buf[..expected])
        .ok()
        .and_then(|s| s.chars().next())
        .map_or(Parsed::Skip(1), |ch| {
            Parsed::Key(Key::plain(KeyCode::Char(ch)), expected)
        })
}

// ─── Helpers ────────────────────────────────────────────────────────────────

/// The letter a control byte stands for: 0x01 is `a`, 0x1A is `z`.
const fn ctrl_letter(byte: u8) -> char {
    (byte + b'a' - 1) as char
}

/// Semicolon-separated decimal parameters. Empty fields are 0.
fn parse_params(raw: &[u8]) -> Vec<u16> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(|&b| b == b';')
        .map(|field| {
            field
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u16, |acc, &b| acc.saturating_mul(10).saturating_add(u16::from(b - b'0')))
        })
        .collect()
}

/// xterm modifier parameter: `1 + bitmask`. 0 and 1 mean none.
#[allow(clippy::cast_possible_truncation)]
const fn decode_modifiers(param: u16) -> Modifiers {
    let val = if param > 0 { param - 1 } else { 0 };
    Modifiers::from_bits_truncate(val as u8)
}

// ─── Tests ──────────────────────────────────────────────────────────────────
