//! Text buffer — the text the editor renders and moves through.
//!
//! A `Buffer` wraps a [`ropey::Rope`] and exposes the navigation primitives
//! the view and the line renderer are built on.
//!
//! # Coordinate system
//!
//! Every position is a **byte offset** into the buffer's UTF-8 text. Every
//! primitive is total: positions past the end are clamped to [`len`], and a
//! position inside a multi-byte character is snapped back to that
//! character's first byte. Callers never have to validate a position before
//! handing it in, and never get an invalid one back.
//!
//! Lines are separated by `\n` and nothing else, the same rule the line
//! renderer follows. A `\r` directly before a `\n` belongs to the line
//! terminator. Line numbers are 0-indexed. A buffer ending in `\n` has a
//! trailing empty line, the position at [`len`].
//!
//! [`len`]: Buffer::len

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ropey::Rope;
use tracing::debug;

use crate::columns::Columns;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a file could not be opened.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}", path = .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("{path} is not valid UTF-8", path = .path.display())]
    NotUtf8 { path: PathBuf },
}

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

/// A rope-backed text buffer addressed by byte position.
pub struct Buffer {
    rope: Rope,
    path: Option<PathBuf>,
}

impl Buffer {
    // -- Construction -------------------------------------------------------

    /// An empty buffer with no file.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            path: None,
        }
    }

    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            path: None,
        }
    }

    /// Open `path`. A file that does not exist yet gives an empty buffer
    /// bound to that path.
    ///
    /// # Errors
    ///
    /// [`LoadError::Io`] if the file exists but cannot be read,
    /// [`LoadError::NotUtf8`] if its contents are not UTF-8.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "new file");
                return Ok(Self {
                    rope: Rope::new(),
                    path: Some(path.to_path_buf()),
                });
            }
            Err(source) => {
                return Err(LoadError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let text = String::from_utf8(bytes).map_err(|_| LoadError::NotUtf8 {
            path: path.to_path_buf(),
        })?;
        debug!(path = %path.display(), bytes = text.len(), "loaded");
        Ok(Self {
            rope: Rope::from_str(&text),
            path: Some(path.to_path_buf()),
        })
    }

    // -- Metadata -----------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Size in bytes. Also the largest valid position.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rope.len_bytes()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_bytes() == 0
    }

    /// Number of lines, counting the empty line after a final `\n`. An
    /// empty buffer has one line.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    // -- Position helpers ---------------------------------------------------

    /// Clamp `pos` to the buffer and snap it to a character boundary.
    #[must_use]
    pub fn clamp(&self, pos: usize) -> usize {
        let pos = pos.min(self.len());
        self.rope.char_to_byte(self.rope.byte_to_char(pos))
    }

    fn char_idx(&self, pos: usize) -> usize {
        self.rope.byte_to_char(pos.min(self.len()))
    }

    fn byte_pos(&self, char_idx: usize) -> usize {
        self.rope.char_to_byte(char_idx.min(self.rope.len_chars()))
    }

    /// The character starting at `pos`, if any.
    #[must_use]
    pub fn char_at(&self, pos: usize) -> Option<char> {
        let idx = self.char_idx(pos);
        (idx < self.rope.len_chars()).then(|| self.rope.char(idx))
    }

    // -- Lines --------------------------------------------------------------

    /// First byte of `line`. Lines past the end clamp to the last line.
    #[must_use]
    pub fn pos_by_line_number(&self, line: usize) -> usize {
        let line = line.min(self.line_count().saturating_sub(1));
        self.rope.line_to_byte(line)
    }

    /// The line containing `pos`.
    #[must_use]
    pub fn line_number(&self, pos: usize) -> usize {
        self.rope.byte_to_line(self.clamp(pos))
    }

    /// Start of the line containing `pos`.
    #[must_use]
    pub fn line_begin(&self, pos: usize) -> usize {
        self.rope.line_to_byte(self.line_number(pos))
    }

    /// The terminator (`\n`, or the `\r` of `\r\n`) ending the line
    /// containing `pos`, or the end of the buffer on the last line.
    #[must_use]
    pub fn line_end(&self, pos: usize) -> usize {
        let line = self.line_number(pos);
        if line + 1 >= self.line_count() {
            return self.len();
        }
        // The `\n` is the byte just before the next line starts.
        let newline = self.rope.line_to_byte(line + 1) - 1;
        if newline > self.rope.line_to_byte(line) && self.rope.byte(newline - 1) == b'\r' {
            newline - 1
        } else {
            newline
        }
    }

    /// Start of the next line. On the last line, the end of the buffer.
    #[must_use]
    pub fn line_next(&self, pos: usize) -> usize {
        let line = self.line_number(pos);
        if line + 1 < self.line_count() {
            self.rope.line_to_byte(line + 1)
        } else {
            self.len()
        }
    }

    /// Start of the previous line. On the first line, 0.
    #[must_use]
    pub fn line_prev(&self, pos: usize) -> usize {
        let line = self.line_number(pos);
        self.rope.line_to_byte(line.saturating_sub(1))
    }

    /// Whether the line containing `pos` has no content.
    #[must_use]
    pub fn line_is_blank(&self, pos: usize) -> bool {
        self.line_begin(pos) == self.line_end(pos)
    }

    /// Display column of `pos` within its line.
    #[must_use]
    pub fn line_width_get(&self, pos: usize, columns: Columns) -> usize {
        let begin = self.char_idx(self.line_begin(pos));
        let end = self.char_idx(self.clamp(pos).min(self.line_end(pos)));
        self.rope
            .chars_at(begin)
            .take(end - begin)
            .fold(0, |col, ch| col + columns.width_at(col, ch))
    }

    /// The position on the line containing `pos` that sits at display column
    /// `width`: the character covering that column, or the line terminator
    /// when the line is shorter.
    #[must_use]
    pub fn line_width_set(&self, pos: usize, width: usize, columns: Columns) -> usize {
        let begin = self.char_idx(self.line_begin(pos));
        let end = self.char_idx(self.line_end(pos));
        let mut idx = begin;
        let mut col = 0;
        for ch in self.rope.chars_at(begin).take(end - begin) {
            let w = columns.width_at(col, ch);
            if col + w > width {
                break;
            }
            col += w;
            idx += 1;
        }
        self.byte_pos(idx)
    }

    // -- Characters ---------------------------------------------------------

    /// Start of the character after the one at `pos`.
    #[must_use]
    pub fn char_next(&self, pos: usize) -> usize {
        self.byte_pos(self.char_idx(pos) + 1)
    }

    /// Start of the character before `pos`.
    #[must_use]
    pub fn char_prev(&self, pos: usize) -> usize {
        self.byte_pos(self.char_idx(pos).saturating_sub(1))
    }

    /// Copy text starting at `start` into `out`. Stops early rather than
    /// split a character, so the copied bytes are always valid UTF-8.
    /// Returns the number of bytes written.
    pub fn bytes_get(&self, start: usize, out: &mut [u8]) -> usize {
        let start = self.clamp(start);
        let end = self.clamp(start.saturating_add(out.len()));
        // `clamp` snaps back to a boundary, so `end` never splits a char.
        let mut written = 0;
        for (dst, byte) in out.iter_mut().zip(self.rope.bytes_at(start).take(end - start)) {
            *dst = byte;
            written += 1;
        }
        written
    }

    // -- Words --------------------------------------------------------------
    //
    // A word is a run of characters on one side of `is_boundary`. Boundary
    // characters that are not whitespace (punctuation) group into words of
    // their own. Whitespace, newlines included, separates words.

    /// Start of the next word.
    pub fn customword_start_next(&self, pos: usize, is_boundary: impl Fn(char) -> bool) -> usize {
        let total = self.rope.len_chars();
        let ch = |i| self.rope.char(i);
        let mut i = self.char_idx(pos);
        if i >= total {
            return self.len();
        }

        if is_boundary(ch(i)) {
            while i < total && is_boundary(ch(i)) && !ch(i).is_whitespace() {
                i += 1;
            }
        } else {
            while i < total && !is_boundary(ch(i)) {
                i += 1;
            }
        }
        while i < total && ch(i).is_whitespace() {
            i += 1;
        }
        self.byte_pos(i)
    }

    /// Last character of the current word, or of the next one when `pos` is
    /// already at a word's end.
    pub fn customword_end_next(&self, pos: usize, is_boundary: impl Fn(char) -> bool) -> usize {
        let total = self.rope.len_chars();
        let ch = |i| self.rope.char(i);
        let start = self.char_idx(pos);
        let mut i = start + 1;

        while i < total && ch(i).is_whitespace() {
            i += 1;
        }
        if i >= total {
            return self.clamp(pos);
        }

        if is_boundary(ch(i)) {
            while i < total && is_boundary(ch(i)) && !ch(i).is_whitespace() {
                i += 1;
            }
        } else {
            while i < total && !is_boundary(ch(i)) {
                i += 1;
            }
        }
        self.byte_pos(i - 1)
    }

    /// Start of the current word, or of the previous one when `pos` is
    /// already at a word's start.
    pub fn customword_start_prev(&self, pos: usize, is_boundary: impl Fn(char) -> bool) -> usize {
        let ch = |i| self.rope.char(i);
        let mut i = self.char_idx(pos);

        while i > 0 && ch(i - 1).is_whitespace() {
            i -= 1;
        }
        if i == 0 {
            return 0;
        }

        if is_boundary(ch(i - 1)) {
            while i > 0 && is_boundary(ch(i - 1)) && !ch(i - 1).is_whitespace() {
                i -= 1;
            }
        } else {
            while i > 0 && !is_boundary(ch(i - 1)) {
                i -= 1;
            }
        }
        self.byte_pos(i)
    }

    // -- Paragraphs ---------------------------------------------------------
    //
    // Paragraphs are separated by blank lines. Starting on a blank line, the
    // run of blank lines it belongs to is skipped first, so repeated motions
    // keep moving.

    /// Start of the next blank line, or the end of the buffer.
    #[must_use]
    pub fn paragraph_next(&self, pos: usize) -> usize {
        let count = self.line_count();
        let blank = |line: usize| self.line_is_blank(self.rope.line_to_byte(line));
        let current = self.line_number(pos);
        let mut line = current + 1;

        if blank(current) {
            while line < count && blank(line) {
                line += 1;
            }
        }
        while line < count && !blank(line) {
            line += 1;
        }

        if line < count {
            self.rope.line_to_byte(line)
        } else {
            self.len()
        }
    }

    /// Start of the previous blank line, or 0.
    #[must_use]
    pub fn paragraph_prev(&self, pos: usize) -> usize {
        let blank = |line: usize| self.line_is_blank(self.rope.line_to_byte(line));
        let current = self.line_number(pos);
        if current == 0 {
            return 0;
        }
        let mut line = current - 1;

        if blank(current) {
            while line > 0 && blank(line) {
                line -= 1;
            }
        }
        while line > 0 && !blank(line) {
            line -= 1;
        }
        self.rope.line_to_byte(line)
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("lines", &self.line_count())
            .field("bytes", &self.len())
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::{is_space, is_word_boundary};
    use pretty_assertions::assert_eq;

    fn cols(tab_width: usize) -> Columns {
        Columns::new(tab_width, false)
    }

    // -- Construction -------------------------------------------------------

    #[test]
    fn empty_buffer_has_one_line() {
        let buf = Buffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.pos_by_line_number(0), 0);
        assert!(buf.path().is_none());
    }

    #[test]
    fn load_missing_file_is_new_buffer() {
        let path = std::env::temp_dir().join("vsm-test-does-not-exist.txt");
        let _ = fs::remove_file(&path);
        let buf = Buffer::load(&path).unwrap();
        assert!(buf.is_empty());
        assert_eq!(buf.path(), Some(path.as_path()));
    }

    #[test]
    fn load_reads_file() {
        let path = std::env::temp_dir().join(format!("vsm-test-load-{}.txt", std::process::id()));
        fs::write(&path, "one\ntwo\n").unwrap();
        let buf = Buffer::load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(buf.len(), 8);
        assert_eq!(buf.line_count(), 3);
    }

    #[test]
    fn load_rejects_invalid_utf8() {
        let path = std::env::temp_dir().join(format!("vsm-test-bad-{}.txt", std::process::id()));
        fs::write(&path, [b'a', 0xFF, b'b']).unwrap();
        let err = Buffer::load(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(matches!(err, LoadError::NotUtf8 { .. }));
        assert!(err.to_string().contains("not valid UTF-8"));
    }

    // -- Clamping -----------------------------------------------------------

    #[test]
    fn positions_are_clamped_and_snapped() {
        let buf = Buffer::from_text("aé"); // 'é' is bytes 1..3
        assert_eq!(buf.clamp(99), 3);
        assert_eq!(buf.clamp(2), 1);
        assert_eq!(buf.char_at(1), Some('é'));
        assert_eq!(buf.char_at(3), None);
    }

    // -- Lines --------------------------------------------------------------

    #[test]
    fn line_numbers_and_positions() {
        let buf = Buffer::from_text("ab\ncd\n\nef");
        assert_eq!(buf.line_count(), 4);
        assert_eq!(buf.pos_by_line_number(0), 0);
        assert_eq!(buf.pos_by_line_number(1), 3);
        assert_eq!(buf.pos_by_line_number(2), 6);
        assert_eq!(buf.pos_by_line_number(3), 7);
        assert_eq!(buf.pos_by_line_number(99), 7);
        assert_eq!(buf.line_number(4), 1);
        assert_eq!(buf.line_number(6), 2);
    }

    #[test]
    fn line_begin_and_end() {
        let buf = Buffer::from_text("ab\ncd");
        assert_eq!(buf.line_begin(1), 0);
        assert_eq!(buf.line_end(1), 2);
        assert_eq!(buf.line_begin(4), 3);
        assert_eq!(buf.line_end(3), 5);
    }

    #[test]
    fn only_newline_breaks_lines() {
        for text in ["ab\u{2028}cd", "ab\rcd", "ab\u{b}\u{c}\u{85}cd"] {
            let buf = Buffer::from_text(text);
            assert_eq!(buf.line_count(), 1, "{text:?}");
            assert_eq!(buf.line_end(0), buf.len(), "{text:?}");
            assert_eq!(buf.line_number(buf.len()), 0, "{text:?}");
        }
    }

    #[test]
    fn crlf_terminator_starts_at_the_carriage_return() {
        let buf = Buffer::from_text("ab\r\n\r\ncd");
        assert_eq!(buf.line_count(), 3);
        assert_eq!(buf.line_end(0), 2);
        assert_eq!(buf.line_end(4), 4);
        assert!(buf.line_is_blank(4));
        assert_eq!(buf.line_end(6), 8);
        assert_eq!(buf.line_width_set(0, 50, cols(8)), 2);
        // The `\n` of the pair sits at the terminator's column.
        assert_eq!(buf.line_width_get(3, cols(8)), 2);
    }

    #[test]
    fn line_next_and_prev_clamp_at_edges() {
        let buf = Buffer::from_text("ab\ncd");
        assert_eq!(buf.line_next(1), 3);
        assert_eq!(buf.line_next(4), 5);
        assert_eq!(buf.line_prev(4), 0);
        assert_eq!(buf.line_prev(1), 0);
    }

    #[test]
    fn line_width_counts_tabs_to_next_stop() {
        let buf = Buffer::from_text("a\tbc");
        assert_eq!(buf.line_width_get(0, cols(4)), 0);
        assert_eq!(buf.line_width_get(1, cols(4)), 1);
        assert_eq!(buf.line_width_get(2, cols(4)), 4);
        assert_eq!(buf.line_width_get(3, cols(4)), 5);
    }

    #[test]
    fn line_width_set_lands_on_covering_char() {
        let buf = Buffer::from_text("a\tbc\nxyz");
        // Columns 1..4 are all the tab.
        assert_eq!(buf.line_width_set(0, 2, cols(4)), 1);
        assert_eq!(buf.line_width_set(0, 4, cols(4)), 2);
        // Past the end of the line: its terminator.
        assert_eq!(buf.line_width_set(0, 50, cols(4)), 4);
        assert_eq!(buf.line_width_set(6, 50, cols(4)), 8);
    }

    // -- Characters ---------------------------------------------------------

    #[test]
    fn char_motions_step_whole_characters() {
        let buf = Buffer::from_text("aé\nb");
        assert_eq!(buf.char_next(0), 1);
        assert_eq!(buf.char_next(1), 3);
        assert_eq!(buf.char_next(5), 5);
        assert_eq!(buf.char_prev(3), 1);
        assert_eq!(buf.char_prev(0), 0);
    }

    #[test]
    fn bytes_get_never_splits_a_character() {
        let buf = Buffer::from_text("aéb");
        let mut out = [0u8; 2];
        assert_eq!(buf.bytes_get(0, &mut out), 1);
        assert_eq!(&out[..1], b"a");

        let mut out = [0u8; 16];
        let n = buf.bytes_get(1, &mut out);
        assert_eq!(&out[..n], "éb".as_bytes());
        assert_eq!(buf.bytes_get(99, &mut out), 0);
    }

    // -- Words --------------------------------------------------------------

    #[test]
    fn word_start_next() {
        let buf = Buffer::from_text("foo.bar baz");
        assert_eq!(buf.customword_start_next(0, is_word_boundary), 3);
        assert_eq!(buf.customword_start_next(3, is_word_boundary), 4);
        assert_eq!(buf.customword_start_next(4, is_word_boundary), 8);
        assert_eq!(buf.customword_start_next(8, is_word_boundary), 11);
        // WORDs only break on whitespace.
        assert_eq!(buf.customword_start_next(0, is_space), 8);
    }

    #[test]
    fn word_start_next_crosses_lines() {
        let buf = Buffer::from_text("foo\n  bar");
        assert_eq!(buf.customword_start_next(0, is_word_boundary), 6);
    }

    #[test]
    fn word_end_next() {
        let buf = Buffer::from_text("foo.bar baz");
        assert_eq!(buf.customword_end_next(0, is_word_boundary), 2);
        assert_eq!(buf.customword_end_next(2, is_word_boundary), 3);
        assert_eq!(buf.customword_end_next(3, is_word_boundary), 6);
        assert_eq!(buf.customword_end_next(0, is_space), 6);
        assert_eq!(buf.customword_end_next(6, is_space), 10);
        // Nothing after the last word.
        assert_eq!(buf.customword_end_next(10, is_space), 10);
    }

    #[test]
    fn word_start_prev() {
        let buf = Buffer::from_text("foo.bar baz");
        assert_eq!(buf.customword_start_prev(10, is_word_boundary), 8);
        assert_eq!(buf.customword_start_prev(8, is_word_boundary), 4);
        assert_eq!(buf.customword_start_prev(4, is_word_boundary), 3);
        assert_eq!(buf.customword_start_prev(3, is_word_boundary), 0);
        assert_eq!(buf.customword_start_prev(8, is_space), 0);
        assert_eq!(buf.customword_start_prev(0, is_space), 0);
    }

    #[test]
    fn non_ascii_letters_are_word_characters() {
        let buf = Buffer::from_text("héllo wörld");
        assert_eq!(buf.customword_start_next(0, is_word_boundary), 7);
    }

    // -- Paragraphs ---------------------------------------------------------

    #[test]
    fn paragraph_next_stops_at_blank_lines() {
        let buf = Buffer::from_text("aaa\nbbb\n\nccc\n\n\nddd");
        assert_eq!(buf.paragraph_next(0), 8);
        assert_eq!(buf.paragraph_next(8), 13);
        assert_eq!(buf.paragraph_next(13), buf.len());
    }

    #[test]
    fn paragraph_prev_stops_at_blank_lines() {
        let buf = Buffer::from_text("aaa\n\nbbb\nccc\n\nddd");
        assert_eq!(buf.paragraph_prev(15), 13);
        assert_eq!(buf.paragraph_prev(13), 4);
        assert_eq!(buf.paragraph_prev(4), 0);
        assert_eq!(buf.paragraph_prev(0), 0);
    }
}
