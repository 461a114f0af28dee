//! Word boundary predicates for the word motions.
//!
//! The buffer's `customword_*` primitives take one of these to decide where
//! a word ends:
//!
//! | Predicate | Motions | A word is |
//! |-----------|---------|-----------|
//! | [`is_word_boundary`] | `w` `b` `e` | letters, digits and `_`, or a run of punctuation |
//! | [`is_space`] | `W` `B` `E` | any run of non-blank characters |
//!
//! `hello.world` is three words (`hello`, `.`, `world`) but one WORD.
//!
//! Only ASCII punctuation breaks words. Non-ASCII characters are treated as
//! letters, so `wörld` is one word.

/// Whether `ch` ends a word: ASCII that is not a letter, digit or `_`.
/// Whitespace is always a boundary.
#[inline]
#[must_use]
pub const fn is_word_boundary(ch: char) -> bool {
    ch.is_ascii() && !(ch.is_ascii_alphanumeric() || ch == '_')
}

/// Whether `ch` is whitespace. The boundary for WORD motions.
#[inline]
#[must_use]
pub fn is_space(ch: char) -> bool {
    ch.is_whitespace()
}
