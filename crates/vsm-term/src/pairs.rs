// SPDX-License-Identifier: MIT
//
// Color pairs — sharing a small fixed pool of terminal color-pair slots
// across an unbounded set of (foreground, background) requests.
//
// Terminals in the curses model do not take arbitrary colors per cell. They
// take a *pair slot*: a small integer naming a registered (fg, bg)
// combination. The number of slots is bounded, so a styled editor will
// eventually ask for more distinct pairs than exist.
//
// The allocator:
//
//   - hashes (fg, bg) perfectly into a dense table of (colors + 2)² entries,
//     with "terminal default" as one extra synthetic value on each axis;
//   - keeps a reverse table slot → pair so any slot can be reclaimed;
//   - hands out slots round-robin. When the cursor comes back around, the
//     slot's current owner is evicted. No recency tracking, O(1) per miss.
//
// Slot 0 is the terminal's built-in default pair and is never reassigned.
//
// The allocator never errors. A saturated pool costs visual fidelity (an
// evicted region shows another pair's colors until it is redrawn), and a
// driver that refuses a registration makes that one request fall back to
// slot 0 while every mapping stays as it was.

use tracing::{debug, trace};

use crate::cell::CellColor;

/// Practical ceiling on slots handed out, whatever the terminal reports.
pub const MAX_COLOR_PAIRS: u16 = 256;

/// Foreground substituted when the terminal's default pair is unspecified.
const FALLBACK_FG: u16 = 7; // white
/// Background substituted when the terminal's default pair is unspecified.
const FALLBACK_BG: u16 = 0; // black

// ─── Slot ───────────────────────────────────────────────────────────────────

/// A terminal color-pair slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct PairSlot(pub u16);

impl PairSlot {
    /// The terminal's built-in default pair.
    pub const DEFAULT: Self = Self(0);
}

// ─── Driver boundary ────────────────────────────────────────────────────────

/// Why a terminal driver refused a pair registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PairError {
    #[error("color pair slot 0 is reserved for the terminal default")]
    Reserved,
    #[error("color pair slot {0} is beyond the terminal's {1} pairs")]
    SlotOutOfRange(u16, u16),
    #[error("color {0} is beyond the terminal's {1} colors")]
    ColorOutOfRange(u16, u16),
    #[error("terminal rejected color pair {0}")]
    Rejected(u16),
}

/// The color-pair half of a terminal driver.
pub trait PairDriver {
    /// Number of palette colors. 0 means monochrome.
    fn colors(&self) -> u16;

    /// Number of pair slots the terminal distinguishes, slot 0 included.
    fn max_pairs(&self) -> u16;

    /// The terminal's current default pair (the content of slot 0).
    fn default_pair(&self) -> (CellColor, CellColor);

    /// Whether [`CellColor::Default`] can be used inside a registered pair.
    fn supports_default_colors(&self) -> bool;

    /// Register `(fg, bg)` under `slot`, replacing whatever it held.
    ///
    /// # Errors
    ///
    /// Returns a [`PairError`] when the terminal refuses the registration.
    fn init_pair(&mut self, slot: PairSlot, fg: CellColor, bg: CellColor)
        -> Result<(), PairError>;
}

// ─── Allocator ──────────────────────────────────────────────────────────────

/// A resolved color: `None` is the terminal default.
type Resolved = Option<u16>;

/// State fixed once the terminal's capabilities are known.
#[derive(Debug)]
struct Palette {
    colors: u16,
    default_fg: u16,
    default_bg: u16,
    has_default_colors: bool,
    ceiling: u16,
    /// Pair hash → slot. 0 means "no live slot". Empty when monochrome.
    forward: Vec<u16>,
    /// Slot → pair hash of its current owner.
    reverse: Vec<Option<usize>>,
    /// Last slot handed out.
    cursor: u16,
}

impl Palette {
    fn probe(driver: &impl PairDriver) -> Self {
        let colors = driver.colors();
        let (fg, bg) = driver.default_pair();
        let default_fg = match fg {
            CellColor::Indexed(i) => i,
            CellColor::Default => FALLBACK_FG,
        };
        let default_bg = match bg {
            CellColor::Indexed(i) => i,
            CellColor::Default => FALLBACK_BG,
        };
        let ceiling = driver.max_pairs().min(MAX_COLOR_PAIRS);

        let forward = if colors > 0 {
            let side = usize::from(colors) + 2;
            vec![0; side * side]
        } else {
            Vec::new()
        };

        debug!(colors, ceiling, default_fg, default_bg, "color pairs initialized");

        Self {
            colors,
            default_fg,
            default_bg,
            has_default_colors: driver.supports_default_colors(),
            ceiling,
            forward,
            reverse: vec![None; usize::from(ceiling)],
            cursor: 0,
        }
    }

    fn resolve(&self, color: CellColor, fallback: u16) -> Resolved {
        match color {
            CellColor::Indexed(i) if i >= self.colors => Some(fallback),
            CellColor::Indexed(i) => Some(i),
            CellColor::Default if self.has_default_colors => None,
            CellColor::Default => Some(fallback),
        }
    }

    /// Perfect hash: "default" is `colors` on the fg axis and `colors + 1`
    /// on the bg axis.
    fn hash(&self, fg: Resolved, bg: Resolved) -> usize {
        let colors = usize::from(self.colors);
        let fg = fg.map_or(colors, usize::from);
        let bg = bg.map_or(colors + 1, usize::from);
        fg * (colors + 2) + bg
    }

    /// Advance the rotation cursor, wrapping from the ceiling back to 1.
    const fn next_slot(&mut self) -> u16 {
        self.cursor += 1;
        if self.cursor >= self.ceiling {
            self.cursor = 1;
        }
        self.cursor
    }
}

const fn to_color(c: Resolved) -> CellColor {
    match c {
        Some(i) => CellColor::Indexed(i),
        None => CellColor::Default,
    }
}

/// Maps logical (fg, bg) pairs onto terminal color-pair slots.
///
/// One allocator per rendering context. It holds state across frames and
/// must have a single owner; it is not meant to be shared between threads.
///
/// ```
/// use vsm_term::cell::CellColor;
/// use vsm_term::pairs::{AnsiPalette, ColorPairs, PairSlot};
///
/// let mut driver = AnsiPalette::new(8);
/// let mut pairs = ColorPairs::new();
///
/// let red = pairs.get(&mut driver, CellColor::RED, CellColor::Default);
/// assert_ne!(red, PairSlot::DEFAULT);
/// assert_eq!(pairs.get(&mut driver, CellColor::RED, CellColor::Default), red);
/// assert_eq!(
///     pairs.get(&mut driver, CellColor::Default, CellColor::Default),
///     PairSlot::DEFAULT,
/// );
/// ```
#[derive(Debug, Default)]
pub struct ColorPairs {
    palette: Option<Palette>,
}

impl ColorPairs {
    /// An allocator that probes the driver on first use.
    #[must_use]
    pub const fn new() -> Self {
        Self { palette: None }
    }

    /// Forget every mapping. The next request re-probes the driver.
    pub fn reset(&mut self) {
        self.palette = None;
    }

    /// Number of (fg, bg) pairs that currently own a slot.
    #[must_use]
    pub fn live_pairs(&self) -> usize {
        self.palette
            .as_ref()
            .map_or(0, |p| p.reverse.iter().filter(|r| r.is_some()).count())
    }

    /// The slot ceiling in effect, once the driver has been probed.
    #[must_use]
    pub fn ceiling(&self) -> Option<u16> {
        self.palette.as_ref().map(|p| p.ceiling)
    }

    /// Slot for `(fg, bg)`, registering it with the driver on a miss.
    ///
    /// Never fails. Returns [`PairSlot::DEFAULT`] for the default pair, on
    /// monochrome terminals, and when the driver refuses a registration.
    pub fn get(&mut self, driver: &mut impl PairDriver, fg: CellColor, bg: CellColor) -> PairSlot {
        let palette = self.palette.get_or_insert_with(|| Palette::probe(driver));

        let fg = palette.resolve(fg, palette.default_fg);
        let bg = palette.resolve(bg, palette.default_bg);

        if palette.forward.is_empty() || (fg.is_none() && bg.is_none()) {
            return PairSlot::DEFAULT;
        }

        let index = palette.hash(fg, bg);
        let live = palette.forward[index];
        if live != 0 {
            return PairSlot(live);
        }

        if palette.ceiling <= 1 {
            // Nothing beyond the reserved slot to hand out.
            return PairSlot::DEFAULT;
        }

        let slot = palette.next_slot();
        if let Err(err) = driver.init_pair(PairSlot(slot), to_color(fg), to_color(bg)) {
            debug!(slot, %err, "color pair registration refused");
            return PairSlot::DEFAULT;
        }

        let owner = &mut palette.reverse[usize::from(slot)];
        if let Some(evicted) = owner.replace(index) {
            trace!(slot, evicted, "color pair evicted");
            palette.forward[evicted] = 0;
        }
        palette.forward[index] = slot;
        PairSlot(slot)
    }
}

// ─── ANSI driver ────────────────────────────────────────────────────────────

/// Pair slots reported for 8-color terminals (8 × 8, as curses does).
const PAIRS_8: u16 = 64;
/// Pair slots reported for 256-color terminals.
const PAIRS_256: u16 = i16::MAX as u16;

/// Number of palette colors advertised by the environment.
///
/// `COLORTERM=truecolor|24bit` or a `TERM` containing `256color` means 256;
/// `TERM=dumb` or no `TERM` at all means monochrome; anything else is the
/// basic 8.
#[must_use]
pub fn detect_colors(term: Option<&str>, colorterm: Option<&str>) -> u16 {
    if matches!(colorterm, Some("truecolor" | "24bit")) {
        return 256;
    }
    match term {
        None | Some("" | "dumb") => 0,
        Some(t) if t.contains("256color") => 256,
        Some(_) => 8,
    }
}

/// Color-pair driver for ANSI terminals.
///
/// ANSI terminals take colors per cell through SGR, so there is no hardware
/// pair table. This driver keeps one, with the slot count a curses terminal
/// of the same color depth would report, and the blitter reads a slot's
/// colors back with [`pair`](Self::pair) when it emits SGR.
#[derive(Debug, Clone)]
pub struct AnsiPalette {
    colors: u16,
    max_pairs: u16,
    pairs: Vec<(CellColor, CellColor)>,
}

impl AnsiPalette {
    /// A palette with `colors` entries (0, 8, or 256 in practice).
    #[must_use]
    pub fn new(colors: u16) -> Self {
        let max_pairs = match colors {
            0 => 0,
            1..=8 => PAIRS_8,
            _ => PAIRS_256,
        };
        Self {
            colors,
            max_pairs,
            pairs: vec![(CellColor::Default, CellColor::Default); usize::from(max_pairs.min(MAX_COLOR_PAIRS))],
        }
    }

    /// A palette sized from `TERM` / `COLORTERM`.
    #[must_use]
    pub fn detect() -> Self {
        let term = std::env::var("TERM").ok();
        let colorterm = std::env::var("COLORTERM").ok();
        Self::new(detect_colors(term.as_deref(), colorterm.as_deref()))
    }

    /// The colors registered under `slot`. Slot 0 and unknown slots are the
    /// terminal default pair.
    #[must_use]
    pub fn pair(&self, slot: PairSlot) -> (CellColor, CellColor) {
        self.pairs
            .get(usize::from(slot.0))
            .copied()
            .unwrap_or((CellColor::Default, CellColor::Default))
    }

    fn check_color(&self, color: CellColor) -> Result<(), PairError> {
        match color {
            CellColor::Indexed(i) if i >= self.colors => {
                Err(PairError::ColorOutOfRange(i, self.colors))
            }
            _ => Ok(()),
        }
    }
}

impl PairDriver for AnsiPalette {
    fn colors(&self) -> u16 {
        self.colors
    }

    fn max_pairs(&self) -> u16 {
        self.max_pairs
    }

    fn default_pair(&self) -> (CellColor, CellColor) {
        (CellColor::Default, CellColor::Default)
    }

    fn supports_default_colors(&self) -> bool {
        self.colors > 0
    }

    fn init_pair(
        &mut self,
        slot: PairSlot,
        fg: CellColor,
        bg: CellColor,
    ) -> Result<(), PairError> {
        if slot == PairSlot::DEFAULT {
            return Err(PairError::Reserved);
        }
        self.check_color(fg)?;
        self.check_color(bg)?;
        let limit = self.pairs.len();
        let entry = self
            .pairs
            .get_mut(usize::from(slot.0))
            .ok_or(PairError::SlotOutOfRange(slot.0, u16::try_from(limit).unwrap_or(u16::MAX)))?;
        *entry = (fg, bg);
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    /// Driver double that records registrations and can refuse them.
    struct RecordingDriver {
        colors: u16,
        max_pairs: u16,
        default_pair: (CellColor, CellColor),
        default_colors: bool,
        refuse: HashSet<u16>,
        registered: Vec<(u16, CellColor, CellColor)>,
    }

    impl RecordingDriver {
        fn new(colors: u16, max_pairs: u16) -> Self {
            Self {
                colors,
                max_pairs,
                default_pair: (CellColor::Default, CellColor::Default),
                default_colors: true,
                refuse: HashSet::new(),
                registered: Vec::new(),
            }
        }
    }

    impl PairDriver for RecordingDriver {
        fn colors(&self) -> u16 {
            self.colors
        }
        fn max_pairs(&self) -> u16 {
            self.max_pairs
        }
        fn default_pair(&self) -> (CellColor, CellColor) {
            self.default_pair
        }
        fn supports_default_colors(&self) -> bool {
            self.default_colors
        }
        fn init_pair(
            &mut self,
            slot: PairSlot,
            fg: CellColor,
            bg: CellColor,
        ) -> Result<(), PairError> {
            if self.refuse.contains(&slot.0) {
                return Err(PairError::Rejected(slot.0));
            }
            self.registered.push((slot.0, fg, bg));
            Ok(())
        }
    }

    fn ix(i: u16) -> CellColor {
        CellColor::Indexed(i)
    }

    // ── Lookup ───────────────────────────────────────────────────────────

    #[test]
    fn repeated_lookup_returns_same_slot() {
        let mut driver = RecordingDriver::new(8, 64);
        let mut pairs = ColorPairs::new();

        let a = pairs.get(&mut driver, ix(1), ix(4));
        let b = pairs.get(&mut driver, ix(2), ix(4));
        assert_ne!(a, b);
        assert_eq!(pairs.get(&mut driver, ix(1), ix(4)), a);
        assert_eq!(pairs.get(&mut driver, ix(2), ix(4)), b);
        // Hits do not register again.
        assert_eq!(driver.registered.len(), 2);
    }

    #[test]
    fn slots_are_handed_out_in_order_from_one() {
        let mut driver = RecordingDriver::new(8, 64);
        let mut pairs = ColorPairs::new();
        assert_eq!(pairs.get(&mut driver, ix(1), ix(0)), PairSlot(1));
        assert_eq!(pairs.get(&mut driver, ix(2), ix(0)), PairSlot(2));
        assert_eq!(pairs.get(&mut driver, ix(3), ix(0)), PairSlot(3));
    }

    #[test]
    fn default_pair_uses_reserved_slot() {
        let mut driver = RecordingDriver::new(8, 64);
        let mut pairs = ColorPairs::new();
        let slot = pairs.get(&mut driver, CellColor::Default, CellColor::Default);
        assert_eq!(slot, PairSlot::DEFAULT);
        assert!(driver.registered.is_empty());
    }

    #[test]
    fn half_default_pair_gets_a_real_slot() {
        let mut driver = RecordingDriver::new(8, 64);
        let mut pairs = ColorPairs::new();
        let fg_only = pairs.get(&mut driver, ix(1), CellColor::Default);
        let bg_only = pairs.get(&mut driver, CellColor::Default, ix(1));
        assert_ne!(fg_only, PairSlot::DEFAULT);
        assert_ne!(bg_only, PairSlot::DEFAULT);
        assert_ne!(fg_only, bg_only);
        assert_eq!(driver.registered[0], (1, ix(1), CellColor::Default));
    }

    #[test]
    fn monochrome_terminal_always_gets_default_slot() {
        let mut driver = RecordingDriver::new(0, 0);
        let mut pairs = ColorPairs::new();
        assert_eq!(pairs.get(&mut driver, ix(1), ix(2)), PairSlot::DEFAULT);
        assert_eq!(
            pairs.get(&mut driver, CellColor::Default, CellColor::Default),
            PairSlot::DEFAULT
        );
        assert!(driver.registered.is_empty());
    }

    // ── Clamping and default substitution ────────────────────────────────

    #[test]
    fn out_of_palette_colors_clamp_to_fallback_default() {
        let mut driver = RecordingDriver::new(8, 64);
        let mut pairs = ColorPairs::new();
        // fg 200 does not exist on an 8-color terminal: clamped to white.
        let clamped = pairs.get(&mut driver, ix(200), ix(1));
        assert_eq!(pairs.get(&mut driver, ix(7), ix(1)), clamped);
        assert_eq!(driver.registered, vec![(1, ix(7), ix(1))]);
    }

    #[test]
    fn terminal_default_pair_replaces_fallback() {
        let mut driver = RecordingDriver::new(8, 64);
        driver.default_pair = (ix(2), ix(4));
        let mut pairs = ColorPairs::new();
        pairs.get(&mut driver, ix(99), ix(99));
        assert_eq!(driver.registered, vec![(1, ix(2), ix(4))]);
    }

    #[test]
    fn without_default_color_support_default_resolves_to_fallback() {
        let mut driver = RecordingDriver::new(8, 64);
        driver.default_colors = false;
        let mut pairs = ColorPairs::new();

        // Both default → white on black, a real pair, not slot 0.
        let slot = pairs.get(&mut driver, CellColor::Default, CellColor::Default);
        assert_eq!(slot, PairSlot(1));
        assert_eq!(driver.registered, vec![(1, ix(7), ix(0))]);
        // And it is the same pair as asking for white on black directly.
        assert_eq!(pairs.get(&mut driver, ix(7), ix(0)), slot);
    }

    // ── Eviction ─────────────────────────────────────────────────────────

    #[test]
    fn rotation_wraps_to_one_and_evicts() {
        // Ceiling 4: usable slots 1, 2, 3.
        let mut driver = RecordingDriver::new(8, 4);
        let mut pairs = ColorPairs::new();

        let s1 = pairs.get(&mut driver, ix(1), ix(0));
        let _s2 = pairs.get(&mut driver, ix(2), ix(0));
        let _s3 = pairs.get(&mut driver, ix(3), ix(0));
        let s4 = pairs.get(&mut driver, ix(4), ix(0));

        assert_eq!(s1, PairSlot(1));
        assert_eq!(s4, PairSlot(1), "fourth pair reuses slot 1");
        assert_eq!(pairs.live_pairs(), 3);

        // The evicted pair is served again, taking the next slot in turn.
        assert_eq!(pairs.get(&mut driver, ix(1), ix(0)), PairSlot(2));
        // Which evicted (2, 0); (3, 0) still lives in slot 3.
        assert_eq!(pairs.get(&mut driver, ix(3), ix(0)), PairSlot(3));
    }

    #[test]
    fn live_mappings_never_exceed_ceiling_minus_one() {
        let mut driver = RecordingDriver::new(256, 32767);
        let mut pairs = ColorPairs::new();
        for fg in 0..40 {
            for bg in 0..40 {
                let slot = pairs.get(&mut driver, ix(fg), ix(bg));
                assert!(slot.0 < MAX_COLOR_PAIRS);
                assert_ne!(slot, PairSlot::DEFAULT);
            }
        }
        assert_eq!(pairs.ceiling(), Some(MAX_COLOR_PAIRS));
        assert_eq!(pairs.live_pairs(), usize::from(MAX_COLOR_PAIRS) - 1);
    }

    #[test]
    fn slots_stay_below_small_ceiling() {
        let mut driver = RecordingDriver::new(8, 5);
        let mut pairs = ColorPairs::new();
        for fg in 0..8 {
            for bg in 0..8 {
                let slot = pairs.get(&mut driver, ix(fg), ix(bg));
                assert!((1..5).contains(&slot.0), "slot {slot:?}");
            }
        }
        assert_eq!(pairs.live_pairs(), 4);
    }

    #[test]
    fn ceiling_of_one_never_allocates() {
        let mut driver = RecordingDriver::new(8, 1);
        let mut pairs = ColorPairs::new();
        assert_eq!(pairs.get(&mut driver, ix(1), ix(2)), PairSlot::DEFAULT);
        assert!(driver.registered.is_empty());
    }

    // ── Driver rejection ─────────────────────────────────────────────────

    #[test]
    fn rejection_keeps_prior_mappings_and_returns_default() {
        let mut driver = RecordingDriver::new(8, 3); // slots 1, 2
        let mut pairs = ColorPairs::new();

        let a = pairs.get(&mut driver, ix(1), ix(0));
        let b = pairs.get(&mut driver, ix(2), ix(0));
        assert_eq!((a, b), (PairSlot(1), PairSlot(2)));

        // Next rotation targets slot 1; the driver refuses it.
        driver.refuse.insert(1);
        assert_eq!(pairs.get(&mut driver, ix(3), ix(0)), PairSlot::DEFAULT);

        // Old owner of slot 1 still owns it, new pair has no slot.
        assert_eq!(pairs.get(&mut driver, ix(1), ix(0)), PairSlot(1));
        assert_eq!(pairs.live_pairs(), 2);

        // Once the driver cooperates the request is served on the next slot.
        driver.refuse.clear();
        assert_eq!(pairs.get(&mut driver, ix(3), ix(0)), PairSlot(2));
        assert_eq!(pairs.get(&mut driver, ix(1), ix(0)), PairSlot(1));
    }

    #[test]
    fn reset_forgets_everything() {
        let mut driver = RecordingDriver::new(8, 64);
        let mut pairs = ColorPairs::new();
        pairs.get(&mut driver, ix(1), ix(2));
        pairs.reset();
        assert_eq!(pairs.live_pairs(), 0);
        assert_eq!(pairs.ceiling(), None);
        assert_eq!(pairs.get(&mut driver, ix(3), ix(2)), PairSlot(1));
    }

    #[test]
    fn independent_allocators_do_not_share_state() {
        let mut driver = RecordingDriver::new(8, 64);
        let mut a = ColorPairs::new();
        let mut b = ColorPairs::new();
        a.get(&mut driver, ix(1), ix(2));
        a.get(&mut driver, ix(3), ix(2));
        assert_eq!(b.get(&mut driver, ix(5), ix(2)), PairSlot(1));
    }

    // ── ANSI driver ──────────────────────────────────────────────────────

    #[test]
    fn detect_colors_from_environment_strings() {
        assert_eq!(detect_colors(Some("xterm-256color"), None), 256);
        assert_eq!(detect_colors(Some("xterm"), Some("truecolor")), 256);
        assert_eq!(detect_colors(Some("xterm"), Some("24bit")), 256);
        assert_eq!(detect_colors(Some("xterm"), None), 8);
        assert_eq!(detect_colors(Some("linux"), None), 8);
        assert_eq!(detect_colors(Some("dumb"), None), 0);
        assert_eq!(detect_colors(None, None), 0);
    }

    #[test]
    fn ansi_palette_capabilities() {
        let p = AnsiPalette::new(8);
        assert_eq!(p.max_pairs(), 64);
        assert!(p.supports_default_colors());
        assert_eq!(AnsiPalette::new(256).max_pairs(), 32767);
        assert_eq!(AnsiPalette::new(0).max_pairs(), 0);
        assert!(!AnsiPalette::new(0).supports_default_colors());
    }

    #[test]
    fn ansi_palette_stores_and_returns_pairs() {
        let mut p = AnsiPalette::new(8);
        p.init_pair(PairSlot(3), ix(1), CellColor::Default).unwrap();
        assert_eq!(p.pair(PairSlot(3)), (ix(1), CellColor::Default));
        assert_eq!(p.pair(PairSlot::DEFAULT), (CellColor::Default, CellColor::Default));
        assert_eq!(p.pair(PairSlot(9999)), (CellColor::Default, CellColor::Default));
    }

    #[test]
    fn ansi_palette_rejects_bad_registrations() {
        let mut p = AnsiPalette::new(8);
        assert_eq!(
            p.init_pair(PairSlot::DEFAULT, ix(1), ix(2)),
            Err(PairError::Reserved)
        );
        assert_eq!(
            p.init_pair(PairSlot(64), ix(1), ix(2)),
            Err(PairError::SlotOutOfRange(64, 64))
        );
        assert_eq!(
            p.init_pair(PairSlot(1), ix(8), ix(2)),
            Err(PairError::ColorOutOfRange(8, 8))
        );
    }

    #[test]
    fn allocator_over_ansi_palette() {
        let mut p = AnsiPalette::new(256);
        let mut pairs = ColorPairs::new();
        let slot = pairs.get(&mut p, ix(196), ix(236));
        assert_eq!(p.pair(slot), (ix(196), ix(236)));
    }
}
