// SPDX-License-Identifier: MIT
//
// vsm-term — the terminal half of vsm.
//
// Cells, styles, the color-pair allocator, the cell grid and the blitter,
// plus the terminal session and key input around them. The editor crate
// fills a `Grid`; everything that turns a grid into bytes on a terminal
// lives here.
//
// Output is plain ANSI over raw termios. No TUI framework in between.

pub mod ansi;
pub mod cell;
pub mod event_loop;
pub mod grid;
pub mod input;
pub mod output;
pub mod pairs;
pub mod screen;
pub mod style;
pub mod terminal;
