//! # vsm-editor — editor core for vsm
//!
//! Everything between a file on disk and a filled [`Grid`](vsm_term::grid::Grid):
//!
//! - **[`buffer`]** — `Buffer`, a rope with total, byte-position navigation primitives
//! - **[`word`]** — word and WORD boundary predicates
//! - **[`columns`]** — the column model: tab stops and glyph widths
//! - **[`view`]** — `View`, the top line and cursor over a buffer, and every motion
//! - **[`render`]** — `LineRenderer`, laying the view's text into grid cells, and the info line

pub mod buffer;
pub mod columns;
pub mod render;
pub mod view;
pub mod word;
