// SPDX-License-Identifier: MIT
//
// vsm — a small vi-like viewer built around a cell-grid renderer.
//
// This binary wires the two crates together:
//
//   vsm-term   → cells, styles, color pairs, grid, blitter, terminal, input
//   vsm-editor → text buffer, motions, view, line renderer
//
// The Editor implements vsm-term's App trait. Each key flows through:
//
//   stdin → parser → on_key → View motion
//   paint → LineRenderer → Grid → Screen::blit → terminal
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ text (soft-wrapped)          │  ← h - 1 rows
//   ├──────────────────────────────┤
//   │ info line (BOLD)             │  ← 1 row
//   └──────────────────────────────┘

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;

use clap::Parser as _;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use vsm_editor::buffer::Buffer;
use vsm_editor::columns::{Columns, DEFAULT_TAB_WIDTH};
use vsm_editor::render::{self, LineRenderer};
use vsm_editor::view::View;

use vsm_term::event_loop::{Action, App, EventLoop};
use vsm_term::grid::Grid;
use vsm_term::input::{Key, KeyCode, Modifiers};
use vsm_term::screen::Screen;
use vsm_term::style::StyleTable;

// ─── Command line ───────────────────────────────────────────────────────────

#[derive(Debug, clap::Parser)]
#[command(name = "vsm", version, about = "Browse a text file with vi motions")]
struct Args {
    /// File to open. A missing file opens as an empty buffer.
    file: Option<PathBuf>,

    /// Columns per tab stop (1-32).
    #[arg(long, short = 't', default_value_t = DEFAULT_TAB_WIDTH)]
    tabstop: usize,

    /// Line to place the cursor on (1-indexed).
    #[arg(long, short = 'l')]
    line: Option<usize>,

    /// Give CJK and other wide glyphs two cells instead of one.
    #[arg(long)]
    wide_glyphs: bool,

    /// Write logs to this file. Filter with VSM_LOG (default: info).
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,
}

/// Log to `path`. The terminal belongs to the editor, so logs never go to
/// stdout or stderr.
fn init_logging(path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_env("VSM_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ─── Editor ─────────────────────────────────────────────────────────────────

/// Upper bound on re-renders per frame while scrolling the cursor into a
/// window of soft-wrapped lines.
const MAX_SCROLL_STEPS: usize = 64;

struct Editor {
    view: View,
    renderer: LineRenderer,
    styles: StyleTable,
    /// Shown on the info line until the next key.
    message: Option<String>,
}

impl Editor {
    fn new(view: View) -> Self {
        Self {
            view,
            renderer: LineRenderer::new(),
            styles: StyleTable::new(),
            message: None,
        }
    }

    /// Load `path`, or start empty. A file that cannot be read ends the
    /// process before the terminal is touched.
    fn open(path: Option<&Path>, columns: Columns) -> Self {
        let Some(path) = path else {
            return Self::new(View::new(Buffer::new(), columns));
        };

        let buffer = Buffer::load(path).unwrap_or_else(|e| {
            eprintln!("vsm: {e}");
            process::exit(1);
        });
        let lines = buffer.line_count();
        let note = if buffer.is_empty() { " [New]" } else { "" };
        let mut editor = Self::new(View::new(buffer, columns));
        editor.message = Some(format!("\"{}\"{note} {lines}L", path.display()));
        editor
    }

    fn status(&self) -> String {
        let name = self
            .view
            .buffer()
            .path()
            .map_or_else(|| "[No Name]".to_owned(), |p| p.display().to_string());
        format!(
            "{name}  {}:{}",
            self.view.cursor_line() + 1,
            self.view.cursor_col() + 1
        )
    }

    /// Apply the motion bound to `key`.
    fn motion(&mut self, key: Key) {
        let v = &mut self.view;
        match key.code {
            KeyCode::Char('h') | KeyCode::Left | KeyCode::Backspace => v.char_prev(),
            KeyCode::Char('l' | ' ') | KeyCode::Right => v.char_next(),
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Enter => v.line_down(),
            KeyCode::Char('k') | KeyCode::Up => v.line_up(),
            KeyCode::Char('w') => v.word_start_next(),
            KeyCode::Char('b') => v.word_start_prev(),
            KeyCode::Char('e') => v.word_end_next(),
            KeyCode::Char('W') => v.bigword_start_next(),
            KeyCode::Char('B') => v.bigword_start_prev(),
            KeyCode::Char('E') => v.bigword_end_next(),
            KeyCode::Char('0') | KeyCode::Home => v.line_begin(),
            KeyCode::Char('$') | KeyCode::End => v.line_end(),
            KeyCode::Char('{') => v.paragraph_prev(),
            KeyCode::Char('}') => v.paragraph_next(),
            _ => debug!(?key, "unbound key"),
        }
    }
}

impl App for Editor {
    fn on_key(&mut self, key: Key) -> Action {
        self.message = None;

        if key.is_char('q') || key == Key::ctrl(KeyCode::Char('c')) {
            return Action::Quit;
        }
        // Shifted letters may arrive with SHIFT set; the char already says it.
        let key = Key {
            code: key.code,
            modifiers: key.modifiers - Modifiers::SHIFT,
        };
        if key.modifiers.is_empty() {
            self.motion(key);
        }
        Action::Continue
    }

    fn paint(&mut self, grid: &mut Grid) {
        let rows = usize::from(grid.height().saturating_sub(1));
        self.view.scroll_to_cursor(rows);

        // Wrapped lines can push the cursor below the window even when its
        // line index is in range. Scroll one line at a time until it shows.
        for _ in 0..MAX_SCROLL_STEPS {
            let out = self.renderer.render(&self.view, grid, &self.styles);
            if out.cursor_drawn || self.view.top_line() >= self.view.cursor_line() {
                break;
            }
            self.view.set_top_line(self.view.top_line() + 1);
            grid.clear();
        }

        let info = self.message.clone().unwrap_or_else(|| self.status());
        render::draw_info(grid, &self.styles, &info);
    }
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() {
    let args = Args::parse();

    if let Some(path) = &args.log {
        if let Err(e) = init_logging(path) {
            eprintln!("vsm: {}: {e}", path.display());
            process::exit(1);
        }
    }

    let columns = Columns::new(args.tabstop, args.wide_glyphs);
    let mut editor = Editor::open(args.file.as_deref(), columns);
    if let Some(line) = args.line {
        editor.view.goto_line(line.saturating_sub(1));
    }
    info!(
        file = ?args.file,
        tabstop = columns.tab_width(),
        wide_glyphs = columns.wide_glyphs(),
        "starting"
    );

    let mut event_loop = EventLoop::new(Screen::detect());
    if let Err(e) = event_loop.run(&mut editor) {
        eprintln!("vsm: {e}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
