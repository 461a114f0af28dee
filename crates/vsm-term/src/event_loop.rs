// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop — one blocking, single-threaded frame cycle.
//
// Every iteration is:
//
//   1. act on a pending resize (resize the grid, tell the app)
//   2. clear the grid
//   3. let the app paint it
//   4. blit the grid and flush, once
//   5. take the next decoded key, blocking on stdin when none is queued
//   6. hand that one key to the app
//
// There is no timeout and no tick. The process is idle until a key arrives,
// then exactly one redraw follows. Keys that arrive in one `read()` (a paste,
// key repeat) are queued and each still gets its own frame. Grid mutation (2-3) and output (4) never
// overlap because there is only one thread of control.
//
// # SIGWINCH
//
// The handler only sets an `AtomicBool`. It is installed *without*
// `SA_RESTART`, so a resize interrupts the blocking `read()` with EINTR; the
// loop treats that as "no keys" and goes round again, picking the new size
// up in step 1. A resize that lands between steps 1 and 4 is seen one frame
// late.
//
// # Escape
//
// Whatever one `read()` returned is parsed in full. Bytes still pending after
// that (a lone ESC, a truncated sequence) are settled immediately: an ESC on
// its own in a read is the Escape key.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, trace};

use crate::grid::Grid;
use crate::input::{Key, Parser};
use crate::screen::Screen;
use crate::terminal::{Size, Terminal};

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
fn install_sigwinch_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        // No SA_RESTART: the blocking read must return EINTR.
        sa.sa_flags = 0;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {}

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application wants after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// An application driven by [`EventLoop`].
pub trait App {
    /// Handle one key. Return [`Action::Quit`] to leave the loop.
    fn on_key(&mut self, key: Key) -> Action;

    /// The terminal was resized. The grid already has the new dimensions.
    fn on_resize(&mut self, _size: Size) {}

    /// Paint the frame. The grid has just been cleared.
    fn paint(&mut self, grid: &mut Grid);
}

/// Steps 2-4 of the frame cycle, minus the flush: clear, paint, blit.
///
/// # Errors
///
/// Only writer errors from the blit.
pub fn draw(app: &mut impl App, grid: &mut Grid, screen: &mut Screen) -> io::Result<()> {
    grid.clear();
    app.paint(grid);
    screen.blit(grid)
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// Owns the terminal session, the key parser, and the screen.
///
/// ```no_run
/// use vsm_term::event_loop::{Action, App, EventLoop};
/// use vsm_term::grid::Grid;
/// use vsm_term::input::Key;
/// use vsm_term::screen::Screen;
///
/// struct Hello;
///
/// impl App for Hello {
///     fn on_key(&mut self, key: Key) -> Action {
///         if key.is_char('q') { Action::Quit } else { Action::Continue }
///     }
///
///     fn paint(&mut self, grid: &mut Grid) {
///         grid.draw_string(0, 0, "hello", Default::default());
///     }
/// }
///
/// EventLoop::new(Screen::detect()).run(&mut Hello)?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct EventLoop {
    terminal: Terminal,
    parser: Parser,
    screen: Screen,
}

impl EventLoop {
    #[must_use]
    pub fn new(screen: Screen) -> Self {
        Self {
            terminal: Terminal::new(),
            parser: Parser::new(),
            screen,
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Run until the app quits or stdin closes. The terminal is restored on
    /// the way out, error or not.
    ///
    /// # Errors
    ///
    /// Returns an error if entering or leaving the terminal session, output,
    /// or reading stdin fails.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        // Slots assigned in an earlier session mean nothing to this one.
        self.screen.reset_pairs();
        install_sigwinch_handler();

        let result = self.drive(app, read_stdin, Screen::flush);
        self.terminal.leave()?;
        result
    }

    /// The frame cycle, with stdin and the frame's way out passed in.
    fn drive(
        &mut self,
        app: &mut impl App,
        mut read: impl FnMut() -> io::Result<Option<Vec<u8>>>,
        mut present: impl FnMut(&mut Screen) -> io::Result<()>,
    ) -> io::Result<()> {
        let size = self.terminal.size();
        let mut grid = Grid::new(size.cols, size.rows);
        app.on_resize(size);
        let mut queued: VecDeque<Key> = VecDeque::new();

        loop {
            if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
                let size = self.terminal.refresh_size();
                grid.resize(size.cols, size.rows);
                debug!(cols = size.cols, rows = size.rows, "terminal resized");
                app.on_resize(size);
            }

            draw(app, &mut grid, &mut self.screen)?;
            present(&mut self.screen)?;

            while queued.is_empty() {
                let Some(bytes) = read()? else {
                    debug!("stdin closed");
                    return Ok(());
                };
                if bytes.is_empty() {
                    // Interrupted, most likely by SIGWINCH: redraw.
                    break;
                }
                queued.extend(self.decode(&bytes));
            }

            if let Some(key) = queued.pop_front() {
                trace!(?key, "key");
                if app.on_key(key) == Action::Quit {
                    return Ok(());
                }
            }
        }
    }

    /// Every key in `bytes`, with a trailing partial sequence settled.
    fn decode(&mut self, bytes: &[u8]) -> Vec<Key> {
        let mut keys = self.parser.advance(bytes);
        if self.parser.has_pending() {
            keys.extend(self.parser.flush());
        }
        keys
    }
}

/// Block until stdin has bytes. `Some(empty)` when a signal interrupted the
/// wait, `None` at end of input.
#[cfg(unix)]
fn read_stdin() -> io::Result<Option<Vec<u8>>> {
    let mut buf = [0u8; 256];
    let n = unsafe { libc::read(libc::STDIN_FILENO, buf.as_mut_ptr().cast(), buf.len()) };
    if n < 0 {
        let err = io::Error::last_os_error();
        return if err.kind() == io::ErrorKind::Interrupted {
            Ok(Some(Vec::new()))
        } else {
            Err(err)
        };
    }
    let n = usize::try_from(n).unwrap_or(0);
    Ok((n > 0).then(|| buf[..n].to_vec()))
}

#[cfg(not(unix))]
fn read_stdin() -> io::Result<Option<Vec<u8>>> {
    use std::io::Read;

    let mut buf = [0u8; 256];
    match io::stdin().read(&mut buf) {
        Ok(0) => Ok(None),
        Ok(n) => Ok(Some(buf[..n].to_vec())),
        Err(err) if err.kind() == io::ErrorKind::Interrupted => Ok(Some(Vec::new())),
        Err(err) => Err(err),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Style;
    use crate::input::KeyCode;
    use crate::pairs::AnsiPalette;

    struct Counter {
        keys: usize,
        paints: usize,
        text: &'static str,
    }

    impl App for Counter {
        fn on_key(&mut self, key: Key) -> Action {
            self.keys += 1;
            if key.is_char('q') { Action::Quit } else { Action::Continue }
        }

        fn paint(&mut self, grid: &mut Grid) {
            self.paints += 1;
            grid.draw_string(0, 0, self.text, Style::DEFAULT);
        }
    }

    #[test]
    fn draw_clears_before_paint() {
        let mut app = Counter { keys: 0, paints: 0, text: "hi" };
        let mut grid = Grid::new(4, 1);
        grid.draw_string(0, 0, "xxxx", Style::DEFAULT);
        let mut screen = Screen::new(AnsiPalette::new(8));

        draw(&mut app, &mut grid, &mut screen).unwrap();

        assert_eq!(app.paints, 1);
        assert_eq!(grid.get(1, 0).unwrap().glyph(), b"i");
        assert_eq!(grid.get(2, 0).unwrap().glyph(), b" ");
        let out = String::from_utf8(screen.pending().to_vec()).unwrap();
        assert!(out.contains("hi  "));
    }

    /// Drive a loop over canned reads, counting presented frames.
    fn drive(app: &mut Counter, reads: &[&str]) -> usize {
        let mut reads = reads.iter().map(|r| r.as_bytes().to_vec());
        let mut frames = 0;
        let mut event_loop = EventLoop::new(Screen::new(AnsiPalette::new(8)));
        event_loop
            .drive(
                app,
                || Ok(reads.next()),
                |screen| {
                    frames += 1;
                    screen.flush_to(&mut io::sink())
                },
            )
            .unwrap();
        frames
    }

    #[test]
    fn every_key_gets_its_own_frame() {
        let mut app = Counter { keys: 0, paints: 0, text: "" };
        let frames = drive(&mut app, &["jj", "kq"]);
        // First frame, then one per key before `q`.
        assert_eq!(app.keys, 4);
        assert_eq!(app.paints, 4);
        assert_eq!(frames, 4);
    }

    #[test]
    fn interrupted_read_redraws_without_a_key() {
        let mut app = Counter { keys: 0, paints: 0, text: "" };
        let frames = drive(&mut app, &["", "j"]);
        // Closed stdin ends the loop after the frame for `j`.
        assert_eq!(app.keys, 1);
        assert_eq!(frames, 3);
    }

    #[test]
    fn app_quits_on_q() {
        let mut app = Counter { keys: 0, paints: 0, text: "" };
        assert_eq!(app.on_key(Key::plain(KeyCode::Char('j'))), Action::Continue);
        assert_eq!(app.on_key(Key::plain(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(app.keys, 2);
    }
}
