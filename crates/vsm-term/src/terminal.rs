// SPDX-License-Identifier: MIT
//
// Terminal session — raw mode, alternate screen, keypad, and RAII cleanup.
//
// Safety: termios (tcgetattr, cfmakeraw, tcsetattr), ioctl (TIOCGWINSZ),
// isatty and the raw fd write in the panic path have no safe std
// equivalent. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// A session is: raw input, application keypad so function and cursor keys
// arrive as distinct sequences, the cursor hidden, and the alternate screen
// so the user's scrollback is untouched. Leaving undoes all of it in
// reverse, on `leave`, on drop, and on panic.
//
// The panic path cannot reach the `Terminal`: it restores cooked mode from
// a process-wide copy of the saved termios and writes a fixed restore
// sequence straight to fd 1, bypassing the stdout lock a half-written frame
// may still hold.

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use tracing::debug;

use crate::ansi;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    /// What a terminal that cannot be asked is assumed to be.
    pub const FALLBACK: Self = Self { cols: 80, rows: 24 };
}

/// Ask the OS for the size of the terminal on stdout (`TIOCGWINSZ`).
///
/// `None` when stdout is not a terminal or reports a zero dimension.
#[cfg(unix)]
#[must_use]
pub fn query_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let ok = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) } == 0;
    (ok && ws.ws_col > 0 && ws.ws_row > 0).then_some(Size {
        cols: ws.ws_col,
        rows: ws.ws_row,
    })
}

#[cfg(not(unix))]
#[must_use]
pub fn query_size() -> Option<Size> {
    None
}

/// Current terminal size, or [`Size::FALLBACK`] (80×24) when unknown.
#[must_use]
pub fn get_size() -> Size {
    query_size().unwrap_or_else(|| {
        debug!("terminal size unavailable, assuming 80x24");
        Size::FALLBACK
    })
}

/// Whether stdin is a terminal. Raw mode is skipped when it is not.
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) == 1 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Raw Mode ───────────────────────────────────────────────────────────────

/// Cooked-mode settings saved by [`RawMode::enable`], for the panic hook.
#[cfg(unix)]
static SAVED_TERMIOS: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Stdin in raw mode. Holds the settings to go back to.
#[cfg(unix)]
struct RawMode {
    cooked: libc::termios,
}

#[cfg(unix)]
impl RawMode {
    /// Switch stdin to raw mode: no echo, no line editing, no signal keys,
    /// 8-bit bytes, `read` blocking until one byte is available.
    fn enable() -> io::Result<Self> {
        let fd = libc::STDIN_FILENO;
        let mut cooked: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &raw mut cooked) } != 0 {
            return Err(io::Error::last_os_error());
        }

        let mut settings = cooked;
        unsafe { libc::cfmakeraw(&raw mut settings) };
        settings.c_cc[libc::VMIN] = 1;
        settings.c_cc[libc::VTIME] = 0;
        set_termios(&settings)?;

        if let Ok(mut saved) = SAVED_TERMIOS.lock() {
            *saved = Some(cooked);
        }
        Ok(Self { cooked })
    }

    fn disable(self) -> io::Result<()> {
        if let Ok(mut saved) = SAVED_TERMIOS.lock() {
            *saved = None;
        }
        set_termios(&self.cooked)
    }
}

#[cfg(unix)]
fn set_termios(termios: &libc::termios) -> io::Result<()> {
    if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, termios) } == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

// ─── Panic Restore ──────────────────────────────────────────────────────────

/// Everything [`Terminal::leave`] emits, as one constant. Exiting the
/// alternate screen comes last.
#[rustfmt::skip]
const RESTORE_SEQUENCE: &[u8] = b"\
    \x1b[?2026l\
    \x1b[0m\
    \x1b[?1l\x1b>\
    \x1b[?25h\
    \x1b[?1049l";

static PANIC_HOOK: Once = Once::new();

fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore_after_panic();
            previous(info);
        }));
    });
}

fn restore_after_panic() {
    #[cfg(unix)]
    {
        let _ = unsafe {
            libc::write(
                libc::STDOUT_FILENO,
                RESTORE_SEQUENCE.as_ptr().cast(),
                RESTORE_SEQUENCE.len(),
            )
        };
        if let Some(cooked) = SAVED_TERMIOS.lock().ok().and_then(|saved| *saved) {
            let _ = set_termios(&cooked);
        }
    }

    #[cfg(not(unix))]
    {
        let mut out = io::stdout();
        let _ = out.write_all(RESTORE_SEQUENCE);
        let _ = out.flush();
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// An editor session on the controlling terminal.
///
/// ```no_run
/// use vsm_term::terminal::Terminal;
///
/// let mut term = Terminal::new();
/// term.enter()?;
/// // ... frames ...
/// // Restored on drop.
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    #[cfg(unix)]
    raw: Option<RawMode>,
    size: Size,
    active: bool,
}

impl Terminal {
    /// A handle with the current size cached. Does not touch terminal modes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            #[cfg(unix)]
            raw: None,
            size: get_size(),
            active: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Re-query the size after SIGWINCH. A failed query keeps the old size.
    pub fn refresh_size(&mut self) -> Size {
        self.size = query_size().unwrap_or(self.size);
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Start the session. No-op when already active.
    ///
    /// # Errors
    ///
    /// Returns an error if termios or terminal output fails.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }

        install_panic_hook();
        #[cfg(unix)]
        {
            if is_tty() {
                self.raw = Some(RawMode::enable()?);
            }
        }

        let mut out = io::stdout().lock();
        ansi::enter_alt_screen(&mut out)?;
        ansi::enable_keypad(&mut out)?;
        ansi::cursor_hide(&mut out)?;
        ansi::clear_screen(&mut out)?;
        out.flush()?;

        self.active = true;
        debug!(cols = self.size.cols, rows = self.size.rows, "terminal session started");
        Ok(())
    }

    /// End the session and give the terminal back as it was. No-op when
    /// inactive.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal output or the termios restore fails.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        {
            let mut out = io::stdout().lock();
            ansi::end_sync(&mut out)?;
            ansi::reset(&mut out)?;
            ansi::disable_keypad(&mut out)?;
            ansi::cursor_show(&mut out)?;
            ansi::exit_alt_screen(&mut out)?;
            out.flush()?;
        }

        #[cfg(unix)]
        {
            if let Some(raw) = self.raw.take() {
                raw.disable()?;
            }
        }
        debug!("terminal session ended");
        Ok(())
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
