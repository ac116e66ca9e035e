// SPDX-License-Identifier: MIT
//
// Editor mode: raw input plus the alternate screen, and getting back out.
//
// Safety: termios, ioctl(TIOCGWINSZ), isatty and the panic hook's write(2)
// are only reachable through libc.
#![allow(unsafe_code)]
//
// Editor mode is left in three ways: `Terminal::leave`, `Drop`, and a
// panic hook. The hook sends the pre-encoded `LEAVE_EDITOR` bytes with a
// bare write(2) on fd 1, since the panicking thread may hold the stdout
// lock mid-frame, then puts the saved termios back and lets the previous
// hook print the message on a usable terminal.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, Once};

use crate::ansi::{self, Command, ENTER_EDITOR, LEAVE_EDITOR};

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Default for Size {
    /// 80×24, for when there is no terminal to ask.
    fn default() -> Self {
        Self { cols: 80, rows: 24 }
    }
}

impl Size {
    /// Ask the terminal on stdout. `None` when stdout isn't a terminal or
    /// reports a zero dimension.
    #[cfg(unix)]
    #[must_use]
    pub fn query() -> Option<Self> {
        let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
        let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };
        (rc == 0 && ws.ws_col > 0 && ws.ws_row > 0).then_some(Self {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    }

    #[cfg(not(unix))]
    #[must_use]
    pub fn query() -> Option<Self> {
        None
    }
}

/// Whether stdin is a terminal.
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Raw Mode ───────────────────────────────────────────────────────────────

/// The termios to restore, shared with the panic hook.
#[cfg(unix)]
static SAVED_TERMIOS: Mutex<Option<libc::termios>> = Mutex::new(None);

/// stdin in raw mode. Holds the settings it replaced.
#[cfg(unix)]
struct RawMode {
    saved: libc::termios,
}

#[cfg(unix)]
impl RawMode {
    /// Switch stdin to raw mode. `Ok(None)` when stdin isn't a terminal.
    fn enable() -> io::Result<Option<Self>> {
        if !is_tty() {
            return Ok(None);
        }
        let fd = libc::STDIN_FILENO;

        let mut saved: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(fd, &raw mut saved) } != 0 {
            return Err(io::Error::last_os_error());
        }

        // cfmakeraw clears ISIG and IXON too: Ctrl-C, Ctrl-S and Ctrl-Q all
        // arrive as keys. The event loop polls first, so a blocking read of
        // one byte never stalls.
        let mut termios = saved;
        unsafe { libc::cfmakeraw(&raw mut termios) };
        termios.c_cc[libc::VMIN] = 1;
        termios.c_cc[libc::VTIME] = 0;

        if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const termios) } != 0 {
            return Err(io::Error::last_os_error());
        }

        if let Ok(mut slot) = SAVED_TERMIOS.lock() {
            *slot = Some(saved);
        }
        Ok(Some(Self { saved }))
    }

    fn restore(&self) -> io::Result<()> {
        if let Ok(mut slot) = SAVED_TERMIOS.lock() {
            *slot = None;
        }
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const self.saved) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

#[cfg(not(unix))]
struct RawMode;

#[cfg(not(unix))]
impl RawMode {
    #[allow(clippy::unnecessary_wraps)]
    fn enable() -> io::Result<Option<Self>> {
        Ok(None)
    }

    #[allow(clippy::unnecessary_wraps, clippy::unused_self)]
    fn restore(&self) -> io::Result<()> {
        Ok(())
    }
}

// ─── Panic Hook ─────────────────────────────────────────────────────────────

/// Set while editor mode is on, so a panic after `leave` prints normally.
static IN_EDITOR_MODE: AtomicBool = AtomicBool::new(false);

static PANIC_HOOK: Once = Once::new();

fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let restore = ansi::encode(&LEAVE_EDITOR);
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            if IN_EDITOR_MODE.swap(false, Ordering::SeqCst) {
                write_unlocked(&restore);
                #[cfg(unix)]
                restore_saved_termios();
            }
            previous(info);
        }));
    });
}

fn write_unlocked(bytes: &[u8]) {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(libc::STDOUT_FILENO, bytes.as_ptr().cast::<libc::c_void>(), bytes.len());
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(bytes);
    }
}

#[cfg(unix)]
fn restore_saved_termios() {
    let Ok(slot) = SAVED_TERMIOS.lock() else {
        return;
    };
    if let Some(saved) = slot.as_ref() {
        unsafe {
            let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, saved);
        }
    }
}

fn send(commands: &[Command]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    out.write_all(&ansi::encode(commands))?;
    out.flush()
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Owns editor mode. Dropping an active handle leaves it.
///
/// ```no_run
/// use cedit_term::terminal::Terminal;
///
/// let mut term = Terminal::new();
/// term.enter()?;
/// // ... draw frames, read keys ...
/// term.leave()?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    raw: Option<RawMode>,
    size: Size,
    active: bool,
}

impl Terminal {
    /// A handle sized to the current terminal (80×24 if it can't be asked).
    /// Nothing is sent until [`enter`](Self::enter).
    #[must_use]
    pub fn new() -> Self {
        Self {
            raw: None,
            size: Size::query().unwrap_or_default(),
            active: false,
        }
    }

    /// Last known size.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Re-ask the size after SIGWINCH. A failed query keeps the last size.
    pub fn resized(&mut self) -> Size {
        if let Some(size) = Size::query() {
            self.size = size;
        }
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Enter editor mode. A no-op when already active.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode can't be set or the mode switch can't
    /// be written. Raw mode is undone again in the second case.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }

        install_panic_hook();
        let raw = RawMode::enable()?;
        IN_EDITOR_MODE.store(true, Ordering::SeqCst);

        if let Err(err) = send(&ENTER_EDITOR) {
            IN_EDITOR_MODE.store(false, Ordering::SeqCst);
            if let Some(raw) = &raw {
                let _ = raw.restore();
            }
            return Err(err);
        }

        self.raw = raw;
        self.active = true;
        tracing::debug!(cols = self.size.cols, rows = self.size.rows, "entered editor mode");
        Ok(())
    }

    /// Leave editor mode. A no-op when inactive.
    ///
    /// Raw mode is restored even when the screen sequence fails to write.
    ///
    /// # Errors
    ///
    /// Returns the first error from writing the sequence or restoring
    /// termios.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        IN_EDITOR_MODE.store(false, Ordering::SeqCst);

        let screen = send(&LEAVE_EDITOR);
        let termios = self.raw.take().map_or(Ok(()), |raw| raw.restore());
        tracing::debug!(screen_ok = screen.is_ok(), termios_ok = termios.is_ok(), "left editor mode");
        screen.and(termios)
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

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_size_is_80_by_24() {
        assert_eq!(Size::default(), Size { cols: 80, rows: 24 });
    }

    #[test]
    fn queried_size_is_never_zero() {
        if let Some(size) = Size::query() {
            assert!(size.cols > 0 && size.rows > 0);
        }
        let _ = is_tty();
    }

    #[test]
    fn new_terminal_is_inactive() {
        let term = Terminal::new();
        assert!(!term.is_active());
        assert!(term.size().cols > 0);
    }

    #[test]
    fn enter_leave_is_idempotent() {
        let mut term = Terminal::new();
        term.enter().unwrap();
        term.enter().unwrap();
        assert!(term.is_active());
        assert!(IN_EDITOR_MODE.load(Ordering::SeqCst));
        term.leave().unwrap();
        term.leave().unwrap();
        assert!(!term.is_active());
        assert!(!IN_EDITOR_MODE.load(Ordering::SeqCst));
    }

    #[test]
    fn leave_without_enter() {
        let mut term = Terminal::new();
        term.leave().unwrap();
        assert!(!term.is_active());
    }

    #[test]
    fn resized_keeps_size_when_query_fails() {
        let mut term = Terminal::new();
        let before = term.size();
        let after = term.resized();
        assert_eq!(after, term.size());
        if Size::query().is_none() {
            assert_eq!(after, before);
        }
    }
}
