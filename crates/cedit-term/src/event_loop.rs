// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Event loop: stdin bytes in, frames out, on one thread.
//
// Each iteration polls stdin with a short timeout. Bytes that arrive are
// parsed into key events and handed to the application one at a time, so
// every edit is applied and painted before the next is read. When nothing
// arrives before the timeout, the loop resolves a pending lone ESC and
// checks the resize flag. A frame is painted only when something changed
// (the dirty flag), so an idle editor costs nothing.
//
// # SIGWINCH Handling
//
// The resize handler only stores an `AtomicBool`. The loop swaps it each
// iteration and triggers a full redraw when it was set. poll() returns
// early with EINTR when the signal lands, so resize latency is one
// iteration at most.
//
// # Escape Sequence Timeout
//
// A lone ESC byte could be the Escape key or the start of a CSI sequence.
// The parser holds it as pending; the first poll timeout with no new bytes
// flushes it as a literal Escape.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::ansi::{self, Command};
use crate::buffer::FrameBuffer;
use crate::diff::DiffRenderer;
use crate::input::{Event, Parser};
use crate::terminal::{Size, Terminal};

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

/// Set by the SIGWINCH handler, swapped by the loop.
static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
fn install_sigwinch_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
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

// ─── Stdin Polling ───────────────────────────────────────────────────────────

/// Input chunk size. A keypress is 1–6 bytes; a paste can be more and is
/// simply read over several iterations.
const READ_BUF_SIZE: usize = 4096;

/// Result of one poll-then-read step.
enum Input {
    /// Bytes were read into the buffer.
    Bytes(usize),
    /// Nothing arrived before the timeout (or a signal interrupted poll).
    Timeout,
    /// stdin reached end of file.
    Eof,
}

#[cfg(unix)]
fn poll_stdin(buf: &mut [u8], timeout_ms: i32) -> io::Result<Input> {
    let fd = libc::STDIN_FILENO;
    let ready = unsafe {
        let mut pfd = libc::pollfd {
            fd,
            events: libc::POLLIN,
            revents: 0,
        };
        libc::poll(&raw mut pfd, 1, timeout_ms)
    };

    if ready < 0 {
        let err = io::Error::last_os_error();
        return if err.kind() == io::ErrorKind::Interrupted {
            Ok(Input::Timeout)
        } else {
            Err(err)
        };
    }
    if ready == 0 {
        return Ok(Input::Timeout);
    }

    let n = unsafe { libc::read(fd, buf.as_mut_ptr().cast(), buf.len()) };
    match n {
        0 => Ok(Input::Eof),
        #[allow(clippy::cast_sign_loss)] // n > 0 in this arm.
        n if n > 0 => Ok(Input::Bytes(n as usize)),
        _ => {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                Ok(Input::Timeout)
            } else {
                Err(err)
            }
        }
    }
}

#[cfg(not(unix))]
fn poll_stdin(buf: &mut [u8], _timeout_ms: i32) -> io::Result<Input> {
    use std::io::Read;

    match io::stdin().lock().read(buf)? {
        0 => Ok(Input::Eof),
        n => Ok(Input::Bytes(n)),
    }
}

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the event loop after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep running.
    Continue,
    /// Exit the event loop cleanly.
    Quit,
}

/// Application interface for the event loop.
///
/// Per iteration the loop calls [`on_event`](App::on_event) for each
/// parsed event, [`on_resize`](App::on_resize) when the terminal size
/// changed, then [`paint`](App::paint) and [`cursor`](App::cursor) if
/// anything happened.
pub trait App {
    /// Handle one input event. Return [`Action::Quit`] to exit the loop.
    fn on_event(&mut self, _event: &Event) -> Action {
        Action::Continue
    }

    /// The terminal was resized; the frame buffer already has the new size.
    fn on_resize(&mut self, _size: Size) {}

    /// Paint the whole visible state. The buffer was cleared before the
    /// call. Takes `&mut self` so the app can update scroll state and
    /// remember where the cursor landed.
    fn paint(&mut self, buf: &mut FrameBuffer);

    /// Where to show the hardware cursor after painting, or `None` to
    /// keep it hidden.
    fn cursor(&self) -> Option<(u16, u16, ansi::CursorShape)> {
        None
    }
}

/// Hand each event to the app in order, stopping at the first quit.
/// Returns `Some(Action::Quit)` if the app asked to exit, `Some(Continue)`
/// if at least one event was handled, `None` for an empty batch.
fn dispatch(app: &mut impl App, events: &[Event]) -> Option<Action> {
    let mut handled = None;
    for event in events {
        if app.on_event(event) == Action::Quit {
            return Some(Action::Quit);
        }
        handled = Some(Action::Continue);
    }
    handled
}

// ─── Loop Config ─────────────────────────────────────────────────────────────

/// Event loop timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// How long one poll waits for input before the loop resolves a
    /// pending ESC and checks for resize (milliseconds).
    pub poll_timeout_ms: i32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self { poll_timeout_ms: 25 }
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// The terminal event loop.
///
/// Owns the terminal, parser and renderer. [`run`](Self::run) returns
/// when the application signals [`Action::Quit`] or stdin closes.
///
/// ```no_run
/// use cedit_term::buffer::FrameBuffer;
/// use cedit_term::event_loop::{Action, App, EventLoop};
/// use cedit_term::input::{Event, KeyEvent};
///
/// struct MyApp;
///
/// impl App for MyApp {
///     fn on_event(&mut self, event: &Event) -> Action {
///         if *event == Event::Key(KeyEvent::ctrl('q')) {
///             return Action::Quit;
///         }
///         Action::Continue
///     }
///
///     fn paint(&mut self, buf: &mut FrameBuffer) {
///         // Paint the UI here...
///     }
/// }
///
/// EventLoop::new().run(&mut MyApp)?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct EventLoop {
    terminal: Terminal,
    parser: Parser,
    renderer: DiffRenderer,
    config: LoopConfig,
}

impl EventLoop {
    /// Create an event loop with default timing.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LoopConfig::default())
    }

    /// Create an event loop with custom timing.
    #[must_use]
    pub fn with_config(config: LoopConfig) -> Self {
        Self {
            terminal: Terminal::new(),
            parser: Parser::new(),
            renderer: DiffRenderer::new(),
            config,
        }
    }

    /// The current terminal size.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Enter the terminal, run until the app quits, and restore the
    /// terminal, even when the loop fails.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup, reading stdin, or rendering fails.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        install_sigwinch_handler();

        let result = self.run_inner(app);
        let restored = self.terminal.leave();
        loop_result(result, restored)
    }

    fn run_inner(&mut self, app: &mut impl App) -> io::Result<()> {
        let size = self.terminal.size();
        let mut frame = FrameBuffer::new(size.cols, size.rows);
        let mut read_buf = [0u8; READ_BUF_SIZE];
        let mut dirty = true;

        loop {
            // ── Render if dirty ──────────────────────────────────
            if dirty {
                self.draw(app, &mut frame)?;
                dirty = false;
            }

            // ── Wait for input ───────────────────────────────────
            let events = match poll_stdin(&mut read_buf, self.config.poll_timeout_ms)? {
                Input::Bytes(n) => self.parser.advance(&read_buf[..n]),
                Input::Timeout if self.parser.has_pending() => self.parser.flush(),
                Input::Timeout => Vec::new(),
                Input::Eof => {
                    tracing::debug!("stdin closed, leaving event loop");
                    return Ok(());
                }
            };

            match dispatch(app, &events) {
                Some(Action::Quit) => return Ok(()),
                Some(Action::Continue) => dirty = true,
                None => {}
            }

            // ── Check for terminal resize ────────────────────────
            if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
                let new_size = self.terminal.resized();
                tracing::debug!(cols = new_size.cols, rows = new_size.rows, "terminal resized");
                frame.resize(new_size.cols, new_size.rows);
                self.renderer.force_redraw();
                app.on_resize(new_size);
                dirty = true;
            }
        }
    }

    fn draw(&mut self, app: &mut impl App, frame: &mut FrameBuffer) -> io::Result<()> {
        frame.clear();
        app.paint(frame);
        let stats = self.renderer.render(frame);
        tracing::trace!(
            rendered = stats.cells_rendered,
            skipped = stats.cells_skipped,
            bytes = stats.bytes_written,
            "frame"
        );
        self.renderer.flush()?;

        let cursor = match app.cursor() {
            Some((x, y, shape)) => vec![
                Command::MoveTo { x, y },
                Command::SetCursorShape(shape),
                Command::ShowCursor,
            ],
            None => vec![Command::HideCursor],
        };
        let mut lock = io::stdout().lock();
        lock.write_all(&ansi::encode(&cursor))?;
        lock.flush()
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

/// Combine the loop result with the terminal restore. The loop's own error
/// wins; a restore failure after a clean loop is returned.
fn loop_result(result: io::Result<()>, restored: io::Result<()>) -> io::Result<()> {
    if let (Err(loop_err), Err(leave_err)) = (&result, &restored) {
        tracing::error!(%leave_err, %loop_err, "terminal restore failed after loop error");
    }
    result.and(restored)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyCode, KeyEvent};

    struct Recorder {
        seen: Vec<Event>,
        quit_on: Option<Event>,
    }

    impl App for Recorder {
        fn on_event(&mut self, event: &Event) -> Action {
            self.seen.push(*event);
            if self.quit_on == Some(*event) {
                Action::Quit
            } else {
                Action::Continue
            }
        }

        fn paint(&mut self, _buf: &mut FrameBuffer) {}
    }

    fn key(ch: char) -> Event {
        Event::Key(KeyEvent::plain(KeyCode::Char(ch)))
    }

    // ── Dispatch ────────────────────────────────────────────────

    #[test]
    fn dispatch_empty_batch_is_not_dirty() {
        let mut app = Recorder { seen: Vec::new(), quit_on: None };
        assert_eq!(dispatch(&mut app, &[]), None);
    }

    #[test]
    fn dispatch_delivers_in_order() {
        let mut app = Recorder { seen: Vec::new(), quit_on: None };
        assert_eq!(dispatch(&mut app, &[key('a'), key('b')]), Some(Action::Continue));
        assert_eq!(app.seen, vec![key('a'), key('b')]);
    }

    #[test]
    fn dispatch_stops_at_quit() {
        let quit = Event::Key(KeyEvent::ctrl('q'));
        let mut app = Recorder { seen: Vec::new(), quit_on: Some(quit) };
        assert_eq!(dispatch(&mut app, &[key('a'), quit, key('b')]), Some(Action::Quit));
        assert_eq!(app.seen, vec![key('a'), quit]);
    }

    // ── Config & flags ──────────────────────────────────────────

    #[test]
    fn default_poll_timeout() {
        assert_eq!(LoopConfig::default().poll_timeout_ms, 25);
    }

    #[test]
    fn event_loop_has_nonzero_size() {
        let event_loop = EventLoop::with_config(LoopConfig { poll_timeout_ms: 10 });
        assert!(event_loop.size().cols > 0);
        assert_eq!(event_loop.config.poll_timeout_ms, 10);
    }

    #[test]
    fn sigwinch_flag_swap() {
        SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
        assert!(SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed));
        assert!(!SIGWINCH_RECEIVED.load(Ordering::Relaxed));
    }

    // ── App defaults ────────────────────────────────────────────

    struct MinimalApp;
    impl App for MinimalApp {
        fn paint(&mut self, _buf: &mut FrameBuffer) {}
    }

    #[test]
    fn app_defaults() {
        let mut app = MinimalApp;
        assert_eq!(app.on_event(&key('x')), Action::Continue);
        app.on_resize(Size { cols: 100, rows: 50 });
        assert!(app.cursor().is_none());
    }

    #[test]
    fn restore_error_is_not_dropped() {
        let broken = || Err(io::Error::other("restore"));
        let err = loop_result(Ok(()), broken()).unwrap_err();
        assert_eq!(err.to_string(), "restore");

        let err = loop_result(Err(io::Error::other("read")), broken()).unwrap_err();
        assert_eq!(err.to_string(), "read");

        assert!(loop_result(Ok(()), Ok(())).is_ok());
    }
}
