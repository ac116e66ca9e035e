// SPDX-License-Identifier: MIT
//
// cedit: a small terminal editor for C sources with live syntax coloring.
//
// This is the main binary that wires together all the crates:
//
//   cedit-term   → terminal control, rendering, input parsing, event loop
//   cedit-editor → line store, cursor, highlighter, session, view
//   cedit-theme  → colors for every highlight group
//
// The Editor struct implements cedit-term's App trait. Each keypress flows
// through:
//
//   stdin → parser → on_event → EditEvent → Session::apply
//   paint → view.render → framebuffer → diff renderer → terminal
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ text area + gutter           │  ← h - 2 rows (managed by View)
//   ├──────────────────────────────┤
//   │ status line                  │  ← 1 row (managed by View)
//   ├──────────────────────────────┤
//   │ message line                 │  ← 1 row (managed by Editor)
//   └──────────────────────────────┘

use std::error::Error;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;

use clap::Parser;

use cedit_editor::buffer::LoadReport;
use cedit_editor::config::Config;
use cedit_editor::error::ConfigError;
use cedit_editor::session::{EditEvent, Outcome, Session};
use cedit_editor::view::{self, MessageKind, View, CHROME_ROWS};

use cedit_term::ansi::CursorShape;
use cedit_term::buffer::FrameBuffer;
use cedit_term::event_loop::{Action, App, EventLoop};
use cedit_term::input::{Event, KeyCode, KeyEvent, Modifiers};
use cedit_term::terminal::{self, Size};

use cedit_theme::{builtin_names, builtin_theme, Theme};

/// Environment variable naming a log file.
const LOG_FILE_ENV: &str = "CEDIT_LOG_FILE";

/// Environment variable holding the log filter.
const LOG_FILTER_ENV: &str = "CEDIT_LOG";

// ─── Command line ───────────────────────────────────────────────────────────

/// Command line arguments. Flags override the config file.
#[derive(Debug, Parser)]
#[command(name = "cedit", version)]
#[command(about = "A small terminal editor for C sources with live syntax coloring")]
struct Cli {
    /// File to edit. Created on first save if it doesn't exist.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Config file (default: $CEDIT_CONFIG, then <config dir>/cedit/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Builtin theme
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,

    /// Maximum number of lines
    #[arg(long, value_name = "N")]
    max_lines: Option<usize>,

    /// Maximum characters per line
    #[arg(long, value_name = "N")]
    max_cols: Option<usize>,

    /// Show line numbers
    #[arg(long)]
    line_numbers: bool,

    /// Write logs to this file (default: $CEDIT_LOG_FILE; no logging if unset)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Layer the flags on top of `config` and re-validate.
    fn apply_overrides(&self, mut config: Config) -> Result<Config, ConfigError> {
        if let Some(theme) = &self.theme {
            config.theme.clone_from(theme);
        }
        if let Some(n) = self.max_lines {
            config.limits.max_lines = n;
        }
        if let Some(n) = self.max_cols {
            config.limits.max_cols = n;
        }
        if self.line_numbers {
            config.line_numbers = true;
        }
        config.validate()?;
        Ok(config)
    }
}

// ─── Logging ────────────────────────────────────────────────────────────────

/// Install a file logger. The terminal belongs to the UI, so without a log
/// file nothing is installed and tracing macros are no-ops.
fn setup_tracing(log_file: Option<&Path>) -> io::Result<()> {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_path = std::env::var_os(LOG_FILE_ENV).map(PathBuf::from);
    let Some(path) = log_file.or(env_path.as_deref()) else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter =
        EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("cedit=info"));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry().with(filter).with(file_layer).init();
    tracing::info!(path = %path.display(), "tracing initialized");
    Ok(())
}

// ─── Editor ─────────────────────────────────────────────────────────────────

/// The application: one session, its view, and the message line.
struct Editor {
    session: Session,
    view: View,
    theme: Theme,

    /// Shown on the bottom line. Cleared on the next keypress.
    message: Option<(String, MessageKind)>,

    /// Screen position of the cursor from the last paint.
    cursor_screen: Option<(u16, u16)>,

    /// Text rows from the last paint, for PageUp/PageDown.
    last_text_height: usize,
}

impl Editor {
    fn new(session: Session, config: &Config, theme: Theme) -> Self {
        let mut view = View::new();
        view.set_line_numbers(config.line_numbers);
        view.set_tab_width(config.tab_width);
        Self {
            session,
            view,
            theme,
            message: None,
            cursor_screen: None,
            last_text_height: 20,
        }
    }

    /// Open `file` (or the configured default) and set the startup message.
    fn open(file: Option<&Path>, config: &Config, theme: Theme) -> Result<Self, Box<dyn Error>> {
        let path = file.unwrap_or(config.default_file.as_path());
        let existed = path.exists();
        let (session, report) = Session::open(path, config)?;

        let mut editor = Self::new(session, config, theme);
        editor.announce_load(existed, report);
        Ok(editor)
    }

    fn announce_load(&mut self, existed: bool, report: LoadReport) {
        let name = self.session.display_name();
        if !report.is_clean() {
            self.set_error(format!(
                "\"{name}\" did not fit: {} long lines wrapped, {} lines dropped",
                report.wrapped_lines, report.dropped_lines
            ));
        } else if existed {
            let lines = self.session.store().line_count();
            self.set_message(format!("\"{name}\" {lines} lines"));
        } else {
            self.set_message(format!("\"{name}\" [New]"));
        }
    }

    fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some((msg.into(), MessageKind::Info));
    }

    fn set_error(&mut self, msg: impl Into<String>) {
        self.message = Some((msg.into(), MessageKind::Error));
    }

    /// Apply one edit event and turn its outcome into a message or a quit.
    fn apply(&mut self, event: EditEvent) -> Action {
        match self.session.apply(event) {
            Ok(Outcome::Quit) => return Action::Quit,
            Ok(Outcome::QuitBlocked) => {
                self.set_error("No write since last change (Ctrl-Q again to quit)");
            }
            Ok(Outcome::Saved { path, lines, bytes }) => {
                self.set_message(format!("\"{}\" written, {lines} lines, {bytes} bytes", path.display()));
            }
            Ok(Outcome::Moved | Outcome::Edited) => {}
            Err(err) => {
                tracing::warn!(?event, %err, "edit failed");
                self.set_error(err.to_string());
            }
        }
        Action::Continue
    }

    fn page(&mut self, event: EditEvent) {
        for _ in 0..self.last_text_height.max(1) {
            self.apply(event);
        }
    }
}

/// Map a key press to an edit event. Keys with no editing meaning map to
/// `None`.
fn key_to_event(key: &KeyEvent) -> Option<EditEvent> {
    if key.modifiers.contains(Modifiers::CTRL) {
        return match key.code {
            KeyCode::Char('s') => Some(EditEvent::Save),
            KeyCode::Char('q') => Some(EditEvent::Quit),
            _ => None,
        };
    }
    if key.modifiers.contains(Modifiers::ALT) {
        return None;
    }

    match key.code {
        KeyCode::Up => Some(EditEvent::MoveUp),
        KeyCode::Down => Some(EditEvent::MoveDown),
        KeyCode::Left => Some(EditEvent::MoveLeft),
        KeyCode::Right => Some(EditEvent::MoveRight),
        KeyCode::Home => Some(EditEvent::LineStart),
        KeyCode::End => Some(EditEvent::LineEnd),
        KeyCode::Enter => Some(EditEvent::SplitLine),
        KeyCode::Backspace => Some(EditEvent::DeleteBefore),
        KeyCode::Tab => Some(EditEvent::Insert('\t')),
        KeyCode::Char(ch) if !ch.is_control() => Some(EditEvent::Insert(ch)),
        _ => None,
    }
}

// ─── App implementation ─────────────────────────────────────────────────────

impl App for Editor {
    fn on_event(&mut self, event: &Event) -> Action {
        let Event::Key(key) = event;
        self.message = None;

        match key.code {
            KeyCode::PageUp => self.page(EditEvent::MoveUp),
            KeyCode::PageDown => self.page(EditEvent::MoveDown),
            _ => {
                if let Some(edit) = key_to_event(key) {
                    return self.apply(edit);
                }
            }
        }
        Action::Continue
    }

    fn on_resize(&mut self, size: Size) {
        tracing::debug!(cols = size.cols, rows = size.rows, "resize");
    }

    fn paint(&mut self, frame: &mut FrameBuffer) {
        self.last_text_height = usize::from(frame.height().saturating_sub(CHROME_ROWS));
        self.cursor_screen = self.view.render(&self.session, &self.theme, frame);

        let (text, kind) = self
            .message
            .as_ref()
            .map_or(("", MessageKind::Info), |(text, kind)| (text.as_str(), *kind));
        view::render_message_line(frame, &self.theme, text, kind);
    }

    fn cursor(&self) -> Option<(u16, u16, CursorShape)> {
        let (x, y) = self.cursor_screen?;
        Some((x, y, CursorShape::SteadyBar))
    }
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    setup_tracing(cli.log_file.as_deref())?;

    let config = cli.apply_overrides(Config::resolve(cli.config.as_deref())?)?;
    let theme = builtin_theme(&config.theme).ok_or_else(|| {
        format!(
            "unknown theme '{}' (available: {})",
            config.theme,
            builtin_names().join(", ")
        )
    })?;

    if !terminal::is_tty() {
        return Err("stdin is not a terminal".into());
    }

    let mut editor = Editor::open(cli.file.as_deref(), &config, theme)?;
    EventLoop::new().run(&mut editor)?;
    tracing::info!("exit");
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("cedit: {e}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
