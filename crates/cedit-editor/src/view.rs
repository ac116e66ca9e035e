//! View: the bridge from a session to the frame buffer.
//!
//! A `View` holds scroll state and display options; the session and the
//! theme are passed to [`render`](View::render). The screen is laid out as:
//!
//! ```text
//! ┌──────┬────────────────────────┐
//! │gutter│      text area         │ ← height - 2 rows
//! │      │                        │
//! ├──────┴────────────────────────┤
//! │         status line           │ ← 1 row
//! ├───────────────────────────────┤
//! │         message line          │ ← 1 row
//! └───────────────────────────────┘
//! ```
//!
//! Every char occupies one screen column except tabs, which expand to the
//! next tab stop. Characters that aren't one column wide are drawn as a
//! placeholder by the frame buffer.
//!
//! Syntax colors come from [`highlight_window`], which replays the block
//! comment state from line 0 on every render.

use cedit_term::buffer::FrameBuffer;
use cedit_theme::{HighlightGroup, Theme};

use crate::buffer::LineStore;
use crate::cursor::Cursor;
use crate::highlight::{highlight_window, Category, LineHighlight};
use crate::session::Session;

/// Rows below the text area: status line and message line.
pub const CHROME_ROWS: u16 = 2;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Gutter width for line numbers: digits of the largest line number plus a
/// separator space. 0 when line numbers are off.
#[must_use]
pub fn gutter_width(line_count: usize, show_numbers: bool) -> u16 {
    if !show_numbers {
        return 0;
    }
    let digits = line_count.max(1).ilog10() + 1;
    #[allow(clippy::cast_possible_truncation)]
    let width = digits as u16 + 1;
    width
}

/// Display column of char column `char_col`, expanding tabs.
#[must_use]
pub fn char_col_to_display_col<I: Iterator<Item = char>>(
    chars: I,
    char_col: usize,
    tab_width: u8,
) -> usize {
    let tab_w = usize::from(tab_width.max(1));
    chars.take(char_col).fold(0, |col, ch| {
        if ch == '\t' { (col / tab_w + 1) * tab_w } else { col + 1 }
    })
}

/// Theme group for a token category.
#[must_use]
pub fn group_for(theme: &Theme, category: Category) -> HighlightGroup {
    match category {
        Category::Keyword => theme.syntax.keyword,
        Category::String => theme.syntax.string,
        Category::CharLiteral => theme.syntax.char_literal,
        Category::Comment => theme.syntax.comment,
        Category::Preprocessor => theme.syntax.preprocessor,
        Category::Number => theme.syntax.number,
        Category::Plain => theme.normal,
    }
}

/// Kind of text on the message line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// Scroll state and display options for one session.
#[derive(Debug, Clone)]
pub struct View {
    /// First visible line.
    top_line: usize,
    /// Horizontal scroll offset in display columns.
    left_col: usize,
    line_numbers: bool,
    tab_width: u8,
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

impl View {
    /// Line numbers off, 8-column tab stops.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            top_line: 0,
            left_col: 0,
            line_numbers: false,
            tab_width: 8,
        }
    }

    // -- Accessors ----------------------------------------------------------

    #[inline]
    #[must_use]
    pub const fn top_line(&self) -> usize {
        self.top_line
    }

    #[inline]
    #[must_use]
    pub const fn left_col(&self) -> usize {
        self.left_col
    }

    #[inline]
    #[must_use]
    pub const fn line_numbers(&self) -> bool {
        self.line_numbers
    }

    #[inline]
    #[must_use]
    pub const fn tab_width(&self) -> u8 {
        self.tab_width
    }

    // -- Configuration ------------------------------------------------------

    pub const fn set_line_numbers(&mut self, show: bool) {
        self.line_numbers = show;
    }

    /// Set the tab stop width (minimum 1).
    pub fn set_tab_width(&mut self, width: u8) {
        self.tab_width = width.max(1);
    }

    // -- Scrolling ----------------------------------------------------------

    /// Scroll so the cursor is inside a text area of the given size.
    ///
    /// A cursor above the window becomes the top line; a cursor below it
    /// becomes the bottom line. Columns work the same way.
    pub fn ensure_cursor_visible(
        &mut self,
        cursor: &Cursor,
        store: &LineStore,
        text_width: u16,
        text_height: u16,
    ) {
        let (text_width, text_height) = (usize::from(text_width), usize::from(text_height));
        if text_width == 0 || text_height == 0 {
            return;
        }

        let line = cursor.line();
        if line < self.top_line {
            self.top_line = line;
        } else if line >= self.top_line + text_height {
            self.top_line = line + 1 - text_height;
        }

        let display_col = store.line(line).map_or(0, |text| {
            char_col_to_display_col(text.chars(), cursor.col(), self.tab_width)
        });
        if display_col < self.left_col {
            self.left_col = display_col;
        } else if display_col >= self.left_col + text_width {
            self.left_col = display_col + 1 - text_width;
        }

        tracing::trace!(top = self.top_line, left = self.left_col, "scroll");
    }

    // -- Rendering ----------------------------------------------------------

    /// Paint the text area and status line of `session` into `frame`.
    ///
    /// The bottom row is left for [`render_message_line`]. Returns the
    /// cursor's screen position, or `None` if the frame has no text area.
    pub fn render(
        &mut self,
        session: &Session,
        theme: &Theme,
        frame: &mut FrameBuffer,
    ) -> Option<(u16, u16)> {
        let width = frame.width();
        let text_height = frame.height().saturating_sub(CHROME_ROWS);
        if width == 0 {
            return None;
        }

        let store = session.store();
        let cursor = session.cursor();
        let line_count = store.line_count();
        let gw = gutter_width(line_count, self.line_numbers).min(width);
        let text_width = width - gw;

        self.ensure_cursor_visible(cursor, store, text_width, text_height);

        let window = highlight_window(store, self.top_line, usize::from(text_height));
        let mut cursor_screen = None;

        for row in 0..text_height {
            let line_idx = self.top_line + usize::from(row);
            let Some(text) = store.line(line_idx) else {
                render_tilde_line(frame, theme, row, width);
                continue;
            };

            if gw > 0 {
                render_line_number(frame, theme, row, gw, line_idx + 1);
            }
            if let Some(hl) = window.get(usize::from(row)) {
                self.render_text_line(frame, theme, text, hl, gw, row, text_width);
            }

            if line_idx == cursor.line() {
                let display_col =
                    char_col_to_display_col(text.chars(), cursor.col(), self.tab_width);
                let offset = display_col.checked_sub(self.left_col);
                if let Some(offset) = offset.filter(|&o| o < usize::from(text_width)) {
                    #[allow(clippy::cast_possible_truncation)]
                    let offset = offset as u16;
                    cursor_screen = Some((gw + offset, row));
                }
            }
        }

        if frame.height() > 1 {
            render_status_line(frame, theme, session, text_height, width);
        }

        cursor_screen
    }

    /// Paint one line: fill with the normal style, then each visible char
    /// in the style of the token covering it.
    #[allow(clippy::too_many_arguments)]
    fn render_text_line(
        &self,
        frame: &mut FrameBuffer,
        theme: &Theme,
        text: &str,
        hl: &LineHighlight,
        x: u16,
        y: u16,
        width: u16,
    ) {
        let normal = theme.normal;
        frame.fill(x, y, width, normal.fg, normal.bg, normal.attrs);

        let tab_w = usize::from(self.tab_width.max(1));
        let end = self.left_col + usize::from(width);
        let mut tokens = hl.tokens.iter().peekable();
        let mut display_col = 0;

        for (i, ch) in text.chars().enumerate() {
            if display_col >= end {
                break;
            }
            while tokens.next_if(|t| t.end <= i).is_some() {}
            let group = tokens
                .peek()
                .filter(|t| t.start <= i)
                .map_or(normal, |t| group_for(theme, t.category));

            let next = if ch == '\t' { (display_col / tab_w + 1) * tab_w } else { display_col + 1 };
            for col in display_col..next {
                if col < self.left_col || col >= end {
                    continue;
                }
                let shown = if ch == '\t' { ' ' } else { ch };
                #[allow(clippy::cast_possible_truncation)]
                let screen_x = x + (col - self.left_col) as u16;
                frame.put_char(screen_x, y, shown, group.fg, group.bg, group.attrs);
            }
            display_col = next;
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering helpers
// ---------------------------------------------------------------------------

fn render_line_number(frame: &mut FrameBuffer, theme: &Theme, y: u16, gutter_w: u16, line_num: usize) {
    let style = theme.line_nr;
    let digits = usize::from(gutter_w.saturating_sub(1));
    let text = format!("{line_num:>digits$} ");
    frame.fill(0, y, gutter_w, style.fg, style.bg, style.attrs);
    frame.put_str(0, y, &text, style.fg, style.bg, style.attrs);
}

fn render_tilde_line(frame: &mut FrameBuffer, theme: &Theme, y: u16, width: u16) {
    let normal = theme.normal;
    frame.fill(0, y, width, normal.fg, normal.bg, normal.attrs);
    let style = theme.non_text;
    frame.put_char(0, y, '~', style.fg, style.bg, style.attrs);
}

const KEY_HINT: &str = "Ctrl-S: Save | Ctrl-Q: Quit | ";

/// Left: `Ctrl-S: Save | Ctrl-Q: Quit | name [+]`. Right: `line:col`.
fn render_status_line(frame: &mut FrameBuffer, theme: &Theme, session: &Session, y: u16, width: u16) {
    let style = theme.status_line;
    let right = format!(" {} ", session.cursor().position());

    #[allow(clippy::cast_possible_truncation)]
    let right_len = right.chars().count() as u16;
    let right_start = width.saturating_sub(right_len);

    let left = status_left(&session.display_name(), session.is_modified(), usize::from(right_start));

    frame.fill(0, y, width, style.fg, style.bg, style.attrs);
    frame.put_str(0, y, &left, style.fg, style.bg, style.attrs);
    frame.put_str(right_start, y, &right, style.fg, style.bg, style.attrs);
}

/// Left half of the status line in at most `room` columns. The key hint
/// goes first, then the name is shortened from the left; the `[+]` marker
/// stays as long as it fits at all.
fn status_left(name: &str, modified: bool, room: usize) -> String {
    let marker = if modified { " [+]" } else { "" };
    let full = format!(" {KEY_HINT}{name}{marker}");
    if full.chars().count() <= room {
        return full;
    }

    let name_room = room.saturating_sub(1 + marker.len());
    let short = format!(" {}{marker}", shorten_path(name, name_room));
    short.chars().take(room).collect()
}

/// `name` in at most `max` columns, cut from the left behind a `…`,
/// at a `/` when the kept tail has one.
fn shorten_path(name: &str, max: usize) -> String {
    let len = name.chars().count();
    if len <= max {
        return name.to_owned();
    }
    if max == 0 {
        return String::new();
    }

    let tail: String = name.chars().skip(len - (max - 1)).collect();
    let tail = tail.find('/').map_or(tail.as_str(), |i| &tail[i..]);
    format!("…{tail}")
}

/// Paint `text` on the bottom row in the message or error style.
pub fn render_message_line(frame: &mut FrameBuffer, theme: &Theme, text: &str, kind: MessageKind) {
    let Some(y) = frame.height().checked_sub(1) else {
        return;
    };
    let normal = theme.normal;
    frame.fill(0, y, frame.width(), normal.fg, normal.bg, normal.attrs);
    let style = match kind {
        MessageKind::Info => theme.message,
        MessageKind::Error => theme.error,
    };
    frame.put_str(0, y, text, style.fg, style.bg, style.attrs);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
