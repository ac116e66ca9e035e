//! Cursor: a clamped position in a line store.
//!
//! The `Cursor` does not own or reference the store; the store is passed to
//! each movement method. Every method leaves the cursor inside the store:
//! `line < line_count` and `col <= line_len(line)`.
//!
//! There is no sticky column. Moving up or down onto a shorter line clamps
//! the column to that line's length, and moving back to a longer line keeps
//! the clamped column.
//!
//! Horizontal movement never wraps: `move_left` stops at column 0 and
//! `move_right` stops at the end of the line.

use crate::buffer::LineStore;
use crate::position::Position;

/// A cursor in a line store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pos: Position,
}

impl Cursor {
    /// Create a cursor at the origin.
    #[must_use]
    pub const fn new() -> Self {
        Self { pos: Position::ZERO }
    }

    // -- Accessors ----------------------------------------------------------

    /// Current position.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Position {
        self.pos
    }

    /// Current line (0-indexed).
    #[inline]
    #[must_use]
    pub const fn line(&self) -> usize {
        self.pos.line
    }

    /// Current column (0-indexed, char offset).
    #[inline]
    #[must_use]
    pub const fn col(&self) -> usize {
        self.pos.col
    }

    // -- Movement -----------------------------------------------------------

    /// Move up one line, clamping the column. No-op on line 0.
    pub fn move_up(&mut self, store: &LineStore) {
        if self.pos.line > 0 {
            self.pos.line -= 1;
            self.clamp(store);
        }
    }

    /// Move down one line, clamping the column. No-op on the last line.
    pub fn move_down(&mut self, store: &LineStore) {
        if self.pos.line + 1 < store.line_count() {
            self.pos.line += 1;
            self.clamp(store);
        }
    }

    /// Move left one character. Stops at column 0.
    pub const fn move_left(&mut self) {
        self.pos.col = self.pos.col.saturating_sub(1);
    }

    /// Move right one character. Stops at the end of the line.
    pub fn move_right(&mut self, store: &LineStore) {
        if self.pos.col < line_len(store, self.pos.line) {
            self.pos.col += 1;
        }
    }

    /// Move to column 0.
    pub const fn move_to_line_start(&mut self) {
        self.pos.col = 0;
    }

    /// Move past the last character of the line.
    pub fn move_to_line_end(&mut self, store: &LineStore) {
        self.pos.col = line_len(store, self.pos.line);
    }

    /// Jump to `pos`, clamped into the store.
    pub fn set_position(&mut self, pos: Position, store: &LineStore) {
        self.pos = pos;
        self.clamp(store);
    }

    /// Pull the cursor back inside the store after a mutation.
    pub fn clamp(&mut self, store: &LineStore) {
        let last = store.line_count().saturating_sub(1);
        self.pos.line = self.pos.line.min(last);
        self.pos.col = self.pos.col.min(line_len(store, self.pos.line));
    }
}

fn line_len(store: &LineStore, line: usize) -> usize {
    store.line_len(line).unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Limits;

    fn store(text: &str) -> LineStore {
        LineStore::from_text(text, Limits::default()).0
    }

    fn at(line: usize, col: usize, s: &LineStore) -> Cursor {
        let mut c = Cursor::new();
        c.set_position(Position::new(line, col), s);
        c
    }

    #[test]
    fn default_is_origin() {
        assert_eq!(Cursor::default(), Cursor::new());
        assert_eq!(Cursor::default().position(), Position::ZERO);
    }

    // -- Vertical -----------------------------------------------------------

    #[test]
    fn move_down_clamps_to_shorter_line() {
        let s = store("long line\nab\nanother long\n");
        let mut c = at(0, 8, &s);
        c.move_down(&s);
        assert_eq!(c.position(), Position::new(1, 2));
    }

    #[test]
    fn no_sticky_column() {
        let s = store("long line\nab\nanother long\n");
        let mut c = at(0, 8, &s);
        c.move_down(&s);
        c.move_down(&s);
        assert_eq!(c.position(), Position::new(2, 2));
    }

    #[test]
    fn vertical_stops_at_edges() {
        let s = store("a\nb\n");
        let mut c = Cursor::new();
        c.move_up(&s);
        assert_eq!(c.position(), Position::ZERO);
        c.move_down(&s);
        c.move_down(&s);
        assert_eq!(c.line(), 1);
    }

    #[test]
    fn move_up_clamps() {
        let s = store("x\nlonger\n");
        let mut c = at(1, 6, &s);
        c.move_up(&s);
        assert_eq!(c.position(), Position::new(0, 1));
    }

    // -- Horizontal ---------------------------------------------------------

    #[test]
    fn left_stops_at_column_zero() {
        let s = store("a\nbc\n");
        let mut c = at(1, 0, &s);
        c.move_left();
        assert_eq!(c.position(), Position::new(1, 0));
    }

    #[test]
    fn right_stops_at_line_end() {
        let s = store("ab\ncd\n");
        let mut c = at(0, 2, &s);
        c.move_right(&s);
        assert_eq!(c.position(), Position::new(0, 2));
    }

    #[test]
    fn right_counts_chars_not_bytes() {
        let s = store("é\n");
        let mut c = Cursor::new();
        c.move_right(&s);
        c.move_right(&s);
        assert_eq!(c.col(), 1);
    }

    #[test]
    fn line_start_and_end() {
        let s = store("hello\n");
        let mut c = at(0, 2, &s);
        c.move_to_line_end(&s);
        assert_eq!(c.col(), 5);
        c.move_to_line_start();
        assert_eq!(c.col(), 0);
    }

    // -- Clamping -----------------------------------------------------------

    #[test]
    fn set_position_clamps_past_end() {
        let s = store("abc\nde\n");
        let c = at(9, 9, &s);
        assert_eq!(c.position(), Position::new(1, 2));
    }

    #[test]
    fn clamp_after_store_shrinks() {
        let mut s = store("abc\nde\n");
        let mut c = at(1, 0, &s);
        s.delete_char_before(c.position()).unwrap();
        c.set_position(Position::new(1, 5), &s);
        assert_eq!(c.position(), Position::new(0, 5));
    }
}
