// SPDX-License-Identifier: MIT
//
// FrameBuffer: the 2D cell grid that everything paints to.
//
// The editor's view, status line and message line paint here. The diff
// renderer then compares this frame against the previous one and emits
// minimal ANSI for the changes.
//
// Design:
//
//   - Flat `Vec<Cell>` with row-major indexing. A row's cells are
//     contiguous, so the renderer's left-to-right scan is linear and a
//     whole row can be compared with one slice equality.
//
//   - One character per column. Text painting goes through `put_char`,
//     which replaces anything that is not exactly one column wide
//     (control characters, combining marks, CJK) with a single
//     placeholder so the screen never drifts out of step with the grid.

use unicode_width::UnicodeWidthChar;

use crate::cell::{Attr, Cell};
use crate::color::CellColor;

/// Shown in place of characters that don't occupy exactly one column.
pub const PLACEHOLDER: char = '\u{FFFD}';

// ─── FrameBuffer ────────────────────────────────────────────────────────────────

/// A 2D buffer of terminal cells.
///
/// ```
/// use cedit_term::buffer::FrameBuffer;
/// use cedit_term::cell::Cell;
///
/// let mut buf = FrameBuffer::new(80, 24);
/// buf.set(5, 3, Cell::new('X'));
/// assert_eq!(buf.get(5, 3).unwrap().ch, 'X');
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    // ─── Construction ────────────────────────────────────────────────────

    /// Create a buffer filled with empty cells.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let size = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; size],
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    /// Buffer width in columns.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Buffer height in rows.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Whether `(x, y)` is within the buffer.
    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    const fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get a cell reference, or `None` if out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// A single row as a slice. Returns `None` if `y` is out of bounds.
    #[inline]
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y < self.height {
            let start = self.index(0, y);
            Some(&self.cells[start..start + usize::from(self.width)])
        } else {
            None
        }
    }

    /// The characters of one row as a `String` (for tests and debugging).
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        self.row(y).map_or_else(String::new, |cells| {
            cells.iter().map(|c| c.ch).collect()
        })
    }

    // ─── Clear & Resize ──────────────────────────────────────────────────

    /// Clear the buffer to empty cells.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Resize the buffer, clearing all content.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let size = usize::from(width) * usize::from(height);
        self.cells.clear();
        self.cells.resize(size, Cell::EMPTY);
    }

    /// Copy another buffer's cells into this one. Both must have the same
    /// dimensions; a mismatched source is ignored.
    pub fn copy_from(&mut self, other: &Self) {
        if self.width == other.width && self.height == other.height {
            self.cells.copy_from_slice(&other.cells);
        }
    }

    // ─── Painting ────────────────────────────────────────────────────────

    /// Write a cell directly. Returns `true` if the position was in bounds.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.index(x, y);
        self.cells[idx] = cell;
        true
    }

    /// Paint one character with styling, substituting [`PLACEHOLDER`] for
    /// anything that isn't exactly one column wide.
    #[inline]
    pub fn put_char(
        &mut self,
        x: u16,
        y: u16,
        ch: char,
        fg: CellColor,
        bg: CellColor,
        attrs: Attr,
    ) -> bool {
        self.set(x, y, Cell::styled(display_char(ch), fg, bg, attrs))
    }

    /// Paint a string left to right starting at `(x, y)`, clipped to the
    /// buffer width. Returns the number of columns painted.
    pub fn put_str(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        fg: CellColor,
        bg: CellColor,
        attrs: Attr,
    ) -> u16 {
        if y >= self.height {
            return 0;
        }
        let mut col = x;
        for ch in text.chars() {
            if col >= self.width {
                break;
            }
            self.put_char(col, y, ch, fg, bg, attrs);
            col += 1;
        }
        col - x
    }

    /// Fill `width` columns of row `y` starting at `x` with styled spaces.
    pub fn fill(&mut self, x: u16, y: u16, width: u16, fg: CellColor, bg: CellColor, attrs: Attr) {
        let end = x.saturating_add(width).min(self.width);
        for col in x..end {
            self.set(col, y, Cell::styled(' ', fg, bg, attrs));
        }
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FrameBuffer({}x{})", self.width, self.height)
    }
}

// ─── Character Width ────────────────────────────────────────────────────────────

/// The character actually drawn for `ch`: itself when it is one column
/// wide, otherwise [`PLACEHOLDER`].
///
/// ```
/// use cedit_term::buffer::{display_char, PLACEHOLDER};
///
/// assert_eq!(display_char('a'), 'a');
/// assert_eq!(display_char('é'), 'é');
/// assert_eq!(display_char('中'), PLACEHOLDER);
/// assert_eq!(display_char('\x07'), PLACEHOLDER);
/// ```
#[inline]
#[must_use]
pub fn display_char(ch: char) -> char {
    if ch.width() == Some(1) { ch } else { PLACEHOLDER }
}

// ─── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── Construction ────────────────────────────────────────────────────

    #[test]
    fn new_buffer_is_empty() {
        let buf = FrameBuffer::new(4, 2);
        assert_eq!(buf.width(), 4);
        assert_eq!(buf.height(), 2);
        assert!(buf.get(3, 1).unwrap().is_empty());
        assert_eq!(buf.row_text(0), "    ");
    }

    #[test]
    fn zero_sized_buffer_has_no_cells() {
        let buf = FrameBuffer::new(0, 0);
        assert!(buf.get(0, 0).is_none());
        assert!(buf.row(0).is_none());
    }

    // ── Accessors ───────────────────────────────────────────────────────

    #[test]
    fn get_out_of_bounds() {
        let buf = FrameBuffer::new(3, 3);
        assert!(buf.get(3, 0).is_none());
        assert!(buf.get(0, 3).is_none());
    }

    #[test]
    fn row_is_contiguous() {
        let mut buf = FrameBuffer::new(3, 2);
        buf.set(0, 1, Cell::new('a'));
        buf.set(2, 1, Cell::new('c'));
        assert_eq!(buf.row_text(1), "a c");
        assert_eq!(buf.row(1).unwrap().len(), 3);
    }

    // ── Clear, resize, copy ─────────────────────────────────────────────

    #[test]
    fn clear_resets_all_cells() {
        let mut buf = FrameBuffer::new(2, 2);
        buf.set(1, 1, Cell::new('x'));
        buf.clear();
        assert!(buf.get(1, 1).unwrap().is_empty());
    }

    #[test]
    fn resize_changes_dimensions_and_clears() {
        let mut buf = FrameBuffer::new(2, 2);
        buf.set(0, 0, Cell::new('x'));
        buf.resize(5, 3);
        assert_eq!((buf.width(), buf.height()), (5, 3));
        assert!(buf.get(0, 0).unwrap().is_empty());
        assert!(buf.get(4, 2).is_some());
    }

    #[test]
    fn copy_from_same_size() {
        let mut a = FrameBuffer::new(3, 1);
        let mut b = FrameBuffer::new(3, 1);
        b.set(1, 0, Cell::new('q'));
        a.copy_from(&b);
        assert_eq!(a, b);
    }

    #[test]
    fn copy_from_mismatched_size_is_ignored() {
        let mut a = FrameBuffer::new(3, 1);
        let b = FrameBuffer::new(4, 1);
        a.copy_from(&b);
        assert_eq!(a.width(), 3);
    }

    // ── Painting ────────────────────────────────────────────────────────

    #[test]
    fn set_out_of_bounds_returns_false() {
        let mut buf = FrameBuffer::new(2, 2);
        assert!(!buf.set(2, 0, Cell::new('x')));
        assert!(buf.set(1, 1, Cell::new('x')));
    }

    #[test]
    fn put_str_clips_at_width() {
        let mut buf = FrameBuffer::new(5, 1);
        let n = buf.put_str(2, 0, "hello", CellColor::Default, CellColor::Default, Attr::empty());
        assert_eq!(n, 3);
        assert_eq!(buf.row_text(0), "  hel");
    }

    #[test]
    fn put_str_applies_style() {
        let mut buf = FrameBuffer::new(3, 1);
        buf.put_str(0, 0, "ab", CellColor::Ansi256(4), CellColor::Default, Attr::BOLD);
        let cell = buf.get(1, 0).unwrap();
        assert_eq!(cell.fg, CellColor::Ansi256(4));
        assert_eq!(cell.attrs, Attr::BOLD);
    }

    #[test]
    fn put_str_below_buffer_paints_nothing() {
        let mut buf = FrameBuffer::new(3, 1);
        assert_eq!(buf.put_str(0, 1, "ab", CellColor::Default, CellColor::Default, Attr::empty()), 0);
    }

    #[test]
    fn wide_and_control_chars_become_placeholders() {
        let mut buf = FrameBuffer::new(4, 1);
        buf.put_str(0, 0, "a中\tb", CellColor::Default, CellColor::Default, Attr::empty());
        assert_eq!(buf.row_text(0), format!("a{PLACEHOLDER}{PLACEHOLDER}b"));
    }

    #[test]
    fn fill_clips_to_width() {
        let mut buf = FrameBuffer::new(4, 1);
        buf.fill(2, 0, 10, CellColor::Default, CellColor::Default, Attr::INVERSE);
        assert!(buf.get(1, 0).unwrap().attrs.is_empty());
        assert_eq!(buf.get(3, 0).unwrap().attrs, Attr::INVERSE);
    }
}
