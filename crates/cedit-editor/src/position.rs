//! Text position type.
//!
//! All coordinates are **0-indexed**. Line 0 is the first line, column 0 is
//! the first character. Columns count Unicode scalar values (chars), not
//! bytes, and every char occupies one screen column.
//!
//! Display layers (status line, error messages) show 1-indexed values
//! through the `Display` impl; that conversion never happens anywhere else.

use std::fmt;

/// A position in a line store: (line, column), both 0-indexed.
///
/// `col` may equal the line's length, which is the insertion point after
/// the last character.
///
/// Positions order lexicographically: line first, then column.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    /// The origin: line 0, column 0.
    pub const ZERO: Self = Self { line: 0, col: 0 };

    /// Create a new position.
    #[inline]
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}:{})", self.line, self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
