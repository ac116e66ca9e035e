//! Line store: the editor's text, one owned `String` per line.
//!
//! A `LineStore` is an ordered `Vec<String>` with three structural edits:
//! insert a character, delete the character before a position (merging
//! lines at column 0), and split a line in two. Everything the view and the
//! highlighter need is read through `line(idx)` and `line_count()`.
//!
//! # Design choices
//!
//! - **Columns are char offsets**, never byte offsets. Byte offsets are
//!   computed internally per edit and don't leak into the API.
//!
//! - **Limits are configuration, not constants.** An edit that would push a
//!   line past `max_cols` or the store past `max_lines` is rejected and
//!   reported with [`EditError::CapacityExceeded`]; the store is untouched.
//!
//! - **At least one line, no terminators.** The store starts with one empty
//!   line, never drops to zero, and no line ever contains `\n` or `\r`.
//!
//! - **Persistence is line-oriented.** Each line is written followed by
//!   exactly one `\n`. Loading accepts LF, CRLF and lone CR, wraps lines
//!   that are too long and drops lines past the count limit, reporting both
//!   in a [`LoadReport`].

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Capacity, EditError};
use crate::position::Position;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Capacity limits of a line store. Both values are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum number of lines.
    pub max_lines: usize,
    /// Maximum characters per line.
    pub max_cols: usize,
}

impl Limits {
    pub const DEFAULT_MAX_LINES: usize = 1000;
    pub const DEFAULT_MAX_COLS: usize = 1000;
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_lines: Self::DEFAULT_MAX_LINES,
            max_cols: Self::DEFAULT_MAX_COLS,
        }
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// What loading had to change to fit the text into the limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// Lines (after wrapping) that didn't fit under `max_lines`.
    pub dropped_lines: usize,
    /// Source lines longer than `max_cols` that were split into pieces.
    pub wrapped_lines: usize,
}

impl LoadReport {
    /// True when the loaded store is a faithful copy of the text.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.dropped_lines == 0 && self.wrapped_lines == 0
    }
}

/// What a save wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReport {
    pub lines: usize,
    pub bytes: usize,
}

// ---------------------------------------------------------------------------
// LineStore
// ---------------------------------------------------------------------------

/// Ordered, mutable lines of text bounded by [`Limits`].
#[derive(Clone, PartialEq, Eq)]
pub struct LineStore {
    lines: Vec<String>,
    limits: Limits,
    modified: bool,
}

impl LineStore {
    // -- Construction -------------------------------------------------------

    /// Create a store holding one empty line.
    #[must_use]
    pub fn new(limits: Limits) -> Self {
        Self {
            lines: vec![String::new()],
            limits,
            modified: false,
        }
    }

    /// Build a store from text, fitting it into `limits`.
    ///
    /// `\n`, `\r\n` and a lone `\r` all end a line; a final terminator does
    /// not start an extra empty line. Empty text gives one empty line.
    #[must_use]
    pub fn from_text(text: &str, limits: Limits) -> (Self, LoadReport) {
        let max_lines = limits.max_lines.max(1);
        let max_cols = limits.max_cols.max(1);
        let mut lines = Vec::new();
        let mut report = LoadReport::default();

        for raw in split_lines(text) {
            let len = raw.chars().count();
            if len > max_cols {
                report.wrapped_lines += 1;
            }

            let mut rest = raw;
            loop {
                let cut = byte_index(rest, max_cols).unwrap_or(rest.len());
                let (piece, tail) = rest.split_at(cut);
                if lines.len() < max_lines {
                    lines.push(piece.to_string());
                } else {
                    report.dropped_lines += 1;
                }
                if tail.is_empty() {
                    break;
                }
                rest = tail;
            }
        }

        if lines.is_empty() {
            lines.push(String::new());
        }

        (
            Self {
                lines,
                limits,
                modified: false,
            },
            report,
        )
    }

    // -- Text access --------------------------------------------------------

    /// Number of lines (always at least 1).
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Content of a line, or `None` if `idx` is out of bounds.
    #[inline]
    #[must_use]
    pub fn line(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(String::as_str)
    }

    /// Length of a line in chars, or `None` if `idx` is out of bounds.
    #[must_use]
    pub fn line_len(&self, idx: usize) -> Option<usize> {
        self.line(idx).map(|l| l.chars().count())
    }

    /// All lines in order.
    pub fn lines(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.lines.iter().map(String::as_str)
    }

    /// The whole store as it would be saved: each line plus `\n`.
    #[must_use]
    pub fn contents(&self) -> String {
        let mut out = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    /// The limits this store enforces.
    #[inline]
    #[must_use]
    pub const fn limits(&self) -> Limits {
        self.limits
    }

    // -- Metadata -----------------------------------------------------------

    /// True if the store changed since it was created, loaded or saved.
    #[inline]
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    /// Mark the store as saved (not modified).
    #[inline]
    pub const fn mark_saved(&mut self) {
        self.modified = false;
    }

    // -- Editing ------------------------------------------------------------

    /// Insert `ch` at `pos`, shifting the rest of the line right.
    ///
    /// # Errors
    ///
    /// - [`EditError::InvalidChar`] for `\n` or `\r`.
    /// - [`EditError::OutOfBounds`] if `pos` is outside the store.
    /// - [`EditError::CapacityExceeded`] if the line is already `max_cols` long.
    pub fn insert_char(&mut self, pos: Position, ch: char) -> Result<(), EditError> {
        if ch == '\n' || ch == '\r' {
            return Err(EditError::InvalidChar(ch));
        }
        let max = self.limits.max_cols;
        let line = self.line_mut(pos.line)?;
        let at = byte_index(line, pos.col).ok_or(EditError::OutOfBounds(pos))?;
        if line.chars().count() >= max {
            return Err(EditError::CapacityExceeded(Capacity::LineLength { max }));
        }
        line.insert(at, ch);
        self.modified = true;
        Ok(())
    }

    /// Backspace at `pos`. Returns where the cursor goes.
    ///
    /// - `col > 0`: removes the char before `pos`; returns `(line, col - 1)`.
    /// - `col == 0, line > 0`: appends this line to the previous one and
    ///   removes it; returns the join point on the previous line.
    /// - `(0, 0)`: nothing to delete; returns `(0, 0)`.
    ///
    /// # Errors
    ///
    /// - [`EditError::OutOfBounds`] if `pos` is outside the store.
    /// - [`EditError::CapacityExceeded`] if the joined line would be longer
    ///   than `max_cols`.
    pub fn delete_char_before(&mut self, pos: Position) -> Result<Position, EditError> {
        let line = self.line_mut(pos.line)?;
        let at = byte_index(line, pos.col).ok_or(EditError::OutOfBounds(pos))?;

        if pos.col > 0 {
            let prev = line[..at]
                .char_indices()
                .next_back()
                .map_or(0, |(i, _)| i);
            line.remove(prev);
            self.modified = true;
            return Ok(Position::new(pos.line, pos.col - 1));
        }

        if pos.line == 0 {
            return Ok(Position::ZERO);
        }

        let max = self.limits.max_cols;
        let prev_len = self.lines[pos.line - 1].chars().count();
        let cur_len = self.lines[pos.line].chars().count();
        if prev_len + cur_len > max {
            return Err(EditError::CapacityExceeded(Capacity::LineLength { max }));
        }

        let moved = self.lines.remove(pos.line);
        self.lines[pos.line - 1].push_str(&moved);
        self.modified = true;
        Ok(Position::new(pos.line - 1, prev_len))
    }

    /// Split the line at `pos`: the suffix from `col` becomes a new line
    /// right after it, and later lines shift down.
    ///
    /// # Errors
    ///
    /// - [`EditError::OutOfBounds`] if `pos` is outside the store.
    /// - [`EditError::CapacityExceeded`] if the store already has
    ///   `max_lines` lines.
    pub fn split_line(&mut self, pos: Position) -> Result<(), EditError> {
        let max = self.limits.max_lines;
        let count = self.lines.len();
        let line = self.line_mut(pos.line)?;
        let at = byte_index(line, pos.col).ok_or(EditError::OutOfBounds(pos))?;
        if count >= max {
            return Err(EditError::CapacityExceeded(Capacity::LineCount { max }));
        }
        let suffix = line.split_off(at);
        self.lines.insert(pos.line + 1, suffix);
        self.modified = true;
        Ok(())
    }

    fn line_mut(&mut self, idx: usize) -> Result<&mut String, EditError> {
        self.lines
            .get_mut(idx)
            .ok_or(EditError::OutOfBounds(Position::new(idx, 0)))
    }

    // -- File I/O -----------------------------------------------------------

    /// Load a store from a file.
    ///
    /// A missing file is not an error: it loads as one empty line, and the
    /// first save creates it.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::Io`] if the file exists but can't be read or
    /// isn't valid UTF-8.
    pub fn load(path: &Path, limits: Limits) -> Result<(Self, LoadReport), EditError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "new file");
                return Ok((Self::new(limits), LoadReport::default()));
            }
            Err(source) => {
                return Err(EditError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let (store, report) = Self::from_text(&text, limits);
        tracing::info!(
            path = %path.display(),
            lines = store.line_count(),
            bytes = text.len(),
            "loaded"
        );
        if !report.is_clean() {
            tracing::warn!(
                path = %path.display(),
                dropped = report.dropped_lines,
                wrapped = report.wrapped_lines,
                "file did not fit the configured limits"
            );
        }
        Ok((store, report))
    }

    /// Write every line followed by `\n` to `path` and mark the store saved.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::Io`] if the write fails; the modified flag is
    /// left as it was.
    pub fn save(&mut self, path: &Path) -> Result<SaveReport, EditError> {
        let content = self.contents();
        fs::write(path, &content).map_err(|source| EditError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.modified = false;

        let report = SaveReport {
            lines: self.lines.len(),
            bytes: content.len(),
        };
        tracing::info!(path = %path.display(), lines = report.lines, bytes = report.bytes, "saved");
        Ok(report)
    }
}

impl Default for LineStore {
    fn default() -> Self {
        Self::new(Limits::default())
    }
}

impl fmt::Debug for LineStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineStore")
            .field("lines", &self.lines.len())
            .field("modified", &self.modified)
            .field("limits", &self.limits)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Byte offset of char column `col` in `line`. `col == len` maps to the end
/// of the string; anything past that is `None`.
fn byte_index(line: &str, col: usize) -> Option<usize> {
    line.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(line.len()))
        .nth(col)
}

/// Split text into lines on `\n`, `\r\n` or `\r`, without the terminators.
/// A trailing terminator ends the last line instead of starting a new one.
fn split_lines(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                out.push(&text[start..i]);
                start = i + 1;
            }
            b'\r' => {
                out.push(&text[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
