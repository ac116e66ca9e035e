// SPDX-License-Identifier: MIT
//
// Terminal colors as stored in cells.
//
// The editor only ever needs colors the terminal can show directly: the
// 256-color palette (whose first 16 entries are the classic ANSI colors),
// 24-bit RGB, and the terminal's own default. Themes resolve everything to
// one of these up front so the diff loop compares plain 4-byte values.

use std::fmt;

// ─── Standard palette indices ────────────────────────────────────────────────

/// Indices of the eight standard ANSI colors in the 256-color palette.
pub mod ansi16 {
    pub const BLACK: u8 = 0;
    pub const RED: u8 = 1;
    pub const GREEN: u8 = 2;
    pub const YELLOW: u8 = 3;
    pub const BLUE: u8 = 4;
    pub const MAGENTA: u8 = 5;
    pub const CYAN: u8 = 6;
    pub const WHITE: u8 = 7;
    /// Bright black, usually rendered as gray.
    pub const GRAY: u8 = 8;
}

// ─── CellColor ───────────────────────────────────────────────────────────────

/// Compact color for terminal cell storage.
///
/// This is what gets written to the [`FrameBuffer`](crate::buffer::FrameBuffer)
/// and converted to SGR sequences on output. Small and cheap to compare,
/// which matters in the diff renderer's inner loop.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellColor {
    /// 24-bit `TrueColor`.
    Rgb(u8, u8, u8),

    /// ANSI 256-color palette index. 0–7 are the standard colors, 8–15
    /// their bright variants.
    Ansi256(u8),

    /// Terminal default color (inherits from terminal settings).
    #[default]
    Default,
}

impl CellColor {
    /// Whether this is the terminal default color.
    #[inline]
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }
}

impl fmt::Debug for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            Self::Ansi256(idx) => write!(f, "ansi({idx})"),
            Self::Default => write!(f, "default"),
        }
    }
}

impl fmt::Display for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
