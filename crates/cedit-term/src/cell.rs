// SPDX-License-Identifier: MIT
//
// Cells and pens.
//
// A Cell is one screen column: a char plus the Pen it is drawn with. The
// Pen is the part the terminal keeps as state between characters (colors
// and SGR attributes), so the renderer compares pens, not cells, to decide
// which escapes to send.
//
// The editor draws one char per column. Anything that would not occupy
// exactly one column is substituted before it reaches a cell (see
// `FrameBuffer::put_char`), so there are no wide or continuation cells.

use crate::color::CellColor;

// ─── Attributes ──────────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// SGR text attributes used by the themes.
    ///
    /// ```
    /// use cedit_term::cell::Attr;
    ///
    /// let status = Attr::BOLD | Attr::INVERSE;
    /// assert!(status.contains(Attr::INVERSE));
    /// assert!(!status.contains(Attr::DIM));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        const BOLD      = 1 << 0;
        const DIM       = 1 << 1;
        const ITALIC    = 1 << 2;
        const UNDERLINE = 1 << 3;
        /// Swap foreground and background. The `mono` theme's status line.
        const INVERSE   = 1 << 4;
    }
}

impl Attr {
    /// SGR parameter for each flag, in the order they are emitted.
    pub const SGR_CODES: [(Self, u8); 5] = [
        (Self::BOLD, 1),
        (Self::DIM, 2),
        (Self::ITALIC, 3),
        (Self::UNDERLINE, 4),
        (Self::INVERSE, 7),
    ];
}

// ─── Pen ─────────────────────────────────────────────────────────────────────

/// Drawing state: what the terminal remembers between characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Pen {
    pub fg: CellColor,
    pub bg: CellColor,
    pub attrs: Attr,
}

impl Pen {
    /// Default colors, no attributes: the terminal after SGR 0.
    pub const PLAIN: Self = Self {
        fg: CellColor::Default,
        bg: CellColor::Default,
        attrs: Attr::empty(),
    };
}

// ─── Cell ────────────────────────────────────────────────────────────────────

/// One screen column.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: CellColor,
    pub bg: CellColor,
    pub attrs: Attr,
}

impl Cell {
    /// A blank drawn with the plain pen.
    pub const EMPTY: Self = Self::new(' ');

    /// `ch` with the plain pen.
    #[inline]
    #[must_use]
    pub const fn new(ch: char) -> Self {
        Self::styled(ch, CellColor::Default, CellColor::Default, Attr::empty())
    }

    #[inline]
    #[must_use]
    pub const fn styled(ch: char, fg: CellColor, bg: CellColor, attrs: Attr) -> Self {
        Self { ch, fg, bg, attrs }
    }

    /// The pen this cell is drawn with.
    #[inline]
    #[must_use]
    pub const fn pen(&self) -> Pen {
        Pen {
            fg: self.fg,
            bg: self.bg,
            attrs: self.attrs,
        }
    }

    /// A blank drawn with the plain pen.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ch == ' ' && self.pen() == Pen::PLAIN
    }
}

impl Default for Cell {
    #[inline]
    fn default() -> Self {
        Self::EMPTY
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cell({:?}", self.ch)?;
        if self.fg != CellColor::Default {
            write!(f, ", fg={:?}", self.fg)?;
        }
        if self.bg != CellColor::Default {
            write!(f, ", bg={:?}", self.bg)?;
        }
        if !self.attrs.is_empty() {
            write!(f, ", {:?}", self.attrs)?;
        }
        write!(f, ")")
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
