//! Theme assembly: named highlight groups for editor rendering.
//!
//! The view layer styles every cell through a `Theme`. Nothing in the
//! renderer hardcodes a color.

use cedit_term::cell::Attr;
use cedit_term::color::{ansi16, CellColor};

// ---------------------------------------------------------------------------
// HighlightGroup
// ---------------------------------------------------------------------------

/// A resolved style for one editor element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighlightGroup {
    pub fg: CellColor,
    pub bg: CellColor,
    pub attrs: Attr,
}

impl HighlightGroup {
    /// Create a highlight group with just foreground color.
    #[must_use]
    pub const fn fg_only(fg: CellColor) -> Self {
        Self {
            fg,
            bg: CellColor::Default,
            attrs: Attr::empty(),
        }
    }

    /// Create a highlight group with foreground and attributes.
    #[must_use]
    pub const fn fg_attrs(fg: CellColor, attrs: Attr) -> Self {
        Self {
            fg,
            bg: CellColor::Default,
            attrs,
        }
    }

    /// Create a highlight group with attributes only.
    #[must_use]
    pub const fn attrs_only(attrs: Attr) -> Self {
        Self {
            fg: CellColor::Default,
            bg: CellColor::Default,
            attrs,
        }
    }
}

// ---------------------------------------------------------------------------
// SyntaxGroups
// ---------------------------------------------------------------------------

/// Styles for the C token categories. Plain text uses [`Theme::normal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyntaxGroups {
    pub keyword: HighlightGroup,
    pub string: HighlightGroup,
    pub char_literal: HighlightGroup,
    pub comment: HighlightGroup,
    pub preprocessor: HighlightGroup,
    pub number: HighlightGroup,
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// A complete editor theme with named highlight groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Name of this theme (e.g., "terminal", "dusk").
    pub name: String,

    // ── UI chrome groups ──────────────────────────────────────
    /// Normal text, and the fill for the whole text area.
    pub normal: HighlightGroup,
    /// Line numbers in the gutter.
    pub line_nr: HighlightGroup,
    /// Tilde lines past end of buffer (`~`).
    pub non_text: HighlightGroup,
    /// Status line.
    pub status_line: HighlightGroup,
    /// Informational messages.
    pub message: HighlightGroup,
    /// Error messages.
    pub error: HighlightGroup,

    // ── Syntax ────────────────────────────────────────────────
    pub syntax: SyntaxGroups,
}

impl Theme {
    /// Terminal-native theme using only the standard ANSI colors, so it
    /// follows the user's terminal palette: keywords blue, strings and
    /// character literals green, comments red, numbers magenta,
    /// preprocessor directives cyan.
    #[must_use]
    pub fn terminal() -> Self {
        use CellColor::{Ansi256, Default};

        Self {
            name: "terminal".to_string(),

            normal: HighlightGroup::default(),
            line_nr: HighlightGroup::fg_only(Ansi256(ansi16::GRAY)),
            non_text: HighlightGroup::fg_attrs(Ansi256(ansi16::BLUE), Attr::DIM),
            status_line: HighlightGroup::attrs_only(Attr::INVERSE),
            message: HighlightGroup::fg_only(Default),
            error: HighlightGroup::fg_attrs(Ansi256(ansi16::RED), Attr::BOLD),

            syntax: SyntaxGroups {
                keyword: HighlightGroup::fg_only(Ansi256(ansi16::BLUE)),
                string: HighlightGroup::fg_only(Ansi256(ansi16::GREEN)),
                char_literal: HighlightGroup::fg_only(Ansi256(ansi16::GREEN)),
                comment: HighlightGroup::fg_only(Ansi256(ansi16::RED)),
                preprocessor: HighlightGroup::fg_only(Ansi256(ansi16::CYAN)),
                number: HighlightGroup::fg_only(Ansi256(ansi16::MAGENTA)),
            },
        }
    }

    /// No colors at all, only attributes. For monochrome terminals and
    /// `NO_COLOR` users.
    #[must_use]
    pub fn mono() -> Self {
        Self {
            name: "mono".to_string(),

            normal: HighlightGroup::default(),
            line_nr: HighlightGroup::attrs_only(Attr::DIM),
            non_text: HighlightGroup::attrs_only(Attr::DIM),
            status_line: HighlightGroup::attrs_only(Attr::INVERSE),
            message: HighlightGroup::default(),
            error: HighlightGroup::attrs_only(Attr::BOLD.union(Attr::UNDERLINE)),

            syntax: SyntaxGroups {
                keyword: HighlightGroup::attrs_only(Attr::BOLD),
                string: HighlightGroup::attrs_only(Attr::UNDERLINE),
                char_literal: HighlightGroup::attrs_only(Attr::UNDERLINE),
                comment: HighlightGroup::attrs_only(Attr::DIM.union(Attr::ITALIC)),
                preprocessor: HighlightGroup::attrs_only(Attr::BOLD),
                number: HighlightGroup::default(),
            },
        }
    }

    /// A 24-bit dark theme on a fixed background.
    #[must_use]
    pub fn dusk() -> Self {
        use CellColor::Rgb;

        let bg = Rgb(0x1e, 0x20, 0x30);
        let fg = Rgb(0xc8, 0xd3, 0xf5);
        let muted = Rgb(0x63, 0x6d, 0xa6);
        let on_bg = |fg| HighlightGroup { fg, bg, attrs: Attr::empty() };

        Self {
            name: "dusk".to_string(),

            normal: on_bg(fg),
            line_nr: on_bg(muted),
            non_text: HighlightGroup { fg: muted, bg, attrs: Attr::DIM },
            status_line: HighlightGroup {
                fg: Rgb(0x1b, 0x1d, 0x2b),
                bg: Rgb(0x82, 0xaa, 0xff),
                attrs: Attr::BOLD,
            },
            message: on_bg(fg),
            error: HighlightGroup { fg: Rgb(0xff, 0x75, 0x7f), bg, attrs: Attr::BOLD },

            syntax: SyntaxGroups {
                keyword: on_bg(Rgb(0xc0, 0x99, 0xff)),
                string: on_bg(Rgb(0xc3, 0xe8, 0x8d)),
                char_literal: on_bg(Rgb(0x4f, 0xd6, 0xbe)),
                comment: HighlightGroup { fg: Rgb(0x7a, 0x88, 0xcf), bg, attrs: Attr::ITALIC },
                preprocessor: on_bg(Rgb(0x86, 0xe1, 0xfc)),
                number: on_bg(Rgb(0xff, 0x96, 0x6c)),
            },
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::terminal()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_uses_classic_palette() {
        let t = Theme::terminal();
        assert_eq!(t.syntax.keyword.fg, CellColor::Ansi256(ansi16::BLUE));
        assert_eq!(t.syntax.string.fg, CellColor::Ansi256(ansi16::GREEN));
        assert_eq!(t.syntax.char_literal.fg, CellColor::Ansi256(ansi16::GREEN));
        assert_eq!(t.syntax.comment.fg, CellColor::Ansi256(ansi16::RED));
        assert_eq!(t.syntax.number.fg, CellColor::Ansi256(ansi16::MAGENTA));
        assert_eq!(t.syntax.preprocessor.fg, CellColor::Ansi256(ansi16::CYAN));
    }

    #[test]
    fn terminal_status_line_is_inverse() {
        assert!(Theme::terminal().status_line.attrs.contains(Attr::INVERSE));
    }

    #[test]
    fn default_is_terminal() {
        assert_eq!(Theme::default(), Theme::terminal());
    }

    #[test]
    fn mono_has_no_colors() {
        let t = Theme::mono();
        let groups = [
            t.normal,
            t.line_nr,
            t.non_text,
            t.status_line,
            t.message,
            t.error,
            t.syntax.keyword,
            t.syntax.string,
            t.syntax.char_literal,
            t.syntax.comment,
            t.syntax.preprocessor,
            t.syntax.number,
        ];
        for g in groups {
            assert!(g.fg.is_default() && g.bg.is_default(), "{g:?}");
        }
    }

    #[test]
    fn dusk_paints_background_everywhere_but_status() {
        let t = Theme::dusk();
        assert_eq!(t.normal.bg, t.syntax.keyword.bg);
        assert_eq!(t.normal.bg, t.line_nr.bg);
        assert_ne!(t.status_line.bg, t.normal.bg);
        assert!(matches!(t.normal.bg, CellColor::Rgb(..)));
    }

    #[test]
    fn error_is_bold_in_every_theme() {
        for t in [Theme::terminal(), Theme::mono(), Theme::dusk()] {
            assert!(t.error.attrs.contains(Attr::BOLD), "{}", t.name);
        }
    }
}
