//! # cedit-theme: highlight groups and builtin themes
//!
//! A [`Theme`] is a fixed set of named [`HighlightGroup`]s: UI chrome
//! (text, gutter, tilde lines, status and message lines) plus one group per
//! C token category the highlighter produces. Colors are resolved to
//! terminal-ready `CellColor` values up front, so the view just copies
//! fields into cells.
//!
//! ```text
//! builtin_theme("dusk")
//!     │
//!     ▼
//! Theme { normal, line_nr, ..., syntax: SyntaxGroups { keyword, ... } }
//!     │
//!     ▼
//! view.rs: token category → HighlightGroup → Cell
//! ```

pub mod builtin;
pub mod highlight;

pub use builtin::{builtin_names, builtin_theme};
pub use highlight::{HighlightGroup, SyntaxGroups, Theme};
