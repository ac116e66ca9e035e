// SPDX-License-Identifier: MIT
//
// The bytes cedit sends to the terminal.
//
// Two kinds of output exist. `Command`s are the fixed sequences: cursor
// moves, visibility, modes. Pen switches are SGR sequences computed from
// the pen the terminal is known to hold and the pen the next cell needs;
// `switch_pen` packs everything into a single CSI.
//
// Positions are 0-indexed here and 1-indexed on the wire.

use std::fmt::Display;
use std::io::{self, Write};

use crate::cell::{Attr, Pen};
use crate::color::CellColor;

// ─── Cursor Shape ────────────────────────────────────────────────────────────

/// Cursor style (DECSCUSR).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorShape {
    /// Whatever the user's terminal is configured with.
    #[default]
    Default,
    SteadyBlock,
    /// I-beam. The editor uses it while inserting.
    SteadyBar,
}

impl CursorShape {
    const fn decscusr(self) -> u8 {
        match self {
            Self::Default => 0,
            Self::SteadyBlock => 2,
            Self::SteadyBar => 6,
        }
    }
}

// ─── Commands ────────────────────────────────────────────────────────────────

/// A fixed terminal command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// CUP to column `x`, row `y`.
    MoveTo { x: u16, y: u16 },
    ShowCursor,
    HideCursor,
    SetCursorShape(CursorShape),
    ClearScreen,
    /// SGR 0. Afterwards the terminal holds [`Pen::PLAIN`].
    ResetPen,
    /// Start of a synchronized frame (mode 2026). Terminals without the
    /// mode ignore it.
    BeginFrame,
    EndFrame,
    EnterAltScreen,
    LeaveAltScreen,
}

impl Command {
    /// Write the escape sequence.
    ///
    /// # Errors
    ///
    /// Returns any error from `w`.
    pub fn write_to(self, w: &mut impl Write) -> io::Result<()> {
        match self {
            Self::MoveTo { x, y } => write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1),
            Self::ShowCursor => w.write_all(b"\x1b[?25h"),
            Self::HideCursor => w.write_all(b"\x1b[?25l"),
            Self::SetCursorShape(shape) => write!(w, "\x1b[{} q", shape.decscusr()),
            Self::ClearScreen => w.write_all(b"\x1b[2J"),
            Self::ResetPen => w.write_all(b"\x1b[0m"),
            Self::BeginFrame => w.write_all(b"\x1b[?2026h"),
            Self::EndFrame => w.write_all(b"\x1b[?2026l"),
            Self::EnterAltScreen => w.write_all(b"\x1b[?1049h"),
            Self::LeaveAltScreen => w.write_all(b"\x1b[?1049l"),
        }
    }

    /// Append the escape sequence to an in-memory frame.
    pub fn push_to(self, out: &mut Vec<u8>) {
        // Writing into a Vec can't fail.
        let _ = self.write_to(out);
    }
}

/// Switch into editor mode.
pub const ENTER_EDITOR: [Command; 3] = [Command::EnterAltScreen, Command::HideCursor, Command::ClearScreen];

/// Undo [`ENTER_EDITOR`] and anything a frame or the cursor update left
/// behind. The alternate screen goes last so the shell reappears clean.
pub const LEAVE_EDITOR: [Command; 5] = [
    Command::EndFrame,
    Command::ResetPen,
    Command::SetCursorShape(CursorShape::Default),
    Command::ShowCursor,
    Command::LeaveAltScreen,
];

/// Encode a command sequence into bytes.
#[must_use]
pub fn encode(commands: &[Command]) -> Vec<u8> {
    let mut out = Vec::with_capacity(commands.len() * 8);
    for command in commands {
        command.push_to(&mut out);
    }
    out
}

// ─── Pens ────────────────────────────────────────────────────────────────────

/// Switch the terminal from pen `from` to pen `to` with at most one SGR
/// sequence. Nothing is written when the pens are equal.
///
/// Attributes can only be cleared by a reset, so when `to` drops any
/// attribute of `from` the sequence starts with `0` and re-sends every
/// non-default part of `to`.
///
/// # Errors
///
/// Returns any error from `w`.
pub fn switch_pen(w: &mut impl Write, from: Pen, to: Pen) -> io::Result<()> {
    let mut sgr = Sgr { w, open: false };

    let base = if from.attrs.difference(to.attrs).is_empty() {
        from
    } else {
        sgr.param(0)?;
        Pen::PLAIN
    };

    for (flag, code) in Attr::SGR_CODES {
        if to.attrs.contains(flag) && !base.attrs.contains(flag) {
            sgr.param(code)?;
        }
    }
    if to.fg != base.fg {
        sgr.color(FOREGROUND, to.fg)?;
    }
    if to.bg != base.bg {
        sgr.color(BACKGROUND, to.bg)?;
    }
    sgr.finish()
}

const FOREGROUND: u16 = 30;
const BACKGROUND: u16 = 40;

/// Builds one `CSI ... m` from parameters.
struct Sgr<'w, W: Write> {
    w: &'w mut W,
    open: bool,
}

impl<W: Write> Sgr<'_, W> {
    fn param(&mut self, p: impl Display) -> io::Result<()> {
        let sep = if self.open { ";" } else { "\x1b[" };
        self.open = true;
        write!(self.w, "{sep}{p}")
    }

    /// `layer` is 30 (foreground) or 40 (background). The 16 standard
    /// colors use the short forms: 30-37/90-97 and 40-47/100-107.
    fn color(&mut self, layer: u16, color: CellColor) -> io::Result<()> {
        match color {
            CellColor::Default => self.param(layer + 9),
            CellColor::Ansi256(idx) if idx < 8 => self.param(layer + u16::from(idx)),
            CellColor::Ansi256(idx) if idx < 16 => self.param(layer + 52 + u16::from(idx)),
            CellColor::Ansi256(idx) => {
                self.param(layer + 8)?;
                self.param(5)?;
                self.param(idx)
            }
            CellColor::Rgb(r, g, b) => {
                self.param(layer + 8)?;
                self.param(2)?;
                self.param(r)?;
                self.param(g)?;
                self.param(b)
            }
        }
    }

    fn finish(self) -> io::Result<()> {
        if self.open { self.w.write_all(b"m") } else { Ok(()) }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ansi16;

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    fn switch(from: Pen, to: Pen) -> String {
        let mut out = Vec::new();
        switch_pen(&mut out, from, to).unwrap();
        text(out)
    }

    fn fg(color: CellColor) -> Pen {
        Pen { fg: color, ..Pen::PLAIN }
    }

    fn bg(color: CellColor) -> Pen {
        Pen { bg: color, ..Pen::PLAIN }
    }

    // ── Commands ────────────────────────────────────────────────────────

    #[test]
    fn move_to_is_one_based_row_then_column() {
        assert_eq!(text(encode(&[Command::MoveTo { x: 0, y: 0 }])), "\x1b[1;1H");
        assert_eq!(text(encode(&[Command::MoveTo { x: 9, y: 4 }])), "\x1b[5;10H");
        assert_eq!(
            text(encode(&[Command::MoveTo { x: u16::MAX, y: u16::MAX }])),
            "\x1b[65536;65536H"
        );
    }

    #[test]
    fn cursor_shapes() {
        let shapes = [CursorShape::Default, CursorShape::SteadyBlock, CursorShape::SteadyBar]
            .map(|s| text(encode(&[Command::SetCursorShape(s)])));
        assert_eq!(shapes, ["\x1b[0 q", "\x1b[2 q", "\x1b[6 q"]);
    }

    #[test]
    fn enter_and_leave_sequences() {
        assert_eq!(text(encode(&ENTER_EDITOR)), "\x1b[?1049h\x1b[?25l\x1b[2J");
        assert_eq!(
            text(encode(&LEAVE_EDITOR)),
            "\x1b[?2026l\x1b[0m\x1b[0 q\x1b[?25h\x1b[?1049l"
        );
    }

    // ── Pens ────────────────────────────────────────────────────────────

    #[test]
    fn same_pen_writes_nothing() {
        assert_eq!(switch(Pen::PLAIN, Pen::PLAIN), "");
        let keyword = fg(CellColor::Ansi256(ansi16::BLUE));
        assert_eq!(switch(keyword, keyword), "");
    }

    #[test]
    fn standard_and_bright_colors_use_short_codes() {
        assert_eq!(switch(Pen::PLAIN, fg(CellColor::Ansi256(ansi16::BLUE))), "\x1b[34m");
        assert_eq!(switch(Pen::PLAIN, fg(CellColor::Ansi256(8))), "\x1b[90m");
        assert_eq!(switch(Pen::PLAIN, fg(CellColor::Ansi256(15))), "\x1b[97m");
        assert_eq!(switch(Pen::PLAIN, bg(CellColor::Ansi256(2))), "\x1b[42m");
        assert_eq!(switch(Pen::PLAIN, bg(CellColor::Ansi256(10))), "\x1b[102m");
    }

    #[test]
    fn extended_and_rgb_colors() {
        assert_eq!(switch(Pen::PLAIN, fg(CellColor::Ansi256(208))), "\x1b[38;5;208m");
        assert_eq!(switch(Pen::PLAIN, bg(CellColor::Ansi256(237))), "\x1b[48;5;237m");
        assert_eq!(switch(Pen::PLAIN, fg(CellColor::Rgb(1, 2, 3))), "\x1b[38;2;1;2;3m");
    }

    #[test]
    fn back_to_default_color() {
        let red = fg(CellColor::Ansi256(ansi16::RED));
        assert_eq!(switch(red, Pen::PLAIN), "\x1b[39m");
        assert_eq!(switch(bg(CellColor::Rgb(30, 32, 48)), Pen::PLAIN), "\x1b[49m");
    }

    #[test]
    fn both_colors_share_one_sequence() {
        let status = Pen {
            fg: CellColor::Ansi256(0),
            bg: CellColor::Ansi256(7),
            attrs: Attr::empty(),
        };
        assert_eq!(switch(Pen::PLAIN, status), "\x1b[30;47m");
    }

    #[test]
    fn adding_attributes_keeps_colors() {
        let comment = fg(CellColor::Ansi256(ansi16::RED));
        let bold = Pen { attrs: Attr::BOLD | Attr::INVERSE, ..comment };
        assert_eq!(switch(comment, bold), "\x1b[1;7m");
        assert_eq!(switch(Pen::PLAIN, Pen { attrs: Attr::all(), ..Pen::PLAIN }), "\x1b[1;2;3;4;7m");
    }

    #[test]
    fn dropping_an_attribute_resets_and_resends() {
        let status = Pen {
            fg: CellColor::Ansi256(ansi16::BLUE),
            bg: CellColor::Default,
            attrs: Attr::INVERSE | Attr::BOLD,
        };
        let bold_blue = Pen { attrs: Attr::BOLD, ..status };
        assert_eq!(switch(status, bold_blue), "\x1b[0;1;34m");
        assert_eq!(switch(status, Pen::PLAIN), "\x1b[0m");
    }
}
