// SPDX-License-Identifier: MIT
//
// Differential renderer.
//
// Each frame is compared with the one before it and only changed cells are
// sent. Typing a character changes one text row and the status line, so
// that is all that goes over the wire.
//
// A frame is encoded into one Vec<u8> and written with a single write:
//
//   BeginFrame [ResetPen ClearScreen]   (the bracket only on a full redraw)
//   MoveTo? SGR? char ...              per changed cell
//   ResetPen EndFrame
//
// Every frame ends with the plain pen, so the next one starts from a known
// terminal state. Within a frame the terminal's pen and cursor are tracked,
// which drops the MoveTo between adjacent changed cells and the SGR between
// cells of the same token.

use std::io::{self, Write};

use crate::ansi::{self, Command};
use crate::buffer::FrameBuffer;
use crate::cell::{Cell, Pen};

// ─── RenderStats ─────────────────────────────────────────────────────────────

/// What one render pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub cells_rendered: usize,
    pub cells_skipped: usize,
    pub bytes_written: usize,
}

// ─── FrameEncoder ────────────────────────────────────────────────────────────

/// Encodes cells while tracking what the terminal holds.
struct FrameEncoder<'a> {
    out: &'a mut Vec<u8>,
    pen: Pen,
    /// Where the terminal cursor is after the last char, if known.
    next: Option<(u16, u16)>,
}

impl FrameEncoder<'_> {
    fn cell(&mut self, x: u16, y: u16, cell: &Cell) {
        if self.next != Some((x, y)) {
            Command::MoveTo { x, y }.push_to(&mut *self.out);
        }

        let pen = cell.pen();
        // Writing into a Vec can't fail.
        let _ = ansi::switch_pen(&mut *self.out, self.pen, pen);
        self.pen = pen;

        let mut utf8 = [0u8; 4];
        self.out.extend_from_slice(cell.ch.encode_utf8(&mut utf8).as_bytes());
        self.next = x.checked_add(1).map(|nx| (nx, y));
    }
}

// ─── DiffRenderer ────────────────────────────────────────────────────────────

/// Renders frames, sending only what changed since the previous one.
pub struct DiffRenderer {
    out: Vec<u8>,
    previous: Option<FrameBuffer>,
}

impl DiffRenderer {
    /// The first render draws everything.
    #[must_use]
    pub fn new() -> Self {
        Self {
            out: Vec::with_capacity(16 * 1024),
            previous: None,
        }
    }

    /// Encode `current` against the previous frame. Follow with
    /// [`flush`](Self::flush) or [`flush_to`](Self::flush_to).
    pub fn render(&mut self, current: &FrameBuffer) -> RenderStats {
        self.out.clear();
        let mut stats = RenderStats::default();
        let (width, height) = (current.width(), current.height());

        if width == 0 || height == 0 {
            self.remember(current);
            return stats;
        }

        let previous = self
            .previous
            .as_ref()
            .filter(|prev| prev.width() == width && prev.height() == height);

        Command::BeginFrame.push_to(&mut self.out);
        if previous.is_none() {
            Command::ResetPen.push_to(&mut self.out);
            Command::ClearScreen.push_to(&mut self.out);
        }

        let mut encoder = FrameEncoder {
            out: &mut self.out,
            pen: Pen::PLAIN,
            next: None,
        };

        for y in 0..height {
            let Some(row) = current.row(y) else {
                continue;
            };
            let before = previous.and_then(|prev| prev.row(y));
            if before == Some(row) {
                stats.cells_skipped += row.len();
                continue;
            }

            for (x, cell) in (0..width).zip(row) {
                if before.is_some_and(|b| b[usize::from(x)] == *cell) {
                    stats.cells_skipped += 1;
                } else {
                    encoder.cell(x, y, cell);
                    stats.cells_rendered += 1;
                }
            }
        }

        if encoder.pen != Pen::PLAIN {
            Command::ResetPen.push_to(&mut self.out);
        }
        Command::EndFrame.push_to(&mut self.out);

        stats.bytes_written = self.out.len();
        self.remember(current);
        stats
    }

    /// The bytes from the last render.
    #[must_use]
    pub fn output_bytes(&self) -> &[u8] {
        &self.out
    }

    /// Write the last render to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn flush(&mut self) -> io::Result<()> {
        self.flush_to(&mut io::stdout().lock())
    }

    /// Write the last render to `w`. The bytes are dropped once written.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if self.out.is_empty() {
            return Ok(());
        }
        w.write_all(&self.out)?;
        w.flush()?;
        self.out.clear();
        Ok(())
    }

    /// Forget the previous frame so the next render draws everything.
    pub fn force_redraw(&mut self) {
        self.previous = None;
    }

    fn remember(&mut self, current: &FrameBuffer) {
        match &mut self.previous {
            Some(prev) if prev.width() == current.width() && prev.height() == current.height() => {
                prev.copy_from(current);
            }
            _ => self.previous = Some(current.clone()),
        }
    }
}

impl Default for DiffRenderer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
