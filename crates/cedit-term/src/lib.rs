// SPDX-License-Identifier: MIT
//
// cedit-term: terminal layer for cedit.
//
// Direct terminal control via ANSI escape sequences and raw termios, a
// cell grid that the editor paints into, and a differential renderer that
// only touches changed cells. Input bytes are decoded into key events by a
// small legacy-protocol parser and dispatched from a single-threaded loop.
//
// No TUI framework sits underneath: every byte sent to the terminal comes
// from `ansi`, and every frame goes through `diff`.

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod color;
pub mod diff;
pub mod event_loop;
pub mod input;
pub mod terminal;
