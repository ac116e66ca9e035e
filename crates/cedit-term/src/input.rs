// SPDX-License-Identifier: MIT
//
// Terminal input parser.
//
// Turns raw stdin bytes into key events. Handles what a terminal in raw
// mode sends for ordinary typing and the editing keys:
//
// - Control characters (Ctrl+letter, Enter, Tab, Backspace)
// - Legacy CSI sequences (arrows, Home/End, PageUp/PageDown, Delete)
// - SS3 sequences (application cursor mode arrows and Home/End)
// - Alt+key (ESC followed by a printable character)
// - UTF-8 multi-byte characters
//
// # Design
//
// The parser keeps a small internal byte buffer because escape sequences
// can span multiple `read()` calls. Feed bytes with [`Parser::advance`],
// retrieve events from the returned `Vec`. After a timeout with no new
// bytes, call [`Parser::flush`] to emit any pending lone ESC as a real
// Escape keypress.
//
// Sequences the editor has no use for (function keys, mouse reports) are
// consumed and dropped so their bytes never turn into typed text.

use bitflags::bitflags;

// ─── Event Types ────────────────────────────────────────────────────────────

/// A parsed terminal input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A key press.
    Key(KeyEvent),
}

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Which key was pressed.
    pub code: KeyCode,
    /// Active modifier keys.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key press with no modifiers.
    #[must_use]
    pub const fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
        }
    }

    /// Ctrl held together with `letter`.
    #[must_use]
    pub const fn ctrl(letter: char) -> Self {
        Self {
            code: KeyCode::Char(letter),
            modifiers: Modifiers::CTRL,
        }
    }
}

/// Identity of a key.
///
/// Named keys have dedicated variants; printable characters use
/// [`Char`](KeyCode::Char).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A Unicode character.
    Char(char),
    // ── Named keys ──────────────────────────────────────────────
    Enter,
    Tab,
    Backspace,
    Escape,
    Delete,
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

bitflags! {
    /// Keyboard modifier flags.
    ///
    /// Matches the xterm CSI modifier encoding where `param = 1 + bitmask`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0000_0001;
        const ALT   = 0b0000_0010;
        const CTRL  = 0b0000_0100;
    }
}

// ─── Parser ─────────────────────────────────────────────────────────────────

/// Terminal input parser.
///
/// Feed raw bytes via [`advance`](Parser::advance) and collect
/// [`Event`]s. Incomplete sequences are buffered and resumed when more
/// bytes arrive.
///
/// # Escape vs escape-sequence ambiguity
///
/// A bare `ESC` byte (0x1B) could be a standalone Escape keypress or the
/// start of an escape sequence. The parser holds a lone ESC back; the
/// caller waits a short timeout and then calls [`flush`](Parser::flush)
/// to emit it as a real Escape key event.
pub struct Parser {
    buf: Vec<u8>,
}

impl Parser {
    /// Create a parser with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
        }
    }

    /// Feed raw bytes from stdin and return every event that can be parsed.
    ///
    /// Bytes that form an incomplete sequence stay buffered for the next
    /// call.
    pub fn advance(&mut self, data: &[u8]) -> Vec<Event> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match try_parse(&self.buf[pos..]) {
                Parsed::Event(event, consumed) => {
                    events.push(event);
                    pos += consumed;
                }
                Parsed::Incomplete => break,
                Parsed::Skip(n) => pos += n,
            }
        }

        if pos > 0 {
            self.buf.drain(..pos);
        }

        events
    }

    /// Are there unconsumed bytes that might complete with more data?
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Flush pending bytes as literal key events.
    ///
    /// A lone ESC becomes an Escape key event; any other leftover bytes
    /// become `Char` events. Partial UTF-8 is dropped.
    pub fn flush(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        for &byte in &self.buf {
            let event = match byte {
                0x1B => KeyEvent::plain(KeyCode::Escape),
                b @ 0x01..=0x1A => KeyEvent::ctrl(char::from(b + b'a' - 1)),
                0x7F => KeyEvent::plain(KeyCode::Backspace),
                b @ 0x20..=0x7E => KeyEvent::plain(KeyCode::Char(char::from(b))),
                _ => continue,
            };
            events.push(Event::Key(event));
        }
        self.buf.clear();
        events
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Stateless Parsing Functions ────────────────────────────────────────────

/// Result of trying to parse one event from the front of the buffer.
enum Parsed {
    /// Parsed an event, consuming `usize` bytes.
    Event(Event, usize),
    /// The sequence needs more bytes.
    Incomplete,
    /// Unrecognized or unused bytes; skip `usize` of them.
    Skip(usize),
}

fn try_parse(buf: &[u8]) -> Parsed {
    let Some(&first) = buf.first() else {
        return Parsed::Skip(0);
    };

    match first {
        0x1B => parse_escape(buf),
        0x08 | 0x7F => key(KeyCode::Backspace, 1),
        0x09 => key(KeyCode::Tab, 1),
        // Pasted CRLF text is one line break per pair.
        0x0D if buf.get(1) == Some(&0x0A) => key(KeyCode::Enter, 2),
        0x0A | 0x0D => key(KeyCode::Enter, 1),
        b @ 0x01..=0x1A => Parsed::Event(Event::Key(KeyEvent::ctrl(char::from(b + b'a' - 1))), 1),
        b @ 0x20..=0x7E => key(KeyCode::Char(char::from(b)), 1),
        0xC0..=0xFF => parse_utf8(buf),
        // NUL, the remaining C0 codes and bare continuation bytes.
        _ => Parsed::Skip(1),
    }
}

// ── Escape sequences ────────────────────────────────────────────────────────

fn parse_escape(buf: &[u8]) -> Parsed {
    debug_assert_eq!(buf[0], 0x1B);

    let Some(&second) = buf.get(1) else {
        return Parsed::Incomplete;
    };

    match second {
        b'[' => parse_csi(buf),
        b'O' => parse_ss3(buf),
        b @ 0x20..=0x7E => Parsed::Event(
            Event::Key(KeyEvent {
                code: KeyCode::Char(char::from(b)),
                modifiers: Modifiers::ALT,
            }),
            2,
        ),
        // ESC followed by anything else: the ESC stands alone.
        _ => key(KeyCode::Escape, 1),
    }
}

// ── CSI (Control Sequence Introducer) ───────────────────────────────────────

fn parse_csi(buf: &[u8]) -> Parsed {
    debug_assert!(buf.len() >= 2 && buf[0] == 0x1B && buf[1] == b'[');

    // Scan for the final byte (0x40..=0x7E). Parameter bytes are
    // 0x30..=0x3F, intermediates 0x20..=0x2F.
    let mut end = 2;
    while end < buf.len() {
        let b = buf[end];
        if (0x40..=0x7E).contains(&b) {
            break;
        }
        if !(0x20..=0x3F).contains(&b) {
            return Parsed::Skip(end + 1);
        }
        end += 1;
    }

    if end >= buf.len() {
        return Parsed::Incomplete;
    }

    let final_byte = buf[end];
    let params = parse_csi_params(&buf[2..end]);
    let consumed = end + 1;
    let modifiers = params.get(1).map_or(Modifiers::empty(), |&p| decode_modifiers(p));

    let code = if final_byte == b'~' {
        match params.first().copied().unwrap_or(0) {
            1 | 7 => KeyCode::Home,
            3 => KeyCode::Delete,
            4 | 8 => KeyCode::End,
            5 => KeyCode::PageUp,
            6 => KeyCode::PageDown,
            _ => return Parsed::Skip(consumed),
        }
    } else {
        match final_byte {
            b'A' => KeyCode::Up,
            b'B' => KeyCode::Down,
            b'C' => KeyCode::Right,
            b'D' => KeyCode::Left,
            b'H' => KeyCode::Home,
            b'F' => KeyCode::End,
            _ => return Parsed::Skip(consumed),
        }
    };

    Parsed::Event(Event::Key(KeyEvent { code, modifiers }), consumed)
}

// ── SS3 (Single Shift 3) ───────────────────────────────────────────────────

fn parse_ss3(buf: &[u8]) -> Parsed {
    debug_assert!(buf.len() >= 2 && buf[0] == 0x1B && buf[1] == b'O');

    let Some(&third) = buf.get(2) else {
        return Parsed::Incomplete;
    };

    match third {
        b'A' => key(KeyCode::Up, 3),
        b'B' => key(KeyCode::Down, 3),
        b'C' => key(KeyCode::Right, 3),
        b'D' => key(KeyCode::Left, 3),
        b'H' => key(KeyCode::Home, 3),
        b'F' => key(KeyCode::End, 3),
        _ => Parsed::Skip(3),
    }
}

// ── UTF-8 ──────────────────────────────────────────────────────────────────

fn parse_utf8(buf: &[u8]) -> Parsed {
    let expected = utf8_char_len(buf[0]);

    if expected == 0 {
        return Parsed::Skip(1);
    }
    if buf.len() < expected {
        return Parsed::Incomplete;
    }

    std::str::from_utf8(&buf[..expected])
        .ok()
        .and_then(|s| s.chars().next())
        .map_or(Parsed::Skip(1), |ch| key(KeyCode::Char(ch), expected))
}

// ─── Helpers ────────────────────────────────────────────────────────────────

const fn key(code: KeyCode, consumed: usize) -> Parsed {
    Parsed::Event(Event::Key(KeyEvent::plain(code)), consumed)
}

/// Parse semicolon-separated CSI parameters. Empty fields read as 0.
///
/// - `1;5` → `[1, 5]`
/// - (empty) → `[]`
fn parse_csi_params(raw: &[u8]) -> Vec<u16> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(|&b| b == b';')
        .map(|field| {
            field
                .iter()
                .take_while(|b| b.is_ascii_digit())
                .fold(0u16, |acc, &b| acc.saturating_mul(10).saturating_add(u16::from(b - b'0')))
        })
        .collect()
}

/// Decode a CSI modifier parameter (`1 + bitmask`). 0 or 1 means none.
#[allow(clippy::cast_possible_truncation)]
const fn decode_modifiers(param: u16) -> Modifiers {
    let val = if param > 0 { param - 1 } else { 0 };
    Modifiers::from_bits_truncate(val as u8)
}

/// Expected byte length of a UTF-8 character from its lead byte.
/// Returns 0 for invalid lead bytes.
const fn utf8_char_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(data: &[u8]) -> Vec<Event> {
        Parser::new().advance(data)
    }

    fn parse_one(data: &[u8]) -> Event {
        let events = parse(data);
        assert_eq!(events.len(), 1, "expected 1 event, got {events:?}");
        events[0]
    }

    fn plain(code: KeyCode) -> Event {
        Event::Key(KeyEvent::plain(code))
    }

    fn with(code: KeyCode, modifiers: Modifiers) -> Event {
        Event::Key(KeyEvent { code, modifiers })
    }

    // ── Printable ───────────────────────────────────────────────────────

    #[test]
    fn ascii_chars() {
        assert_eq!(
            parse(b"a{"),
            vec![plain(KeyCode::Char('a')), plain(KeyCode::Char('{'))]
        );
    }

    #[test]
    fn utf8_two_and_three_byte() {
        assert_eq!(parse_one("é".as_bytes()), plain(KeyCode::Char('é')));
        assert_eq!(parse_one("中".as_bytes()), plain(KeyCode::Char('中')));
    }

    #[test]
    fn utf8_split_across_reads() {
        let bytes = "€".as_bytes();
        let mut p = Parser::new();
        assert!(p.advance(&bytes[..1]).is_empty());
        assert!(p.has_pending());
        assert_eq!(p.advance(&bytes[1..]), vec![plain(KeyCode::Char('€'))]);
        assert!(!p.has_pending());
    }

    #[test]
    fn invalid_lead_byte_skipped() {
        assert_eq!(parse(b"\x80a"), vec![plain(KeyCode::Char('a'))]);
    }

    // ── Control Characters ──────────────────────────────────────────────

    #[test]
    fn ctrl_letters() {
        assert_eq!(parse_one(b"\x11"), Event::Key(KeyEvent::ctrl('q')));
        assert_eq!(parse_one(b"\x13"), Event::Key(KeyEvent::ctrl('s')));
    }

    #[test]
    fn enter_tab_backspace() {
        assert_eq!(parse_one(b"\r"), plain(KeyCode::Enter));
        assert_eq!(parse_one(b"\n"), plain(KeyCode::Enter));
        assert_eq!(parse_one(b"\t"), plain(KeyCode::Tab));
        assert_eq!(parse_one(b"\x7F"), plain(KeyCode::Backspace));
        assert_eq!(parse_one(b"\x08"), plain(KeyCode::Backspace));
    }

    #[test]
    fn crlf_is_one_enter() {
        assert_eq!(parse_one(b"\r\n"), plain(KeyCode::Enter));
        assert_eq!(
            parse(b"a\r\nb\r\n"),
            vec![
                plain(KeyCode::Char('a')),
                plain(KeyCode::Enter),
                plain(KeyCode::Char('b')),
                plain(KeyCode::Enter),
            ]
        );
        assert_eq!(parse(b"\n\r"), vec![plain(KeyCode::Enter), plain(KeyCode::Enter)]);
    }

    #[test]
    fn nul_is_ignored() {
        assert!(parse(b"\x00").is_empty());
    }

    // ── CSI ─────────────────────────────────────────────────────────────

    #[test]
    fn arrows() {
        assert_eq!(parse_one(b"\x1b[A"), plain(KeyCode::Up));
        assert_eq!(parse_one(b"\x1b[B"), plain(KeyCode::Down));
        assert_eq!(parse_one(b"\x1b[C"), plain(KeyCode::Right));
        assert_eq!(parse_one(b"\x1b[D"), plain(KeyCode::Left));
    }

    #[test]
    fn arrows_with_modifiers() {
        assert_eq!(parse_one(b"\x1b[1;5C"), with(KeyCode::Right, Modifiers::CTRL));
        assert_eq!(
            parse_one(b"\x1b[1;4D"),
            with(KeyCode::Left, Modifiers::SHIFT | Modifiers::ALT)
        );
    }

    #[test]
    fn home_end_variants() {
        for seq in [&b"\x1b[H"[..], b"\x1b[1~", b"\x1b[7~", b"\x1bOH"] {
            assert_eq!(parse_one(seq), plain(KeyCode::Home), "{seq:?}");
        }
        for seq in [&b"\x1b[F"[..], b"\x1b[4~", b"\x1b[8~", b"\x1bOF"] {
            assert_eq!(parse_one(seq), plain(KeyCode::End), "{seq:?}");
        }
    }

    #[test]
    fn tilde_keys() {
        assert_eq!(parse_one(b"\x1b[3~"), plain(KeyCode::Delete));
        assert_eq!(parse_one(b"\x1b[5~"), plain(KeyCode::PageUp));
        assert_eq!(parse_one(b"\x1b[6~"), plain(KeyCode::PageDown));
    }

    #[test]
    fn unused_sequences_are_swallowed() {
        // F5 and an SGR mouse report.
        assert_eq!(parse(b"\x1b[15~x"), vec![plain(KeyCode::Char('x'))]);
        assert_eq!(parse(b"\x1b[<0;3;4Mx"), vec![plain(KeyCode::Char('x'))]);
    }

    #[test]
    fn csi_split_across_reads() {
        let mut p = Parser::new();
        assert!(p.advance(b"\x1b[").is_empty());
        assert_eq!(p.advance(b"A"), vec![plain(KeyCode::Up)]);
    }

    // ── SS3 ─────────────────────────────────────────────────────────────

    #[test]
    fn ss3_arrows() {
        assert_eq!(parse_one(b"\x1bOA"), plain(KeyCode::Up));
        assert_eq!(parse_one(b"\x1bOD"), plain(KeyCode::Left));
    }

    // ── Escape ──────────────────────────────────────────────────────────

    #[test]
    fn lone_escape_waits_for_flush() {
        let mut p = Parser::new();
        assert!(p.advance(b"\x1b").is_empty());
        assert!(p.has_pending());
        assert_eq!(p.flush(), vec![plain(KeyCode::Escape)]);
        assert!(!p.has_pending());
    }

    #[test]
    fn alt_char() {
        assert_eq!(parse_one(b"\x1bx"), with(KeyCode::Char('x'), Modifiers::ALT));
    }

    #[test]
    fn double_escape() {
        let mut p = Parser::new();
        assert_eq!(p.advance(b"\x1b\x1b"), vec![plain(KeyCode::Escape)]);
        assert_eq!(p.flush(), vec![plain(KeyCode::Escape)]);
    }

    // ── Params ──────────────────────────────────────────────────────────

    #[test]
    fn csi_params_parse() {
        assert_eq!(parse_csi_params(b""), Vec::<u16>::new());
        assert_eq!(parse_csi_params(b"1;5"), vec![1, 5]);
        assert_eq!(parse_csi_params(b";2"), vec![0, 2]);
        assert_eq!(parse_csi_params(b"99999"), vec![u16::MAX]);
    }

    #[test]
    fn modifier_decoding() {
        assert_eq!(decode_modifiers(0), Modifiers::empty());
        assert_eq!(decode_modifiers(1), Modifiers::empty());
        assert_eq!(decode_modifiers(2), Modifiers::SHIFT);
        assert_eq!(decode_modifiers(5), Modifiers::CTRL);
    }
}
