//! C syntax highlighting by a single-pass token scanner.
//!
//! [`tokenize_line`] classifies every character of one line into a
//! [`Category`], given whether the line starts inside an unterminated
//! `/* ... */` block. It returns the tokens and the block-comment state the
//! line leaves behind. The scanner is a best-effort lexer: it never rejects
//! input, and every character of the line is covered by exactly one token.
//!
//! # Block comments across lines
//!
//! The only state carried between lines is a single [`CommentState`] flag.
//! It is a pure function of the lines before the current one, so it is
//! recomputed by replaying the scanner from line 0 whenever it's needed.
//! [`highlight_window`] does that replay once per window and then tokenizes
//! the visible lines, so a repaint costs O(position of the window) and no
//! cache has to be invalidated on edit.
//!
//! # Priority
//!
//! When several interpretations could start at the same character, the
//! first match wins:
//!
//! 1. continuation of a block comment (up to and including `*/`)
//! 2. `//` line comment (rest of the line)
//! 3. `/*` block comment
//! 4. `"` string literal
//! 5. `'` character literal
//! 6. `#` preprocessor directive name, when only whitespace precedes it
//! 7. number (a digit, or `.` followed by a digit)
//! 8. identifier or keyword
//! 9. any other single character, as plain text

use crate::buffer::LineStore;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Highlight category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Keyword,
    String,
    CharLiteral,
    Comment,
    Preprocessor,
    Number,
    Plain,
}

/// A span `[start, end)` of char columns within one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub start: usize,
    pub end: usize,
    pub category: Category,
}

impl Token {
    #[inline]
    #[must_use]
    pub const fn new(start: usize, end: usize, category: Category) -> Self {
        Self { start, end, category }
    }

    /// Number of chars covered.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Whether a line starts (or ends) inside an unterminated block comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentState {
    #[default]
    Code,
    InBlockComment,
}

impl CommentState {
    #[inline]
    #[must_use]
    pub const fn in_comment(self) -> bool {
        matches!(self, Self::InBlockComment)
    }
}

/// Tokens of one line and the comment state it exits with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineHighlight {
    pub tokens: Vec<Token>,
    pub exit: CommentState,
}

impl LineHighlight {
    /// Category of the char at `col`, if any token covers it.
    #[must_use]
    pub fn category_at(&self, col: usize) -> Option<Category> {
        self.tokens
            .iter()
            .find(|t| t.start <= col && col < t.end)
            .map(|t| t.category)
    }
}

// ---------------------------------------------------------------------------
// Keywords
// ---------------------------------------------------------------------------

/// The 32 C89 keywords.
#[must_use]
pub fn is_keyword(word: &str) -> bool {
    matches!(
        word,
        "auto"
            | "break"
            | "case"
            | "char"
            | "const"
            | "continue"
            | "default"
            | "do"
            | "double"
            | "else"
            | "enum"
            | "extern"
            | "float"
            | "for"
            | "goto"
            | "if"
            | "int"
            | "long"
            | "register"
            | "return"
            | "short"
            | "signed"
            | "sizeof"
            | "static"
            | "struct"
            | "switch"
            | "typedef"
            | "union"
            | "unsigned"
            | "void"
            | "volatile"
            | "while"
    )
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

/// Tokenize one line starting in `entering` comment state.
///
/// Pure: the same line and entering state always give the same result.
#[must_use]
pub fn tokenize_line(line: &str, entering: CommentState) -> LineHighlight {
    let chars: Vec<char> = line.chars().collect();
    let len = chars.len();
    let mut tokens = Vec::new();
    let mut i = 0;

    if entering.in_comment() {
        match find_comment_end(&chars, 0) {
            Some(end) => {
                tokens.push(Token::new(0, end, Category::Comment));
                i = end;
            }
            None => {
                if len > 0 {
                    tokens.push(Token::new(0, len, Category::Comment));
                }
                return LineHighlight { tokens, exit: CommentState::InBlockComment };
            }
        }
    }

    while i < len {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        // Line comment swallows the rest.
        if c == '/' && next == Some('/') {
            tokens.push(Token::new(i, len, Category::Comment));
            break;
        }

        if c == '/' && next == Some('*') {
            // Search after the opener so `/*/` doesn't close itself.
            if let Some(end) = find_comment_end(&chars, i + 2) {
                tokens.push(Token::new(i, end, Category::Comment));
                i = end;
                continue;
            }
            tokens.push(Token::new(i, len, Category::Comment));
            return LineHighlight { tokens, exit: CommentState::InBlockComment };
        }

        let start = i;
        let category = match c {
            '"' => {
                i = scan_quoted(&chars, i, '"');
                Category::String
            }
            '\'' => {
                i = scan_quoted(&chars, i, '\'');
                Category::CharLiteral
            }
            '#' if chars[..i].iter().all(|ch| ch.is_whitespace()) => {
                i += 1;
                while i < len && !chars[i].is_whitespace() {
                    i += 1;
                }
                Category::Preprocessor
            }
            _ if c.is_ascii_digit() || (c == '.' && next.is_some_and(|n| n.is_ascii_digit())) => {
                i += 1;
                while i < len && matches!(chars[i], '0'..='9' | '.' | 'f' | 'l') {
                    i += 1;
                }
                Category::Number
            }
            _ if c.is_ascii_alphabetic() || c == '_' => {
                i += 1;
                while i < len && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                if is_keyword(&word) {
                    Category::Keyword
                } else {
                    Category::Plain
                }
            }
            _ => {
                i += 1;
                Category::Plain
            }
        };
        tokens.push(Token::new(start, i, category));
    }

    LineHighlight { tokens, exit: CommentState::Code }
}

/// Index just past the first `*/` at or after `from`.
fn find_comment_end(chars: &[char], from: usize) -> Option<usize> {
    (from..chars.len().saturating_sub(1))
        .find(|&j| chars[j] == '*' && chars[j + 1] == '/')
        .map(|j| j + 2)
}

/// Index just past a quoted literal opened at `open`. A backslash consumes
/// itself and the next char; an unterminated literal runs to end of line.
fn scan_quoted(chars: &[char], open: usize, quote: char) -> usize {
    let mut i = open + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    chars.len()
}

// ---------------------------------------------------------------------------
// Replay over a line store
// ---------------------------------------------------------------------------

/// Comment state entering line `row`, computed by scanning lines `0..row`.
///
/// Rows past the end replay the whole store.
#[must_use]
pub fn comment_state_at(store: &LineStore, row: usize) -> CommentState {
    store
        .lines()
        .take(row)
        .fold(CommentState::Code, |state, line| tokenize_line(line, state).exit)
}

/// Highlight up to `count` lines starting at `first`.
///
/// The entering state of `first` is replayed once; each following line
/// enters with the previous line's exit state. Lines past the end of the
/// store are not returned.
#[must_use]
pub fn highlight_window(store: &LineStore, first: usize, count: usize) -> Vec<LineHighlight> {
    let mut state = comment_state_at(store, first);
    store
        .lines()
        .skip(first)
        .take(count)
        .map(|line| {
            let hl = tokenize_line(line, state);
            state = hl.exit;
            hl
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
