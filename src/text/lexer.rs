//! Ion text lexer.
//!
//! The lexer splits its input into tokens that cover every byte exactly once, so concatenating
//! the contents of all tokens yields the input again. Characters that start no Ion token become
//! single-character [`TokenKind::NotIon`] tokens instead of errors. Every step consumes at least
//! one character, and unterminated strings, symbols, comments and lobs run to the end of input.

use std::fmt::{Display, Formatter};

const LOB_START: &str = "{{";
const LOB_END: &str = "}}";
const ANNOTATION_DELIMITER: &str = "::";
const LONG_QUOTE: &[u8] = b"'''";

const SINGLE_DELIMITERS: &[u8] = b"{}[]():,";
const OPERATOR_CHARS: &[u8] = b"!#%&*+-./;<=>?@^`|~";
const NUMERIC_STOP_CHARS: &[u8] = b"{}[](),\"' \t\n\r\x0B\x0C";

/// Kind of a text token.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    Whitespace,
    Comment,
    /// Punctuation: `{{ }} :: { } [ ] ( ) : ,`.
    Delimiter,
    /// A whole scalar literal, or one part of a lob or long string.
    PartialValue,
    NotIon,
}

/// Location of the first character of a token.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Position {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, counted in characters and reset after every `\n`.
    pub column: usize,
    /// Byte offset from the start of input.
    pub offset: usize,
}

impl Position {
    pub const START: Position = Position {
        line: 1,
        column: 1,
        offset: 0,
    };
}

impl Default for Position {
    #[inline]
    fn default() -> Self {
        Position::START
    }
}

impl Display for Position {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A slice of the input text with its kind and position.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Token<'a> {
    pub content: &'a str,
    pub kind: TokenKind,
    pub position: Position,
}

impl<'a> Token<'a> {
    #[inline]
    pub const fn new(content: &'a str, kind: TokenKind, position: Position) -> Self {
        Self {
            content,
            kind,
            position,
        }
    }

    /// Whitespace and comments.
    #[inline]
    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace | TokenKind::Comment)
    }

    #[inline]
    pub fn is_delimiter(&self, delimiter: &str) -> bool {
        self.kind == TokenKind::Delimiter && self.content == delimiter
    }

    #[inline]
    pub fn is_partial_value(&self) -> bool {
        self.kind == TokenKind::PartialValue
    }

    /// A `'''` quoted long string segment.
    #[inline]
    pub fn is_long_string(&self) -> bool {
        self.is_partial_value() && self.content.as_bytes().starts_with(LONG_QUOTE)
    }
}

#[inline]
fn is_symbol_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

#[inline]
fn is_symbol_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

#[inline]
fn is_operator_char(b: u8) -> bool {
    OPERATOR_CHARS.contains(&b)
}

/// Length of the leading run of bytes matching `f`.
#[inline]
fn run_len<F: Fn(u8) -> bool>(bytes: &[u8], f: F) -> usize {
    bytes.iter().take_while(|b| f(**b)).count()
}

#[inline]
fn whitespace_len(rest: &str) -> usize {
    rest.char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map_or(rest.len(), |(i, _)| i)
}

/// Length of a quoted literal starting at the opening quote, skipping backslash escapes.
#[inline]
fn quoted_len(bytes: &[u8], quote: &[u8]) -> usize {
    let mut i = quote.len();
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i += 2;
        } else if bytes[i..].starts_with(quote) {
            return i + quote.len();
        } else {
            i += 1;
        }
    }
    bytes.len()
}

/// Ion text lexer.
///
/// A `Lexer` is an iterator over [`Token`]s. Cloning it yields an independent cursor that
/// restarts from the same position.
#[derive(Clone, Debug)]
pub struct Lexer<'a> {
    input: &'a str,
    position: Position,
    in_lob: bool,
}

impl<'a> Lexer<'a> {
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: Position::START,
            in_lob: false,
        }
    }

    #[inline]
    pub fn input(&self) -> &'a str {
        self.input
    }

    #[inline]
    fn exhausted(&self) -> bool {
        self.position.offset >= self.input.len()
    }

    #[inline]
    fn remain(&self) -> &'a str {
        &self.input[self.position.offset..]
    }

    #[inline]
    fn advance(&mut self, content: &str) {
        for c in content.chars() {
            if c == '\n' {
                self.position.line += 1;
                self.position.column = 1;
            } else {
                self.position.column += 1;
            }
        }
        self.position.offset += content.len();
    }

    fn lex(&mut self) -> (TokenKind, usize) {
        let rest = self.remain();
        let bytes = rest.as_bytes();
        let first = bytes[0];
        let second = bytes.get(1).copied();

        // whitespace
        let len = whitespace_len(rest);
        if len > 0 {
            return (TokenKind::Whitespace, len);
        }

        // comments
        if rest.starts_with("//") {
            let len = rest.find('\n').map_or(rest.len(), |i| i + 1);
            return (TokenKind::Comment, len);
        }
        if rest.starts_with("/*") {
            let len = rest[2..].find("*/").map_or(rest.len(), |i| i + 4);
            return (TokenKind::Comment, len);
        }

        if rest.starts_with(LOB_START) {
            self.in_lob = true;
            return (TokenKind::Delimiter, LOB_START.len());
        }

        // null and typed null
        if rest.starts_with("null") {
            return match bytes.get(4).copied() {
                Some(b'.') => (TokenKind::PartialValue, 5 + run_len(&bytes[5..], is_symbol_char)),
                Some(b) if is_symbol_char(b) => (TokenKind::PartialValue, run_len(bytes, is_symbol_char)),
                _ => (TokenKind::PartialValue, 4),
            };
        }

        if bytes.starts_with(LONG_QUOTE) {
            return (TokenKind::PartialValue, quoted_len(bytes, LONG_QUOTE));
        }

        // `}}` only closes a lob; elsewhere each `}` closes its own struct
        if rest.starts_with(ANNOTATION_DELIMITER) {
            return (TokenKind::Delimiter, ANNOTATION_DELIMITER.len());
        }

        // numbers and timestamps
        if first.is_ascii_digit() || (first == b'-' && second.map_or(false, |b| b.is_ascii_digit())) {
            let len = bytes
                .iter()
                .position(|b| NUMERIC_STOP_CHARS.contains(b))
                .unwrap_or(bytes.len());
            return (TokenKind::PartialValue, len);
        }

        match first {
            b'"' => (TokenKind::PartialValue, quoted_len(bytes, b"\"")),
            b'\'' => (TokenKind::PartialValue, quoted_len(bytes, b"'")),
            b if SINGLE_DELIMITERS.contains(&b) => (TokenKind::Delimiter, 1),
            b if is_symbol_start(b) => (TokenKind::PartialValue, run_len(bytes, is_symbol_char)),
            b if is_operator_char(b) => (TokenKind::PartialValue, run_len(bytes, is_operator_char)),
            _ => {
                let len = rest.chars().next().map_or(1, char::len_utf8);
                (TokenKind::NotIon, len)
            }
        }
    }

    /// Lexes inside `{{ }}`: whitespace, quoted text and bare runs up to the closing `}}`.
    fn lex_lob(&mut self) -> (TokenKind, usize) {
        let rest = self.remain();
        let bytes = rest.as_bytes();

        if rest.starts_with(LOB_END) {
            self.in_lob = false;
            return (TokenKind::Delimiter, LOB_END.len());
        }

        let len = whitespace_len(rest);
        if len > 0 {
            return (TokenKind::Whitespace, len);
        }

        if bytes.starts_with(LONG_QUOTE) {
            return (TokenKind::PartialValue, quoted_len(bytes, LONG_QUOTE));
        }
        if bytes[0] == b'"' {
            return (TokenKind::PartialValue, quoted_len(bytes, b"\""));
        }

        let len = rest
            .char_indices()
            .find(|(_, c)| c.is_whitespace() || *c == '}')
            .map_or(rest.len(), |(i, _)| i);
        (TokenKind::PartialValue, len.max(1))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted() {
            return None;
        }

        let start = self.position;
        let (kind, len) = if self.in_lob { self.lex_lob() } else { self.lex() };
        let end = (start.offset + len).min(self.input.len());
        debug_assert!(end > start.offset);

        let content = &self.input[start.offset..end];
        self.advance(content);
        Some(Token::new(content, kind, start))
    }
}

/// Lexes the whole input.
#[inline]
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}
