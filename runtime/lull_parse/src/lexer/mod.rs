//! Tokenizer for script text.
//!
//! Whitespace and commas separate tokens; `;` starts a comment that runs to
//! the end of the line. Bare tokens are classified in this order: pre-hashed
//! `:name`, `nil`/`null`, booleans, numbers, and finally symbols.
//!
//! # Numeric literals
//!
//! | Text | Type |
//! |------|------|
//! | `1` | `i32` |
//! | `1u` | `u32` |
//! | `1l` | `i64` |
//! | `1ul` | `u64` |
//! | `1.5f`, `1.f` | `f32` |
//! | `1.5`, `1.`, `1e3` | `f64` |

use lull_ir::{hash, HashValue};

use crate::error::{ParseError, ParseErrorKind};

/// The three bracket pairs. All delimit lists; square and curly brackets
/// additionally mark array and map constructors.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Delimiter {
    Paren,
    Bracket,
    Brace,
}

impl Delimiter {
    fn from_open(c: char) -> Option<Self> {
        match c {
            '(' => Some(Delimiter::Paren),
            '[' => Some(Delimiter::Bracket),
            '{' => Some(Delimiter::Brace),
            _ => None,
        }
    }

    fn from_close(c: char) -> Option<Self> {
        match c {
            ')' => Some(Delimiter::Paren),
            ']' => Some(Delimiter::Bracket),
            '}' => Some(Delimiter::Brace),
            _ => None,
        }
    }

    pub fn close_char(self) -> char {
        match self {
            Delimiter::Paren => ')',
            Delimiter::Bracket => ']',
            Delimiter::Brace => '}',
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Open(Delimiter),
    Close(Delimiter),
    Str(String),
    Hash(HashValue),
    Nil,
    Bool(bool),
    Int32(i32),
    Uint32(u32),
    Int64(i64),
    Uint64(u64),
    Float(f32),
    Double(f64),
    Symbol(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character.
    pub offset: usize,
}

fn is_separator(c: char) -> bool {
    c.is_ascii_whitespace() || c == ','
}

fn ends_bare_token(c: char) -> bool {
    is_separator(c) || c == ';' || Delimiter::from_open(c).is_some() || Delimiter::from_close(c).is_some()
}

/// Streaming tokenizer over a source string.
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer { source, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn skip_trivia(&mut self) {
        loop {
            let rest = self.rest();
            let trimmed = rest.trim_start_matches(is_separator);
            self.pos += rest.len() - trimmed.len();
            if !trimmed.starts_with(';') {
                return;
            }
            let line_end = trimmed.find('\n').unwrap_or(trimmed.len());
            self.pos += line_end;
        }
    }

    fn lex_string(&mut self, quote: char) -> Result<TokenKind, ParseError> {
        let start = self.pos;
        let mut text = String::new();
        let mut chars = self.rest().char_indices().skip(1);
        while let Some((index, c)) = chars.next() {
            match c {
                '\\' => {
                    if let Some((_, escaped)) = chars.next() {
                        text.push(match escaped {
                            'n' => '\n',
                            't' => '\t',
                            'r' => '\r',
                            other => other,
                        });
                    }
                }
                c if c == quote => {
                    self.pos += index + c.len_utf8();
                    return Ok(TokenKind::Str(text));
                }
                c => text.push(c),
            }
        }
        self.pos = self.source.len();
        Err(ParseError::new(
            ParseErrorKind::UnterminatedString { quote },
            start,
        ))
    }

    fn lex_bare(&mut self) -> Result<TokenKind, ParseError> {
        let start = self.pos;
        let rest = self.rest();
        let len = rest.find(ends_bare_token).unwrap_or(rest.len());
        let text = &rest[..len];
        self.pos += len;
        classify(text).map_err(|kind| ParseError::new(kind, start))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_trivia();
        let offset = self.pos;
        let c = self.rest().chars().next()?;
        let kind = if let Some(delimiter) = Delimiter::from_open(c) {
            self.pos += 1;
            Ok(TokenKind::Open(delimiter))
        } else if let Some(delimiter) = Delimiter::from_close(c) {
            self.pos += 1;
            Ok(TokenKind::Close(delimiter))
        } else if c == '\'' || c == '"' {
            self.lex_string(c)
        } else {
            self.lex_bare()
        };
        Some(kind.map(|kind| Token { kind, offset }))
    }
}

fn looks_numeric(text: &str) -> bool {
    let unsigned = text.strip_prefix(['-', '+']).unwrap_or(text);
    let mut chars = unsigned.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('.') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

fn classify(text: &str) -> Result<TokenKind, ParseErrorKind> {
    if let Some(name) = text.strip_prefix(':') {
        if name.is_empty() {
            return Err(ParseErrorKind::EmptyHash);
        }
        return Ok(TokenKind::Hash(hash(name)));
    }
    match text {
        "nil" | "null" => return Ok(TokenKind::Nil),
        "true" => return Ok(TokenKind::Bool(true)),
        "false" => return Ok(TokenKind::Bool(false)),
        _ => {}
    }
    if looks_numeric(text) {
        return classify_number(text).ok_or_else(|| ParseErrorKind::InvalidNumber {
            text: text.to_owned(),
        });
    }
    Ok(TokenKind::Symbol(text.to_owned()))
}

fn classify_number(text: &str) -> Option<TokenKind> {
    if let Some(digits) = text.strip_suffix("ul") {
        return digits.parse().ok().map(TokenKind::Uint64);
    }
    if let Some(digits) = text.strip_suffix('l') {
        return digits.parse().ok().map(TokenKind::Int64);
    }
    if let Some(digits) = text.strip_suffix('u') {
        return digits.parse().ok().map(TokenKind::Uint32);
    }
    if let Some(digits) = text.strip_suffix('f') {
        return digits.parse().ok().map(TokenKind::Float);
    }
    if let Ok(value) = text.parse() {
        return Some(TokenKind::Int32(value));
    }
    text.parse().ok().map(TokenKind::Double)
}
