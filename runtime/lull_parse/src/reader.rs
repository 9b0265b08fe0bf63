//! Builds cons lists from the token stream.

use std::iter::Peekable;

use lull_ir::{ScriptValue, Symbol};

use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{Delimiter, Lexer, Token, TokenKind};

/// Head symbol inserted for `[...]`.
pub const ARRAY_CONSTRUCTOR: &str = "make-array";
/// Head symbol inserted for `{...}`.
pub const MAP_CONSTRUCTOR: &str = "make-map";

/// Parse `source` into a list of its top-level forms.
///
/// Empty input (or input with only comments) yields `Nil`.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse(source: &str) -> Result<ScriptValue, ParseError> {
    let mut reader = Reader {
        tokens: Lexer::new(source).peekable(),
        end: source.len(),
    };
    let mut forms = Vec::new();
    while let Some(token) = reader.next_token()? {
        forms.push(reader.read_form(token)?);
    }
    tracing::debug!(forms = forms.len(), "parsed script");
    Ok(ScriptValue::list(forms))
}

struct Reader<'a> {
    tokens: Peekable<Lexer<'a>>,
    end: usize,
}

impl Reader<'_> {
    fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        self.tokens.next().transpose()
    }

    fn read_form(&mut self, token: Token) -> Result<ScriptValue, ParseError> {
        Ok(match token.kind {
            TokenKind::Open(delimiter) => {
                return lull_stack::ensure_sufficient_stack(|| self.read_list(delimiter));
            }
            TokenKind::Close(delimiter) => {
                return Err(ParseError::new(
                    ParseErrorKind::UnexpectedClose {
                        found: delimiter.close_char(),
                    },
                    token.offset,
                ));
            }
            TokenKind::Str(text) => ScriptValue::new(text),
            TokenKind::Hash(value) => ScriptValue::new(value),
            TokenKind::Nil => ScriptValue::Nil,
            TokenKind::Bool(value) => ScriptValue::new(value),
            TokenKind::Int32(value) => ScriptValue::new(value),
            TokenKind::Uint32(value) => ScriptValue::new(value),
            TokenKind::Int64(value) => ScriptValue::new(value),
            TokenKind::Uint64(value) => ScriptValue::new(value),
            TokenKind::Float(value) => ScriptValue::new(value),
            TokenKind::Double(value) => ScriptValue::new(value),
            TokenKind::Symbol(name) => ScriptValue::Symbol(Symbol::new(&name)),
        })
    }

    fn read_list(&mut self, open: Delimiter) -> Result<ScriptValue, ParseError> {
        let mut items = match open {
            Delimiter::Paren => Vec::new(),
            Delimiter::Bracket => vec![ScriptValue::symbol(ARRAY_CONSTRUCTOR)],
            Delimiter::Brace => vec![ScriptValue::symbol(MAP_CONSTRUCTOR)],
        };
        loop {
            let Some(token) = self.next_token()? else {
                return Err(ParseError::new(
                    ParseErrorKind::UnclosedList {
                        expected: open.close_char(),
                    },
                    self.end,
                ));
            };
            match token.kind {
                TokenKind::Close(close) if close == open => break,
                _ => items.push(self.read_form(token)?),
            }
        }
        Ok(ScriptValue::list(items))
    }
}
