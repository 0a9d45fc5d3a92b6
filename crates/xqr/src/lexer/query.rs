//! Whitespace tokenizer for query text
//!
//! Tokens are maximal runs of non-whitespace bytes. Quotes get no special
//! treatment, so a string literal containing whitespace is split in two.

use crate::error::{Pos, Span};
use crate::lexer::cursor::{is_whitespace, Cursor};
use crate::lexer::token::Token;

/// Query lexer
#[derive(Clone, Debug)]
pub struct QueryLexer<'a> {
    cursor: Cursor<'a>,
}

impl<'a> QueryLexer<'a> {
    pub const fn new(input: &'a str) -> Self {
        Self {
            cursor: Cursor::new(input.as_bytes()),
        }
    }

    /// Get the next token, or `None` once the input is exhausted
    pub fn next_token(&mut self) -> Option<Token> {
        self.cursor.skip_whitespace();
        if self.cursor.is_eof() {
            return None;
        }

        let start_pos = self.cursor.position();
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if is_whitespace(b) {
                break;
            }
            self.cursor.advance();
        }

        // splitting at ASCII bytes keeps UTF-8 sequences intact
        let text = String::from_utf8_lossy(self.cursor.slice_from(start)).into_owned();
        Some(Token::new(text, Span::new(start_pos, self.cursor.position())))
    }

    /// Position just past the last byte of input
    pub fn end_position(&self) -> Pos {
        let mut cursor = self.cursor.clone();
        while !cursor.is_eof() {
            cursor.advance();
        }
        cursor.position()
    }

    /// Consume the lexer and collect all tokens
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        tokens
    }
}

impl Iterator for QueryLexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}
