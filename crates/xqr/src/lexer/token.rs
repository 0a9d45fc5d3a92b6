//! Token types for the query lexer

use std::fmt;

use crate::error::Span;

/// Reserved words of the query language
///
/// Keywords are case-sensitive and always upper-case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Keyword {
    Select,
    From,
    Root,
    Where,
    Contains,
    Limit,
    Not,
}

impl Keyword {
    pub const ALL: [Self; 7] = [
        Self::Select,
        Self::From,
        Self::Root,
        Self::Where,
        Self::Contains,
        Self::Limit,
        Self::Not,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::From => "FROM",
            Self::Root => "ROOT",
            Self::Where => "WHERE",
            Self::Contains => "CONTAINS",
            Self::Limit => "LIMIT",
            Self::Not => "NOT",
        }
    }

    /// Look up a keyword by its exact spelling
    pub fn from_word(word: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kw| kw.as_str() == word)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check whether `word` is spelled exactly like a keyword
pub fn is_keyword(word: &str) -> bool {
    Keyword::from_word(word).is_some()
}

/// Whitespace-delimited query token with source location
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
        }
    }

    /// The keyword this token spells, if any
    pub fn keyword(&self) -> Option<Keyword> {
        Keyword::from_word(&self.text)
    }

    pub fn is(&self, keyword: Keyword) -> bool {
        self.text == keyword.as_str()
    }
}
