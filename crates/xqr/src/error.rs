//! Error types for xqr

use std::fmt;
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn point(pos: Pos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }
}

/// Error kind for detailed categorization
///
/// Every kind except [`ErrorKind::InvalidXml`] and [`ErrorKind::MaxDepthExceeded`]
/// is a query format error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A keyword was required at this grammar position
    ExpectedKeyword { expected: String, found: String },
    /// The query ended where a token was required
    MissingToken { expected: String },
    /// Tokens remain after a complete query
    UnexpectedToken { found: String },
    /// Bad dot placement or an illegal XML identifier
    MalformedElement { token: String },
    /// Token is neither a quoted string nor an integer
    MalformedLiteral { token: String },
    /// A keyword used as an element or attribute name
    ReservedKeyword { word: String },
    /// `CONTAINS` paired with an integer literal
    ContainsRequiresString,
    /// The SELECT target carries an attribute
    AttributeSelected { token: String },
    /// LIMIT operand that is not a non-negative integer
    InvalidLimit { token: String },
    /// Input document is not well-formed
    InvalidXml,
    /// Input document nests deeper than the parser allows
    MaxDepthExceeded { max: u16 },
}

impl ErrorKind {
    /// Whether the error originates from the query text
    pub const fn is_query_format(&self) -> bool {
        !matches!(self, Self::InvalidXml | Self::MaxDepthExceeded { .. })
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExpectedKeyword { expected, found } => {
                write!(f, "expected {expected}, found '{found}'")
            }
            Self::MissingToken { expected } => {
                write!(f, "expected {expected}, found end of query")
            }
            Self::UnexpectedToken { found } => write!(f, "unexpected token '{found}'"),
            Self::MalformedElement { token } => write!(f, "bad element format '{token}'"),
            Self::MalformedLiteral { token } => write!(f, "bad literal '{token}'"),
            Self::ReservedKeyword { word } => write!(
                f,
                "'{word}' is a query keyword and cannot name an element or attribute"
            ),
            Self::ContainsRequiresString => {
                write!(f, "operator 'CONTAINS' can be applied only to a string")
            }
            Self::AttributeSelected { token } => {
                write!(f, "an attempt to SELECT attribute '{token}'")
            }
            Self::InvalidLimit { token } => {
                write!(f, "literal in LIMIT clause should be a non-negative int, found '{token}'")
            }
            Self::InvalidXml => write!(f, "invalid xml"),
            Self::MaxDepthExceeded { max } => write!(f, "max depth exceeded: {max}"),
        }
    }
}

/// Main error type for xqr
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Shorthand for `self.kind().is_query_format()`
    pub fn is_query_format(&self) -> bool {
        self.kind.is_query_format()
    }

    /// Create error at specific position
    pub fn at(kind: ErrorKind, offset: usize, line: u32, col: u32) -> Self {
        Self::new(kind, Span::point(Pos::new(offset, line, col)))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error at {}: {}", self.span.start, self.message)
    }
}

/// Result type alias for xqr
pub type Result<T> = std::result::Result<T, Error>;
