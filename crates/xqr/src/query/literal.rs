//! Literals and comparison operators

use std::fmt;

/// Typed literal value
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Literal {
    Str(String),
    Int(i64),
}

impl Literal {
    /// Parse a literal token
    ///
    /// A token wrapped in double quotes with no quote inside is a string (no escape
    /// processing); an optionally signed run of digits is an integer.
    pub fn parse(text: &str) -> Option<Self> {
        if let Some(inner) = text.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
            return (!inner.contains('"')).then(|| Self::Str(inner.to_string()));
        }

        if is_integer(text) {
            return text.parse().ok().map(Self::Int);
        }

        None
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Int(_) => None,
        }
    }

    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Str(_) => None,
        }
    }

    pub const fn is_str(&self) -> bool {
        matches!(self, Self::Str(_))
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "\"{s}\""),
            Self::Int(n) => write!(f, "{n}"),
        }
    }
}

/// `[+-]?[0-9]+`, whole token
fn is_integer(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Comparison operator of a WHERE condition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Operator {
    Gt,
    Lt,
    Eq,
    Contains,
}

impl Operator {
    pub const ALL: [Self; 4] = [Self::Gt, Self::Lt, Self::Eq, Self::Contains];

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Eq => "=",
            Self::Contains => "CONTAINS",
        }
    }

    /// Operator spelled at the start of `text`, with the remainder
    pub fn strip_prefix(text: &str) -> Option<(Self, &str)> {
        Self::ALL
            .into_iter()
            .find_map(|op| text.strip_prefix(op.symbol()).map(|rest| (op, rest)))
    }

    /// Split `elem<op>lit` at the last operator preceded by at least one byte
    ///
    /// The literal part may be empty.
    pub fn split_condition(text: &str) -> Option<(&str, Self, &str)> {
        (1..text.len())
            .rev()
            .filter(|&at| text.is_char_boundary(at))
            .find_map(|at| {
                let (head, tail) = text.split_at(at);
                Self::strip_prefix(tail).map(|(op, rest)| (head, op, rest))
            })
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
