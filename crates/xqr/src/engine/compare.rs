//! Operator semantics with a tri-state outcome

use std::cmp::Ordering;

use crate::query::{Literal, Operator};

/// Result of applying an operator to two values
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    Match(bool),
    /// Operand types the operator does not apply to
    Inapplicable,
}

/// Compare a value taken from the document against a query literal
///
/// `>`, `<` and `=` need both operands of the same type; integers compare
/// numerically and strings by byte order. `CONTAINS` needs two strings.
pub fn compare(left: &Literal, right: &Literal, operator: Operator) -> Comparison {
    if operator == Operator::Contains {
        return match (left, right) {
            (Literal::Str(l), Literal::Str(r)) => Comparison::Match(l.contains(r.as_str())),
            _ => Comparison::Inapplicable,
        };
    }

    let ordering = match (left, right) {
        (Literal::Int(l), Literal::Int(r)) => l.cmp(r),
        (Literal::Str(l), Literal::Str(r)) => l.as_str().cmp(r.as_str()),
        _ => return Comparison::Inapplicable,
    };

    let matched = match operator {
        Operator::Gt => ordering == Ordering::Greater,
        Operator::Lt => ordering == Ordering::Less,
        Operator::Eq => ordering == Ordering::Equal,
        Operator::Contains => return Comparison::Inapplicable,
    };
    Comparison::Match(matched)
}

/// Type a raw attribute value or text content
///
/// A value starting with an optionally signed run of digits becomes that
/// integer, so `12.7` and `12px` read as `12`. Anything else stays a string.
pub fn extract_value(raw: &str) -> Literal {
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    let digits = unsigned.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return Literal::Str(raw.to_string());
    }

    let sign_len = raw.len() - unsigned.len();
    raw.get(..sign_len + digits)
        .and_then(|prefix| prefix.parse().ok())
        .map_or_else(|| Literal::Str(raw.to_string()), Literal::Int)
}
