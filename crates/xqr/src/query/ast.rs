//! Parsed query structures

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::query::element::ElementSpec;
use crate::query::literal::{Literal, Operator};
use crate::query::parser::Parser;

/// WHERE clause condition
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Predicate {
    target: ElementSpec,
    operator: Operator,
    literal: Literal,
    negate: bool,
}

impl Predicate {
    pub const fn new(target: ElementSpec, operator: Operator, literal: Literal, negate: bool) -> Self {
        Self {
            target,
            operator,
            literal,
            negate,
        }
    }

    pub fn target(&self) -> &ElementSpec {
        &self.target
    }

    pub const fn operator(&self) -> Operator {
        self.operator
    }

    pub fn literal(&self) -> &Literal {
        &self.literal
    }

    /// Odd number of `NOT` prefixes
    pub const fn negate(&self) -> bool {
        self.negate
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negate {
            f.write_str("NOT ")?;
        }
        write!(f, "{} {} {}", self.target, self.operator, self.literal)
    }
}

/// A parsed query
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Query {
    select: ElementSpec,
    from: Option<ElementSpec>,
    predicate: Option<Predicate>,
    limit: Option<usize>,
}

impl Query {
    /// Parse query text
    pub fn parse(input: &str) -> Result<Self> {
        Parser::new(input).parse()
    }

    pub(crate) const fn new(select: ElementSpec) -> Self {
        Self {
            select,
            from: None,
            predicate: None,
            limit: None,
        }
    }

    pub(crate) fn set_from(&mut self, from: ElementSpec) {
        self.from = Some(from);
    }

    pub(crate) fn set_predicate(&mut self, predicate: Predicate) {
        self.predicate = Some(predicate);
    }

    pub(crate) fn set_limit(&mut self, limit: usize) {
        self.limit = Some(limit);
    }

    /// SELECT target; never carries an attribute
    pub fn select(&self) -> &ElementSpec {
        &self.select
    }

    /// FROM anchor; `None` when the clause is empty
    pub fn from(&self) -> Option<&ElementSpec> {
        self.from.as_ref()
    }

    /// WHERE condition
    pub fn predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }

    pub const fn limit(&self) -> Option<usize> {
        self.limit
    }
}

impl FromStr for Query {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT {} FROM", self.select)?;
        if let Some(from) = &self.from {
            write!(f, " {from}")?;
        }
        if let Some(predicate) = &self.predicate {
            write!(f, " WHERE {predicate}")?;
        }
        if let Some(limit) = self.limit {
            write!(f, " LIMIT {limit}")?;
        }
        Ok(())
    }
}
