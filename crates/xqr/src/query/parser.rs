//! Recursive-descent query parser
//!
//! ```text
//! Query       := 'SELECT' ElemTok 'FROM' FromTail
//! FromTail    := ε | WhereClause | LimitClause | ElemTok AfterFrom
//! AfterFrom   := ε | WhereClause | LimitClause
//! WhereClause := 'WHERE' ('NOT')* Condition LimitClause?
//! Condition   := ElemOpLit | ElemTok OpTok LitTok | ElemTok OpLitTok
//! LimitClause := 'LIMIT' IntTok
//! ```

use tracing::debug;

use crate::error::{Error, ErrorKind, Pos, Result, Span};
use crate::lexer::{Keyword, QueryLexer, Token};
use crate::query::ast::{Predicate, Query};
use crate::query::element::ElementSpec;
use crate::query::literal::{Literal, Operator};

/// Query parser over an owned token vector
#[derive(Clone, Debug)]
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    end: Pos,
}

impl Parser {
    /// Tokenize `input` and create a parser positioned at the first token
    pub fn new(input: &str) -> Self {
        let lexer = QueryLexer::new(input);
        let end = lexer.end_position();
        Self {
            tokens: lexer.tokenize(),
            pos: 0,
            end,
        }
    }

    /// Parse the whole token stream into a [`Query`]
    pub fn parse(mut self) -> Result<Query> {
        self.expect_keyword(Keyword::Select)?;
        let select = self.select_target()?;
        self.expect_keyword(Keyword::From)?;

        let mut query = Query::new(select);
        self.from_tail(&mut query)?;

        if let Some(token) = self.advance() {
            return Err(Error::new(
                ErrorKind::UnexpectedToken { found: token.text },
                token.span,
            ));
        }

        debug!(%query, "parsed query");
        Ok(query)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn peek_keyword(&self) -> Option<Keyword> {
        self.peek().and_then(Token::keyword)
    }

    fn missing(&self, expected: &str) -> Error {
        Error::new(
            ErrorKind::MissingToken {
                expected: expected.to_string(),
            },
            Span::point(self.end),
        )
    }

    fn expect_token(&mut self, expected: &str) -> Result<Token> {
        self.advance().ok_or_else(|| self.missing(expected))
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<Token> {
        let expected = format!("'{keyword}' keyword");
        let token = self.expect_token(&expected)?;
        if token.is(keyword) {
            Ok(token)
        } else {
            Err(Error::new(
                ErrorKind::ExpectedKeyword {
                    expected,
                    found: token.text,
                },
                token.span,
            ))
        }
    }

    fn select_target(&mut self) -> Result<ElementSpec> {
        let token = self.expect_token("element name after 'SELECT' keyword")?;
        let element = ElementSpec::from_token(&token)?;
        if element.has_attribute() {
            return Err(Error::new(
                ErrorKind::AttributeSelected { token: token.text },
                token.span,
            ));
        }
        check_reserved(&element, &token)?;
        Ok(element)
    }

    fn from_tail(&mut self, query: &mut Query) -> Result<()> {
        match self.peek_keyword() {
            None if self.peek().is_none() => return Ok(()),
            Some(Keyword::Where) => return self.where_clause(query),
            Some(Keyword::Limit) => return self.limit_clause(query),
            _ => {}
        }

        let token = self.expect_token("element after 'FROM' keyword")?;
        let element = ElementSpec::from_token(&token)?;
        if !element.is_root() {
            check_reserved(&element, &token)?;
        }
        query.set_from(element);

        match (self.peek_keyword(), self.peek()) {
            (_, None) => Ok(()),
            (Some(Keyword::Where), _) => self.where_clause(query),
            (Some(Keyword::Limit), _) => self.limit_clause(query),
            (_, Some(token)) => Err(Error::new(
                ErrorKind::ExpectedKeyword {
                    expected: "'WHERE' or 'LIMIT' keyword".to_string(),
                    found: token.text.clone(),
                },
                token.span,
            )),
        }
    }

    fn where_clause(&mut self, query: &mut Query) -> Result<()> {
        self.expect_keyword(Keyword::Where)?;

        let mut negate = false;
        while self.peek_keyword() == Some(Keyword::Not) {
            self.advance();
            negate = !negate;
        }

        let predicate = self.condition(negate)?;
        query.set_predicate(predicate);

        match (self.peek_keyword(), self.peek()) {
            (_, None) => Ok(()),
            (Some(Keyword::Limit), _) => self.limit_clause(query),
            (_, Some(token)) => Err(Error::new(
                ErrorKind::ExpectedKeyword {
                    expected: "'LIMIT' keyword".to_string(),
                    found: token.text.clone(),
                },
                token.span,
            )),
        }
    }

    fn condition(&mut self, negate: bool) -> Result<Predicate> {
        let first = self.expect_token("condition after 'WHERE' keyword")?;

        // an operator in the next token means `first` is the whole element
        let operator_follows = self
            .peek()
            .is_some_and(|token| Operator::strip_prefix(&token.text).is_some());
        let fused = if operator_follows {
            None
        } else {
            Operator::split_condition(&first.text).map(|(element, operator, rest)| {
                (element.to_string(), operator, rest.to_string())
            })
        };

        let (element, operator, literal) = match fused {
            Some((element, operator, rest)) => {
                let literal = self.literal_token(&rest, first.span)?;
                (Token::new(element, first.span), operator, literal)
            }
            None => {
                let op_token = self.expect_token("operator in 'WHERE' condition")?;
                let Some((operator, rest)) = Operator::strip_prefix(&op_token.text) else {
                    return Err(Error::new(
                        ErrorKind::ExpectedKeyword {
                            expected: "operator in 'WHERE' condition".to_string(),
                            found: op_token.text,
                        },
                        op_token.span,
                    ));
                };
                let literal = self.literal_token(rest, op_token.span)?;
                (first, operator, literal)
            }
        };

        let target = ElementSpec::from_token(&element)?;
        check_reserved(&target, &element)?;

        let Some(value) = Literal::parse(&literal.text) else {
            return Err(Error::new(
                ErrorKind::MalformedLiteral {
                    token: literal.text,
                },
                literal.span,
            ));
        };

        if operator == Operator::Contains && !value.is_str() {
            return Err(Error::new(ErrorKind::ContainsRequiresString, literal.span));
        }

        Ok(Predicate::new(target, operator, value, negate))
    }

    /// Literal fused to the operator, or the following token when nothing was fused
    fn literal_token(&mut self, fused: &str, span: Span) -> Result<Token> {
        if fused.is_empty() {
            self.expect_token("literal in 'WHERE' condition")
        } else {
            Ok(Token::new(fused, span))
        }
    }

    fn limit_clause(&mut self, query: &mut Query) -> Result<()> {
        self.expect_keyword(Keyword::Limit)?;
        let token = self.expect_token("number in 'LIMIT' clause")?;

        let limit = Literal::parse(&token.text)
            .and_then(|literal| literal.as_int())
            .and_then(|n| usize::try_from(n).ok());

        match limit {
            Some(limit) => {
                query.set_limit(limit);
                Ok(())
            }
            None => Err(Error::new(
                ErrorKind::InvalidLimit { token: token.text },
                token.span,
            )),
        }
    }
}

fn check_reserved(element: &ElementSpec, token: &Token) -> Result<()> {
    match element.reserved_word() {
        Some(word) => Err(Error::new(
            ErrorKind::ReservedKeyword {
                word: word.to_string(),
            },
            token.span,
        )),
        None => Ok(()),
    }
}
