//! Element/attribute specifiers (`name`, `.attr`, `name.attr`)

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result, Span};
use crate::lexer::token::{is_keyword, Keyword, Token};
use crate::xml::is_valid_name;

/// Parsed name/attribute selector
///
/// At least one of `name` and `attribute` is always present.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ElementSpec {
    name: Option<String>,
    attribute: Option<String>,
}

impl ElementSpec {
    /// Parse a single token
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_at(text, Span::empty())
    }

    pub(crate) fn from_token(token: &Token) -> Result<Self> {
        Self::parse_at(&token.text, token.span)
    }

    fn parse_at(text: &str, span: Span) -> Result<Self> {
        let malformed = || {
            Error::new(
                ErrorKind::MalformedElement {
                    token: text.to_string(),
                },
                span,
            )
        };

        if text.is_empty() || text.chars().any(char::is_whitespace) {
            return Err(malformed());
        }

        let spec = match text.split_once('.') {
            None => Self {
                name: Some(text.to_string()),
                attribute: None,
            },
            Some((_, "")) => return Err(malformed()),
            Some((_, suffix)) if suffix.contains('.') => return Err(malformed()),
            Some((prefix, suffix)) => Self {
                name: (!prefix.is_empty()).then(|| prefix.to_string()),
                attribute: Some(suffix.to_string()),
            },
        };

        let name_ok = spec.name.as_deref().map_or(true, is_valid_name);
        let attribute_ok = spec.attribute.as_deref().map_or(true, is_valid_name);
        if name_ok && attribute_ok {
            Ok(spec)
        } else {
            Err(malformed())
        }
    }

    /// Spec matching elements by name only
    pub fn element(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            attribute: None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    pub fn has_name(&self) -> bool {
        self.name.is_some()
    }

    pub fn has_attribute(&self) -> bool {
        self.attribute.is_some()
    }

    /// The `ROOT` anchor marker
    pub fn is_root(&self) -> bool {
        self.name() == Some(Keyword::Root.as_str()) && !self.has_attribute()
    }

    /// First component spelled like a query keyword, if any
    pub fn reserved_word(&self) -> Option<&str> {
        self.name()
            .filter(|name| is_keyword(name))
            .or_else(|| self.attribute().filter(|attr| is_keyword(attr)))
    }
}

impl FromStr for ElementSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ElementSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            f.write_str(name)?;
        }
        if let Some(attribute) = &self.attribute {
            write!(f, ".{attribute}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_only() -> Result<()> {
        let spec = ElementSpec::parse("book")?;
        assert_eq!(spec.name(), Some("book"));
        assert_eq!(spec.attribute(), None);
        Ok(())
    }

    #[test]
    fn test_attribute_only() -> Result<()> {
        let spec = ElementSpec::parse(".id")?;
        assert_eq!(spec.name(), None);
        assert_eq!(spec.attribute(), Some("id"));
        Ok(())
    }

    #[test]
    fn test_name_and_attribute() -> Result<()> {
        let spec = ElementSpec::parse("book.id")?;
        assert_eq!(spec.name(), Some("book"));
        assert_eq!(spec.attribute(), Some("id"));
        Ok(())
    }

    #[test]
    fn test_bad_shapes() {
        for token in ["a.b.c", "a.", ".", "..a", "", "1abc", "a.1b", "a b", "a=b"] {
            let err = ElementSpec::parse(token).err();
            assert_eq!(
                err.as_ref().map(Error::kind),
                Some(&ErrorKind::MalformedElement {
                    token: token.to_string()
                }),
                "token {token:?}"
            );
        }
    }

    #[test]
    fn test_is_root() -> Result<()> {
        assert!(ElementSpec::parse("ROOT")?.is_root());
        assert!(!ElementSpec::parse("ROOT.id")?.is_root());
        assert!(!ElementSpec::parse("root")?.is_root());
        Ok(())
    }

    #[test]
    fn test_reserved_word() -> Result<()> {
        assert_eq!(ElementSpec::parse("SELECT")?.reserved_word(), Some("SELECT"));
        assert_eq!(ElementSpec::parse("a.LIMIT")?.reserved_word(), Some("LIMIT"));
        assert_eq!(ElementSpec::parse("select.limit")?.reserved_word(), None);
        Ok(())
    }

    #[test]
    fn test_display() -> Result<()> {
        for token in ["book", ".id", "book.id"] {
            assert_eq!(ElementSpec::parse(token)?.to_string(), token);
        }
        Ok(())
    }

    #[test]
    fn test_error_carries_token_span() {
        let span = Span::new(
            crate::error::Pos::new(7, 1, 8),
            crate::error::Pos::new(12, 1, 13),
        );
        let err = ElementSpec::from_token(&Token::new("a.b.c", span)).err();
        assert_eq!(err.map(|e| e.span()), Some(span));
    }
}
