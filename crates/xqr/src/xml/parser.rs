//! XML parser implementation

use indexmap::IndexMap;
use tracing::trace;

use crate::error::{Error, ErrorKind, Result, Span};
use crate::lexer::Cursor;
use crate::xml::model::{Content, Document, Element};

const DEFAULT_MAX_DEPTH: u16 = 512;
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Configuration for the XML parser
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum element nesting depth (0 means unlimited)
    pub max_depth: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Config {
    /// Create a new config with unlimited depth
    pub const fn unlimited() -> Self {
        Self { max_depth: 0 }
    }
}

/// XML parser
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    config: Config,
    depth: u16,
}

impl<'a> Parser<'a> {
    /// Create a new XML parser
    pub const fn new(input: &'a [u8]) -> Self {
        Self::with_config(
            input,
            Config {
                max_depth: DEFAULT_MAX_DEPTH,
            },
        )
    }

    /// Create a new XML parser with custom configuration
    pub const fn with_config(input: &'a [u8], config: Config) -> Self {
        Self {
            cursor: Cursor::new(input),
            config,
            depth: 0,
        }
    }

    /// Parse an XML document
    pub fn parse(&mut self) -> Result<Document> {
        if self.cursor.starts_with(UTF8_BOM) {
            self.cursor.advance_by(UTF8_BOM.len());
        }
        self.skip_misc(true)?;
        if self.cursor.current() != Some(b'<') {
            return Err(self.error_here("expected root element"));
        }
        let root = self.parse_element()?;
        self.skip_misc(false)?;

        if !self.cursor.is_eof() {
            return Err(self.error_here("content after root element"));
        }

        trace!(root = %root.name, "parsed xml document");
        Ok(Document { root })
    }

    /// Skip whitespace, comments and processing instructions around the root
    fn skip_misc(&mut self, allow_doctype: bool) -> Result<()> {
        loop {
            self.skip_whitespace();
            if self.cursor.starts_with(b"<?") {
                self.cursor.advance_by(2);
                self.skip_until(b"?>")?;
            } else if self.cursor.starts_with(b"<!--") {
                self.cursor.advance_by(4);
                self.skip_until(b"-->")?;
            } else if allow_doctype && self.cursor.starts_with(b"<!DOCTYPE") {
                self.skip_doctype()?;
            } else {
                return Ok(());
            }
        }
    }

    fn parse_element(&mut self) -> Result<Element> {
        self.expect_byte(b'<')?;

        if self.cursor.current() == Some(b'/') {
            return Err(self.error_here("unexpected closing tag"));
        }

        self.enter()?;
        let name = self.parse_name()?;
        let attributes = self.parse_attributes()?;

        if self.cursor.current() == Some(b'/') {
            self.cursor.advance();
            self.expect_byte(b'>')?;
            self.depth -= 1;
            return Ok(Element {
                name,
                attributes,
                children: Vec::new(),
            });
        }

        self.expect_byte(b'>')?;

        let mut children = Vec::new();
        loop {
            if self.cursor.starts_with(b"</") {
                self.cursor.advance_by(2);
                let close_name = self.parse_name()?;
                if close_name != name {
                    return Err(self.error_here("mismatched closing tag"));
                }
                self.skip_whitespace();
                self.expect_byte(b'>')?;
                break;
            }

            if self.cursor.starts_with(b"<!--") {
                self.cursor.advance_by(4);
                self.skip_until(b"-->")?;
                continue;
            }

            if self.cursor.starts_with(b"<![CDATA[") {
                self.cursor.advance_by(9);
                let text = self.take_until(b"]]>")?;
                push_text(&mut children, text);
                continue;
            }

            if self.cursor.starts_with(b"<?") {
                self.cursor.advance_by(2);
                self.skip_until(b"?>")?;
                continue;
            }

            if self.cursor.current() == Some(b'<') {
                let child = self.parse_element()?;
                children.push(Content::Element(child));
                continue;
            }

            if self.cursor.is_eof() {
                return Err(self.error_here("unterminated element"));
            }

            let text = self.parse_text()?;
            push_text(&mut children, text);
        }

        self.depth -= 1;
        Ok(Element {
            name,
            attributes,
            children,
        })
    }

    fn enter(&mut self) -> Result<()> {
        self.depth = self.depth.saturating_add(1);
        if self.config.max_depth > 0 && self.depth > self.config.max_depth {
            let pos = self.cursor.position();
            return Err(Error::at(
                ErrorKind::MaxDepthExceeded {
                    max: self.config.max_depth,
                },
                pos.offset,
                pos.line,
                pos.col,
            ));
        }
        Ok(())
    }

    fn parse_attributes(&mut self) -> Result<IndexMap<String, String>> {
        let mut attrs = IndexMap::new();

        loop {
            self.skip_whitespace();
            match self.cursor.current() {
                Some(b'/') | Some(b'>') => break,
                Some(_) => {}
                None => return Err(self.error_here("unexpected end of input")),
            }

            let name = self.parse_name()?;
            self.skip_whitespace();
            self.expect_byte(b'=')?;
            self.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attrs.contains_key(&name) {
                return Err(self.error_here("duplicate attribute"));
            }
            attrs.insert(name, value);
        }

        Ok(attrs)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(b'"') => b'"',
            Some(b'\'') => b'\'',
            _ => return Err(self.error_here("expected quoted attribute value")),
        };
        self.cursor.advance();

        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance();
                let text = self.bytes_to_string(raw)?;
                return self.decode_entities(&text);
            }
            if b == b'<' {
                return Err(self.error_here("'<' in attribute value"));
            }
            self.cursor.advance();
        }

        Err(self.error_here("unterminated attribute value"))
    }

    fn parse_text(&mut self) -> Result<String> {
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = self.cursor.slice_from(start);
        let text = self.bytes_to_string(raw)?;
        self.decode_entities(&text)
    }

    fn parse_name(&mut self) -> Result<String> {
        let start = self.cursor.pos();

        match self.cursor.current() {
            Some(first) if is_name_start(first) => self.cursor.advance(),
            Some(_) => return Err(self.error_here("invalid name")),
            None => return Err(self.error_here("expected name")),
        }

        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        let raw = self.cursor.slice_from(start);
        self.bytes_to_string(raw)
    }

    fn skip_doctype(&mut self) -> Result<()> {
        // internal subsets may contain '>' inside brackets
        while let Some(b) = self.cursor.current() {
            self.cursor.advance();
            match b {
                b'[' => self.skip_until(b"]")?,
                b'>' => return Ok(()),
                _ => {}
            }
        }
        Err(self.error_here("unterminated doctype"))
    }

    fn skip_until(&mut self, pattern: &[u8]) -> Result<()> {
        self.take_until(pattern).map(|_| ())
    }

    /// Consume input up to and including `pattern`, returning what came before it
    fn take_until(&mut self, pattern: &[u8]) -> Result<String> {
        let start = self.cursor.pos();
        while self.cursor.current().is_some() {
            if self.cursor.peek_bytes(pattern.len()) == Some(pattern) {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance_by(pattern.len());
                return self.bytes_to_string(raw);
            }
            self.cursor.advance();
        }
        Err(self.error_here("unterminated markup"))
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.current() == Some(expected) {
            self.cursor.advance();
            Ok(())
        } else {
            Err(self.error_here("unexpected token"))
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.cursor.current() {
            if matches!(b, b' ' | b'\t' | b'\r' | b'\n') {
                self.cursor.advance();
            } else {
                break;
            }
        }
    }

    fn bytes_to_string(&self, bytes: &[u8]) -> Result<String> {
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| self.error_here("invalid utf-8"))
    }

    fn decode_entities(&self, input: &str) -> Result<String> {
        if !input.contains('&') {
            return Ok(input.to_string());
        }

        let mut result = String::with_capacity(input.len());
        let mut rest = input;
        while let Some(amp) = rest.find('&') {
            let (before, after) = rest.split_at(amp);
            result.push_str(before);

            let Some(semi) = after.find(';') else {
                return Err(self.error_here("unterminated xml entity"));
            };
            let entity = after.get(1..semi).unwrap_or_default();
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => decode_numeric_entity(entity),
            };

            match decoded {
                Some(ch) => result.push(ch),
                None => return Err(self.error_here("invalid xml entity")),
            }
            rest = after.get(semi + 1..).unwrap_or_default();
        }
        result.push_str(rest);

        Ok(result)
    }

    fn error_here(&self, message: &str) -> Error {
        Error::with_message(
            ErrorKind::InvalidXml,
            Span::point(self.cursor.position()),
            message.to_string(),
        )
    }
}

/// Adjacent text and CDATA runs merge into one text node
fn push_text(children: &mut Vec<Content>, text: String) {
    if let Some(Content::Text(last)) = children.last_mut() {
        last.push_str(&text);
    } else {
        children.push(Content::Text(text));
    }
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

/// Check whether `name` is usable as an element or attribute name
pub fn is_valid_name(name: &str) -> bool {
    let mut bytes = name.bytes();
    match bytes.next() {
        Some(first) if is_name_start(first) => bytes.all(is_name_char),
        _ => false,
    }
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Document> {
        Parser::new(input.as_bytes()).parse()
    }

    #[test]
    fn test_parse_simple_element() -> Result<()> {
        let doc = parse("<root></root>")?;
        assert_eq!(doc.root.name, "root");
        assert!(doc.root.children.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_with_attributes() -> Result<()> {
        let doc = parse("<root id=\"1\" name='test'></root>")?;
        assert_eq!(doc.root.attribute("id"), Some("1"));
        assert_eq!(doc.root.attribute("name"), Some("test"));
        Ok(())
    }

    #[test]
    fn test_parse_nested() -> Result<()> {
        let doc = parse("<root><child>text</child></root>")?;
        let child = doc.root.elements().next();
        assert_eq!(child.map(Element::name), Some("child"));
        assert_eq!(child.map(Element::text).as_deref(), Some("text"));
        Ok(())
    }

    #[test]
    fn test_parse_self_closing() -> Result<()> {
        let doc = parse("<root><child /></root>")?;
        let child = doc.root.elements().next();
        assert_eq!(child.map(|c| c.children.len()), Some(0));
        Ok(())
    }

    #[test]
    fn test_prolog_and_epilog() -> Result<()> {
        let input = "<?xml version=\"1.0\"?>\n<!DOCTYPE root [<!ELEMENT root ANY>]>\n\
                     <!-- lead -->\n<root/>\n<!-- trail -->\n";
        let doc = parse(input)?;
        assert_eq!(doc.root.name, "root");
        Ok(())
    }

    #[test]
    fn test_comment_between_text() -> Result<()> {
        let doc = parse("<a>one<!-- skip -->two</a>")?;
        assert_eq!(doc.root.text(), "onetwo");
        assert_eq!(doc.root.children.len(), 1);
        Ok(())
    }

    #[test]
    fn test_cdata_is_text() -> Result<()> {
        let doc = parse("<a><![CDATA[x < y & z]]></a>")?;
        assert_eq!(doc.root.text(), "x < y & z");
        Ok(())
    }

    #[test]
    fn test_entities() -> Result<()> {
        let doc = parse("<a t=\"&quot;q&quot;\">&lt;&#65;&#x42;&amp;</a>")?;
        assert_eq!(doc.root.attribute("t"), Some("\"q\""));
        assert_eq!(doc.root.text(), "<AB&");
        Ok(())
    }

    #[test]
    fn test_whitespace_text_kept() -> Result<()> {
        let doc = parse("<a>\n  <b/>\n</a>")?;
        assert_eq!(doc.root.children.len(), 3);
        assert_eq!(doc.root.text(), "\n  \n");

        let doc = parse("<v>  <x/>7</v>")?;
        assert_eq!(doc.root.text(), "  7");
        Ok(())
    }

    #[test]
    fn test_leading_byte_order_mark() -> Result<()> {
        let doc = parse("\u{feff}<?xml version=\"1.0\"?><r><a/></r>")?;
        assert_eq!(doc.root.name, "r");
        assert_eq!(doc.root.elements().count(), 1);
        Ok(())
    }

    #[test]
    fn test_rejects_malformed() {
        for input in [
            "",
            "text",
            "<a>",
            "<a></b>",
            "<a x=1/>",
            "<a x='1' x='2'/>",
            "<a/><b/>",
            "<a>&bogus;</a>",
            "<1a/>",
        ] {
            let err = parse(input).err();
            assert_eq!(
                err.as_ref().map(Error::kind),
                Some(&ErrorKind::InvalidXml),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn test_max_depth() {
        let input = "<a><a><a><a/></a></a></a>";
        let err = Parser::with_config(input.as_bytes(), Config { max_depth: 3 })
            .parse()
            .err();
        assert_eq!(
            err.as_ref().map(Error::kind),
            Some(&ErrorKind::MaxDepthExceeded { max: 3 })
        );
        assert!(Parser::with_config(input.as_bytes(), Config::unlimited())
            .parse()
            .is_ok());
    }

    #[test]
    fn test_valid_names() {
        assert!(is_valid_name("item"));
        assert!(is_valid_name("_x-1.y"));
        assert!(is_valid_name("ns:item"));
        assert!(is_valid_name("čaj"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("1item"));
        assert!(!is_valid_name("-item"));
        assert!(!is_valid_name("a=b"));
        assert!(!is_valid_name("a\"b"));
    }
}
