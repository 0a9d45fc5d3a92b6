//! xqr - SQL-like queries over XML documents
//!
//! A query such as `SELECT book FROM library WHERE .year>2000 LIMIT 5` is parsed
//! into a [`Query`] and executed against a parsed document tree, producing the
//! selected elements in document order.
//!
//! # Quick Start
//!
//! ```
//! use xqr::{from_xml_str, Executor, Query};
//! # fn main() -> Result<(), xqr::Error> {
//! let doc = from_xml_str(r#"<root><item id="1"/><other/><item id="2"/></root>"#)?;
//! let query = Query::parse("SELECT item FROM ROOT WHERE .id>1")?;
//! let outcome = Executor::new(&query).run(&doc.root);
//! assert_eq!(outcome.nodes.len(), 1);
//! assert_eq!(outcome.nodes[0].attribute("id"), Some("2"));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result, Span};

pub mod lexer;
pub use lexer::{Keyword, Token};

pub mod query;
pub use query::{ElementSpec, Literal, Operator, Predicate, Query};

pub mod engine;
pub use engine::{compare, search, Comparison, Executor, Outcome};

pub mod xml;
pub use xml::{
    Config as XmlConfig, Content as XmlContent, Document as XmlDocument, Element as XmlElement,
    Parser as XmlParser,
};

pub mod output;
pub use output::{render, OutputConfig};

/// Parse query text
pub fn parse_query(query: &str) -> Result<Query> {
    Query::parse(query)
}

/// Parse XML from string
pub fn from_xml_str(s: &str) -> Result<XmlDocument> {
    XmlParser::new(s.as_bytes()).parse()
}

/// Parse XML from raw bytes, honouring a byte-order mark or declared encoding
pub fn from_xml_bytes(bytes: &[u8]) -> Result<XmlDocument> {
    let text = xml::decode(bytes)?;
    XmlParser::new(text.as_bytes()).parse()
}

/// Parse `query` and `xml`, then return owned copies of the selected elements
pub fn run_query(query: &str, xml: &str) -> Result<Vec<XmlElement>> {
    let query = parse_query(query)?;
    let doc = from_xml_str(xml)?;
    let outcome = Executor::new(&query).run(&doc.root);
    Ok(outcome.nodes.into_iter().cloned().collect())
}

/// Run `query` over `xml` and render the output document
pub fn query_to_string(query: &str, xml: &str, config: &OutputConfig) -> Result<String> {
    let query = parse_query(query)?;
    let doc = from_xml_str(xml)?;
    let outcome = Executor::new(&query).run(&doc.root);
    Ok(render(&outcome, config))
}
