//! Lexer module for tokenization

pub mod cursor;
pub mod query;
pub mod token;

pub use cursor::Cursor;
pub use query::QueryLexer;
pub use token::{Keyword, Token};
