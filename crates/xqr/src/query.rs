//! Query language front end
//!
//! ```text
//! SELECT element FROM [element | element.attribute | .attribute | ROOT]
//!     [WHERE [NOT ...] condition] [LIMIT n]
//! ```

pub mod ast;
pub mod element;
pub mod literal;
pub mod parser;

pub use ast::{Predicate, Query};
pub use element::ElementSpec;
pub use literal::{Literal, Operator};
pub use parser::Parser;
