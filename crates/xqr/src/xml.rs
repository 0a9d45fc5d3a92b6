//! XML document tree: model, parser and serializer

pub mod decode;
pub mod model;
pub mod parser;
pub mod writer;

pub use decode::decode;
pub use model::{Content, Document, Element};
pub use parser::{is_valid_name, Config, Parser};
pub use writer::to_string;
