//! Tree query engine: matching, comparison and execution

pub mod compare;
pub mod executor;
pub mod matcher;

pub use compare::{compare, extract_value, Comparison};
pub use executor::{evaluate, Executor, Outcome};
pub use matcher::{matches, search, Matcher};
