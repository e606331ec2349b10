//! Section-tree parsing and lookup.

mod error;
mod node;
mod parser;

pub use error::ParseError;
pub use node::{Node, NodeRef};
pub use parser::Config;
