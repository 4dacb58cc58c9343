//! Order-preserving XML tree parsing and writing primitives.
//!
//! Built for MSBuild project files: the tree keeps attribute order, and the
//! document keeps its byte-order mark, declaration and line-ending style so
//! an edited project can be written back without gratuitous churn.

pub mod parser;
pub mod tree;
pub mod writer;

pub use parser::{parse, parse_file, ParseError};
pub use tree::{Declaration, XmlDocument, XmlNode};
pub use writer::{write, write_file, WriteError};
