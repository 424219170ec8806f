//! Generic XML element tree for GRXML documents.
//!
//! Only the structure the grammar compiler needs is kept: element names,
//! attributes in document order, child elements and text. Comments,
//! processing instructions and the XML declaration are dropped on read.
pub mod ast;
pub mod parser;
pub mod serializer;

pub use ast::{Element, Node};
pub use parser::{parse_document, ParseError};
pub use serializer::serialize_document;
