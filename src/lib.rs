//! BBCode to HTML conversion for untrusted, user written text.
//!
//! Input is parsed into a tree of text and tag nodes following the grammar in a [`TagRegistry`], optionally passed
//! through the [detection passes][Document::detect_links], then rendered to HTML. Anything that is not a registered
//! tag is escaped and kept as text.

mod document;
mod error;
mod parser;

pub mod html;
pub mod node;
pub mod registry;

#[cfg(feature = "auto_detect")]
mod detect;

pub use document::Document;
pub use error::ParseError;
pub use node::{Attributes, Node, NodeId, NodeRef, Tree};
pub use parser::{ParserConfig, DEFAULT_MAX_DEPTH};
pub use registry::{AutoDetect, BBCode, Handler, TagHandler, TagKind, TagRegistry};
