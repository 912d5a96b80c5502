//! Document tree
//!
//! Server-rendered markup is parsed once with html5ever and converted into an owned [`Node`]
//! tree. The rewriter consumes that tree and builds a new one; nothing downstream touches the
//! reference-counted DOM, so a document's tree can move freely between threads.

pub mod nodes;
pub mod parse;

pub use nodes::{Attr, AttrValue, Element, Node};
pub use parse::parse_fragment;
