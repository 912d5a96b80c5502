//! Template rewriting
//!
//! [`DocumentRewriter`] walks a parsed document and, using [`ReferenceRewriter`] for every marker
//! it meets, produces the template tree. [`Dialect`] supplies the target syntax.

pub mod dialect;
pub mod document;
pub mod references;
pub mod scope;

pub use dialect::{Dialect, IterationMode};
pub use document::{rewrite_document, DocumentRewriter};
pub use references::ReferenceRewriter;
pub use scope::Scope;
