//! # ssr2templ
//!
//! Turns server-rendered HTML annotated with naming-convention markers into a typed props schema
//! and a parameterized template.
//!
//! Markers live in class attributes and text:
//!
//! ```text
//! <span class="svelte-title-">Hello</span>                    title: string
//! <p>svelte-user-age{int}-</p>                                user.age: int
//! <ul class="iter-items[item]--"><li>svelte-items-name-</li>  items: []{name}
//! ```
//!
//! ## Pipeline
//!
//! 1. [`markers`]: find and tokenize markers
//! 2. [`schema`]: infer the property tree and collapse single-field wrappers
//! 3. [`dom`]: parse the markup into an owned tree
//! 4. [`rewrite`]: replace marked content with scoped references and iteration blocks
//! 5. [`formats`]: render the template, the Go declarations and the component frame
//!
//! [`pipeline::Converter`] runs steps 1 to 5 for one document and [`build::build`] runs it for
//! a whole directory tree.

pub mod build;
pub mod config;
pub mod dom;
pub mod error;
pub mod formats;
pub mod logging;
pub mod markers;
pub mod pipeline;
pub mod rewrite;
pub mod schema;

pub use error::{Error, FormatError, MarkerError, Result, SchemaError};
pub use pipeline::{Conversion, Converter};
pub use rewrite::Dialect;
pub use schema::{PropType, Property, Scalar, Schema};
