//! Output formats
//!
//! - [`template`]: the rewritten document as template source
//! - [`declarations`]: Go struct declarations for the schema
//! - [`component`]: the `.templ` file framing a rendered template
//! - [`schema`]: JSON and YAML dumps of the schema
//!
//! Schema formats are discoverable by name through [`FormatRegistry`].

pub mod component;
pub mod declarations;
pub mod registry;
pub mod schema;
pub mod template;

pub use component::{package_name, ComponentFrame};
pub use declarations::{Declarations, GoStructsFormat};
pub use registry::{FormatRegistry, SchemaFormat};
pub use schema::{JsonFormat, YamlFormat};
pub use template::{render_template, DEFAULT_INDENT};
