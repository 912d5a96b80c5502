//! Property schema
//!
//! The schema is the typed tree of everything a page needs at render time, recovered from the
//! flat `svelte-...-` markers of one document:
//!
//! 1. [`builder::SchemaBuilder`] grows the tree from raw source lines
//! 2. [`Schema::normalized`] collapses single-field wrappers
//! 3. the rewriter and the declaration emitter read the result, never mutate it
//!
//! Top-level properties live in [`Schema::properties`]; the root container itself is not a
//! property and is never collapsed.

pub mod builder;
pub mod normalize;
pub mod property;

pub use builder::{infer_schema, SchemaBuilder};
pub use property::{PropType, Property, Scalar};

use serde::Serialize;
use std::collections::BTreeMap;

/// Property tree of one document plus a name index over it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Schema {
    pub properties: BTreeMap<String, Property>,
    #[serde(skip)]
    index: BTreeMap<String, Vec<String>>,
}

impl Schema {
    pub fn new(properties: BTreeMap<String, Property>) -> Self {
        let index = name_index(&properties);
        Schema { properties, index }
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Resolve an absolute property path
    pub fn lookup<S: AsRef<str>>(&self, path: &[S]) -> Option<&Property> {
        let (first, rest) = path.split_first()?;
        let mut property = self.properties.get(first.as_ref())?;
        for segment in rest {
            property = property.field(segment.as_ref())?;
        }
        Some(property)
    }

    /// Path of the first property named `name`, in depth-first name order
    pub fn find(&self, name: &str) -> Option<&[String]> {
        self.index.get(name).map(Vec::as_slice)
    }

    /// Collapse single-field wrappers; see [`normalize`]
    pub fn normalized(self) -> Schema {
        Schema::new(normalize::normalize(self.properties))
    }
}

/// Pre-order walk recording the first path seen for every name.
pub(crate) fn name_index(properties: &BTreeMap<String, Property>) -> BTreeMap<String, Vec<String>> {
    fn visit(
        property: &Property,
        path: &mut Vec<String>,
        index: &mut BTreeMap<String, Vec<String>>,
    ) {
        path.push(property.name.clone());
        index
            .entry(property.name.clone())
            .or_insert_with(|| path.clone());
        for field in property.fields() {
            visit(field, path, index);
        }
        path.pop();
    }

    let mut index = BTreeMap::new();
    let mut path = Vec::new();
    for property in properties.values() {
        visit(property, &mut path, &mut index);
    }
    index
}

/// Mutable counterpart of [`Schema::lookup`] over a bare property map.
pub(crate) fn lookup_mut<'p>(
    properties: &'p mut BTreeMap<String, Property>,
    path: &[String],
) -> Option<&'p mut Property> {
    let (first, rest) = path.split_first()?;
    let mut property = properties.get_mut(first)?;
    for segment in rest {
        property = property.children.get_mut(segment)?;
    }
    Some(property)
}
