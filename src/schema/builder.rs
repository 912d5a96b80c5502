//! Schema inference from raw source lines
//!
//! Every plain reference marker contributes its path: intermediate segments become composite
//! nodes, the final segment a leaf typed by its annotation or defaulted to `string`. Paths merge
//! regardless of where in the document they occur, and re-scanning a path is a no-op.
//!
//! Iteration markers are collected on the way and applied once all references are in, so that a
//! looped property is known to be a list (or a keyed map) even when no marker annotates it.

use super::property::{PropType, Property, Scalar};
use super::{lookup_mut, name_index, Schema};
use crate::error::{Error, SchemaError};
use crate::markers::{self, Binding, IterationMarker, Marker, Reference};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Accumulates markers into a property tree
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    properties: BTreeMap<String, Property>,
    iterations: Vec<IterationMarker>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan a whole document, line by line
    pub fn scan_source(&mut self, source: &str) -> Result<(), Error> {
        for line in source.lines() {
            self.scan_line(line)?;
        }
        Ok(())
    }

    pub fn scan_line(&mut self, line: &str) -> Result<(), Error> {
        for (marker, _) in markers::scan(line)? {
            match marker {
                Marker::Reference(reference) => self.add_reference(&reference)?,
                Marker::Iteration(iteration) => self.iterations.push(iteration),
            }
        }
        Ok(())
    }

    /// Walk (and create as needed) the nodes along a reference path.
    pub fn add_reference(&mut self, reference: &Reference) -> Result<(), SchemaError> {
        let last = reference.segments.len().saturating_sub(1);
        let mut level = &mut self.properties;
        let mut path: Vec<&str> = Vec::with_capacity(reference.segments.len());

        for (i, segment) in reference.segments.iter().enumerate() {
            path.push(&segment.name);
            let is_leaf = i == last;

            let property = level.entry(segment.name.clone()).or_insert_with(|| {
                debug!(path = %path.join("."), "new property");
                let ty = if is_leaf {
                    PropType::DEFAULT_LEAF
                } else {
                    PropType::Composite
                };
                Property::new(segment.name.clone(), ty)
            });

            if let Some(ty) = segment.annotation {
                declare(property, ty, &path)?;
            }

            if !is_leaf && !property.ty.is_structural() {
                if property.declared {
                    return Err(SchemaError::ConflictingShape {
                        path: path.join("."),
                        declared: property.ty.to_string(),
                    });
                }
                property.ty = PropType::Composite;
            }

            level = &mut property.children;
        }

        Ok(())
    }

    /// Record an iteration marker to refine the bound property's type in [`build`](Self::build)
    pub fn add_iteration(&mut self, iteration: IterationMarker) {
        self.iterations.push(iteration);
    }

    /// Apply iteration hints and freeze the tree. The result is not yet normalized.
    pub fn build(mut self) -> Schema {
        let index = name_index(&self.properties);
        for iteration in std::mem::take(&mut self.iterations) {
            let path = if iteration.ancestors.is_empty() {
                match index.get(&iteration.name) {
                    Some(path) => path.clone(),
                    None => continue,
                }
            } else {
                let mut path = iteration.ancestors.clone();
                path.push(iteration.name.clone());
                path
            };

            if let Some(property) = lookup_mut(&mut self.properties, &path) {
                apply_iteration_hint(property, &iteration.binding);
            }
        }
        Schema::new(self.properties)
    }
}

/// Set an explicit type. The first declaration wins; a defaulted type is upgraded.
fn declare(property: &mut Property, ty: PropType, path: &[&str]) -> Result<(), SchemaError> {
    if !ty.is_structural() && !property.children.is_empty() {
        return Err(SchemaError::ConflictingShape {
            path: path.join("."),
            declared: ty.to_string(),
        });
    }

    if !property.declared {
        property.ty = ty;
        property.declared = true;
    } else if property.ty != ty {
        warn!(
            path = %path.join("."),
            kept = %property.ty,
            ignored = %ty,
            "conflicting type annotations"
        );
    }
    Ok(())
}

fn apply_iteration_hint(property: &mut Property, binding: &Binding) {
    if property.declared {
        return;
    }
    property.ty = match (binding, property.ty) {
        (Binding::Loop { .. }, PropType::Composite) => PropType::CompositeList,
        (Binding::Loop { .. }, PropType::Scalar(element)) => PropType::List(element),
        (Binding::KeyedMap { .. }, PropType::Composite) => PropType::CompositeMap,
        (Binding::KeyedMap { .. }, PropType::Scalar(value)) => {
            PropType::Map(Scalar::String, value)
        }
        (_, ty) => ty,
    };
}

/// Infer the (un-normalized) schema of a document.
pub fn infer_schema(source: &str) -> Result<Schema, Error> {
    let mut builder = SchemaBuilder::new();
    builder.scan_source(source)?;
    Ok(builder.build())
}
