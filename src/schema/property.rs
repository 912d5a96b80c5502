//! Property tree nodes
//!
//! A [`Property`] is one named piece of dynamic data. Leaves carry a scalar, list or map type;
//! composites carry children keyed (and therefore ordered) by name. After normalization a
//! composite either has two or more children or none at all: a single child is moved into the
//! `inlined` slot, making the node a transparent wrapper around that one field.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Scalar value types a marker can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scalar {
    String,
    Int,
    Bool,
}

impl Scalar {
    pub const ALL: [Scalar; 3] = [Scalar::String, Scalar::Int, Scalar::Bool];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scalar::String => "string",
            Scalar::Int => "int",
            Scalar::Bool => "bool",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed set of property types.
///
/// `Composite`, `CompositeList` and `CompositeMap` are structural: their shape comes from the
/// children, not from a tag. Only `CompositeList` has an annotation of its own (bare `[]`);
/// `CompositeMap` is inferred from keyed-map iteration markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropType {
    Scalar(Scalar),
    List(Scalar),
    Map(Scalar, Scalar),
    Composite,
    CompositeList,
    CompositeMap,
}

impl PropType {
    pub const DEFAULT_LEAF: PropType = PropType::Scalar(Scalar::String);

    /// Whether nodes of this type may own child properties
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            PropType::Composite | PropType::CompositeList | PropType::CompositeMap
        )
    }
}

impl fmt::Display for PropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropType::Scalar(s) => write!(f, "{s}"),
            PropType::List(s) => write!(f, "[]{s}"),
            PropType::Map(k, v) => write!(f, "{{{k},{v}}}"),
            PropType::Composite => f.write_str("composite"),
            PropType::CompositeList => f.write_str("[]composite"),
            PropType::CompositeMap => f.write_str("{string,composite}"),
        }
    }
}

impl Serialize for PropType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A named, typed node in the property tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: PropType,
    /// Whether `ty` came from an explicit annotation rather than a default
    #[serde(skip)]
    pub declared: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, Property>,
    /// The single field of a collapsed wrapper
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inlined: Option<Box<Property>>,
}

impl Property {
    pub fn new(name: impl Into<String>, ty: PropType) -> Self {
        Property {
            name: name.into(),
            ty,
            declared: false,
            children: BTreeMap::new(),
            inlined: None,
        }
    }

    pub fn declared(name: impl Into<String>, ty: PropType) -> Self {
        Property {
            declared: true,
            ..Property::new(name, ty)
        }
    }

    /// A leaf has neither children nor an inlined field
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty() && self.inlined.is_none()
    }

    /// A composite worth its own declaration (two or more fields after normalization)
    pub fn is_composite(&self) -> bool {
        !self.children.is_empty()
    }

    /// Look up a direct field, seeing through a collapsed wrapper.
    pub fn field(&self, name: &str) -> Option<&Property> {
        self.children.get(name).or_else(|| {
            self.inlined
                .as_deref()
                .filter(|inlined| inlined.name == name)
        })
    }

    /// Iterate over the direct fields in name order, including an inlined field.
    pub fn fields(&self) -> impl Iterator<Item = &Property> {
        self.children.values().chain(self.inlined.as_deref())
    }
}
