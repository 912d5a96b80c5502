//! Wrapper collapsing
//!
//! A composite with exactly one field carries no structure of its own: it is rendered as a
//! transparent wrapper around that field instead of as a named declaration. Normalization moves
//! such a single child into [`Property::inlined`], working bottom-up so that chains of wrappers
//! collapse in one pass. Running it again changes nothing.

use super::property::Property;
use std::collections::BTreeMap;

/// Collapse single-field composites below the root.
pub fn normalize(properties: BTreeMap<String, Property>) -> BTreeMap<String, Property> {
    properties
        .into_iter()
        .map(|(name, property)| (name, normalize_property(property)))
        .collect()
}

fn normalize_property(mut property: Property) -> Property {
    property.children = normalize(std::mem::take(&mut property.children));
    property.inlined = property
        .inlined
        .take()
        .map(|inlined| Box::new(normalize_property(*inlined)));

    if property.children.len() == 1 && property.inlined.is_none() {
        if let Some((_, only)) = property.children.pop_first() {
            property.inlined = Some(Box::new(only));
        }
    }
    property
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{infer_schema, PropType, Scalar};

    #[test]
    fn test_single_child_is_inlined() {
        let schema = infer_schema("svelte-items-name-").unwrap().normalized();
        let items = schema.lookup(&["items"]).unwrap();
        assert!(items.children.is_empty());
        assert_eq!(items.inlined.as_ref().map(|p| p.name.as_str()), Some("name"));
        // still reachable by path
        assert_eq!(
            schema.lookup(&["items", "name"]).map(|p| p.ty),
            Some(PropType::Scalar(Scalar::String))
        );
    }

    #[test]
    fn test_two_children_are_kept() {
        let schema = infer_schema("svelte-user-name- svelte-user-age{int}-")
            .unwrap()
            .normalized();
        let user = schema.lookup(&["user"]).unwrap();
        assert_eq!(user.children.len(), 2);
        assert!(user.inlined.is_none());
    }

    #[test]
    fn test_chains_collapse_bottom_up() {
        let schema = infer_schema("svelte-a-b-c-d- svelte-a-b-c-e-")
            .unwrap()
            .normalized();
        let a = schema.lookup(&["a"]).unwrap();
        let b = a.inlined.as_deref().unwrap();
        assert_eq!(b.name, "b");
        let c = b.inlined.as_deref().unwrap();
        assert_eq!(c.children.len(), 2);
        assert!(schema.lookup(&["a", "b", "c", "e"]).is_some());
    }

    #[test]
    fn test_root_is_not_collapsed() {
        let schema = infer_schema("svelte-title-").unwrap().normalized();
        assert_eq!(schema.properties.len(), 1);
        assert!(schema.lookup(&["title"]).unwrap().is_leaf());
    }

    #[test]
    fn test_idempotent() {
        let once = infer_schema("svelte-a-b-c- svelte-a-x- svelte-y-z-")
            .unwrap()
            .normalized();
        let twice = once.clone().normalized();
        assert_eq!(once, twice);
    }
}
