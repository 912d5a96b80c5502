//! Reference rewriting
//!
//! Turns a plain reference marker into the expression that reads its value at render time.
//! Inside an iteration the path is re-based onto the innermost scope variable that iterates a
//! prefix of it, and the value is cast with that scope's table. Outside any iteration the path
//! hangs off the root properties object, cast only where the dialect needs a string there.

use super::dialect::{Dialect, PROPS_ROOT};
use super::scope::Scope;
use crate::error::SchemaError;
use crate::markers::Reference;
use crate::schema::Schema;
use tracing::debug;

pub struct ReferenceRewriter<'s> {
    schema: &'s Schema,
    dialect: Dialect,
}

impl<'s> ReferenceRewriter<'s> {
    pub fn new(schema: &'s Schema, dialect: Dialect) -> Self {
        ReferenceRewriter { schema, dialect }
    }

    /// Expression for a reference, as seen from `scope`.
    pub fn expression(
        &self,
        reference: &Reference,
        scope: Option<&Scope<'_>>,
    ) -> Result<String, SchemaError> {
        let path = reference.path();

        let Some((scope, rest)) = scope.and_then(|scope| scope.enclosing(&path)) else {
            let property = self.schema.lookup(&path).ok_or_else(|| {
                SchemaError::UnknownProperty {
                    path: path.join("."),
                }
            })?;
            let expr = self.dialect.access_path(PROPS_ROOT, &path);
            return Ok(match self.dialect.root_cast(property.ty) {
                Some(cast) => format!("{cast}({expr})"),
                None => expr,
            });
        };

        let mut property = scope.property;
        for (walked, field) in rest.iter().enumerate() {
            property = property
                .field(field)
                .ok_or_else(|| SchemaError::UnknownField {
                    property: scope
                        .path
                        .iter()
                        .chain(&rest[..walked])
                        .cloned()
                        .collect::<Vec<_>>()
                        .join("."),
                    field: field.clone(),
                })?;
        }

        let expr = self.dialect.access_path(scope.variable(), rest);
        let expr = match self.dialect.cast(scope.mode(), property.ty) {
            Some(cast) => format!("{cast}({expr})"),
            None => expr,
        };
        debug!(path = %path.join("."), %expr, "rewrote scoped reference");
        Ok(expr)
    }

    /// Collection an iteration over `path` ranges over, as seen from the enclosing `parent`.
    pub fn collection(&self, path: &[String], parent: Option<&Scope<'_>>) -> String {
        match parent.and_then(|scope| scope.enclosing(path)) {
            Some((scope, rest)) => self.dialect.access_path(scope.variable(), rest),
            None => self.dialect.access_path(PROPS_ROOT, path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markers::{self, Binding, Marker};
    use crate::schema::infer_schema;

    fn reference(marker: &str) -> Reference {
        match markers::scan(marker).unwrap().remove(0).0 {
            Marker::Reference(reference) => reference,
            other => panic!("expected a reference, got {other:?}"),
        }
    }

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    const SOURCE: &str = concat!(
        "svelte-title- svelte-items-name- svelte-items-count{int}- ",
        "iter-items[item]-- svelte-items-meta-label- svelte-items-meta-size{int}- ",
        "iter-items-meta[k-v]--",
    );

    #[test]
    fn test_root_reference_has_no_cast() {
        let schema = infer_schema(SOURCE).unwrap().normalized();
        let rewriter = ReferenceRewriter::new(&schema, Dialect::Generic);
        assert_eq!(
            rewriter.expression(&reference("svelte-title-"), None).unwrap(),
            "props.title"
        );
        assert!(matches!(
            rewriter.expression(&reference("svelte-nope-"), None),
            Err(SchemaError::UnknownProperty { .. })
        ));
    }

    #[test]
    fn test_scoped_reference_uses_innermost_variable() {
        let schema = infer_schema(SOURCE).unwrap().normalized();
        let rewriter = ReferenceRewriter::new(&schema, Dialect::Generic);
        let items = schema.lookup(&["items"]).unwrap();
        let meta = schema.lookup(&["items", "meta"]).unwrap();
        let outer = Scope::new(
            items,
            path(&["items"]),
            Binding::Loop {
                index: "item".to_string(),
            },
            None,
        );
        let inner = Scope::new(
            meta,
            path(&["items", "meta"]),
            Binding::KeyedMap {
                key: "k".to_string(),
                value: "v".to_string(),
            },
            Some(&outer),
        );

        assert_eq!(
            rewriter
                .expression(&reference("svelte-items-meta-label-"), Some(&inner))
                .unwrap(),
            "v.label"
        );
        assert_eq!(
            rewriter
                .expression(&reference("svelte-items-meta-size-"), Some(&inner))
                .unwrap(),
            "format(v.size)"
        );
        assert_eq!(
            rewriter
                .expression(&reference("svelte-items-count-"), Some(&inner))
                .unwrap(),
            "string(item.count)"
        );
        assert_eq!(
            rewriter.collection(&path(&["items", "meta"]), Some(&outer)),
            "item.meta"
        );
    }

    #[test]
    fn test_unknown_field_is_fatal() {
        let schema = infer_schema(SOURCE).unwrap().normalized();
        let rewriter = ReferenceRewriter::new(&schema, Dialect::Templ);
        let items = schema.lookup(&["items"]).unwrap();
        let scope = Scope::new(
            items,
            path(&["items"]),
            Binding::Loop {
                index: "item".to_string(),
            },
            None,
        );
        let err = rewriter
            .expression(&reference("svelte-items-price-"), Some(&scope))
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownField {
                property: "items".to_string(),
                field: "price".to_string(),
            }
        );
    }
}
