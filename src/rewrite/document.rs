//! Document rewriting
//!
//! Walks the parsed tree with the chain of active iteration scopes and builds the template tree:
//!
//! - an element whose class carries an iteration marker keeps its tag and attributes, and its
//!   children move into a synthetic [`Node::Iteration`] evaluated in a new scope
//! - a plain reference in a class replaces the element's children with one interpolation
//! - references in text and in other attribute values become interpolations in place
//!
//! Marker classes are stripped from the output. Only plain references are substituted outside
//! of class attributes; iteration markers anywhere else are literal text.

use super::dialect::Dialect;
use super::references::ReferenceRewriter;
use super::scope::Scope;
use crate::dom::{Attr, AttrValue, Element, Node};
use crate::error::{Error, SchemaError};
use crate::markers::{self, Binding, IterationMarker, Marker, Reference};
use crate::schema::Schema;
use std::ops::Range;
use tracing::{debug, warn};

pub struct DocumentRewriter<'s> {
    schema: &'s Schema,
    dialect: Dialect,
    references: ReferenceRewriter<'s>,
}

/// Markers found in one class attribute
struct ClassMarkers {
    iteration: Option<IterationMarker>,
    reference: Option<Reference>,
    /// The class names left once markers are removed
    remaining: String,
}

impl<'s> DocumentRewriter<'s> {
    pub fn new(schema: &'s Schema, dialect: Dialect) -> Self {
        DocumentRewriter {
            schema,
            dialect,
            references: ReferenceRewriter::new(schema, dialect),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Rewrite a whole document. The input tree is left untouched.
    pub fn rewrite(&self, nodes: &[Node]) -> Result<Vec<Node>, Error> {
        self.rewrite_nodes(nodes, None)
    }

    fn rewrite_nodes(
        &self,
        nodes: &[Node],
        scope: Option<&Scope<'_>>,
    ) -> Result<Vec<Node>, Error> {
        let mut rewritten = Vec::with_capacity(nodes.len());
        for node in nodes {
            match node {
                Node::Element(element) => {
                    rewritten.push(Node::Element(self.rewrite_element(element, scope)?));
                }
                Node::Text(text) => rewritten.extend(self.rewrite_text(text, scope)?),
                Node::Comment(_) | Node::Expr(_) | Node::Iteration { .. } => {
                    rewritten.push(node.clone())
                }
            }
        }
        Ok(rewritten)
    }

    fn rewrite_element(
        &self,
        element: &Element,
        scope: Option<&Scope<'_>>,
    ) -> Result<Element, Error> {
        let class = match element.attr("class") {
            Some(class) => Some(self.class_markers(class)?),
            None => None,
        };

        let mut attrs = Vec::with_capacity(element.attrs.len());
        for attr in &element.attrs {
            match (&class, attr.name.as_str()) {
                (Some(class), "class") => {
                    if !class.remaining.is_empty() {
                        attrs.push(Attr::literal("class", class.remaining.clone()));
                    }
                }
                _ => attrs.push(self.rewrite_attr(attr, scope)?),
            }
        }

        let (iteration, reference) = match class {
            Some(class) => (class.iteration, class.reference),
            None => (None, None),
        };

        let children = match iteration {
            Some(iteration) => {
                let path = self.resolve_iteration(&iteration, scope)?;
                let property = self.schema.lookup(&path).ok_or_else(|| {
                    SchemaError::UnknownProperty {
                        path: path.join("."),
                    }
                })?;
                let collection = self.references.collection(&path, scope);
                let header = self.dialect.header(&iteration.binding, &collection);
                debug!(
                    path = %path.join("."),
                    variable = iteration.binding.variable(),
                    "entering iteration scope"
                );

                let inner = Scope::new(property, path, iteration.binding, scope);
                let body = self.rewrite_children(element, reference.as_ref(), Some(&inner))?;
                vec![Node::Iteration { header, body }]
            }
            None => self.rewrite_children(element, reference.as_ref(), scope)?,
        };

        Ok(Element {
            tag: element.tag.clone(),
            attrs,
            children,
        })
    }

    /// Children of an element, or a single interpolation when its class references a property
    fn rewrite_children(
        &self,
        element: &Element,
        reference: Option<&Reference>,
        scope: Option<&Scope<'_>>,
    ) -> Result<Vec<Node>, Error> {
        match reference {
            Some(reference) => Ok(vec![Node::Expr(
                self.references.expression(reference, scope)?,
            )]),
            None => self.rewrite_nodes(&element.children, scope),
        }
    }

    fn class_markers(&self, class: &str) -> Result<ClassMarkers, Error> {
        let found = markers::scan(class)?;
        let remaining = strip_spans(class, found.iter().map(|(_, span)| span.clone()))
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        let mut loops = Vec::new();
        let mut keyed = Vec::new();
        let mut reference = None;
        for (marker, _) in found {
            match marker {
                Marker::Iteration(iteration) => match iteration.binding {
                    Binding::Loop { .. } => loops.push(iteration),
                    Binding::KeyedMap { .. } => keyed.push(iteration),
                },
                Marker::Reference(found) => {
                    if reference.is_none() {
                        reference = Some(found);
                    } else {
                        warn!(class, "ignoring additional reference marker");
                    }
                }
            }
        }

        // Loops take precedence over keyed maps
        let mut iterations = loops.into_iter().chain(keyed);
        let iteration = iterations.next();
        for ignored in iterations {
            warn!(class, ignored = %ignored.name, "ignoring additional iteration marker");
        }

        Ok(ClassMarkers {
            iteration,
            reference,
            remaining,
        })
    }

    /// Absolute path of the property an iteration marker binds.
    ///
    /// Explicit ancestors are taken as written. Otherwise the name is first tried as a field of
    /// each enclosing scope, innermost first, then looked up by name anywhere in the schema.
    fn resolve_iteration(
        &self,
        iteration: &IterationMarker,
        scope: Option<&Scope<'_>>,
    ) -> Result<Vec<String>, SchemaError> {
        if !iteration.ancestors.is_empty() {
            let mut path = iteration.ancestors.clone();
            path.push(iteration.name.clone());
            return Ok(path);
        }

        if let Some(scope) = scope {
            for enclosing in scope.chain() {
                let mut path = enclosing.path.clone();
                path.push(iteration.name.clone());
                if self.schema.lookup(&path).is_some() {
                    return Ok(path);
                }
            }
        }

        self.schema
            .find(&iteration.name)
            .map(<[String]>::to_vec)
            .ok_or_else(|| SchemaError::UnknownProperty {
                path: iteration.name.clone(),
            })
    }

    fn rewrite_attr(&self, attr: &Attr, scope: Option<&Scope<'_>>) -> Result<Attr, Error> {
        let AttrValue::Literal(value) = &attr.value else {
            return Ok(attr.clone());
        };

        let pieces = self.split_references(value, scope)?;
        let value = match pieces.as_slice() {
            [] => AttrValue::Literal(String::new()),
            [Piece::Literal(text)] => AttrValue::Literal(text.clone()),
            [Piece::Expr(expr)] => AttrValue::Expr(expr.clone()),
            _ => AttrValue::Expr(
                pieces
                    .iter()
                    .map(|piece| match piece {
                        Piece::Literal(text) => quote(text),
                        Piece::Expr(expr) => expr.clone(),
                    })
                    .collect::<Vec<_>>()
                    .join(" + "),
            ),
        };

        Ok(Attr {
            name: attr.name.clone(),
            value,
        })
    }

    fn rewrite_text(&self, text: &str, scope: Option<&Scope<'_>>) -> Result<Vec<Node>, Error> {
        Ok(self
            .split_references(text, scope)?
            .into_iter()
            .map(|piece| match piece {
                Piece::Literal(text) => Node::Text(text),
                Piece::Expr(expr) => Node::Expr(expr),
            })
            .collect())
    }

    /// Split a value into literal runs and interpolated references.
    fn split_references(
        &self,
        value: &str,
        scope: Option<&Scope<'_>>,
    ) -> Result<Vec<Piece>, Error> {
        let mut pieces = Vec::new();
        let mut cursor = 0;
        for (marker, span) in markers::scan(value)? {
            let Marker::Reference(reference) = marker else {
                continue;
            };
            if span.start > cursor {
                pieces.push(Piece::Literal(value[cursor..span.start].to_string()));
            }
            pieces.push(Piece::Expr(self.references.expression(&reference, scope)?));
            cursor = span.end;
        }
        if cursor < value.len() {
            pieces.push(Piece::Literal(value[cursor..].to_string()));
        }

        // a marker surrounded by whitespace only still fills the whole value; the separator
        // between two adjacent markers is content
        if pieces.iter().any(|piece| matches!(piece, Piece::Expr(_))) {
            if pieces.first().is_some_and(Piece::is_blank) {
                pieces.remove(0);
            }
            if pieces.last().is_some_and(Piece::is_blank) {
                pieces.pop();
            }
        }
        Ok(pieces)
    }
}

#[derive(Debug)]
enum Piece {
    Literal(String),
    Expr(String),
}

impl Piece {
    fn is_blank(&self) -> bool {
        matches!(self, Piece::Literal(text) if text.trim().is_empty())
    }
}

fn strip_spans(text: &str, spans: impl Iterator<Item = Range<usize>>) -> String {
    let mut stripped = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in spans {
        stripped.push_str(&text[cursor..span.start]);
        stripped.push(' ');
        cursor = span.end;
    }
    stripped.push_str(&text[cursor..]);
    stripped
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Convenience over [`DocumentRewriter::rewrite`]
pub fn rewrite_document(
    schema: &Schema,
    dialect: Dialect,
    nodes: &[Node],
) -> Result<Vec<Node>, Error> {
    DocumentRewriter::new(schema, dialect).rewrite(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_fragment;
    use crate::schema::infer_schema;

    fn rewrite(source: &str, dialect: Dialect) -> Result<Vec<Node>, Error> {
        let schema = infer_schema(source)?.normalized();
        rewrite_document(&schema, dialect, &parse_fragment(source))
    }

    fn element(node: &Node) -> &Element {
        match node {
            Node::Element(element) => element,
            other => panic!("expected element, got {other:?}"),
        }
    }

    #[test]
    fn test_class_reference_replaces_children() {
        let source = r#"<span class="svelte-title-">hello</span>"#;
        let nodes = rewrite(source, Dialect::Generic).unwrap();
        let span = element(&nodes[0]);
        assert!(span.attrs.is_empty());
        assert_eq!(span.children, vec![Node::Expr("props.title".to_string())]);
    }

    #[test]
    fn test_loop_wraps_children() {
        let source = r#"<ul class="iter-items[item]--"><li class="svelte-items-name-">x</li></ul>"#;
        let nodes = rewrite(source, Dialect::Generic).unwrap();
        let ul = element(&nodes[0]);
        let Node::Iteration { header, body } = &ul.children[0] else {
            panic!("expected iteration");
        };
        assert_eq!(header, "for each item in props.items");
        let li = element(&body[0]);
        assert_eq!(li.children, vec![Node::Expr("item.name".to_string())]);
    }

    #[test]
    fn test_other_classes_survive() {
        let source =
            r#"<ul class="list iter-items[item]-- wide"><li>svelte-items-name-</li></ul>"#;
        let nodes = rewrite(source, Dialect::Generic).unwrap();
        assert_eq!(element(&nodes[0]).attr("class"), Some("list wide"));
    }

    #[test]
    fn test_text_and_attribute_references() {
        let source =
            r#"<a href="svelte-link-" title="go to svelte-name- now">Hi svelte-name-!</a>"#;
        let nodes = rewrite(source, Dialect::Generic).unwrap();
        let a = element(&nodes[0]);
        assert_eq!(a.attrs[0].value, AttrValue::Expr("props.link".to_string()));
        assert_eq!(
            a.attrs[1].value,
            AttrValue::Expr(r#""go to " + props.name + " now""#.to_string())
        );
        assert_eq!(
            a.children,
            vec![
                Node::Text("Hi ".to_string()),
                Node::Expr("props.name".to_string()),
                Node::Text("!".to_string()),
            ]
        );
    }

    #[test]
    fn test_adjacent_references_keep_their_separator() {
        let source = r#"<a title="svelte-first- svelte-last-"> svelte-first- svelte-last- </a>"#;
        let nodes = rewrite(source, Dialect::Generic).unwrap();
        let a = element(&nodes[0]);
        assert_eq!(
            a.attrs[0].value,
            AttrValue::Expr(r#"props.first + " " + props.last"#.to_string())
        );
        assert_eq!(
            a.children,
            vec![
                Node::Expr("props.first".to_string()),
                Node::Text(" ".to_string()),
                Node::Expr("props.last".to_string()),
            ]
        );
    }

    #[test]
    fn test_padded_attribute_reference_fills_the_value() {
        let nodes = rewrite(r#"<a href=" svelte-link- ">x</a>"#, Dialect::Generic).unwrap();
        assert_eq!(
            element(&nodes[0]).attrs[0].value,
            AttrValue::Expr("props.link".to_string())
        );
    }

    #[test]
    fn test_loop_marker_wins_over_keyed_map() {
        let source = concat!(
            r#"<ul class="iter-meta[k-v]-- iter-items[i]--"><li>svelte-items-name-</li></ul>"#,
            "<p>svelte-meta-label- svelte-meta-size-</p>",
        );
        let nodes = rewrite(source, Dialect::Generic).unwrap();
        let ul = element(&nodes[0]);
        assert!(ul.attrs.is_empty());
        assert_eq!(ul.children.len(), 1);
        let Node::Iteration { header, body } = &ul.children[0] else {
            panic!("expected iteration");
        };
        assert_eq!(header, "for each i in props.items");
        assert_eq!(
            element(&body[0]).children,
            vec![Node::Expr("i.name".to_string())]
        );
    }

    #[test]
    fn test_first_loop_marker_wins() {
        let source = concat!(
            r#"<ul class="iter-tags[t]-- iter-items[i]--"><li>x</li></ul>"#,
            "<p>svelte-tags- svelte-items-</p>",
        );
        let nodes = rewrite(source, Dialect::Generic).unwrap();
        let Node::Iteration { header, .. } = &element(&nodes[0]).children[0] else {
            panic!("expected iteration");
        };
        assert_eq!(header, "for each t in props.tags");
    }

    #[test]
    fn test_nested_keyed_map_resolves_against_inner_scope() {
        let source = concat!(
            r#"<div class="iter-items[item]--">"#,
            r#"<dl class="iter-meta[k-v]--"><dd class="svelte-items-meta-label-">l</dd>"#,
            r#"<dt class="svelte-items-meta-size{int}-">s</dt></dl>"#,
            r#"<p class="svelte-items-title-">t</p></div>"#,
        );
        let nodes = rewrite(source, Dialect::Templ).unwrap();
        let div = element(&nodes[0]);
        let Node::Iteration { header, body } = &div.children[0] else {
            panic!("expected iteration");
        };
        assert_eq!(header, "for _, item := range props.Items");

        let dl = element(&body[0]);
        let Node::Iteration { header, body: inner } = &dl.children[0] else {
            panic!("expected iteration");
        };
        assert_eq!(header, "for k, v := range item.Meta");
        assert_eq!(
            element(&inner[0]).children,
            vec![Node::Expr("v.Label".to_string())]
        );
        assert_eq!(
            element(&inner[1]).children,
            vec![Node::Expr("fmt.Sprint(v.Size)".to_string())]
        );
        assert_eq!(
            element(&body[1]).children,
            vec![Node::Expr("item.Title".to_string())]
        );
    }

    #[test]
    fn test_list_and_map_casts_differ() {
        let list = rewrite(
            r#"<ul class="iter-rows[row]--"><li class="svelte-rows-n{int}-">1</li></ul>"#,
            Dialect::Generic,
        )
        .unwrap();
        let map = rewrite(
            r#"<ul class="iter-rows[k-row]--"><li class="svelte-rows-n{int}-">1</li></ul>"#,
            Dialect::Generic,
        )
        .unwrap();

        let expr = |nodes: &[Node]| {
            let Node::Iteration { body, .. } = &element(&nodes[0]).children[0] else {
                panic!("expected iteration");
            };
            element(&body[0]).children.clone()
        };
        assert_eq!(expr(&list), vec![Node::Expr("string(row.n)".to_string())]);
        assert_eq!(expr(&map), vec![Node::Expr("format(row.n)".to_string())]);
    }

    #[test]
    fn test_unknown_iteration_property_is_fatal() {
        let schema = infer_schema("svelte-title-").unwrap().normalized();
        let nodes = parse_fragment(r#"<ul class="iter-items[item]--"><li>x</li></ul>"#);
        let err = rewrite_document(&schema, Dialect::Generic, &nodes).unwrap_err();
        assert!(matches!(
            err,
            Error::Schema(SchemaError::UnknownProperty { .. })
        ));
    }

    #[test]
    fn test_input_tree_is_not_mutated() {
        let source = r#"<ul class="iter-items[item]--"><li class="svelte-items-name-">x</li></ul>"#;
        let nodes = parse_fragment(source);
        let before = nodes.clone();
        let schema = infer_schema(source).unwrap().normalized();
        rewrite_document(&schema, Dialect::Generic, &nodes).unwrap();
        assert_eq!(nodes, before);
    }
}
