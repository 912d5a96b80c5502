//! HTML parsing
//!
//! The source is parsed as a full document, which is what html5ever's tree builder is good at;
//! the synthesized `<html>`, `<head>` and `<body>` wrappers are then dropped and their contents
//! returned in order. Whitespace-only text disappears and remaining text is trimmed, so the
//! serializer is free to choose its own layout.

use super::nodes::{Attr, Element, Node};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use tracing::debug;

/// Parse a server-rendered fragment into owned nodes.
pub fn parse_fragment(source: &str) -> Vec<Node> {
    let dom = parse_document(RcDom::default(), Default::default()).one(source);
    for error in dom.errors.borrow().iter() {
        debug!(%error, "recovered from malformed markup");
    }

    let mut nodes = Vec::new();
    for child in dom.document.children.borrow().iter() {
        match &child.data {
            NodeData::Element { name, .. } if &*name.local == "html" => {
                for section in child.children.borrow().iter() {
                    match &section.data {
                        NodeData::Element { name, .. }
                            if matches!(&*name.local, "head" | "body") =>
                        {
                            convert_children(section, &mut nodes);
                        }
                        _ => convert(section, &mut nodes),
                    }
                }
            }
            _ => convert(child, &mut nodes),
        }
    }
    nodes
}

fn convert_children(handle: &Handle, out: &mut Vec<Node>) {
    for child in handle.children.borrow().iter() {
        convert(child, out);
    }
}

fn convert(handle: &Handle, out: &mut Vec<Node>) {
    match &handle.data {
        NodeData::Text { contents } => {
            let contents = contents.borrow();
            let text = contents.trim();
            if !text.is_empty() {
                out.push(Node::Text(text.to_string()));
            }
        }
        NodeData::Comment { contents } => out.push(Node::Comment(contents.to_string())),
        NodeData::Element {
            name,
            attrs,
            template_contents,
            ..
        } => {
            let mut element = Element::new(name.local.to_string());
            element.attrs = attrs
                .borrow()
                .iter()
                .map(|attr| Attr::literal(attr_name(&attr.name), attr.value.to_string()))
                .collect();

            // <template> children live in a separate document fragment
            match template_contents.borrow().as_ref() {
                Some(contents) => convert_children(contents, &mut element.children),
                None => convert_children(handle, &mut element.children),
            }
            out.push(Node::Element(element));
        }
        NodeData::Document => convert_children(handle, out),
        NodeData::Doctype { .. } | NodeData::ProcessingInstruction { .. } => {}
    }
}

fn attr_name(name: &QualName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{}:{}", prefix, name.local),
        None => name.local.to_string(),
    }
}
