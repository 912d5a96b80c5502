//! Template serialization
//!
//! Renders a rewritten node tree as template source, one node per line.
//!
//! ## Format
//!
//! - Element → open tag, indented children, close tag
//! - Element whose children are only text and interpolations → one line
//! - Iteration → header line ending in `{`, indented body, `}`
//! - Interpolation → `{ expr }`
//!
//! ## Example
//!
//! ```text
//! <ul>
//!   for each item in props.items {
//!     <li>{ item.name }</li>
//!   }
//! </ul>
//! ```
//!
//! A literal `id` attribute is followed by an interpolation of its own value, so that the
//! element keeps its identity once the template engine takes over rendering.

use crate::dom::{Attr, AttrValue, Element, Node};

pub const DEFAULT_INDENT: &str = "  ";

/// Elements whose text content is emitted verbatim
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

struct TemplateSerializer<'i> {
    output: String,
    indent_unit: &'i str,
    indent_level: usize,
}

impl<'i> TemplateSerializer<'i> {
    fn new(indent_unit: &'i str) -> Self {
        Self {
            output: String::new(),
            indent_unit,
            indent_level: 0,
        }
    }

    fn push_indent(&mut self, s: &str) {
        for _ in 0..self.indent_level {
            self.output.push_str(self.indent_unit);
        }
        self.output.push_str(s);
    }

    fn push_line(&mut self, s: &str) {
        self.push_indent(s);
        self.output.push('\n');
    }

    fn serialize_nodes(&mut self, nodes: &[Node], raw: bool) {
        for node in nodes {
            self.serialize_node(node, raw);
        }
    }

    fn serialize_node(&mut self, node: &Node, raw: bool) {
        match node {
            Node::Text(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    let text = if raw { text.to_string() } else { escape_text(text) };
                    self.push_line(&text);
                }
            }
            Node::Expr(expr) => self.push_line(&interpolation(expr)),
            Node::Comment(comment) => self.push_line(&format!("<!--{comment}-->")),
            Node::Iteration { header, body } => {
                self.push_line(&format!("{header} {{"));
                self.indent_level += 1;
                self.serialize_nodes(body, raw);
                self.indent_level -= 1;
                self.push_line("}");
            }
            Node::Element(element) => self.serialize_element(element),
        }
    }

    fn serialize_element(&mut self, element: &Element) {
        let open = open_tag(element);
        if element.is_void() {
            self.push_line(&open);
            return;
        }

        let close = format!("</{}>", element.tag);
        let raw = RAW_TEXT_ELEMENTS.contains(&element.tag.as_str());

        if let Some(inline) = inline_content(&element.children, raw) {
            self.push_line(&format!("{open}{inline}{close}"));
            return;
        }

        self.push_line(&open);
        self.indent_level += 1;
        self.serialize_nodes(&element.children, raw);
        self.indent_level -= 1;
        self.push_line(&close);
    }
}

/// Children rendered on the element's own line, when they are only text and interpolations
fn inline_content(children: &[Node], raw: bool) -> Option<String> {
    let mut inline = String::new();
    for child in children {
        match child {
            Node::Text(text) if raw => inline.push_str(text),
            Node::Text(text) => inline.push_str(&escape_text(text)),
            Node::Expr(expr) => inline.push_str(&interpolation(expr)),
            _ => return None,
        }
    }
    Some(inline.trim().to_string())
}

fn open_tag(element: &Element) -> String {
    let mut tag = format!("<{}", element.tag);
    for attr in &element.attrs {
        push_attr(&mut tag, attr);
    }
    tag.push('>');
    tag
}

fn push_attr(tag: &mut String, attr: &Attr) {
    tag.push(' ');
    tag.push_str(&attr.name);
    match &attr.value {
        AttrValue::Literal(value) if value.is_empty() => {}
        AttrValue::Literal(value) => {
            tag.push_str(&format!("=\"{}\"", escape_attr(value)));
            if attr.name == "id" {
                tag.push_str(&interpolation(&format!("\"{}\"", escape_string(value))));
            }
        }
        AttrValue::Expr(expr) => {
            tag.push('=');
            tag.push_str(&interpolation(expr));
        }
    }
}

fn interpolation(expr: &str) -> String {
    format!("{{ {expr} }}")
}

/// Escape text content
fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape a double-quoted attribute value
fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

/// Escape the body of a double-quoted string literal in an expression
pub(crate) fn escape_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Render template nodes with the given indent unit.
pub fn render_template(nodes: &[Node], indent: &str) -> String {
    let mut serializer = TemplateSerializer::new(indent);
    serializer.serialize_nodes(nodes, false);
    serializer.output
}
