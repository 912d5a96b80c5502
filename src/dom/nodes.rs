//! Owned document nodes
//!
//! Besides the HTML constructs (elements, text, comments) the tree has two synthetic node kinds
//! produced by the rewriter: interpolations ([`Node::Expr`]) and iteration blocks
//! ([`Node::Iteration`]), which carry a header line instead of a tag.

/// Void elements never have children nor a closing tag
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    /// An interpolated expression, rendered as `{ expr }`
    Expr(String),
    /// A loop or keyed-map block
    Iteration { header: String, body: Vec<Node> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<Attr>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: AttrValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Literal(String),
    Expr(String),
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Element {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Literal value of the first attribute called `name`
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find_map(|attr| match &attr.value {
            AttrValue::Literal(value) if attr.name == name => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag.as_str())
    }
}

impl Attr {
    pub fn literal(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attr {
            name: name.into(),
            value: AttrValue::Literal(value.into()),
        }
    }
}
