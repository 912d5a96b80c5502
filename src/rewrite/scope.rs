//! Iteration scopes
//!
//! Scopes form a chain from the innermost iteration out to the document root. Each one lives on
//! the stack frame that walks its element's subtree and points at its parent by shared reference,
//! so a scope disappears as soon as the walk leaves the subtree and nothing can mutate an outer
//! scope from inside.

use super::dialect::IterationMode;
use crate::markers::Binding;
use crate::schema::Property;

#[derive(Debug)]
pub struct Scope<'a> {
    /// The property being iterated
    pub property: &'a Property,
    /// Absolute path of that property
    pub path: Vec<String>,
    pub binding: Binding,
    pub parent: Option<&'a Scope<'a>>,
}

impl<'a> Scope<'a> {
    pub fn new(
        property: &'a Property,
        path: Vec<String>,
        binding: Binding,
        parent: Option<&'a Scope<'a>>,
    ) -> Self {
        Scope {
            property,
            path,
            binding,
            parent,
        }
    }

    pub fn mode(&self) -> IterationMode {
        IterationMode::from(&self.binding)
    }

    /// Variable holding the current element or map value
    pub fn variable(&self) -> &str {
        self.binding.variable()
    }

    /// This scope followed by its ancestors, innermost first
    pub fn chain(&self) -> impl Iterator<Item = &Scope<'a>> {
        std::iter::successors(Some(self), |scope| scope.parent)
    }

    /// Innermost scope in the chain iterating a prefix of `path`, with the rest of the path
    pub fn enclosing<'p>(&self, path: &'p [String]) -> Option<(&Scope<'a>, &'p [String])> {
        self.chain().find_map(|scope| {
            path.strip_prefix(scope.path.as_slice())
                .map(|rest| (scope, rest))
        })
    }

    pub fn depth(&self) -> usize {
        self.chain().count()
    }
}
