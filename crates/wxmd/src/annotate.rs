//! Blank-line pre-pass.
//!
//! Articles separate their top-level paragraphs with CSS margins rather than
//! empty elements, so the gap has to be inferred from structure: every direct
//! `p`/`section` child of the content root with visible text gets an extra
//! blank line after it. Deeper nodes are left to the renderer's own rules.

use indexmap::IndexSet;

use crate::node::{Node, NodePath, NodeRef};

/// Nodes that need an extra trailing blank line, keyed by path
#[derive(Debug, Clone, Default)]
pub struct BlankLineHints {
    marked: IndexSet<NodePath>,
}

impl BlankLineHints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the node at `path`
    pub fn mark(&mut self, path: NodePath) {
        self.marked.insert(path);
    }

    /// Whether the node at `path` wants the extra blank line
    pub fn wants_blank_line(&self, path: &NodePath) -> bool {
        self.marked.contains(path)
    }

    pub fn len(&self) -> usize {
        self.marked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marked.is_empty()
    }

    /// Marked paths in document order
    pub fn iter(&self) -> impl Iterator<Item = &NodePath> {
        self.marked.iter()
    }
}

/// Compute blank-line hints for the direct children of `root`
pub fn annotate(root: &Node) -> BlankLineHints {
    let mut hints = BlankLineHints::new();

    for child in NodeRef::root(root).element_children() {
        if child.kind().takes_blank_line_hint() && !child.text_content().trim().is_empty() {
            hints.mark(child.path);
        }
    }

    hints
}
