//! CDP-style DOM Node structure for article conversion.
//!
//! This module provides a DOM node structure that matches the Chrome DevTools Protocol
//! DOM.Node structure. Any parser (html5ever, CDP, etc.) can convert their output to
//! this structure to feed the converter.
//!
//! Nodes are never mutated by the conversion passes. Per-node data computed along the
//! way (blank-line hints, resolved image sources) lives in side-tables keyed by
//! [`NodePath`].

use crate::kind::NodeKind;

/// Node types matching DOM nodeType values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Element node (nodeType = 1)
    Element = 1,
    /// Text node (nodeType = 3)
    Text = 3,
    /// Comment node (nodeType = 8)
    Comment = 8,
    /// Document node (nodeType = 9)
    Document = 9,
    /// Document fragment node (nodeType = 11)
    DocumentFragment = 11,
}

impl From<u32> for NodeType {
    fn from(value: u32) -> Self {
        match value {
            1 => NodeType::Element,
            3 => NodeType::Text,
            8 => NodeType::Comment,
            9 => NodeType::Document,
            11 => NodeType::DocumentFragment,
            _ => NodeType::Element, // Default fallback
        }
    }
}

/// A DOM node following the CDP DOM.Node structure.
#[derive(Debug, Clone)]
pub struct Node {
    /// Node type (1 = Element, 3 = Text, etc.)
    pub node_type: NodeType,

    /// Node name (uppercase for elements, e.g., "DIV", "#text" for text nodes)
    pub node_name: String,

    /// Text content for text and comment nodes
    pub node_value: Option<String>,

    /// Attributes as flat array [name, value, name, value, ...] (CDP style)
    /// Only present for element nodes
    pub attributes: Option<Vec<String>>,

    /// Child nodes
    pub children: Option<Vec<Node>>,
}

impl Node {
    /// Create a new element node
    pub fn element(tag_name: &str) -> Self {
        Self {
            node_type: NodeType::Element,
            node_name: tag_name.to_uppercase(),
            node_value: None,
            attributes: Some(Vec::new()),
            children: Some(Vec::new()),
        }
    }

    /// Create a new element node with attributes
    pub fn element_with_attrs(tag_name: &str, attrs: Vec<(&str, &str)>) -> Self {
        let flat_attrs: Vec<String> = attrs
            .into_iter()
            .flat_map(|(k, v)| [k.to_string(), v.to_string()])
            .collect();

        Self {
            node_type: NodeType::Element,
            node_name: tag_name.to_uppercase(),
            node_value: None,
            attributes: Some(flat_attrs),
            children: Some(Vec::new()),
        }
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Self {
            node_type: NodeType::Text,
            node_name: "#text".to_string(),
            node_value: Some(content.to_string()),
            attributes: None,
            children: None,
        }
    }

    /// Create a new comment node
    pub fn comment(content: &str) -> Self {
        Self {
            node_type: NodeType::Comment,
            node_name: "#comment".to_string(),
            node_value: Some(content.to_string()),
            attributes: None,
            children: None,
        }
    }

    /// Create a document fragment node
    pub fn document_fragment() -> Self {
        Self {
            node_type: NodeType::DocumentFragment,
            node_name: "#document-fragment".to_string(),
            node_value: None,
            attributes: None,
            children: Some(Vec::new()),
        }
    }

    /// Builder-style variant of [`Node::add_child`]
    pub fn with_child(mut self, child: Node) -> Self {
        self.add_child(child);
        self
    }

    /// Builder-style shorthand for appending a text child
    pub fn with_text(self, content: &str) -> Self {
        self.with_child(Node::text(content))
    }

    /// Check if this is an element node
    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    /// Check if this is a text node
    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Get the tag name (lowercase)
    pub fn tag_name(&self) -> String {
        self.node_name.to_lowercase()
    }

    /// The conversion kind of this node
    pub fn kind(&self) -> NodeKind {
        NodeKind::of(self)
    }

    /// Get an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        let attrs = self.attributes.as_ref()?;

        // CDP stores attributes as flat array: [name, value, name, value, ...]
        attrs
            .chunks_exact(2)
            .find(|pair| pair[0].eq_ignore_ascii_case(name))
            .map(|pair| pair[1].as_str())
    }

    /// Check if an attribute exists
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Set an attribute, replacing an existing value
    pub fn set_attr(&mut self, name: &str, value: &str) {
        let attrs = self.attributes.get_or_insert_with(Vec::new);

        if let Some(pair) = attrs
            .chunks_exact_mut(2)
            .find(|pair| pair[0].eq_ignore_ascii_case(name))
        {
            pair[1] = value.to_string();
            return;
        }

        attrs.push(name.to_string());
        attrs.push(value.to_string());
    }

    /// Whitespace-separated entries of the `class` attribute
    pub fn class_list(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    /// Check if the `class` attribute contains `class_name`
    pub fn has_class(&self, class_name: &str) -> bool {
        self.class_list().any(|c| c == class_name)
    }

    /// Whether the inline style hides this element.
    ///
    /// Only `display: none` and `visibility: hidden` count; when a property is
    /// declared more than once the last declaration wins.
    pub fn is_hidden(&self) -> bool {
        let Some(style) = self.attr("style") else {
            return false;
        };

        let mut display_none = false;
        let mut visibility_hidden = false;

        for (property, value) in style.split(';').filter_map(|decl| decl.split_once(':')) {
            let value = value.trim();
            let value = value
                .strip_suffix("!important")
                .unwrap_or(value)
                .trim()
                .to_ascii_lowercase();

            match property.trim().to_ascii_lowercase().as_str() {
                "display" => display_none = value == "none",
                "visibility" => visibility_hidden = value == "hidden",
                _ => {}
            }
        }

        display_none || visibility_hidden
    }

    /// Get all child nodes
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().flat_map(|c| c.iter())
    }

    /// Get only element children
    pub fn element_children(&self) -> impl Iterator<Item = &Node> {
        self.children().filter(|n| n.is_element())
    }

    /// Add a child node
    pub fn add_child(&mut self, child: Node) {
        self.children.get_or_insert_with(Vec::new).push(child);
    }

    /// Get all text content from this node and descendants
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        match self.node_type {
            NodeType::Text => out.push_str(self.node_value.as_deref().unwrap_or("")),
            NodeType::Comment => {}
            _ => self.children().for_each(|child| child.collect_text(out)),
        }
    }

    /// Depth-first search for the first descendant (or self) matching `predicate`
    pub fn find<P>(&self, predicate: P) -> Option<&Node>
    where
        P: Fn(&Node) -> bool + Copy,
    {
        if predicate(self) {
            return Some(self);
        }
        self.children().find_map(|child| child.find(predicate))
    }

    /// Find the first element with the given `id` attribute
    pub fn find_by_id(&self, id: &str) -> Option<&Node> {
        self.find(|n| n.is_element() && n.attr("id") == Some(id))
    }

    /// Find the first element carrying `class_name`
    pub fn find_by_class(&self, class_name: &str) -> Option<&Node> {
        self.find(|n| n.is_element() && n.has_class(class_name))
    }
}

/// Position of a node relative to the content root, as child indices.
///
/// The root itself has the empty path. Indices count every child (text and
/// comment nodes included), so paths computed by different passes over the same
/// tree always agree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// The path of the content root
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// The path of the `index`-th child of this node
    pub fn child(&self, index: usize) -> Self {
        let mut indices = Vec::with_capacity(self.0.len() + 1);
        indices.extend_from_slice(&self.0);
        indices.push(index);
        Self(indices)
    }

    /// Number of steps from the root
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

/// A reference to a node with its position and parent context.
/// This allows navigation decisions that depend on the parent without storing
/// parent pointers.
#[derive(Debug, Clone)]
pub struct NodeRef<'a> {
    /// The node itself
    pub node: &'a Node,
    /// Path from the content root
    pub path: NodePath,
    parent_kind: Option<NodeKind>,
}

impl<'a> NodeRef<'a> {
    /// Create a reference to the content root
    pub fn root(node: &'a Node) -> Self {
        Self {
            node,
            path: NodePath::root(),
            parent_kind: None,
        }
    }

    /// Get the parent kind if known
    pub fn parent_kind(&self) -> Option<NodeKind> {
        self.parent_kind
    }

    /// Children paired with their paths, in document order
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + '_ {
        let parent_kind = self.node.kind();
        self.node
            .children()
            .enumerate()
            .map(move |(index, child)| NodeRef {
                node: child,
                path: self.path.child(index),
                parent_kind: Some(parent_kind),
            })
    }

    /// Element children paired with their paths, in document order
    pub fn element_children(&self) -> impl Iterator<Item = NodeRef<'a>> + '_ {
        self.children().filter(|child| child.node.is_element())
    }

    /// Delegate to Node methods
    pub fn kind(&self) -> NodeKind {
        self.node.kind()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.node.attr(name)
    }

    pub fn is_hidden(&self) -> bool {
        self.node.is_hidden()
    }

    /// Whether this node and its subtree produce no output.
    ///
    /// The content root's own inline visibility is ignored: pages ship it
    /// hidden and reveal it by script once loaded.
    pub fn is_suppressed(&self) -> bool {
        self.kind() == NodeKind::NonRenderable || (self.path.depth() > 0 && self.is_hidden())
    }

    pub fn text_content(&self) -> String {
        self.node.text_content()
    }
}
