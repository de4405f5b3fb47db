//! Element kinds recognized by the converter.

use crate::node::{Node, NodeType};

/// The conversion kind of a node.
///
/// Every node maps to exactly one kind; tags without a dedicated rule map to
/// [`NodeKind::Other`], which renders its children unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Text node
    Text,
    /// Comment node
    Comment,
    /// `h1`..`h6`
    Heading(u8),
    /// `p`
    Paragraph,
    /// `br`
    LineBreak,
    /// `strong`, `b`
    Strong,
    /// `em`, `i`
    Emphasis,
    /// `del`, `s`, `strike`
    Strikethrough,
    /// `a`
    Anchor,
    /// `img`
    Image,
    /// `ul`
    UnorderedList,
    /// `ol`
    OrderedList,
    /// `li`
    ListItem,
    /// `blockquote`
    Blockquote,
    /// `code`
    Code,
    /// `pre`
    Preformatted,
    /// `hr`
    Rule,
    /// `table`
    Table,
    /// `tr`
    TableRow,
    /// `td`, `th`
    TableCell,
    /// `div`
    Division,
    /// `section`
    Section,
    /// `article`, `span`, `main`
    Wrapper,
    /// Elements that never produce output (`script`, `style`, ...)
    NonRenderable,
    /// Anything else, including document and fragment nodes
    Other,
}

impl NodeKind {
    /// Classify a node
    pub fn of(node: &Node) -> Self {
        match node.node_type {
            NodeType::Text => NodeKind::Text,
            NodeType::Comment => NodeKind::Comment,
            NodeType::Element => NodeKind::from_tag(&node.node_name),
            NodeType::Document | NodeType::DocumentFragment => NodeKind::Other,
        }
    }

    /// Classify an element by tag name (case-insensitive)
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "h1" => NodeKind::Heading(1),
            "h2" => NodeKind::Heading(2),
            "h3" => NodeKind::Heading(3),
            "h4" => NodeKind::Heading(4),
            "h5" => NodeKind::Heading(5),
            "h6" => NodeKind::Heading(6),
            "p" => NodeKind::Paragraph,
            "br" => NodeKind::LineBreak,
            "strong" | "b" => NodeKind::Strong,
            "em" | "i" => NodeKind::Emphasis,
            "del" | "s" | "strike" => NodeKind::Strikethrough,
            "a" => NodeKind::Anchor,
            "img" => NodeKind::Image,
            "ul" => NodeKind::UnorderedList,
            "ol" => NodeKind::OrderedList,
            "li" => NodeKind::ListItem,
            "blockquote" => NodeKind::Blockquote,
            "code" => NodeKind::Code,
            "pre" => NodeKind::Preformatted,
            "hr" => NodeKind::Rule,
            "table" => NodeKind::Table,
            "tr" => NodeKind::TableRow,
            "td" | "th" => NodeKind::TableCell,
            "div" => NodeKind::Division,
            "section" => NodeKind::Section,
            "article" | "span" | "main" => NodeKind::Wrapper,
            "script" | "style" | "noscript" | "template" | "meta" | "link" | "head" => {
                NodeKind::NonRenderable
            }
            _ => NodeKind::Other,
        }
    }

    /// Kinds whose subtree keeps literal whitespace
    pub fn preserves_whitespace(self) -> bool {
        matches!(self, NodeKind::Preformatted | NodeKind::Code)
    }

    /// Top-level containers eligible for a trailing blank-line hint
    pub fn takes_blank_line_hint(self) -> bool {
        matches!(self, NodeKind::Paragraph | NodeKind::Section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_mapping() {
        assert_eq!(NodeKind::from_tag("H3"), NodeKind::Heading(3));
        assert_eq!(NodeKind::from_tag("b"), NodeKind::Strong);
        assert_eq!(NodeKind::from_tag("strike"), NodeKind::Strikethrough);
        assert_eq!(NodeKind::from_tag("th"), NodeKind::TableCell);
        assert_eq!(NodeKind::from_tag("main"), NodeKind::Wrapper);
        assert_eq!(NodeKind::from_tag("noscript"), NodeKind::NonRenderable);
        assert_eq!(NodeKind::from_tag("figure"), NodeKind::Other);
    }

    #[test]
    fn test_node_types() {
        assert_eq!(Node::text("x").kind(), NodeKind::Text);
        assert_eq!(Node::comment("x").kind(), NodeKind::Comment);
        assert_eq!(Node::document_fragment().kind(), NodeKind::Other);
        assert_eq!(Node::element("SECTION").kind(), NodeKind::Section);
    }

    #[test]
    fn test_blank_line_candidates() {
        assert!(NodeKind::Paragraph.takes_blank_line_hint());
        assert!(NodeKind::Section.takes_blank_line_hint());
        assert!(!NodeKind::Division.takes_blank_line_hint());
        assert!(!NodeKind::Wrapper.takes_blank_line_hint());
    }
}
