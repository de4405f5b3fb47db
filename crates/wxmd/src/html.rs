//! HTML parsing support.
//!
//! This module parses HTML strings with scraper and converts them to the
//! CDP-style Node structure used by the converter. Comments, doctypes and
//! processing instructions are dropped.

use scraper::{ElementRef, Html, Node as ScraperNode};

use crate::node::Node;
use crate::CONTENT_ROOT_ID;

/// Parse an HTML fragment into a Node tree rooted at an `html` element.
///
/// # Example
///
/// ```rust
/// use wxmd::parse_html;
///
/// let node = parse_html("<p>Hello <em>World</em></p>");
/// assert_eq!(node.text_content(), "Hello World");
/// ```
pub fn parse_html(html: &str) -> Node {
    let document = Html::parse_fragment(html);
    scraper_to_node(document.root_element())
}

/// Parse a complete page into a Node tree rooted at its `html` element
pub fn parse_document(html: &str) -> Node {
    let document = Html::parse_document(html);
    scraper_to_node(document.root_element())
}

/// The article body element of a parsed page, if present
pub fn find_content_root(document: &Node) -> Option<&Node> {
    document.find_by_id(CONTENT_ROOT_ID)
}

/// Convert a scraper ElementRef to our Node structure
fn scraper_to_node(element: ElementRef) -> Node {
    let tag = element.value().name();
    let attrs: Vec<(&str, &str)> = element.value().attrs().collect();

    let mut node = Node::element_with_attrs(tag, attrs);

    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => {
                node.add_child(Node::text(&text.text));
            }
            ScraperNode::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    node.add_child(scraper_to_node(child_element));
                }
            }
            _ => {}
        }
    }

    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::NodeKind;

    #[test]
    fn test_parse_fragment() {
        let node = parse_html("<p class=\"intro\">Hello <!-- note --><b>World</b></p>");
        assert_eq!(node.tag_name(), "html");

        let p = node.element_children().next().unwrap();
        assert_eq!(p.kind(), NodeKind::Paragraph);
        assert_eq!(p.attr("class"), Some("intro"));
        assert_eq!(p.children().count(), 2);
        assert_eq!(p.text_content(), "Hello World");
    }

    #[test]
    fn test_find_content_root() {
        let document = parse_document(
            "<html><body><h1 id=\"activity-name\">T</h1><div id=\"js_content\"><p>Body</p></div></body></html>",
        );
        let root = find_content_root(&document).unwrap();
        assert_eq!(root.tag_name(), "div");
        assert_eq!(root.text_content(), "Body");

        assert!(find_content_root(&parse_document("<p>nothing</p>")).is_none());
    }
}
