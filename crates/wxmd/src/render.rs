//! Tree-to-Markdown rendering.
//!
//! A post-order walk: each element renders its children with the inherited
//! [`RenderContext`], trims the concatenation, then applies the rule for its
//! [`NodeKind`]. Blank-line hints and resolved image sources are read from
//! side-tables computed beforehand; rendering itself is pure and total.

use crate::annotate::BlankLineHints;
use crate::images::ResolvedImages;
use crate::kind::NodeKind;
use crate::node::{Node, NodeRef, NodeType};
use crate::utilities::{
    clean_attribute, collapse_whitespace, escape_table_cell, is_script_url, normalize_markdown,
    strip_backticks,
};

/// Alt text for images that carry none
pub const DEFAULT_IMAGE_ALT: &str = "image";

/// Flags inherited by every descendant during rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderContext {
    /// Keep text whitespace verbatim (inside `pre`/`code`)
    pub preserve_whitespace: bool,
}

impl RenderContext {
    /// Context for the children of an element of `kind`
    fn entering(self, kind: NodeKind) -> Self {
        if kind.preserves_whitespace() {
            Self {
                preserve_whitespace: true,
            }
        } else {
            self
        }
    }
}

/// List marker style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStyle {
    /// `- item`
    Bullet,
    /// `1. item`, `2. item`, ...
    Numbered,
}

/// Renders a content root to Markdown
pub struct Renderer<'a> {
    hints: &'a BlankLineHints,
    images: &'a ResolvedImages,
}

impl<'a> Renderer<'a> {
    pub fn new(hints: &'a BlankLineHints, images: &'a ResolvedImages) -> Self {
        Self { hints, images }
    }

    /// Render `root` and normalize the result into a finished document
    pub fn render(&self, root: &Node) -> String {
        let fragment = self.render_node(&NodeRef::root(root), RenderContext::default());
        normalize_markdown(&fragment)
    }

    /// Render one node to its (unnormalized) fragment
    pub fn render_node(&self, node: &NodeRef, ctx: RenderContext) -> String {
        match node.node.node_type {
            NodeType::Text => render_text(node.node, ctx),
            NodeType::Comment => String::new(),
            _ => self.render_element(node, ctx),
        }
    }

    /// Concatenated, trimmed fragments of all children
    fn render_content(&self, node: &NodeRef, ctx: RenderContext) -> String {
        let mut content = String::new();
        for child in node.children() {
            content.push_str(&self.render_node(&child, ctx));
        }
        content.trim().to_string()
    }

    fn render_element(&self, node: &NodeRef, ctx: RenderContext) -> String {
        if node.is_suppressed() {
            return String::new();
        }

        let kind = node.kind();

        let ctx = ctx.entering(kind);

        // Rules that never look at the concatenated children
        match kind {
            NodeKind::LineBreak => return "\n".to_string(),
            NodeKind::Rule => return "\n---\n\n".to_string(),
            NodeKind::Image => return self.render_image(node),
            NodeKind::UnorderedList => {
                return format!("\n{}\n", format_list(&self.list_items(node, ctx), ListStyle::Bullet));
            }
            NodeKind::OrderedList => {
                return format!("\n{}\n", format_list(&self.list_items(node, ctx), ListStyle::Numbered));
            }
            NodeKind::Table => return format_table(&self.table_rows(node, ctx)),
            _ => {}
        }

        let content = self.render_content(node, ctx);
        let extra_blank = self.hints.wants_blank_line(&node.path);

        match kind {
            NodeKind::Heading(level) => format!("\n{} {}\n\n", heading_marker(level), content),

            NodeKind::Paragraph => match (content.is_empty(), extra_blank) {
                (true, _) => String::new(),
                (false, true) => format!("{content}\n\n\n"),
                (false, false) => format!("{content}\n\n"),
            },

            NodeKind::Strong => wrap_inline(&content, "**"),
            NodeKind::Emphasis => wrap_inline(&content, "*"),
            NodeKind::Strikethrough => wrap_inline(&content, "~~"),

            NodeKind::Anchor => {
                let href = clean_attribute(node.attr("href"));
                if !href.is_empty() && !is_script_url(&href) {
                    format!("[{content}]({href})")
                } else {
                    content
                }
            }

            NodeKind::Blockquote => format_blockquote(&content),

            // Already inside a fence
            NodeKind::Code if node.parent_kind() == Some(NodeKind::Preformatted) => content,
            NodeKind::Code => wrap_inline(&content, "`"),

            NodeKind::Preformatted => format!("\n```\n{}\n```\n\n", strip_backticks(&content)),

            NodeKind::Division | NodeKind::Section => match (content.is_empty(), extra_blank) {
                (true, _) => String::new(),
                (false, true) => format!("{content}\n\n\n"),
                (false, false) => format!("{content}\n"),
            },

            NodeKind::Wrapper if content.is_empty() => String::new(),
            NodeKind::Wrapper => format!("{content}\n"),

            // List items get their marker from the enclosing list
            _ => content,
        }
    }

    fn render_image(&self, node: &NodeRef) -> String {
        let Some(source) = self.images.source_for(&node.path) else {
            return String::new();
        };

        let alt = collapse_whitespace(&clean_attribute(node.attr("alt")));
        let alt = if alt.is_empty() { DEFAULT_IMAGE_ALT } else { alt.as_str() };

        format!("\n![{alt}]({source})\n\n")
    }

    /// Rendered direct `li` children of a list
    fn list_items(&self, list: &NodeRef, ctx: RenderContext) -> Vec<String> {
        list.element_children()
            .filter(|item| item.kind() == NodeKind::ListItem && !item.is_suppressed())
            .map(|item| self.render_node(&item, ctx).trim().to_string())
            .collect()
    }

    /// Rendered, escaped cells of every row in a table
    fn table_rows(&self, table: &NodeRef, ctx: RenderContext) -> Vec<Vec<String>> {
        let mut rows = Vec::new();
        collect_rows(table, &mut rows);

        rows.iter()
            .map(|row| {
                row.element_children()
                    .filter(|cell| cell.kind() == NodeKind::TableCell)
                    .map(|cell| escape_table_cell(self.render_node(&cell, ctx).trim()))
                    .collect()
            })
            .collect()
    }
}

/// Render `root` with the given side-tables into a finished document
pub fn render_markdown(root: &Node, hints: &BlankLineHints, images: &ResolvedImages) -> String {
    Renderer::new(hints, images).render(root)
}

fn render_text(node: &Node, ctx: RenderContext) -> String {
    let text = node.node_value.as_deref().unwrap_or("");
    if ctx.preserve_whitespace {
        text.to_string()
    } else {
        collapse_whitespace(text)
    }
}

/// Rows of a table in document order, through `thead`/`tbody`/`tfoot` but not
/// into nested tables, which render inside their own cell.
fn collect_rows<'n>(node: &NodeRef<'n>, rows: &mut Vec<NodeRef<'n>>) {
    for child in node.element_children() {
        if child.is_suppressed() {
            continue;
        }
        match child.kind() {
            NodeKind::TableRow => rows.push(child),
            NodeKind::Table => {}
            _ => collect_rows(&child, rows),
        }
    }
}

fn heading_marker(level: u8) -> &'static str {
    match level {
        0..=2 => "##",
        3 => "###",
        4 => "####",
        _ => "#####",
    }
}

fn wrap_inline(content: &str, delimiter: &str) -> String {
    if content.is_empty() {
        return String::new();
    }
    format!("{delimiter}{content}{delimiter}")
}

/// Prefix every non-blank line with `> `
pub fn format_blockquote(content: &str) -> String {
    let quoted: Vec<String> = content
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| format!("> {line}"))
        .collect();

    format!("\n{}\n\n", quoted.join("\n"))
}

/// One `{marker} {item}` line per item; numbering starts at 1
pub fn format_list(items: &[String], style: ListStyle) -> String {
    let mut out = String::new();

    for (index, item) in items.iter().enumerate() {
        match style {
            ListStyle::Bullet => out.push('-'),
            ListStyle::Numbered => {
                out.push_str(&(index + 1).to_string());
                out.push('.');
            }
        }
        out.push(' ');
        out.push_str(item);
        out.push('\n');
    }

    out
}

/// Pipe table with a `---` separator after the first row.
///
/// Cells must already be escaped. No rows yields an empty fragment.
pub fn format_table(rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut out = String::from("\n");

    for (index, cells) in rows.iter().enumerate() {
        push_row(&mut out, cells.iter().map(String::as_str));
        if index == 0 {
            push_row(&mut out, std::iter::repeat("---").take(cells.len()));
        }
    }

    out.push('\n');
    out
}

fn push_row<'s>(out: &mut String, cells: impl Iterator<Item = &'s str>) {
    let cells: Vec<&str> = cells.collect();
    out.push_str("| ");
    out.push_str(&cells.join(" | "));
    out.push_str(" |\n");
}
