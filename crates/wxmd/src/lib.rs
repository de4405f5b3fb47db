//! # wxmd
//!
//! Convert official-account article pages to Markdown.
//!
//! ## Design
//!
//! Conversion runs in three passes over one in-memory, CDP-style DOM tree:
//!
//! - **Blank-line annotation**: top-level paragraphs and sections with text are
//!   marked for an extra trailing blank line, since the page spaces them with
//!   CSS margins rather than empty elements.
//! - **Image resolution**: every kept image gets its final source (original
//!   URL, `./images/image_N.png`, or an inline data URI). This is the only
//!   pass that may perform I/O.
//! - **Rendering**: a recursive walk produces Markdown per element kind, and a
//!   final pass caps blank lines and trims the document.
//!
//! Results of the first two passes live in side-tables keyed by
//! [`NodePath`], so the tree is never mutated.
//!
//! ## Example
//!
//! ```rust
//! use wxmd::{convert, ConversionOptions, Node};
//!
//! let root = Node::element("div")
//!     .with_child(Node::element("p").with_text("Hello ").with_child(Node::element("b").with_text("World")));
//!
//! let options = ConversionOptions::default();
//! let conversion = block_on(convert(Some(&root), &options, None)).unwrap();
//! assert_eq!(conversion.markdown, "Hello **World**\n");
//! # fn block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

pub mod annotate;
#[cfg(feature = "http")]
pub mod fetch;
#[cfg(feature = "html")]
pub mod html;
pub mod images;
pub mod kind;
pub mod metadata;
pub mod node;
pub mod options;
pub mod render;
mod service;
mod utilities;

pub use annotate::{annotate, BlankLineHints};
#[cfg(feature = "http")]
pub use fetch::HttpPixelFetcher;
#[cfg(feature = "html")]
pub use html::{find_content_root, parse_document, parse_html};
pub use images::{FetchError, ImageRef, ImageResolver, PixelFetcher, ResolvedImages};
pub use kind::NodeKind;
pub use metadata::{is_article_url, markdown_filename, sanitize_filename, ArticleMetadata};
pub use node::{Node, NodePath, NodeRef, NodeType};
pub use options::{ConversionOptions, ImageMode};
pub use render::{render_markdown, RenderContext, Renderer};
pub use service::{convert, Article, Conversion, MarkdownService};
pub use utilities::normalize_markdown;

/// Id of the element holding the article body
pub const CONTENT_ROOT_ID: &str = "js_content";

/// Error type for conversion
#[derive(Debug, thiserror::Error)]
pub enum WxmdError {
    #[error("Article content not found")]
    ContentNotFound,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, WxmdError>;
