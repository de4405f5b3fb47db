//! Article metadata and output naming.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::node::Node;
use crate::options::ConversionOptions;

pub const UNKNOWN_TITLE: &str = "Unknown title";
pub const UNKNOWN_AUTHOR: &str = "Unknown author";
pub const UNKNOWN_TIME: &str = "Unknown time";

/// Host serving official-account articles
const ARTICLE_HOST: &str = "mp.weixin.qq.com";

/// Longest file stem produced by [`sanitize_filename`], in characters
const MAX_FILENAME_CHARS: usize = 100;

static RESERVED_FILENAME_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[\\/:*?"<>|]"#).unwrap());
static WHITESPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Title, author and publish time of an article page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleMetadata {
    pub title: String,
    pub author: String,
    pub publish_time: String,
}

impl Default for ArticleMetadata {
    fn default() -> Self {
        Self {
            title: UNKNOWN_TITLE.to_string(),
            author: UNKNOWN_AUTHOR.to_string(),
            publish_time: UNKNOWN_TIME.to_string(),
        }
    }
}

impl ArticleMetadata {
    /// Read metadata from a parsed article page, falling back to the
    /// `Unknown ...` placeholders for anything missing or blank.
    pub fn extract(document: &Node) -> Self {
        Self {
            title: lookup(document, "activity-name", "rich_media_title")
                .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            author: lookup(document, "js_name", "rich_media_meta_nickname")
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            publish_time: lookup(document, "publish_time", "rich_media_meta_date")
                .unwrap_or_else(|| UNKNOWN_TIME.to_string()),
        }
    }

    /// Header placed above the article body.
    ///
    /// Always starts with the title as a level-one heading; the author block
    /// and rule follow when `include_metadata` is set.
    pub fn preamble(&self, options: &ConversionOptions) -> String {
        let mut out = format!("# {}\n\n", self.title);

        if options.include_metadata {
            out.push_str(&format!("> **Author**: {}  \n", self.author));
            out.push_str(&format!("> **Published**: {}  \n", self.publish_time));
            if let Some(url) = options.source_url.as_deref().filter(|u| !u.trim().is_empty()) {
                out.push_str(&format!("> **Source**: {}\n", url.trim()));
            }
            out.push_str("\n---\n\n");
        }

        out
    }
}

/// Trimmed text of the element with `id`, else of the first element with `class`
fn lookup(document: &Node, id: &str, class_name: &str) -> Option<String> {
    document
        .find_by_id(id)
        .or_else(|| document.find_by_class(class_name))
        .map(|node| node.text_content().trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Make an article title usable as a file stem
pub fn sanitize_filename(name: &str) -> String {
    let replaced = RESERVED_FILENAME_CHARS.replace_all(name, "_");
    let replaced = WHITESPACE_RUNS.replace_all(&replaced, "_");
    replaced.chars().take(MAX_FILENAME_CHARS).collect()
}

/// File name for the Markdown output of an article titled `title`
pub fn markdown_filename(title: &str) -> String {
    let title = title.trim();
    let stem = if title.is_empty() { "article" } else { title };
    format!("{}.md", sanitize_filename(stem))
}

/// Whether `url` points at an official-account article page
pub fn is_article_url(url: &str) -> bool {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let host = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or("")
        .rsplit('@')
        .next()
        .unwrap_or("");
    let host = host.split(':').next().unwrap_or("").to_ascii_lowercase();

    host == ARTICLE_HOST || host.ends_with(&format!(".{ARTICLE_HOST}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Node {
        Node::element("body")
            .with_child(Node::element_with_attrs("h1", vec![("id", "activity-name")]).with_text("\n  My Title \n"))
            .with_child(Node::element_with_attrs("span", vec![("class", "rich_media_meta rich_media_meta_nickname")]).with_text("Writer"))
            .with_child(Node::element_with_attrs("em", vec![("id", "publish_time")]).with_text("   "))
    }

    #[test]
    fn test_extract_with_fallbacks() {
        let metadata = ArticleMetadata::extract(&page());
        assert_eq!(metadata.title, "My Title");
        assert_eq!(metadata.author, "Writer");
        assert_eq!(metadata.publish_time, UNKNOWN_TIME);

        assert_eq!(ArticleMetadata::extract(&Node::element("body")), ArticleMetadata::default());
    }

    #[test]
    fn test_preamble_title_only() {
        let options = ConversionOptions {
            include_metadata: false,
            ..Default::default()
        };
        assert_eq!(ArticleMetadata::extract(&page()).preamble(&options), "# My Title\n\n");
    }

    #[test]
    fn test_preamble_with_metadata() {
        let metadata = ArticleMetadata {
            title: "T".into(),
            author: "A".into(),
            publish_time: "2024-05-01".into(),
        };
        let options = ConversionOptions {
            source_url: Some("https://mp.weixin.qq.com/s/abc".into()),
            ..Default::default()
        };
        assert_eq!(
            metadata.preamble(&options),
            "# T\n\n> **Author**: A  \n> **Published**: 2024-05-01  \n> **Source**: https://mp.weixin.qq.com/s/abc\n\n---\n\n"
        );
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename(r#"a/b\c: "d"  e?"#), "a_b_c___d__e_");
        assert_eq!(sanitize_filename(&"长".repeat(150)).chars().count(), 100);
        assert_eq!(markdown_filename("  "), "article.md");
        assert_eq!(markdown_filename("Rust <2024> Notes"), "Rust__2024__Notes.md");
    }

    #[test]
    fn test_is_article_url() {
        assert!(is_article_url("https://mp.weixin.qq.com/s/xyz"));
        assert!(is_article_url("http://MP.WEIXIN.QQ.COM:443/s?__biz=1"));
        assert!(!is_article_url("https://example.com/?u=mp.weixin.qq.com"));
        assert!(!is_article_url("https://mp.weixin.qq.com.evil.net/s"));
    }
}
