//! Conversion entry points.

use std::sync::Arc;

use tracing::debug;

use crate::annotate::annotate;
use crate::images::{ImageRef, ImageResolver, PixelFetcher};
use crate::metadata::{markdown_filename, ArticleMetadata};
use crate::node::Node;
use crate::options::ConversionOptions;
use crate::render::render_markdown;
use crate::{Result, WxmdError, CONTENT_ROOT_ID};

/// Output of converting one content root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Normalized Markdown body
    pub markdown: String,
    /// Images to download; only filled in download mode
    pub images: Vec<ImageRef>,
}

/// A converted article page: preamble plus body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub metadata: ArticleMetadata,
    pub markdown: String,
    pub images: Vec<ImageRef>,
}

impl Article {
    /// Suggested file name for [`Article::markdown`]
    pub fn markdown_filename(&self) -> String {
        markdown_filename(&self.metadata.title)
    }
}

/// Convert the content root to Markdown.
///
/// Annotates blank lines, resolves image sources according to
/// `options.image_mode` (using `fetcher` in base64 mode), then renders.
/// Fails with [`WxmdError::ContentNotFound`] when `root` is `None`; image
/// failures never fail the conversion.
pub async fn convert(
    root: Option<&Node>,
    options: &ConversionOptions,
    fetcher: Option<&dyn PixelFetcher>,
) -> Result<Conversion> {
    let root = root.ok_or(WxmdError::ContentNotFound)?;

    let hints = annotate(root);

    let mut resolver = ImageResolver::new(options.image_mode);
    if let Some(fetcher) = fetcher {
        resolver = resolver.with_fetcher(fetcher);
    }
    let images = resolver.resolve(root).await;

    let markdown = render_markdown(root, &hints, &images);
    debug!(
        blank_line_hints = hints.len(),
        images = images.len(),
        bytes = markdown.len(),
        "converted content root"
    );

    Ok(Conversion {
        markdown,
        images: images.into_refs(),
    })
}

/// The main service for converting article pages to Markdown
#[derive(Clone, Default)]
pub struct MarkdownService {
    options: ConversionOptions,
    fetcher: Option<Arc<dyn PixelFetcher>>,
}

impl MarkdownService {
    /// Create a MarkdownService with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a MarkdownService with custom options
    pub fn with_options(options: ConversionOptions) -> Self {
        Self {
            options,
            fetcher: None,
        }
    }

    /// Fetch pixel data through `fetcher` in base64 mode
    pub fn with_fetcher(mut self, fetcher: Arc<dyn PixelFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Get the current options
    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Get mutable access to options
    pub fn options_mut(&mut self) -> &mut ConversionOptions {
        &mut self.options
    }

    /// Convert a content root
    pub async fn convert(&self, root: &Node) -> Result<Conversion> {
        convert(Some(root), &self.options, self.fetcher.as_deref()).await
    }

    /// Convert a whole parsed page: locate the body, read metadata, prepend
    /// the preamble.
    pub async fn convert_page(&self, document: &Node) -> Result<Article> {
        let root = document.find_by_id(CONTENT_ROOT_ID);
        let metadata = ArticleMetadata::extract(document);

        let conversion = convert(root, &self.options, self.fetcher.as_deref()).await?;

        let mut markdown = metadata.preamble(&self.options);
        markdown.push_str(&conversion.markdown);

        Ok(Article {
            metadata,
            markdown,
            images: conversion.images,
        })
    }

    /// Parse and convert a page's HTML
    #[cfg(feature = "html")]
    pub async fn convert_html(&self, html: &str) -> Result<Article> {
        let document = crate::html::parse_document(html);
        self.convert_page(&document).await
    }
}

impl std::fmt::Debug for MarkdownService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkdownService")
            .field("options", &self.options)
            .field("fetcher", &self.fetcher.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::FetchError;
    use crate::options::ImageMode;
    use async_trait::async_trait;

    const PAGE: &str = concat!(
        "<html><head><title>ignored</title><script>var x = 1;</script></head><body>",
        "<h1 class=\"rich_media_title\" id=\"activity-name\">  My Title </h1>",
        "<a id=\"js_name\">Author Name</a>",
        "<em id=\"publish_time\">2024-01-02</em>",
        "<div id=\"js_content\" style=\"visibility: hidden;\">",
        "<section><span>First paragraph</span></section>",
        "<p>Second <strong>bold</strong></p>",
        "<p><img data-src=\"https://mmbiz.qpic.cn/a.png\" src=\"data:image/gif;base64,R0lGOD\"></p>",
        "<p><br></p>",
        "<p style=\"display:none\">secret</p>",
        "</div></body></html>",
    );

    struct FailingFetcher;

    #[async_trait]
    impl PixelFetcher for FailingFetcher {
        async fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
            Err(FetchError::Status {
                url: url.to_string(),
                status: 403,
            })
        }
    }

    #[tokio::test]
    async fn test_missing_root() {
        let result = convert(None, &ConversionOptions::default(), None).await;
        assert!(matches!(result, Err(WxmdError::ContentNotFound)));
    }

    #[tokio::test]
    async fn test_convert_root() {
        let root = Node::element("div")
            .with_child(Node::element("p").with_text("Hello"))
            .with_child(Node::element("ul").with_child(Node::element("li").with_text("x")));

        let conversion = MarkdownService::new().convert(&root).await.unwrap();
        assert_eq!(conversion.markdown, "Hello\n\n\n\n- x\n");
        assert!(conversion.images.is_empty());
    }

    #[tokio::test]
    async fn test_convert_html_page() {
        let options = ConversionOptions {
            include_metadata: false,
            ..Default::default()
        };
        let article = MarkdownService::with_options(options).convert_html(PAGE).await.unwrap();

        assert_eq!(article.metadata.title, "My Title");
        assert_eq!(
            article.markdown,
            "# My Title\n\nFirst paragraph\n\n\nSecond **bold**\n\n\n![image](https://mmbiz.qpic.cn/a.png)\n"
        );
        assert_eq!(article.markdown_filename(), "My_Title.md");
    }

    #[tokio::test]
    async fn test_convert_html_with_metadata_and_downloads() {
        let options = ConversionOptions {
            image_mode: ImageMode::Download,
            include_metadata: true,
            source_url: Some("https://mp.weixin.qq.com/s/abc".to_string()),
        };
        let article = MarkdownService::with_options(options).convert_html(PAGE).await.unwrap();

        assert!(article.markdown.starts_with(
            "# My Title\n\n> **Author**: Author Name  \n> **Published**: 2024-01-02  \n> **Source**: https://mp.weixin.qq.com/s/abc\n\n---\n\n"
        ));
        assert!(article.markdown.ends_with("![image](./images/image_1.png)\n"));
        assert_eq!(article.images.len(), 1);
        assert_eq!(article.images[0].source_url, "https://mmbiz.qpic.cn/a.png");
        assert_eq!(article.images[0].relative_path(), "images/image_1.png");
    }

    #[tokio::test]
    async fn test_base64_failure_is_not_fatal() {
        let options = ConversionOptions {
            image_mode: ImageMode::Base64,
            include_metadata: false,
            source_url: None,
        };
        let service = MarkdownService::with_options(options).with_fetcher(Arc::new(FailingFetcher));
        let article = service.convert_html(PAGE).await.unwrap();

        assert!(article.markdown.ends_with("![image](https://mmbiz.qpic.cn/a.png)\n"));
        assert!(article.images.is_empty());
    }

    #[tokio::test]
    async fn test_page_without_content_root() {
        let result = MarkdownService::new().convert_html("<p>not an article</p>").await;
        assert!(matches!(result, Err(WxmdError::ContentNotFound)));
    }
}
