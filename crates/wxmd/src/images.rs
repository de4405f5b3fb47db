//! Image source resolution.
//!
//! Runs once over the content root before rendering and decides, per image
//! node, what ends up inside `![alt](...)`. Results are stored in a
//! [`ResolvedImages`] side-table keyed by node path, so the renderer never
//! performs I/O and the tree itself is left untouched.

use async_trait::async_trait;
use base64::Engine;
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::kind::NodeKind;
use crate::node::{Node, NodePath, NodeRef};
use crate::options::ImageMode;

/// Directory, relative to the Markdown file, that downloaded images go into
pub const IMAGE_DIR: &str = "images";

/// MIME type used when the fetched bytes are not recognized
const DEFAULT_IMAGE_MIME: &str = "image/png";

/// An image scheduled for download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// Where the image is fetched from
    pub source_url: String,
    /// `image_N.png`, numbered from 1 in document order
    pub filename: String,
}

impl ImageRef {
    fn numbered(index: usize, source_url: &str) -> Self {
        Self {
            source_url: source_url.to_string(),
            filename: format!("image_{index}.png"),
        }
    }

    /// Save location next to the Markdown file, e.g. `images/image_1.png`
    pub fn relative_path(&self) -> String {
        format!("{IMAGE_DIR}/{}", self.filename)
    }

    /// Reference written into the Markdown, e.g. `./images/image_1.png`
    pub fn markdown_path(&self) -> String {
        format!("./{}", self.relative_path())
    }
}

/// Error returned by a [`PixelFetcher`]
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("no pixel fetcher configured")]
    NoFetcher,

    #[error("request for {url} failed: {reason}")]
    Request { url: String, reason: String },

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("{url} returned no image data")]
    Empty { url: String },
}

/// Source of raw image bytes for [`ImageMode::Base64`]
#[async_trait]
pub trait PixelFetcher: Send + Sync {
    /// Fetch the image at `url`
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Resolved image sources keyed by node path, plus the download list
#[derive(Debug, Clone, Default)]
pub struct ResolvedImages {
    sources: IndexMap<NodePath, String>,
    refs: Vec<ImageRef>,
}

impl ResolvedImages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the final source for the image at `path`
    pub fn insert(&mut self, path: NodePath, source: String) {
        self.sources.insert(path, source);
    }

    /// The resolved source for the image at `path`, if it was kept
    pub fn source_for(&self, path: &NodePath) -> Option<&str> {
        self.sources.get(path).map(String::as_str)
    }

    /// Images to download, in document order
    pub fn refs(&self) -> &[ImageRef] {
        &self.refs
    }

    pub fn into_refs(self) -> Vec<ImageRef> {
        self.refs
    }

    /// Number of images that will be rendered
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// The best available source of an image element.
///
/// The lazy-load `data-src` wins over `src`, since the page defers real
/// sources. Empty sources and sources that already are data URIs (tracking
/// pixels, blank placeholder gifs) yield `None`.
pub fn image_source(node: &Node) -> Option<String> {
    let source = ["data-src", "src"]
        .iter()
        .filter_map(|name| node.attr(name))
        .map(str::trim)
        .find(|value| !value.is_empty())?;

    if source.starts_with("data:") {
        return None;
    }

    Some(source.to_string())
}

/// Renderable image elements under `root` with their sources, in document order.
///
/// Hidden and non-renderable subtrees are skipped, as the renderer never
/// reaches them.
pub fn collect_images(root: &Node) -> Vec<(NodePath, String)> {
    let mut images = Vec::new();
    collect_into(&NodeRef::root(root), &mut images);
    images
}

fn collect_into(node: &NodeRef, images: &mut Vec<(NodePath, String)>) {
    if node.is_suppressed() {
        return;
    }

    if node.kind() == NodeKind::Image {
        if let Some(source) = image_source(node.node) {
            images.push((node.path.clone(), source));
        }
        return;
    }

    for child in node.children() {
        collect_into(&child, images);
    }
}

/// Encode image bytes as a data URI, sniffing the MIME type
pub fn encode_data_uri(bytes: &[u8]) -> String {
    let mime = infer::get(bytes)
        .map(|kind| kind.mime_type())
        .filter(|mime| mime.starts_with("image/"))
        .unwrap_or(DEFAULT_IMAGE_MIME);

    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime};base64,{encoded}")
}

/// Resolves every image under a content root according to an [`ImageMode`]
pub struct ImageResolver<'f> {
    mode: ImageMode,
    fetcher: Option<&'f dyn PixelFetcher>,
}

impl<'f> ImageResolver<'f> {
    pub fn new(mode: ImageMode) -> Self {
        Self {
            mode,
            fetcher: None,
        }
    }

    /// Use `fetcher` for pixel data in base64 mode
    pub fn with_fetcher(mut self, fetcher: &'f dyn PixelFetcher) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Resolve all images under `root`.
    ///
    /// Fetches in base64 mode run one after another; a failed fetch degrades
    /// only that image to its original source.
    pub async fn resolve(&self, root: &Node) -> ResolvedImages {
        let mut resolved = ResolvedImages::new();

        for (index, (path, source)) in collect_images(root).into_iter().enumerate() {
            let rendered = match self.mode {
                ImageMode::Original => source,
                ImageMode::Download => {
                    let image = ImageRef::numbered(index + 1, &source);
                    let markdown_path = image.markdown_path();
                    resolved.refs.push(image);
                    markdown_path
                }
                ImageMode::Base64 => match self.fetch_data_uri(&source).await {
                    Ok(data_uri) => data_uri,
                    Err(err) => {
                        warn!(url = %source, error = %err, "failed to inline image, keeping original source");
                        source
                    }
                },
            };
            resolved.insert(path, rendered);
        }

        debug!(
            mode = %self.mode,
            images = resolved.len(),
            downloads = resolved.refs.len(),
            "resolved image sources"
        );

        resolved
    }

    async fn fetch_data_uri(&self, url: &str) -> Result<String, FetchError> {
        let fetcher = self.fetcher.ok_or(FetchError::NoFetcher)?;
        let bytes = fetcher.fetch(url).await?;

        if bytes.is_empty() {
            return Err(FetchError::Empty {
                url: url.to_string(),
            });
        }

        Ok(encode_data_uri(&bytes))
    }
}
