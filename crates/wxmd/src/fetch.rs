//! HTTP-backed pixel fetching for base64 image mode.

use async_trait::async_trait;

use crate::images::{FetchError, PixelFetcher};

/// Fetches image bytes over HTTP with reqwest
#[derive(Debug, Clone, Default)]
pub struct HttpPixelFetcher {
    client: reqwest::Client,
}

impl HttpPixelFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an existing client (proxies, timeouts, headers)
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PixelFetcher for HttpPixelFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let request_error = |err: reqwest::Error| FetchError::Request {
            url: url.to_string(),
            reason: err.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(request_error)?;
        Ok(bytes.to_vec())
    }
}
