//! Configuration options for article conversion

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::WxmdError;

/// How image references are resolved before rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageMode {
    /// Link to the image's original (lazy-load preferred) URL
    #[default]
    Original,
    /// Reference `./images/image_N.png` and report each image for download
    Download,
    /// Inline the fetched image bytes as a data URI
    Base64,
}

impl ImageMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageMode::Original => "original",
            ImageMode::Download => "download",
            ImageMode::Base64 => "base64",
        }
    }
}

impl fmt::Display for ImageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageMode {
    type Err = WxmdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "original" => Ok(ImageMode::Original),
            "download" => Ok(ImageMode::Download),
            "base64" => Ok(ImageMode::Base64),
            other => Err(WxmdError::InvalidInput(format!("unknown image mode `{other}`"))),
        }
    }
}

/// Options for a conversion.
///
/// The serialized form doubles as the persisted settings record:
/// `{"imageMode": "original", "includeMetadata": true}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConversionOptions {
    /// Image source resolution strategy
    pub image_mode: ImageMode,

    /// Prepend author, publish time and source link after the title
    pub include_metadata: bool,

    /// Address of the article page, shown in the metadata preamble
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            image_mode: ImageMode::Original,
            include_metadata: true,
            source_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_mode_from_str() {
        assert_eq!("Download".parse::<ImageMode>().unwrap(), ImageMode::Download);
        assert_eq!(" base64 ".parse::<ImageMode>().unwrap(), ImageMode::Base64);
        assert!(matches!(
            "inline".parse::<ImageMode>(),
            Err(WxmdError::InvalidInput(_))
        ));
        assert_eq!(ImageMode::Original.to_string(), "original");
    }

    #[test]
    fn test_settings_record() {
        let options: ConversionOptions =
            serde_json::from_str(r#"{"imageMode":"download","includeMetadata":false}"#).unwrap();
        assert_eq!(options.image_mode, ImageMode::Download);
        assert!(!options.include_metadata);

        let json = serde_json::to_string(&ConversionOptions::default()).unwrap();
        assert_eq!(json, r#"{"imageMode":"original","includeMetadata":true}"#);
    }

    #[test]
    fn test_missing_settings_take_defaults() {
        let options: ConversionOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, ConversionOptions::default());
    }
}
