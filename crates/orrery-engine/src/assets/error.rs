use thiserror::Error;

/// Why raw bytes could not be turned into RGBA pixels.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("could not read image header")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "textures")]
    #[error("image decode failed")]
    Image(#[from] image::ImageError),

    /// Built without the `textures` feature.
    #[error("texture decoding is disabled in this build")]
    Disabled,
}

/// Failure of a single asset request. Always recovered locally.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("fetch of {url} failed: {message}")]
    Fetch { url: String, message: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("could not decode texture {url}")]
    Decode {
        url: String,
        #[source]
        source: DecodeError,
    },

    #[error("bad model descriptor {url}")]
    Model {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{url} did not settle within {secs}s")]
    Timeout { url: String, secs: f32 },

    #[error("no fetcher available for {url}")]
    Unsupported { url: String },
}

impl AssetError {
    pub fn url(&self) -> &str {
        match self {
            AssetError::Fetch { url, .. }
            | AssetError::Status { url, .. }
            | AssetError::Decode { url, .. }
            | AssetError::Model { url, .. }
            | AssetError::Timeout { url, .. }
            | AssetError::Unsupported { url } => url,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, AssetError::Timeout { .. })
    }
}

/// A manifest override that was rejected. The built-in manifest stays in effect.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest is not valid JSON")]
    Parse(#[from] serde_json::Error),

    #[error("manifest rejected: {0}")]
    Invalid(String),
}
