use cae_core::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("failed to download thumbnail {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("thumbnail {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("failed to decode thumbnail {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: image::ImageError,
    },

    /// The embedding service is unreachable or refused to load its model.
    #[error("embedding model unavailable: {0}")]
    Model(String),

    /// The embedding service answered, but not with usable vectors.
    #[error("embedding error for {context}: {message}")]
    Embedding { context: String, message: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ThumbnailError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ThumbnailError::Download { .. } | ThumbnailError::Status { .. } => ErrorKind::Upstream,
            ThumbnailError::Decode { .. } => ErrorKind::Parse,
            ThumbnailError::Model(_)
            | ThumbnailError::Embedding { .. }
            | ThumbnailError::Http(_) => ErrorKind::Model,
        }
    }
}
