use cae_core::ErrorKind;
use cae_youtube::YoutubeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VideoError {
    #[error("media download failed for video {video_id}: {message}")]
    MediaDownload { video_id: String, message: String },

    #[error("transcription failed for video {video_id}: {message}")]
    Transcription { video_id: String, message: String },

    /// The speech-to-text backend could not be reached or loaded.
    #[error("transcription model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("metadata lookup failed: {0}")]
    Metadata(#[from] YoutubeError),

    /// The language model request failed or returned an unusable body.
    #[error("classifier error for {context}: {message}")]
    Classifier { context: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl VideoError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            VideoError::MediaDownload { .. }
            | VideoError::Transcription { .. }
            | VideoError::Classifier { .. }
            | VideoError::Io(_)
            | VideoError::Http(_) => ErrorKind::Upstream,
            VideoError::ModelUnavailable(_) => ErrorKind::Model,
            VideoError::Metadata(e) => e.kind(),
            VideoError::InvalidInput(_) => ErrorKind::InputValidation,
        }
    }
}
