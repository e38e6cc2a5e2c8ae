use cae_core::ErrorKind;
use thiserror::Error;

use crate::duration::DurationParseError;

/// Errors returned by the `YouTube` Data API client and stats filter.
#[derive(Debug, Error)]
pub enum YoutubeError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status and an error envelope.
    #[error("YouTube API error for {context} (status {status}): {message}")]
    Api {
        context: String,
        status: u16,
        message: String,
    },

    #[error("channel not found: {0}")]
    ChannelNotFound(String),

    #[error("video not found: {0}")]
    VideoNotFound(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid duration for video {video_id}: {source}")]
    Duration {
        video_id: String,
        #[source]
        source: DurationParseError,
    },

    #[error("invalid publish timestamp \"{value}\" for video {video_id}")]
    Timestamp { video_id: String, value: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl YoutubeError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            YoutubeError::Http(_)
            | YoutubeError::Api { .. }
            | YoutubeError::ChannelNotFound(_)
            | YoutubeError::VideoNotFound(_) => ErrorKind::Upstream,
            YoutubeError::Deserialize { .. }
            | YoutubeError::Duration { .. }
            | YoutubeError::Timestamp { .. } => ErrorKind::Parse,
            YoutubeError::InvalidInput(_) => ErrorKind::InputValidation,
        }
    }

    /// Returns `true` for failures a bounded retry could fix.
    ///
    /// Network failures, 5xx and 429 are transient. Quota and permission
    /// errors (403), missing resources and malformed payloads are not.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        match self {
            YoutubeError::Http(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            YoutubeError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
