//! Capabilities the analyzer depends on.
//!
//! Each is a trait so the analyzer can be driven by in-process fakes in
//! tests and by HTTP or subprocess backends in production.

use async_trait::async_trait;
use cae_core::VideoMetadata;
use cae_youtube::YoutubeClient;

use crate::error::VideoError;

/// Speech-to-text for a whole video.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, video_id: &str) -> Result<String, VideoError>;
}

/// Title and description lookup.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn video_metadata(&self, video_id: &str) -> Result<VideoMetadata, VideoError>;
}

/// A language model that answers `input` following `instructions`.
///
/// Returns the raw completion text; callers parse it.
#[async_trait]
pub trait TextClassifier: Send + Sync {
    async fn complete(&self, instructions: &str, input: &str) -> Result<String, VideoError>;
}

#[async_trait]
impl MetadataSource for YoutubeClient {
    async fn video_metadata(&self, video_id: &str) -> Result<VideoMetadata, VideoError> {
        let details = self.video_details(video_id).await?;
        Ok(VideoMetadata {
            title: details.title,
            description: details.description,
        })
    }
}
