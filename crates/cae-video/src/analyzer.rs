use cae_core::{Scene, SponsorMention, VideoAnalysis};
use futures::stream::{self, StreamExt};

use crate::classify::{
    parse_scene_response, parse_sponsor_list, SCENE_INSTRUCTIONS, SPONSOR_INSTRUCTIONS,
};
use crate::collaborators::{MetadataSource, TextClassifier, Transcriber};
use crate::error::VideoError;
use crate::segment::{chunk_transcript, fallback_summary, TranscriptChunk, WORDS_PER_SCENE};

/// Scene classifications in flight at once.
const DEFAULT_SCENE_CONCURRENCY: usize = 4;

/// Builds the scene map and sponsor list for a video.
pub struct VideoAnalyzer<T, M, C> {
    transcriber: T,
    metadata: M,
    classifier: C,
    scene_concurrency: usize,
}

impl<T, M, C> VideoAnalyzer<T, M, C>
where
    T: Transcriber,
    M: MetadataSource,
    C: TextClassifier,
{
    #[must_use]
    pub fn new(transcriber: T, metadata: M, classifier: C) -> Self {
        Self {
            transcriber,
            metadata,
            classifier,
            scene_concurrency: DEFAULT_SCENE_CONCURRENCY,
        }
    }

    #[must_use]
    pub fn with_scene_concurrency(mut self, concurrency: usize) -> Self {
        self.scene_concurrency = concurrency.max(1);
        self
    }

    /// Transcribe, segment and classify one video.
    ///
    /// Transcription and metadata lookup run concurrently and are fatal on
    /// failure. A scene whose classification fails or can't be parsed keeps
    /// a fallback summary and an empty sponsor. Scenes keep transcript order.
    ///
    /// # Errors
    ///
    /// - [`VideoError::MediaDownload`] / [`VideoError::Transcription`] /
    ///   [`VideoError::ModelUnavailable`] from the transcriber.
    /// - [`VideoError::Metadata`] from the metadata lookup.
    /// - [`VideoError::Classifier`] if the description sponsor request fails.
    pub async fn analyze_video(&self, video_id: &str) -> Result<VideoAnalysis, VideoError> {
        let (transcript, metadata) = tokio::try_join!(
            self.transcriber.transcribe(video_id),
            self.metadata.video_metadata(video_id),
        )?;

        let chunks = chunk_transcript(&transcript, WORDS_PER_SCENE);
        let scenes: Vec<Scene> = stream::iter(&chunks)
            .map(|chunk| self.classify_scene(video_id, chunk))
            .buffered(self.scene_concurrency)
            .collect()
            .await;

        let sponsors = self.extract_sponsors(&metadata.description).await?;

        tracing::info!(
            video_id,
            scenes = scenes.len(),
            sponsors = sponsors.len(),
            "video analyzed"
        );
        Ok(VideoAnalysis {
            scenes,
            sponsors,
            metadata,
        })
    }

    /// Sponsors named in a video description.
    ///
    /// A blank description yields an empty list without asking the model.
    ///
    /// # Errors
    ///
    /// Returns the classifier's error when the request fails.
    pub async fn extract_sponsors(
        &self,
        description: &str,
    ) -> Result<Vec<SponsorMention>, VideoError> {
        if description.trim().is_empty() {
            return Ok(Vec::new());
        }
        let answer = self
            .classifier
            .complete(SPONSOR_INSTRUCTIONS, &format!("Video description: {description}"))
            .await?;
        Ok(parse_sponsor_list(&answer))
    }

    async fn classify_scene(&self, video_id: &str, chunk: &TranscriptChunk) -> Scene {
        let answer = self
            .classifier
            .complete(SCENE_INSTRUCTIONS, &format!("Scene text: {}", chunk.text))
            .await;

        let parsed = match answer {
            Ok(raw) => match parse_scene_response(&raw) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    tracing::warn!(
                        video_id,
                        scene = chunk.index,
                        error = %e,
                        "unparsable scene answer, using fallback"
                    );
                    None
                }
            },
            Err(e) => {
                tracing::warn!(
                    video_id,
                    scene = chunk.index,
                    error = %e,
                    "scene classification failed, using fallback"
                );
                None
            }
        };

        let (summary, sponsor) = match parsed {
            Some(p) if !p.summary.is_empty() => (p.summary, p.sponsor),
            Some(p) => (fallback_summary(&chunk.text), p.sponsor),
            None => (fallback_summary(&chunk.text), String::new()),
        };

        Scene {
            start: chunk.start,
            end: chunk.end,
            summary,
            sponsor,
        }
    }
}
