use std::time::Duration;

use image::RgbImage;
use tokio::sync::OnceCell;

use crate::backend::EmbeddingBackend;
use crate::error::ThumbnailError;
use crate::scoring::{score_embeddings, ScoringParams, NEGATIVE_PROMPTS, POSITIVE_PROMPTS};

struct PromptEmbeddings {
    positive: Vec<Vec<f32>>,
    negative: Vec<Vec<f32>>,
}

/// Downloads thumbnails and scores them against the prompt sets.
///
/// Prompt embeddings are requested from the backend once, on the first
/// scoring call, and shared by every later call.
pub struct ThumbnailScorer<B> {
    client: reqwest::Client,
    backend: B,
    params: ScoringParams,
    prompts: OnceCell<PromptEmbeddings>,
}

impl<B: EmbeddingBackend> ThumbnailScorer<B> {
    /// `timeout_secs` bounds each image download.
    ///
    /// # Errors
    ///
    /// Returns [`ThumbnailError::Http`] if the HTTP client cannot be built.
    pub fn new(
        backend: B,
        params: ScoringParams,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ThumbnailError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            backend,
            params,
            prompts: OnceCell::new(),
        })
    }

    /// Download, decode and score the image at `url`.
    ///
    /// # Errors
    ///
    /// - [`ThumbnailError::Download`] on transport failure or timeout.
    /// - [`ThumbnailError::Status`] on a non-2xx response.
    /// - [`ThumbnailError::Decode`] if the bytes are not a supported image.
    /// - [`ThumbnailError::Model`] / [`ThumbnailError::Embedding`] from the backend.
    pub async fn score_thumbnail(&self, url: &str) -> Result<f32, ThumbnailError> {
        let image = self.download(url).await?;
        let score = self.score_image(&image).await?;
        tracing::info!(url, score, "scored thumbnail");
        Ok(score)
    }

    /// Score an already decoded image.
    ///
    /// # Errors
    ///
    /// Returns backend errors from embedding the image or the prompts.
    pub async fn score_image(&self, image: &RgbImage) -> Result<f32, ThumbnailError> {
        let prompts = self.prompt_embeddings().await?;
        let embedding = self.backend.embed_image(image).await?;
        score_embeddings(&embedding, &prompts.positive, &prompts.negative, self.params)
    }

    async fn prompt_embeddings(&self) -> Result<&PromptEmbeddings, ThumbnailError> {
        self.prompts
            .get_or_try_init(|| async {
                let positive = self.backend.embed_texts(&POSITIVE_PROMPTS).await?;
                let negative = self.backend.embed_texts(&NEGATIVE_PROMPTS).await?;
                tracing::debug!(
                    positive = positive.len(),
                    negative = negative.len(),
                    "prompt embeddings cached"
                );
                Ok(PromptEmbeddings { positive, negative })
            })
            .await
    }

    async fn download(&self, url: &str) -> Result<RgbImage, ThumbnailError> {
        let download_error = |source| ThumbnailError::Download {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(download_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ThumbnailError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let bytes = response.bytes().await.map_err(download_error)?;

        let image = image::load_from_memory(&bytes).map_err(|source| ThumbnailError::Decode {
            url: url.to_string(),
            source,
        })?;
        tracing::debug!(url, width = image.width(), height = image.height(), "decoded thumbnail");
        Ok(image.to_rgb8())
    }
}
