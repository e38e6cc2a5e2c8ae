//! HTTP client for a CLIP-family embedding service.
//!
//! Endpoints:
//! - `GET /info` returns `{"model_id": ..., "dim": ...}` once the model is loaded
//! - `POST /embed` with `{"inputs": [text, ...]}` returns one vector per text
//! - `POST /embed_image` with `{"inputs": [base64_png]}` returns one vector
//!
//! Model info is fetched once per client; later calls reuse the cached info.

use std::io::Cursor;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbImage};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use crate::backend::EmbeddingBackend;
use crate::error::ThumbnailError;

/// Side length of the square input the vision tower expects.
pub const CLIP_INPUT_SIZE: u32 = 224;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelInfo {
    pub model_id: String,
    /// Embedding dimension, when the service reports it.
    #[serde(default)]
    pub dim: Option<usize>,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a [&'a str],
}

#[derive(Serialize)]
struct EmbedImageRequest {
    inputs: Vec<String>,
}

pub struct ClipClient {
    client: reqwest::Client,
    base_url: String,
    info: OnceCell<ModelInfo>,
}

impl ClipClient {
    /// Create a client for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ThumbnailError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ThumbnailError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            info: OnceCell::new(),
        })
    }

    /// Model metadata, loaded from `GET /info` on first use.
    ///
    /// Concurrent first callers share a single info request. A failed
    /// request is not cached, so the next call retries.
    ///
    /// # Errors
    ///
    /// Returns [`ThumbnailError::Model`] if the service is unreachable or
    /// reports a non-2xx status.
    pub async fn model_info(&self) -> Result<&ModelInfo, ThumbnailError> {
        self.info
            .get_or_try_init(|| async {
                let url = format!("{}/info", self.base_url);
                let response = self
                    .client
                    .get(&url)
                    .send()
                    .await
                    .map_err(|e| ThumbnailError::Model(format!("{url}: {e}")))?;
                if !response.status().is_success() {
                    return Err(ThumbnailError::Model(format!(
                        "{url} returned status {}",
                        response.status()
                    )));
                }
                let info: ModelInfo = response.json().await.map_err(|e| {
                    ThumbnailError::Model(format!("{url}: invalid info payload: {e}"))
                })?;
                tracing::info!(model_id = %info.model_id, dim = ?info.dim, "embedding model loaded");
                Ok(info)
            })
            .await
    }

    async fn post_embed<T: Serialize + Sync>(
        &self,
        endpoint: &str,
        body: &T,
        expected: usize,
    ) -> Result<Vec<Vec<f32>>, ThumbnailError> {
        let info = self.model_info().await?;
        let url = format!("{}/{endpoint}", self.base_url);
        let embedding_error = |message: String| ThumbnailError::Embedding {
            context: url.clone(),
            message,
        };

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| embedding_error(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(embedding_error(format!(
                "service returned status {}",
                response.status()
            )));
        }

        let vectors: Vec<Vec<f32>> = response
            .json()
            .await
            .map_err(|e| embedding_error(format!("response parse error: {e}")))?;

        if vectors.len() != expected {
            return Err(embedding_error(format!(
                "returned {} embeddings for {expected} inputs",
                vectors.len()
            )));
        }
        if let Some(dim) = info.dim {
            if let Some(bad) = vectors.iter().find(|v| v.len() != dim) {
                return Err(embedding_error(format!(
                    "expected dimension {dim}, got {}",
                    bad.len()
                )));
            }
        }

        Ok(vectors)
    }
}

/// Resize to the model's input size and encode as base64 PNG.
pub(crate) fn encode_for_model(image: &RgbImage) -> Result<String, ThumbnailError> {
    let resized = image::imageops::resize(
        image,
        CLIP_INPUT_SIZE,
        CLIP_INPUT_SIZE,
        FilterType::Triangle,
    );
    let mut png = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(resized)
        .write_to(&mut png, ImageFormat::Png)
        .map_err(|e| ThumbnailError::Embedding {
            context: "image encoding".to_string(),
            message: e.to_string(),
        })?;
    Ok(STANDARD.encode(png.into_inner()))
}

#[async_trait]
impl EmbeddingBackend for ClipClient {
    async fn embed_image(&self, image: &RgbImage) -> Result<Vec<f32>, ThumbnailError> {
        let request = EmbedImageRequest {
            inputs: vec![encode_for_model(image)?],
        };
        let mut vectors = self.post_embed("embed_image", &request, 1).await?;
        vectors.pop().ok_or_else(|| ThumbnailError::Embedding {
            context: "embed_image".to_string(),
            message: "empty response".to_string(),
        })
    }

    async fn embed_texts(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, ThumbnailError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.post_embed("embed", &EmbedRequest { inputs: texts }, texts.len())
            .await
    }
}
