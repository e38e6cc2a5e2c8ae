use async_trait::async_trait;
use image::RgbImage;

use crate::error::ThumbnailError;

/// A model that embeds images and texts into one shared vector space.
///
/// Implementations are shared across concurrent scoring calls and must be
/// safe to call from several tasks at once.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    /// Embed one decoded RGB image.
    async fn embed_image(&self, image: &RgbImage) -> Result<Vec<f32>, ThumbnailError>;

    /// Embed `texts`, returning one vector per input in the same order.
    async fn embed_texts(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, ThumbnailError>;
}
