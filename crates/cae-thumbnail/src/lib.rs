//! Thumbnail attractiveness scoring against a vision-language embedding model.
//!
//! An image is compared with fixed positive and negative visual-quality
//! prompts in a shared embedding space. The temperature-scaled similarity
//! gap is squashed through a scaled sigmoid into a score in `(0, 1)`.

pub mod backend;
pub mod clip;
pub mod error;
pub mod scorer;
pub mod scoring;

pub use backend::EmbeddingBackend;
pub use clip::{ClipClient, ModelInfo};
pub use error::ThumbnailError;
pub use scorer::ThumbnailScorer;
pub use scoring::{score_embeddings, ScoringParams, NEGATIVE_PROMPTS, POSITIVE_PROMPTS};
