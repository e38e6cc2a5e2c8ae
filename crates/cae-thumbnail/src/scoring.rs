//! Similarity math between an image embedding and the prompt sets.

use crate::error::ThumbnailError;

pub const POSITIVE_PROMPTS: [&str; 5] = [
    "eye-catching thumbnail",
    "bold, vibrant colors",
    "clear, readable text",
    "prominent faces",
    "professional design",
];

pub const NEGATIVE_PROMPTS: [&str; 5] = [
    "blurry or out of focus",
    "dark or underexposed",
    "dull colors",
    "small or unreadable text",
    "cluttered layout",
];

/// Contrast controls for [`score_embeddings`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringParams {
    /// Cosine similarities are divided by this before averaging.
    pub temperature: f32,
    /// Multiplier applied to the similarity gap inside the sigmoid.
    pub scale: f32,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            temperature: 0.07,
            scale: 5.0,
        }
    }
}

fn l2_normalize(v: &[f32]) -> Vec<f32> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm == 0.0 {
        return v.to_vec();
    }
    v.iter().map(|x| x / norm).collect()
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

fn mean_similarity(
    image: &[f32],
    prompts: &[Vec<f32>],
    temperature: f32,
    label: &str,
) -> Result<f32, ThumbnailError> {
    if prompts.is_empty() {
        return Err(ThumbnailError::Embedding {
            context: label.to_string(),
            message: "no prompt embeddings".to_string(),
        });
    }

    let mut total = 0.0_f32;
    for prompt in prompts {
        if prompt.len() != image.len() {
            return Err(ThumbnailError::Embedding {
                context: label.to_string(),
                message: format!(
                    "dimension mismatch: image has {}, prompt has {}",
                    image.len(),
                    prompt.len()
                ),
            });
        }
        total += dot(image, &l2_normalize(prompt)) / temperature;
    }
    #[allow(clippy::cast_precision_loss)]
    let mean = total / prompts.len() as f32;
    Ok(mean)
}

/// Attractiveness score in `(0, 1)` from raw (unnormalized) embeddings.
///
/// `sigmoid(scale * (mean_pos - mean_neg))`, where each mean is taken over
/// cosine similarities divided by `temperature`.
///
/// # Errors
///
/// Returns [`ThumbnailError::Embedding`] if a prompt set is empty or any
/// prompt's dimension differs from the image's.
pub fn score_embeddings(
    image: &[f32],
    positive: &[Vec<f32>],
    negative: &[Vec<f32>],
    params: ScoringParams,
) -> Result<f32, ThumbnailError> {
    let image = l2_normalize(image);
    let pos = mean_similarity(&image, positive, params.temperature, "positive prompts")?;
    let neg = mean_similarity(&image, negative, params.temperature, "negative prompts")?;
    Ok(sigmoid(params.scale * (pos - neg)))
}
