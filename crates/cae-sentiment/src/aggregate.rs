use crate::error::SentimentError;
use crate::scorer::polarity;

/// One or more texts to score together.
///
/// A single string converts to a one-element sequence, so `sentiment("x")`
/// and `sentiment(&["x"][..])` give the same result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Texts<'a>(Vec<&'a str>);

impl Texts<'_> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> From<&'a str> for Texts<'a> {
    fn from(text: &'a str) -> Self {
        Self(vec![text])
    }
}

impl<'a> From<&'a String> for Texts<'a> {
    fn from(text: &'a String) -> Self {
        Self(vec![text.as_str()])
    }
}

impl<'a> From<&'a [&'a str]> for Texts<'a> {
    fn from(texts: &'a [&'a str]) -> Self {
        Self(texts.to_vec())
    }
}

impl<'a> From<&'a [String]> for Texts<'a> {
    fn from(texts: &'a [String]) -> Self {
        Self(texts.iter().map(String::as_str).collect())
    }
}

impl<'a> From<&'a Vec<String>> for Texts<'a> {
    fn from(texts: &'a Vec<String>) -> Self {
        Self::from(texts.as_slice())
    }
}

impl<'a> From<Vec<&'a str>> for Texts<'a> {
    fn from(texts: Vec<&'a str>) -> Self {
        Self(texts)
    }
}

/// Mean polarity across `texts`.
///
/// Empty strings are valid members and score `0.0`.
///
/// # Errors
///
/// Returns [`SentimentError::EmptyInput`] when the sequence has no elements.
pub fn sentiment<'a>(texts: impl Into<Texts<'a>>) -> Result<f32, SentimentError> {
    let texts = texts.into();
    if texts.is_empty() {
        return Err(SentimentError::EmptyInput);
    }

    let total: f32 = texts.0.iter().map(|t| polarity(t)).sum();
    #[allow(clippy::cast_precision_loss)]
    let mean = total / texts.len() as f32;

    tracing::debug!(texts = texts.len(), score = mean, "aggregated sentiment");
    Ok(mean)
}
