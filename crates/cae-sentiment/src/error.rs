use cae_core::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("no texts to score")]
    EmptyInput,
}

impl SentimentError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            SentimentError::EmptyInput => ErrorKind::InputValidation,
        }
    }
}
