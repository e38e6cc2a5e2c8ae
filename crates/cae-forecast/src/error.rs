use cae_core::{ErrorKind, UnknownIntervalKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("view series is empty")]
    EmptySeries,

    /// Log-normal support is strictly positive.
    #[error("view count at index {index} must be positive, got {value}")]
    NonPositiveValue { index: usize, value: f64 },

    #[error("view count at index {index} must be finite, got {value}")]
    NonFiniteValue { index: usize, value: f64 },

    #[error("confidence level must lie strictly between 0 and 1, got {0}")]
    InvalidConfidence(f64),

    #[error(transparent)]
    InvalidIntervalKind(#[from] UnknownIntervalKind),
}

impl ForecastError {
    /// Every forecast failure is caused by its inputs.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InputValidation
    }
}
