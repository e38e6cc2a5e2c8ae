use thiserror::Error;

/// Coarse classification shared by every crate's error type.
///
/// Callers use this to decide what to do with a failure without matching
/// on each crate's concrete variants: only [`ErrorKind::Upstream`] is worth
/// retrying, everything else is reported as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad caller input: empty series, non-positive values, unknown selector.
    InputValidation,
    /// Platform API, image fetch, media download or transcription source failure.
    Upstream,
    /// Malformed duration token or unparsable classifier output.
    Parse,
    /// Embedding or transcription backend unavailable or failing.
    Model,
}

impl ErrorKind {
    /// Returns `true` when a bounded retry could plausibly succeed.
    #[must_use]
    pub fn is_transient(self) -> bool {
        matches!(self, ErrorKind::Upstream)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::InputValidation => write!(f, "input_validation"),
            ErrorKind::Upstream => write!(f, "upstream"),
            ErrorKind::Parse => write!(f, "parse"),
            ErrorKind::Model => write!(f, "model"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
