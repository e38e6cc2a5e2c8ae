use std::future::Future;
use std::time::Duration;

use cae_thumbnail::ThumbnailError;
use cae_video::VideoError;
use cae_youtube::YoutubeError;

/// Upper bound on a single back-off sleep.
const MAX_DELAY_MS: u64 = 60_000;

/// Errors that a bounded retry may clear.
pub(crate) trait Transient {
    fn is_transient(&self) -> bool;
}

impl Transient for YoutubeError {
    fn is_transient(&self) -> bool {
        self.is_retriable()
    }
}

impl Transient for ThumbnailError {
    fn is_transient(&self) -> bool {
        match self {
            ThumbnailError::Status { status, .. } => *status == 429 || *status >= 500,
            other => other.kind().is_transient(),
        }
    }
}

impl Transient for VideoError {
    fn is_transient(&self) -> bool {
        match self {
            VideoError::Metadata(e) => e.is_retriable(),
            other => other.kind().is_transient(),
        }
    }
}

/// Delay before retry number `attempt` (1-based), before jitter.
fn backoff_delay_ms(backoff_base_ms: u64, attempt: u32) -> u64 {
    backoff_base_ms
        .saturating_mul(1u64 << attempt.saturating_sub(1).min(10))
        .min(MAX_DELAY_MS)
}

/// Run `operation`, retrying transient failures with exponential back-off.
///
/// The delay doubles from `backoff_base_ms` on each attempt, is capped at
/// 60 s and carries ±25% jitter. Non-transient errors and the error after
/// `max_retries` retries are returned as-is.
pub(crate) async fn retry_with_backoff<T, E, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, E>
where
    E: Transient + std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.is_transient() || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let capped = backoff_delay_ms(backoff_base_ms, attempt);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient upstream error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
