//! Recency and minimum-duration filtering of raw video items.

use cae_core::VideoStatRecord;
use chrono::{DateTime, Duration, Utc};

use crate::duration::parse_duration_minutes;
use crate::error::YoutubeError;
use crate::types::VideoItem;

/// A "month" in the recency window is a fixed 30 days.
const DAYS_PER_MONTH: i64 = 30;

/// Selection rules for [`filter_video_stats`].
#[derive(Debug, Clone, PartialEq)]
pub struct StatsCriteria {
    /// Stop once this many records pass the filter.
    pub max_results: usize,
    /// Only keep videos published within `months * 30` days of `now`.
    pub months: u32,
    /// Only keep videos at least this long.
    pub min_duration_minutes: f64,
}

impl Default for StatsCriteria {
    fn default() -> Self {
        Self {
            max_results: 10,
            months: 6,
            min_duration_minutes: 3.0,
        }
    }
}

impl StatsCriteria {
    /// Oldest publish time still inside the window.
    ///
    /// A window reaching past the representable range keeps everything.
    #[must_use]
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        DAYS_PER_MONTH
            .checked_mul(i64::from(self.months))
            .and_then(Duration::try_days)
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Convert raw items into [`VideoStatRecord`]s that satisfy `criteria`.
///
/// Upstream order is preserved and iteration stops as soon as
/// `criteria.max_results` records have passed. An empty result is not an
/// error.
///
/// # Errors
///
/// Returns [`YoutubeError::Duration`] or [`YoutubeError::Timestamp`] when an
/// item examined before the limit is reached cannot be parsed; such a record
/// can't be filtered correctly, so the whole batch fails.
pub fn filter_video_stats(
    items: &[VideoItem],
    criteria: &StatsCriteria,
    now: DateTime<Utc>,
) -> Result<Vec<VideoStatRecord>, YoutubeError> {
    let cutoff = criteria.cutoff(now);
    let mut records = Vec::with_capacity(criteria.max_results.min(items.len()));

    for item in items {
        if records.len() >= criteria.max_results {
            break;
        }

        let published_at = DateTime::parse_from_rfc3339(&item.snippet.published_at)
            .map_err(|_| YoutubeError::Timestamp {
                video_id: item.id.clone(),
                value: item.snippet.published_at.clone(),
            })?
            .with_timezone(&Utc);

        let duration_minutes = parse_duration_minutes(&item.content_details.duration).map_err(
            |source| YoutubeError::Duration {
                video_id: item.id.clone(),
                source,
            },
        )?;

        if published_at < cutoff || duration_minutes < criteria.min_duration_minutes {
            tracing::debug!(
                video_id = %item.id,
                %published_at,
                duration_minutes,
                "video excluded by stats filter"
            );
            continue;
        }

        records.push(VideoStatRecord {
            video_id: item.id.clone(),
            view_count: item.statistics.view_count,
            like_count: item.statistics.like_count,
            comment_count: item.statistics.comment_count,
            favorite_count: item.statistics.favorite_count,
            duration_minutes,
            published_at,
        });
    }

    Ok(records)
}
