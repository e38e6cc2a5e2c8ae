use cae_core::{ForecastInterval, IntervalKind};
use serde::Serialize;

use crate::app::App;
use crate::channel::{fetch_comments, fetch_stats, score_comments, StatsArgs};

#[derive(Debug, Serialize)]
struct ForecastOutput {
    samples: usize,
    confidence_level: f64,
    interval: ForecastInterval,
}

#[derive(Debug, Serialize)]
struct SentimentOutput {
    texts: usize,
    sentiment: f32,
}

/// Forecast from literal view counts, or from a channel's filtered stats.
pub(crate) async fn run_forecast(
    app: &App,
    views: &[f64],
    channel: Option<&str>,
    stats: &StatsArgs,
    confidence: f64,
    kind: IntervalKind,
) -> anyhow::Result<()> {
    let (samples, interval) = if let Some(channel) = channel {
        let records = fetch_stats(app, channel, stats).await?;
        (
            records.len(),
            cae_forecast::forecast_records(&records, confidence, kind)?,
        )
    } else {
        (views.len(), cae_forecast::forecast(views, confidence, kind)?)
    };

    crate::print_json(&ForecastOutput {
        samples,
        confidence_level: confidence,
        interval,
    })
}

/// Sentiment of literal texts, or of a video's most recent comments.
pub(crate) async fn run_sentiment(
    app: &App,
    texts: &[String],
    video_id: Option<&str>,
    max_comments: usize,
) -> anyhow::Result<()> {
    let (count, sentiment) = if let Some(video_id) = video_id {
        let comments = fetch_comments(app, video_id, max_comments).await?;
        (comments.len(), score_comments(&comments)?)
    } else {
        (texts.len(), cae_sentiment::sentiment(texts)?)
    };

    crate::print_json(&SentimentOutput {
        texts: count,
        sentiment,
    })
}
