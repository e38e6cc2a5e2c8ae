//! Channel-level commands: filtered statistics, comments and the combined report.

use cae_core::{ForecastInterval, IntervalKind, VideoStatRecord};
use cae_sentiment::SentimentError;
use cae_youtube::{ChannelOverview, Comment, StatsCriteria, VideoDetails};
use clap::Args;
use serde::Serialize;
use serde_json::json;

use crate::app::App;
use crate::retry::retry_with_backoff;

/// Recency and duration filters shared by `stats`, `forecast` and `report`.
#[derive(Debug, Clone, Args)]
pub struct StatsArgs {
    /// Maximum number of videos to keep after filtering
    #[arg(long, default_value_t = 10)]
    pub max_results: usize,

    /// Only consider videos published in the last N months (30-day months)
    #[arg(long, default_value_t = 6)]
    pub months: u32,

    /// Skip videos shorter than this many minutes
    #[arg(long, default_value_t = 3.0)]
    pub min_duration: f64,
}

impl From<&StatsArgs> for StatsCriteria {
    fn from(args: &StatsArgs) -> Self {
        Self {
            max_results: args.max_results,
            months: args.months,
            min_duration_minutes: args.min_duration,
        }
    }
}

/// Mean polarity of fetched comments.
///
/// # Errors
///
/// Returns [`SentimentError::EmptyInput`] when there are no comments.
pub(crate) fn score_comments(comments: &[Comment]) -> Result<f32, SentimentError> {
    let texts: Vec<&str> = comments.iter().map(|c| c.text.as_str()).collect();
    cae_sentiment::sentiment(texts)
}

pub(crate) async fn fetch_stats(
    app: &App,
    channel: &str,
    args: &StatsArgs,
) -> anyhow::Result<Vec<VideoStatRecord>> {
    let cache_args = json!({
        "channel": channel,
        "max_results": args.max_results,
        "months": args.months,
        "min_duration": args.min_duration,
    });
    app.cached("stats", cache_args, || load_stats(app, channel, args))
        .await
}

async fn load_stats(
    app: &App,
    channel: &str,
    args: &StatsArgs,
) -> anyhow::Result<Vec<VideoStatRecord>> {
    let youtube = app.youtube()?;
    let criteria = StatsCriteria::from(args);
    let records = retry_with_backoff(
        app.config.max_retries,
        app.config.retry_backoff_base_ms,
        || youtube.fetch_video_statistics(channel, &criteria),
    )
    .await?;
    Ok(records)
}

pub(crate) async fn fetch_comments(
    app: &App,
    video_id: &str,
    max_results: usize,
) -> anyhow::Result<Vec<Comment>> {
    let cache_args = json!({ "video_id": video_id, "max_results": max_results });
    app.cached("comments", cache_args, || {
        load_comments(app, video_id, max_results)
    })
    .await
}

async fn load_comments(
    app: &App,
    video_id: &str,
    max_results: usize,
) -> anyhow::Result<Vec<Comment>> {
    let youtube = app.youtube()?;
    let comments = retry_with_backoff(
        app.config.max_retries,
        app.config.retry_backoff_base_ms,
        || youtube.fetch_comments(video_id, max_results),
    )
    .await?;
    Ok(comments)
}

pub(crate) async fn run_stats(app: &App, channel: &str, args: &StatsArgs) -> anyhow::Result<()> {
    let records = fetch_stats(app, channel, args).await?;
    tracing::info!(channel, videos = records.len(), "channel statistics fetched");
    crate::print_json(&records)
}

pub(crate) async fn run_comments(
    app: &App,
    video_id: &str,
    max_results: usize,
) -> anyhow::Result<()> {
    let comments = fetch_comments(app, video_id, max_results).await?;
    crate::print_json(&comments)
}

async fn load_overview(
    app: &App,
    channel: &str,
    max_videos: usize,
) -> anyhow::Result<ChannelOverview> {
    let youtube = app.youtube()?;
    let overview = retry_with_backoff(
        app.config.max_retries,
        app.config.retry_backoff_base_ms,
        || youtube.channel_overview(channel, max_videos),
    )
    .await?;
    Ok(overview)
}

/// Channel info plus its newest uploads.
pub(crate) async fn run_channel(app: &App, channel: &str, max_videos: usize) -> anyhow::Result<()> {
    let cache_args = json!({ "channel": channel, "max_videos": max_videos });
    let overview = app
        .cached("channel", cache_args, || load_overview(app, channel, max_videos))
        .await?;
    tracing::info!(
        channel_id = %overview.channel.id,
        videos = overview.recent_videos.len(),
        "channel overview fetched"
    );
    crate::print_json(&overview)
}

async fn load_search(
    app: &App,
    channel: &str,
    query: &str,
    max_results: usize,
) -> anyhow::Result<Vec<VideoDetails>> {
    let youtube = app.youtube()?;
    let (retries, backoff) = (app.config.max_retries, app.config.retry_backoff_base_ms);
    let channel_id =
        retry_with_backoff(retries, backoff, || youtube.resolve_channel_id(channel)).await?;
    let videos = retry_with_backoff(retries, backoff, || {
        youtube.search_channel_videos(&channel_id, query, max_results)
    })
    .await?;
    Ok(videos)
}

/// Videos of `channel` matching `query`, most relevant first.
pub(crate) async fn run_search_videos(
    app: &App,
    channel: &str,
    query: &str,
    max_results: usize,
) -> anyhow::Result<()> {
    let cache_args = json!({ "channel": channel, "query": query, "max_results": max_results });
    let videos = app
        .cached("search_videos", cache_args, || {
            load_search(app, channel, query, max_results)
        })
        .await?;
    crate::print_json(&videos)
}

#[derive(Debug, Serialize)]
struct NewestVideo {
    video_id: String,
    comment_sentiment: Option<f32>,
    thumbnail_score: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChannelReport {
    channel: String,
    videos: Vec<VideoStatRecord>,
    forecast: Option<ForecastInterval>,
    newest_video: Option<NewestVideo>,
    errors: Vec<String>,
}

/// Statistics for `channel`, then forecast, newest-video comment sentiment
/// and newest-video thumbnail score computed concurrently.
///
/// Failures of the three derived parts are collected into `errors` instead
/// of failing the report.
pub(crate) async fn run_report(
    app: &App,
    channel: &str,
    args: &StatsArgs,
    confidence: f64,
    max_comments: usize,
) -> anyhow::Result<()> {
    let videos = fetch_stats(app, channel, args).await?;
    let newest = videos.first().map(|v| v.video_id.clone());

    let forecast_part = async {
        cae_forecast::forecast_records(&videos, confidence, IntervalKind::TwoSided)
            .map_err(anyhow::Error::from)
    };
    let (forecast, sentiment, thumbnail) = tokio::join!(
        forecast_part,
        newest_comment_sentiment(app, newest.as_deref(), max_comments),
        newest_thumbnail_score(app, newest.as_deref()),
    );

    let mut errors = Vec::new();
    let mut keep = |part: &str, err: anyhow::Error| {
        tracing::warn!(channel, part, error = %err, "report part failed");
        errors.push(format!("{part}: {err:#}"));
    };
    let forecast = forecast.map_err(|e| keep("forecast", e)).ok();
    let comment_sentiment = sentiment.map_err(|e| keep("sentiment", e)).ok().flatten();
    let thumbnail_score = thumbnail.map_err(|e| keep("thumbnail", e)).ok().flatten();

    let report = ChannelReport {
        channel: channel.to_string(),
        newest_video: newest.map(|video_id| NewestVideo {
            video_id,
            comment_sentiment,
            thumbnail_score,
        }),
        videos,
        forecast,
        errors,
    };
    crate::print_json(&report)
}

async fn newest_comment_sentiment(
    app: &App,
    video_id: Option<&str>,
    max_comments: usize,
) -> anyhow::Result<Option<f32>> {
    let Some(video_id) = video_id else {
        return Ok(None);
    };
    let comments = fetch_comments(app, video_id, max_comments).await?;
    if comments.is_empty() {
        return Ok(None);
    }
    Ok(Some(score_comments(&comments)?))
}

async fn newest_thumbnail_score(app: &App, video_id: Option<&str>) -> anyhow::Result<Option<f32>> {
    match video_id {
        Some(video_id) => Ok(Some(crate::video::video_thumbnail_score(app, video_id).await?)),
        None => Ok(None),
    }
}
