//! Per-video commands: thumbnail attractiveness and full scene/sponsor analysis.

use cae_core::VideoAnalysis;
use serde::Serialize;
use serde_json::json;

use crate::app::App;
use crate::retry::retry_with_backoff;

#[derive(Debug, Serialize)]
struct ThumbnailOutput {
    url: String,
    score: f32,
    /// Set when the score is the `--default-on-error` fallback.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Score the image at `url`, retrying transient download failures.
pub(crate) async fn thumbnail_score(app: &App, url: &str) -> anyhow::Result<f32> {
    app.cached("thumbnail", json!({ "url": url }), || load_thumbnail_score(app, url))
        .await
}

async fn load_thumbnail_score(app: &App, url: &str) -> anyhow::Result<f32> {
    let scorer = app.thumbnail_scorer()?;
    let score = retry_with_backoff(
        app.config.max_retries,
        app.config.retry_backoff_base_ms,
        || scorer.score_thumbnail(url),
    )
    .await?;
    Ok(score)
}

/// Resolve the best thumbnail of `video_id` and score it.
pub(crate) async fn video_thumbnail_score(app: &App, video_id: &str) -> anyhow::Result<f32> {
    let url = thumbnail_url(app, video_id).await?;
    thumbnail_score(app, &url).await
}

async fn thumbnail_url(app: &App, video_id: &str) -> anyhow::Result<String> {
    let youtube = app.youtube()?;
    let details = retry_with_backoff(
        app.config.max_retries,
        app.config.retry_backoff_base_ms,
        || youtube.video_details(video_id),
    )
    .await?;
    details
        .best_thumbnail_url()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("video {video_id} has no thumbnails"))
}

pub(crate) async fn run_thumbnail(
    app: &App,
    url: Option<&str>,
    video_id: Option<&str>,
    default_on_error: Option<f32>,
) -> anyhow::Result<()> {
    let url = match (url, video_id) {
        (Some(url), _) => url.to_string(),
        (None, Some(video_id)) => thumbnail_url(app, video_id).await?,
        (None, None) => anyhow::bail!("either --url or --video is required"),
    };

    let output = match (thumbnail_score(app, &url).await, default_on_error) {
        (Ok(score), _) => ThumbnailOutput {
            url,
            score,
            error: None,
        },
        (Err(e), Some(fallback)) => {
            tracing::warn!(url = %url, error = %e, fallback, "thumbnail scoring failed, using default");
            ThumbnailOutput {
                url,
                score: fallback,
                error: Some(format!("{e:#}")),
            }
        }
        (Err(e), None) => return Err(e),
    };
    crate::print_json(&output)
}

pub(crate) async fn run_analyze(app: &App, video_id: &str) -> anyhow::Result<()> {
    let analysis: VideoAnalysis = app
        .cached("analyze", json!({ "video_id": video_id }), || {
            load_analysis(app, video_id)
        })
        .await?;
    crate::print_json(&analysis)
}

async fn load_analysis(app: &App, video_id: &str) -> anyhow::Result<VideoAnalysis> {
    let analyzer = app.video_analyzer()?;
    let analysis = retry_with_backoff(
        app.config.max_retries,
        app.config.retry_backoff_base_ms,
        || analyzer.analyze_video(video_id),
    )
    .await?;
    Ok(analysis)
}
