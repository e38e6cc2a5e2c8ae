mod analytics;
mod app;
mod cache;
mod channel;
mod retry;
mod video;

use cae_core::IntervalKind;
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::channel::StatsArgs;

#[derive(Debug, Parser)]
#[command(name = "cae")]
#[command(about = "Creator analytics: forecasts, sentiment, thumbnails and scene analysis")]
struct Cli {
    /// Skip the result cache for this invocation
    #[arg(long, global = true)]
    no_cache: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Forecast interval for future view counts
    Forecast {
        /// Historical view counts
        #[arg(required_unless_present = "channel", allow_negative_numbers = true)]
        views: Vec<f64>,

        /// Use the filtered recent videos of this channel instead
        #[arg(long, conflicts_with = "views")]
        channel: Option<String>,

        #[command(flatten)]
        stats: StatsArgs,

        /// Probability mass covered by the interval, in (0, 1)
        #[arg(long, default_value_t = 0.9)]
        confidence: f64,

        /// lower, upper or two-sided
        #[arg(long, default_value = "two-sided")]
        kind: IntervalKind,
    },
    /// Mean sentiment polarity of texts or of a video's comments
    Sentiment {
        /// Texts to score
        #[arg(required_unless_present = "video")]
        texts: Vec<String>,

        /// Score this video's most recent comments instead
        #[arg(long, conflicts_with = "texts")]
        video: Option<String>,

        #[arg(long, default_value_t = 100)]
        max_comments: usize,
    },
    /// Attractiveness score of a thumbnail image
    Thumbnail {
        /// Image URL
        #[arg(long, required_unless_present = "video")]
        url: Option<String>,

        /// Score the best thumbnail of this video instead
        #[arg(long, conflicts_with = "url")]
        video: Option<String>,

        /// Report this score instead of failing when scoring fails
        #[arg(long)]
        default_on_error: Option<f32>,
    },
    /// Filtered statistics of a channel's recent videos
    Stats {
        /// Channel id, @handle, channel URL or search term
        channel: String,

        #[command(flatten)]
        stats: StatsArgs,
    },
    /// Channel info and its newest uploads
    Channel {
        /// Channel id, @handle, channel URL or search term
        channel: String,

        #[arg(long, default_value_t = 10)]
        max_videos: usize,
    },
    /// Search one channel's videos by text
    SearchVideos {
        /// Channel id, @handle, channel URL or search term
        channel: String,

        query: String,

        #[arg(long, default_value_t = 10)]
        max_results: usize,
    },
    /// Most recent comments of a video
    Comments {
        video_id: String,

        #[arg(long, default_value_t = 100)]
        max_results: usize,
    },
    /// Transcribe a video and build its scene map and sponsor list
    Analyze { video_id: String },
    /// Channel stats plus forecast, newest-video sentiment and thumbnail score
    Report {
        channel: String,

        #[command(flatten)]
        stats: StatsArgs,

        #[arg(long, default_value_t = 0.9)]
        confidence: f64,

        #[arg(long, default_value_t = 100)]
        max_comments: usize,
    },
    /// Manage the result cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Debug, Subcommand)]
enum CacheCommands {
    /// Remove expired entries and evict beyond the size limit
    Prune,
    /// Remove every entry
    Clear,
}

/// Write `value` to stdout as pretty JSON.
pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cae_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(env = %config.env, no_cache = cli.no_cache, "starting cae");
    let app = App::new(config, !cli.no_cache);

    match cli.command {
        Commands::Forecast {
            views,
            channel,
            stats,
            confidence,
            kind,
        } => {
            analytics::run_forecast(&app, &views, channel.as_deref(), &stats, confidence, kind)
                .await?;
        }
        Commands::Sentiment {
            texts,
            video,
            max_comments,
        } => analytics::run_sentiment(&app, &texts, video.as_deref(), max_comments).await?,
        Commands::Thumbnail {
            url,
            video: video_id,
            default_on_error,
        } => {
            video::run_thumbnail(&app, url.as_deref(), video_id.as_deref(), default_on_error)
                .await?;
        }
        Commands::Stats { channel, stats } => channel::run_stats(&app, &channel, &stats).await?,
        Commands::Channel {
            channel,
            max_videos,
        } => channel::run_channel(&app, &channel, max_videos).await?,
        Commands::SearchVideos {
            channel,
            query,
            max_results,
        } => channel::run_search_videos(&app, &channel, &query, max_results).await?,
        Commands::Comments {
            video_id,
            max_results,
        } => channel::run_comments(&app, &video_id, max_results).await?,
        Commands::Analyze { video_id } => video::run_analyze(&app, &video_id).await?,
        Commands::Report {
            channel,
            stats,
            confidence,
            max_comments,
        } => channel::run_report(&app, &channel, &stats, confidence, max_comments).await?,
        Commands::Cache { command } => {
            let cache = app.cache_store();
            match command {
                CacheCommands::Prune => print_json(&cache.prune(Utc::now())?)?,
                CacheCommands::Clear => {
                    let removed = cache.clear()?;
                    print_json(&serde_json::json!({
                        "dir": cache.dir().display().to_string(),
                        "removed": removed,
                    }))?;
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
