//! Shared command context: configuration, collaborator construction and the
//! cache-then-compute wrapper every cached command goes through.

use std::future::Future;

use cae_core::AppConfig;
use cae_thumbnail::{ClipClient, ScoringParams, ThumbnailScorer};
use cae_video::{ChatClassifier, VideoAnalyzer, YtDlpWhisperTranscriber};
use cae_youtube::YoutubeClient;
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};

use crate::cache::ResultCache;

pub(crate) type Analyzer = VideoAnalyzer<YtDlpWhisperTranscriber, YoutubeClient, ChatClassifier>;

pub(crate) struct App {
    pub config: AppConfig,
    cache: Option<ResultCache>,
}

impl App {
    pub(crate) fn new(config: AppConfig, use_cache: bool) -> Self {
        let cache = use_cache.then(|| {
            ResultCache::new(
                config.cache_dir.clone(),
                config.cache_ttl_secs,
                config.cache_max_entries,
            )
        });
        Self { config, cache }
    }

    /// The result cache, even when `--no-cache` disabled lookups.
    pub(crate) fn cache_store(&self) -> ResultCache {
        ResultCache::new(
            self.config.cache_dir.clone(),
            self.config.cache_ttl_secs,
            self.config.cache_max_entries,
        )
    }

    /// Platform API client.
    ///
    /// # Errors
    ///
    /// Returns an error if `YOUTUBE_API_KEY` is unset or the client cannot be built.
    pub(crate) fn youtube(&self) -> anyhow::Result<YoutubeClient> {
        let api_key = self
            .config
            .youtube_api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("YOUTUBE_API_KEY is not set"))?;
        Ok(YoutubeClient::with_base_url(
            api_key,
            self.config.http_timeout_secs,
            &self.config.user_agent,
            &self.config.youtube_base_url,
        )?)
    }

    pub(crate) fn thumbnail_scorer(&self) -> anyhow::Result<ThumbnailScorer<ClipClient>> {
        let backend = ClipClient::new(&self.config.embedding_url, self.config.http_timeout_secs)?;
        let params = ScoringParams {
            temperature: self.config.clip_temperature,
            scale: self.config.clip_scale,
        };
        Ok(ThumbnailScorer::new(
            backend,
            params,
            self.config.thumbnail_timeout_secs,
            &self.config.user_agent,
        )?)
    }

    pub(crate) fn video_analyzer(&self) -> anyhow::Result<Analyzer> {
        let transcriber = YtDlpWhisperTranscriber::new(
            &self.config.ytdlp_path,
            &self.config.whisper_url,
            self.config.whisper_max_concurrent,
            self.config.http_timeout_secs,
        )?;
        let classifier = ChatClassifier::new(
            &self.config.llm_base_url,
            self.config.llm_api_key.clone(),
            &self.config.llm_model,
            self.config.http_timeout_secs,
        )?;
        Ok(VideoAnalyzer::new(transcriber, self.youtube()?, classifier))
    }

    /// Return the cached result of `operation(args)` or compute and store it.
    ///
    /// A failed cache write is logged and does not fail the command.
    pub(crate) async fn cached<T, F, Fut>(
        &self,
        operation: &str,
        args: serde_json::Value,
        compute: F,
    ) -> anyhow::Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let Some(cache) = &self.cache else {
            return compute().await;
        };
        if let Some(hit) = cache.get(operation, &args, Utc::now()) {
            return Ok(hit);
        }

        let value = compute().await?;
        if let Err(e) = cache.put(operation, &args, &value, Utc::now()) {
            tracing::warn!(operation, error = %e, "failed to store cache entry");
        }
        Ok(value)
    }
}
