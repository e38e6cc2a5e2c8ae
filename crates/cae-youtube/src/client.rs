//! HTTP client for the `YouTube` Data API v3.
//!
//! Wraps `reqwest` with API-key handling, typed response deserialization and
//! error-envelope decoding. Non-2xx responses surface as
//! [`YoutubeError::Api`] carrying the endpoint and identifier that failed.

use std::collections::HashMap;
use std::time::Duration;

use cae_core::VideoStatRecord;
use chrono::Utc;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::YoutubeError;
use crate::filter::{filter_video_stats, StatsCriteria};
use crate::identifier::ChannelIdentifier;
use crate::types::{
    ChannelInfo, ChannelItem, ChannelOverview, ChannelSummary, Comment, CommentThread, ErrorEnvelope,
    ListResponse, PlaylistItem, SearchItem, VideoDetails, VideoItem,
};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/";

/// Upper bound of `maxResults` for playlist and video listings.
const MAX_PAGE_SIZE: usize = 50;

/// Upper bound of `maxResults` for comment threads.
const MAX_COMMENT_PAGE_SIZE: usize = 100;

/// Client for the `YouTube` Data API.
///
/// Use [`YoutubeClient::new`] for production or
/// [`YoutubeClient::with_base_url`] to point at a mock server in tests.
pub struct YoutubeClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl YoutubeClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, YoutubeError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`YoutubeError::InvalidInput`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, YoutubeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so endpoint names append as a path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        Url::parse(&normalised).map_err(|e| {
            YoutubeError::InvalidInput(format!("invalid base URL '{base_url}': {e}"))
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url: normalised,
        })
    }

    /// Resolves a channel id, `@handle` or channel URL to a canonical channel id.
    ///
    /// Canonical ids are returned without an API call; everything else goes
    /// through a one-result channel search.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::InvalidInput`] for a blank identifier.
    /// - [`YoutubeError::ChannelNotFound`] when the search has no match.
    /// - [`YoutubeError::Api`] / [`YoutubeError::Http`] on request failure.
    pub async fn resolve_channel_id(&self, identifier: &str) -> Result<String, YoutubeError> {
        match ChannelIdentifier::parse(identifier)? {
            ChannelIdentifier::ChannelId(id) => Ok(id),
            ChannelIdentifier::Query(query) => {
                let mut found = self.search_channels(&query, 1).await?;
                if found.is_empty() {
                    return Err(YoutubeError::ChannelNotFound(query));
                }
                let channel = found.swap_remove(0);
                tracing::debug!(query = %query, channel_id = %channel.channel_id, "resolved channel");
                Ok(channel.channel_id)
            }
        }
    }

    /// Searches channels by free text.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Api`] / [`YoutubeError::Http`] on request
    /// failure and [`YoutubeError::Deserialize`] on an unexpected shape.
    pub async fn search_channels(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<ChannelSummary>, YoutubeError> {
        let max = max_results.to_string();
        let response: ListResponse<SearchItem> = self
            .get_json(
                "search",
                &[
                    ("part", "snippet"),
                    ("q", query),
                    ("type", "channel"),
                    ("maxResults", &max),
                ],
            )
            .await?;

        Ok(response
            .items
            .into_iter()
            .filter_map(|item| {
                let channel_id = item.id.channel_id?;
                let snippet = item.snippet;
                Some(ChannelSummary {
                    channel_id,
                    title: snippet.as_ref().map(|s| s.title.clone()).unwrap_or_default(),
                    description: snippet
                        .as_ref()
                        .map(|s| s.description.clone())
                        .unwrap_or_default(),
                    thumbnails: snippet.map(|s| s.thumbnails).unwrap_or_default(),
                })
            })
            .collect())
    }

    /// Fetches title, description and headline counters for a channel.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::ChannelNotFound`] for an unknown id, otherwise
    /// the same request errors as [`Self::search_channels`].
    pub async fn channel_info(&self, channel_id: &str) -> Result<ChannelInfo, YoutubeError> {
        let response: ListResponse<ChannelItem> = self
            .get_json(
                "channels",
                &[("part", "snippet,statistics"), ("id", channel_id)],
            )
            .await?;

        let channel = response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| YoutubeError::ChannelNotFound(channel_id.to_string()))?;
        let snippet = channel.snippet;
        let statistics = channel.statistics.unwrap_or_default();

        Ok(ChannelInfo {
            id: channel.id,
            title: snippet.as_ref().map(|s| s.title.clone()).unwrap_or_default(),
            description: snippet
                .as_ref()
                .map(|s| s.description.clone())
                .unwrap_or_default(),
            subscriber_count: statistics.subscriber_count,
            view_count: statistics.view_count,
            video_count: statistics.video_count,
            thumbnails: snippet.map(|s| s.thumbnails).unwrap_or_default(),
        })
    }

    /// Returns the id of the channel's uploads playlist.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::ChannelNotFound`] when the channel does not
    /// exist or exposes no uploads playlist.
    pub async fn uploads_playlist_id(&self, channel_id: &str) -> Result<String, YoutubeError> {
        let response: ListResponse<ChannelItem> = self
            .get_json("channels", &[("part", "contentDetails"), ("id", channel_id)])
            .await?;

        response
            .items
            .into_iter()
            .next()
            .and_then(|c| c.content_details)
            .map(|d| d.related_playlists.uploads)
            .ok_or_else(|| YoutubeError::ChannelNotFound(channel_id.to_string()))
    }

    /// Lists up to `max_results` (capped at 50) video ids from one playlist page.
    ///
    /// # Errors
    ///
    /// Returns request or deserialization errors.
    pub async fn playlist_video_ids(
        &self,
        playlist_id: &str,
        max_results: usize,
    ) -> Result<Vec<String>, YoutubeError> {
        let max = max_results.clamp(1, MAX_PAGE_SIZE).to_string();
        let response: ListResponse<PlaylistItem> = self
            .get_json(
                "playlistItems",
                &[
                    ("part", "contentDetails"),
                    ("playlistId", playlist_id),
                    ("maxResults", &max),
                ],
            )
            .await?;

        Ok(response
            .items
            .into_iter()
            .map(|item| item.content_details.video_id)
            .collect())
    }

    /// Hydrates snippet, statistics and content details for `ids`.
    ///
    /// Ids are sent in batches of 50 (one round trip for a single upstream
    /// page). The result follows the order of `ids`; ids the API does not
    /// return are skipped.
    ///
    /// # Errors
    ///
    /// Returns request or deserialization errors.
    pub async fn videos(&self, ids: &[String]) -> Result<Vec<VideoItem>, YoutubeError> {
        let mut by_id: HashMap<String, VideoItem> = HashMap::with_capacity(ids.len());

        for batch in ids.chunks(MAX_PAGE_SIZE) {
            let joined = batch.join(",");
            let response: ListResponse<VideoItem> = self
                .get_json(
                    "videos",
                    &[("part", "snippet,statistics,contentDetails"), ("id", &joined)],
                )
                .await?;
            by_id.extend(response.items.into_iter().map(|v| (v.id.clone(), v)));
        }

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    /// Fetches metadata and counters for a single video.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::VideoNotFound`] when the id is unknown.
    pub async fn video_details(&self, video_id: &str) -> Result<VideoDetails, YoutubeError> {
        self.videos(&[video_id.to_string()])
            .await?
            .into_iter()
            .next()
            .map(VideoDetails::from)
            .ok_or_else(|| YoutubeError::VideoNotFound(video_id.to_string()))
    }

    /// Fetches the newest uploads of a channel with full details.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::ChannelNotFound`] or request errors.
    pub async fn recent_videos(
        &self,
        channel_id: &str,
        max_results: usize,
    ) -> Result<Vec<VideoDetails>, YoutubeError> {
        let playlist = self.uploads_playlist_id(channel_id).await?;
        let ids = self.playlist_video_ids(&playlist, max_results).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .videos(&ids)
            .await?
            .into_iter()
            .map(VideoDetails::from)
            .collect())
    }

    /// Resolves `identifier` and fetches the channel's info and newest
    /// `max_videos` uploads.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::resolve_channel_id`],
    /// [`Self::channel_info`] and [`Self::recent_videos`].
    pub async fn channel_overview(
        &self,
        identifier: &str,
        max_videos: usize,
    ) -> Result<ChannelOverview, YoutubeError> {
        let channel_id = self.resolve_channel_id(identifier).await?;
        let channel = self.channel_info(&channel_id).await?;
        let recent_videos = self.recent_videos(&channel_id, max_videos).await?;
        Ok(ChannelOverview {
            channel,
            recent_videos,
        })
    }

    /// Searches one channel's videos by free text, most relevant first.
    ///
    /// Matches are hydrated through [`Self::videos`], so the result carries
    /// the same counters as [`Self::recent_videos`] and keeps search order.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::InvalidInput`] for a blank query, otherwise
    /// request or deserialization errors.
    pub async fn search_channel_videos(
        &self,
        channel_id: &str,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<VideoDetails>, YoutubeError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(YoutubeError::InvalidInput(
                "search query must not be empty".to_string(),
            ));
        }
        let max = max_results.clamp(1, MAX_PAGE_SIZE).to_string();
        let response: ListResponse<SearchItem> = self
            .get_json(
                "search",
                &[
                    ("part", "snippet"),
                    ("channelId", channel_id),
                    ("q", query),
                    ("type", "video"),
                    ("order", "relevance"),
                    ("maxResults", &max),
                ],
            )
            .await?;

        let ids: Vec<String> = response
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect();
        tracing::debug!(channel_id, query, matches = ids.len(), "searched channel videos");
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .videos(&ids)
            .await?
            .into_iter()
            .map(VideoDetails::from)
            .collect())
    }

    /// Pages through top-level comments, newest first, until `max_results`
    /// comments are collected or the thread list is exhausted.
    ///
    /// Threads missing an id or text are skipped.
    ///
    /// # Errors
    ///
    /// Returns request or deserialization errors from any page.
    pub async fn fetch_comments(
        &self,
        video_id: &str,
        max_results: usize,
    ) -> Result<Vec<Comment>, YoutubeError> {
        let mut comments = Vec::with_capacity(max_results.min(MAX_COMMENT_PAGE_SIZE));
        let mut page_token: Option<String> = None;

        while comments.len() < max_results {
            let batch = (max_results - comments.len()).min(MAX_COMMENT_PAGE_SIZE).to_string();
            let mut params = vec![
                ("part", "snippet"),
                ("videoId", video_id),
                ("maxResults", batch.as_str()),
                ("order", "time"),
            ];
            if let Some(token) = page_token.as_deref() {
                params.push(("pageToken", token));
            }

            let response: ListResponse<CommentThread> =
                self.get_json("commentThreads", &params).await?;

            comments.extend(
                response
                    .items
                    .into_iter()
                    .filter_map(|t| t.snippet?.top_level_comment?.into_comment()),
            );

            match response.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        comments.truncate(max_results);
        tracing::debug!(video_id, count = comments.len(), "fetched comments");
        Ok(comments)
    }

    /// Per-video statistics for a channel, filtered by recency and duration.
    ///
    /// Resolves the channel, lists one page (at most 50) of its uploads,
    /// hydrates all of them in one `videos.list` call, then filters and
    /// truncates to `criteria.max_results` in upstream order.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::ChannelNotFound`] when the channel can't be resolved.
    /// - [`YoutubeError::Api`] / [`YoutubeError::Http`] on request failure.
    /// - [`YoutubeError::Duration`] / [`YoutubeError::Timestamp`] for
    ///   unparsable items.
    ///
    /// A channel with no matching videos yields `Ok(vec![])`.
    pub async fn fetch_video_statistics(
        &self,
        channel: &str,
        criteria: &StatsCriteria,
    ) -> Result<Vec<VideoStatRecord>, YoutubeError> {
        let channel_id = self.resolve_channel_id(channel).await?;
        let playlist = self.uploads_playlist_id(&channel_id).await?;
        let ids = self.playlist_video_ids(&playlist, MAX_PAGE_SIZE).await?;

        if ids.is_empty() {
            tracing::info!(channel_id = %channel_id, "channel has no uploads");
            return Ok(Vec::new());
        }

        let items = self.videos(&ids).await?;
        let records = filter_video_stats(&items, criteria, Utc::now())?;

        tracing::info!(
            channel_id = %channel_id,
            fetched = items.len(),
            kept = records.len(),
            "video statistics collected"
        );
        Ok(records)
    }

    /// Builds the request URL with percent-encoded query parameters and the API key.
    fn build_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, YoutubeError> {
        let mut url = Url::parse(&format!("{}{endpoint}", self.base_url))
            .map_err(|e| YoutubeError::InvalidInput(format!("invalid endpoint '{endpoint}': {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    /// `endpoint(k=v, ...)` without the API key, for error messages.
    fn context(endpoint: &str, params: &[(&str, &str)]) -> String {
        let args: Vec<String> = params
            .iter()
            .filter(|(k, _)| *k != "part")
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        format!("{endpoint}({})", args.join(", "))
    }

    /// Sends a GET request and decodes either the payload or the error envelope.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, YoutubeError> {
        let url = self.build_url(endpoint, params)?;
        let context = Self::context(endpoint, params);
        tracing::debug!(request = %context, "YouTube API request");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| body.chars().take(200).collect());
            return Err(YoutubeError::Api {
                context,
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|source| YoutubeError::Deserialize { context, source })
    }
}
