//! Wire types for the `YouTube` Data API v3 and the shapes returned to callers.
//!
//! The API encodes every counter as a decimal string; [`de_count`] accepts
//! either a string or a number and treats missing counters as zero.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Generic `{ "items": [...], "nextPageToken": ... }` list envelope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

pub(crate) fn de_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(0),
        Some(Raw::Number(n)) => Ok(n),
        Some(Raw::Text(s)) => s
            .parse::<u64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid counter \"{s}\": {e}"))),
    }
}

// ---------------------------------------------------------------------------
// videos.list
// ---------------------------------------------------------------------------

/// Raw `videos.list` item with `snippet,statistics,contentDetails` parts.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub id: String,
    pub snippet: VideoSnippet,
    #[serde(default)]
    pub statistics: VideoStatistics,
    pub content_details: VideoContentDetails,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub published_at: String,
    #[serde(default)]
    pub thumbnails: BTreeMap<String, Thumbnail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    #[serde(default, deserialize_with = "de_count")]
    pub view_count: u64,
    #[serde(default, deserialize_with = "de_count")]
    pub like_count: u64,
    #[serde(default, deserialize_with = "de_count")]
    pub comment_count: u64,
    #[serde(default, deserialize_with = "de_count")]
    pub favorite_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoContentDetails {
    pub duration: String,
}

/// Video metadata plus counters, as handed to downstream analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetails {
    pub id: String,
    pub title: String,
    pub description: String,
    pub published_at: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    /// Raw ISO-8601 duration token.
    pub duration: String,
    pub thumbnails: BTreeMap<String, Thumbnail>,
}

/// Thumbnail size keys from largest to smallest.
const THUMBNAIL_PREFERENCE: &[&str] = &["maxres", "standard", "high", "medium", "default"];

impl VideoDetails {
    /// URL of the largest available thumbnail.
    #[must_use]
    pub fn best_thumbnail_url(&self) -> Option<&str> {
        THUMBNAIL_PREFERENCE
            .iter()
            .find_map(|key| self.thumbnails.get(*key))
            .or_else(|| self.thumbnails.values().next())
            .map(|t| t.url.as_str())
    }
}

impl From<VideoItem> for VideoDetails {
    fn from(item: VideoItem) -> Self {
        Self {
            id: item.id,
            title: item.snippet.title,
            description: item.snippet.description,
            published_at: item.snippet.published_at,
            view_count: item.statistics.view_count,
            like_count: item.statistics.like_count,
            comment_count: item.statistics.comment_count,
            duration: item.content_details.duration,
            thumbnails: item.snippet.thumbnails,
        }
    }
}

// ---------------------------------------------------------------------------
// channels.list
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChannelItem {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<ChannelSnippet>,
    #[serde(default)]
    pub statistics: Option<ChannelStatistics>,
    #[serde(default)]
    pub content_details: Option<ChannelContentDetails>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChannelSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnails: BTreeMap<String, Thumbnail>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChannelStatistics {
    #[serde(default, deserialize_with = "de_count")]
    pub subscriber_count: u64,
    #[serde(default, deserialize_with = "de_count")]
    pub view_count: u64,
    #[serde(default, deserialize_with = "de_count")]
    pub video_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChannelContentDetails {
    pub related_playlists: RelatedPlaylists,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RelatedPlaylists {
    pub uploads: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelInfo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub subscriber_count: u64,
    pub view_count: u64,
    pub video_count: u64,
    pub thumbnails: BTreeMap<String, Thumbnail>,
}

/// A channel's headline info plus its newest uploads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelOverview {
    pub channel: ChannelInfo,
    pub recent_videos: Vec<VideoDetails>,
}

// ---------------------------------------------------------------------------
// search.list / playlistItems.list
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct SearchItem {
    pub id: SearchId,
    #[serde(default)]
    pub snippet: Option<ChannelSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchId {
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSummary {
    pub channel_id: String,
    pub title: String,
    pub description: String,
    pub thumbnails: BTreeMap<String, Thumbnail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaylistItem {
    pub content_details: PlaylistItemDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaylistItemDetails {
    pub video_id: String,
}

// ---------------------------------------------------------------------------
// commentThreads.list
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct CommentThread {
    #[serde(default)]
    pub snippet: Option<CommentThreadSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommentThreadSnippet {
    #[serde(default)]
    pub top_level_comment: Option<TopLevelComment>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TopLevelComment {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub snippet: Option<CommentSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CommentSnippet {
    #[serde(default)]
    pub author_display_name: Option<String>,
    #[serde(default)]
    pub text_display: Option<String>,
    #[serde(default, deserialize_with = "de_count")]
    pub like_count: u64,
    #[serde(default)]
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub text: String,
    pub like_count: u64,
    pub published_at: Option<String>,
}

impl TopLevelComment {
    /// Converts into a [`Comment`], dropping entries without an id or text.
    pub(crate) fn into_comment(self) -> Option<Comment> {
        let id = self.id?;
        let snippet = self.snippet?;
        let text = snippet.text_display?;
        Some(Comment {
            id,
            author: snippet
                .author_display_name
                .unwrap_or_else(|| "Unknown".to_string()),
            text,
            like_count: snippet.like_count,
            published_at: snippet.published_at,
        })
    }
}
