//! `YouTube` Data API v3 access and per-channel statistics filtering.
//!
//! [`YoutubeClient`] is the platform-API collaborator: it resolves channel
//! identifiers, hydrates video metadata and statistics, and pages through
//! comment threads. [`duration`] and [`filter`] turn raw video items into the
//! time-windowed [`cae_core::VideoStatRecord`] series the forecaster consumes.

pub mod client;
pub mod duration;
pub mod error;
pub mod filter;
pub mod identifier;
pub mod types;

pub use client::YoutubeClient;
pub use duration::{parse_duration_minutes, DurationParseError};
pub use error::YoutubeError;
pub use filter::{filter_video_stats, StatsCriteria};
pub use identifier::ChannelIdentifier;
pub use types::{ChannelInfo, ChannelOverview, ChannelSummary, Comment, Thumbnail, VideoDetails, VideoItem};
