use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-video statistics that survived the recency and duration filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatRecord {
    pub video_id: String,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub favorite_count: u64,
    /// Total duration in minutes, rounded to two decimals.
    pub duration_minutes: f64,
    pub published_at: DateTime<Utc>,
}

/// Which side(s) of the fitted distribution a forecast bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntervalKind {
    /// `(L, +inf)` with `P(X >= L) = confidence`.
    Lower,
    /// `(-inf, U)` with `P(X <= U) = confidence`.
    Upper,
    /// `(L, U)` with `P(L <= X <= U) = confidence`.
    #[default]
    TwoSided,
}

#[derive(Debug, Error)]
#[error("unrecognized interval kind \"{0}\" (expected lower, upper or two-sided)")]
pub struct UnknownIntervalKind(pub String);

impl FromStr for IntervalKind {
    type Err = UnknownIntervalKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lower" => Ok(IntervalKind::Lower),
            "upper" => Ok(IntervalKind::Upper),
            "two-sided" | "two_sided" | "twosided" => Ok(IntervalKind::TwoSided),
            _ => Err(UnknownIntervalKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for IntervalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntervalKind::Lower => write!(f, "lower"),
            IntervalKind::Upper => write!(f, "upper"),
            IntervalKind::TwoSided => write!(f, "two-sided"),
        }
    }
}

/// Prediction bounds for the next video's view count.
///
/// Open sides are represented by `f64::INFINITY` / `f64::NEG_INFINITY`.
/// JSON has no infinity literal, so infinite bounds serialize as the strings
/// `"+inf"` and `"-inf"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastInterval {
    pub kind: IntervalKind,
    #[serde(with = "bound")]
    pub lower: f64,
    #[serde(with = "bound")]
    pub upper: f64,
}

impl ForecastInterval {
    /// Width of the interval; infinite for one-sided kinds.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

mod bound {
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_infinite() {
            serializer.serialize_str(if *value > 0.0 { "+inf" } else { "-inf" })
        } else {
            serializer.serialize_f64(*value)
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(n),
            Raw::Text(s) => match s.as_str() {
                "+inf" | "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                other => Err(serde::de::Error::custom(format!(
                    "invalid interval bound \"{other}\""
                ))),
            },
        }
    }
}

/// One fixed-length window of a transcript.
///
/// Times are derived from a speech-rate approximation, not from audio
/// timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// Start offset in seconds.
    pub start: u32,
    /// End offset in seconds (exclusive).
    pub end: u32,
    pub summary: String,
    /// Sponsor named in this scene, empty when none.
    pub sponsor: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SponsorMention {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
}

/// Scene map, description-level sponsors and metadata for one video.
///
/// `sponsors` is extracted independently of the per-scene sponsor fields and
/// the two are not reconciled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoAnalysis {
    pub scenes: Vec<Scene>,
    pub sponsors: Vec<SponsorMention>,
    pub metadata: VideoMetadata,
}
