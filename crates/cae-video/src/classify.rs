//! Prompts for the language model and parsing of its answers.

use cae_core::SponsorMention;
use serde::Deserialize;

pub(crate) const SCENE_INSTRUCTIONS: &str = "\
You analyze one scene of a video transcript.
Return a JSON object with exactly two string fields:
- \"summary\": a brief, informative summary of what is discussed in the scene
- \"sponsor\": the sponsor or brand promoted in this scene, or \"\" if none
Return only the JSON object.";

pub(crate) const SPONSOR_INSTRUCTIONS: &str = "\
You read a video description and list every sponsor it names.
Return only a comma-separated list of sponsor names and nothing else.
Include actual sponsors only, not brands that are merely mentioned.
Return an empty answer if there are none.";

/// Structured answer for one scene.
///
/// `summary` is required and unknown fields are rejected, so an object that
/// does not follow the requested shape falls back like prose does.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneClassification {
    pub summary: String,
    #[serde(default, deserialize_with = "de_sponsor")]
    pub sponsor: String,
}

/// Accepts `"Brand"`, `""` or `null`.
fn de_sponsor<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse a scene answer.
///
/// The answer must be a JSON object, optionally wrapped in a Markdown code
/// fence. Sponsor names are trimmed.
///
/// # Errors
///
/// Returns the `serde_json` error when the answer is not such an object.
pub fn parse_scene_response(raw: &str) -> Result<SceneClassification, serde_json::Error> {
    let mut parsed: SceneClassification = serde_json::from_str(strip_code_fence(raw))?;
    parsed.summary = parsed.summary.trim().to_string();
    parsed.sponsor = parsed.sponsor.trim().to_string();
    Ok(parsed)
}

/// Split a comma-separated sponsor answer into trimmed, non-empty names.
#[must_use]
pub fn parse_sponsor_list(raw: &str) -> Vec<SponsorMention> {
    raw.trim()
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| SponsorMention {
            name: name.to_string(),
        })
        .collect()
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening line.
    let body = rest.split_once('\n').map_or(rest, |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
