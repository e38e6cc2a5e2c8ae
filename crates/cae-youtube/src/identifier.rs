//! Classification of user-supplied channel identifiers.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::YoutubeError;

/// What a channel identifier turned out to be before any API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelIdentifier {
    /// Canonical `UC…` channel id; usable without a lookup.
    ChannelId(String),
    /// Handle, custom URL segment or free text that needs a channel search.
    Query(String),
}

static CHANNEL_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^UC[a-zA-Z0-9_-]{22}$").expect("valid channel id regex"));

impl ChannelIdentifier {
    /// Classify a channel id, `@handle` or channel URL.
    ///
    /// URLs of the form `youtube.com/c/X`, `youtube.com/channel/X`,
    /// `youtube.com/user/X` and `youtube.com/@X` are reduced to `X`; if `X`
    /// is itself a canonical id it is used directly.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::InvalidInput`] for blank identifiers.
    pub fn parse(raw: &str) -> Result<Self, YoutubeError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(YoutubeError::InvalidInput(
                "channel identifier is empty".to_string(),
            ));
        }

        let mut candidate = trimmed;
        if candidate.contains("youtube.com") {
            for marker in ["/channel/", "/c/", "/user/", "/@"] {
                if let Some((_, rest)) = candidate.split_once(marker) {
                    candidate = rest.split(['/', '?', '#']).next().unwrap_or(rest);
                    break;
                }
            }
        }
        let candidate = candidate.trim_start_matches('@');

        if CHANNEL_ID_RE.is_match(candidate) {
            Ok(ChannelIdentifier::ChannelId(candidate.to_string()))
        } else {
            Ok(ChannelIdentifier::Query(candidate.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "UC_x5XG1OV2P6uZZ5FSM9Ttw";

    #[test]
    fn canonical_id_is_used_directly() {
        assert_eq!(
            ChannelIdentifier::parse(ID).unwrap(),
            ChannelIdentifier::ChannelId(ID.to_string())
        );
    }

    #[test]
    fn handle_is_stripped_of_at_sign() {
        assert_eq!(
            ChannelIdentifier::parse("@veritasium").unwrap(),
            ChannelIdentifier::Query("veritasium".to_string())
        );
    }

    #[test]
    fn channel_url_with_canonical_id() {
        let url = format!("https://www.youtube.com/channel/{ID}/videos");
        assert_eq!(
            ChannelIdentifier::parse(&url).unwrap(),
            ChannelIdentifier::ChannelId(ID.to_string())
        );
    }

    #[test]
    fn custom_and_user_urls_become_queries() {
        assert_eq!(
            ChannelIdentifier::parse("https://youtube.com/c/LinusTechTips").unwrap(),
            ChannelIdentifier::Query("LinusTechTips".to_string())
        );
        assert_eq!(
            ChannelIdentifier::parse("youtube.com/user/pewdiepie?feature=x").unwrap(),
            ChannelIdentifier::Query("pewdiepie".to_string())
        );
        assert_eq!(
            ChannelIdentifier::parse("https://www.youtube.com/@mkbhd").unwrap(),
            ChannelIdentifier::Query("mkbhd".to_string())
        );
    }

    #[test]
    fn blank_identifier_is_rejected() {
        assert!(matches!(
            ChannelIdentifier::parse("  "),
            Err(YoutubeError::InvalidInput(_))
        ));
    }
}
