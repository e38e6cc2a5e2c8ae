//! Fixed word-count segmentation of transcripts.

/// Words per scene at a typical speaking rate of 150 words per minute.
pub const WORDS_PER_SCENE: usize = 150;

/// Nominal length of a full scene in seconds.
pub const SCENE_SECONDS: u32 = 60;

const FALLBACK_SUMMARY_CHARS: usize = 50;

/// One scene-sized window of transcript text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptChunk {
    pub index: usize,
    /// Start offset in seconds.
    pub start: u32,
    /// End offset in seconds (exclusive).
    pub end: u32,
    pub text: String,
}

/// Split `transcript` into chunks of `words_per_scene` whitespace-separated words.
///
/// Chunk `i` starts at `i * 60` seconds. Every chunk but the last spans 60
/// seconds; the last is shortened in proportion to its word count, rounded
/// up to a whole second. An empty or whitespace-only transcript has no chunks.
#[must_use]
pub fn chunk_transcript(transcript: &str, words_per_scene: usize) -> Vec<TranscriptChunk> {
    let words_per_scene = words_per_scene.max(1);
    let words: Vec<&str> = transcript.split_whitespace().collect();

    words
        .chunks(words_per_scene)
        .enumerate()
        .map(|(index, chunk)| {
            let start = scene_offset(index);
            let seconds = if chunk.len() == words_per_scene {
                SCENE_SECONDS
            } else {
                partial_scene_seconds(chunk.len(), words_per_scene)
            };
            TranscriptChunk {
                index,
                start,
                end: start.saturating_add(seconds),
                text: chunk.join(" "),
            }
        })
        .collect()
}

fn scene_offset(index: usize) -> u32 {
    u32::try_from(index)
        .unwrap_or(u32::MAX)
        .saturating_mul(SCENE_SECONDS)
}

/// `ceil(60 * words / words_per_scene)`, at least one second.
fn partial_scene_seconds(words: usize, words_per_scene: usize) -> u32 {
    let scaled = (words * SCENE_SECONDS as usize).div_ceil(words_per_scene);
    u32::try_from(scaled).unwrap_or(SCENE_SECONDS).max(1)
}

/// Summary used when the classifier gives no usable answer: the chunk's
/// first sentence, cut to 50 characters, followed by `...`.
#[must_use]
pub fn fallback_summary(text: &str) -> String {
    let first_sentence = text.split('.').next().unwrap_or_default().trim();
    let truncated: String = first_sentence.chars().take(FALLBACK_SUMMARY_CHARS).collect();
    format!("{truncated}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn three_hundred_and_one_words_make_three_scenes() {
        let chunks = chunk_transcript(&words(301), WORDS_PER_SCENE);
        assert_eq!(chunks.len(), 3);
        let starts: Vec<u32> = chunks.iter().map(|c| c.start).collect();
        assert_eq!(starts, vec![0, 60, 120]);
    }

    #[test]
    fn scenes_are_contiguous_and_full_except_last() {
        let chunks = chunk_transcript(&words(301), WORDS_PER_SCENE);
        assert_eq!(chunks[0].end, 60);
        assert_eq!(chunks[1].end, 120);
        for pair in chunks.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        // One word at 150 wpm rounds up to one second.
        assert_eq!(chunks[2].end, 121);
    }

    #[test]
    fn partial_last_scene_is_proportional() {
        let chunks = chunk_transcript(&words(225), WORDS_PER_SCENE);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].start, 60);
        assert_eq!(chunks[1].end, 90);
    }

    #[test]
    fn exact_multiple_has_no_short_scene() {
        let chunks = chunk_transcript(&words(300), WORDS_PER_SCENE);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].end, 120);
    }

    #[test]
    fn chunk_text_preserves_word_order() {
        let chunks = chunk_transcript("a b  c\nd e", 2);
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["a b", "c d", "e"]);
    }

    #[test]
    fn empty_transcript_has_no_scenes() {
        assert!(chunk_transcript("", WORDS_PER_SCENE).is_empty());
        assert!(chunk_transcript("  \n\t ", WORDS_PER_SCENE).is_empty());
    }

    #[test]
    fn fallback_uses_first_sentence() {
        assert_eq!(
            fallback_summary("Welcome back everyone. Today we test phones."),
            "Welcome back everyone..."
        );
    }

    #[test]
    fn fallback_truncates_to_fifty_chars() {
        let long = "x".repeat(80);
        let summary = fallback_summary(&long);
        assert_eq!(summary.len(), 53);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn fallback_is_char_boundary_safe() {
        let text = "é".repeat(60);
        let summary = fallback_summary(&text);
        assert_eq!(summary.chars().count(), 53);
    }
}
