//! General-purpose lexicon scorer for audience text.

/// Word polarities.
///
/// Keys are lowercase single words. Values in `(0.0, 1.0]` are positive,
/// in `[-1.0, 0.0)` are negative.
pub(crate) const LEXICON: &[(&str, f32)] = &[
    // Positive signals
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("beautiful", 0.85),
    ("best", 1.0),
    ("brilliant", 0.9),
    ("clear", 0.1),
    ("cool", 0.35),
    ("enjoy", 0.4),
    ("enjoyed", 0.4),
    ("excellent", 1.0),
    ("fantastic", 0.4),
    ("favorite", 0.5),
    ("fun", 0.3),
    ("funny", 0.25),
    ("glad", 0.5),
    ("good", 0.7),
    ("great", 0.8),
    ("happy", 0.8),
    ("helpful", 0.5),
    ("incredible", 0.9),
    ("informative", 0.5),
    ("interesting", 0.5),
    ("like", 0.2),
    ("love", 0.5),
    ("loved", 0.7),
    ("masterpiece", 0.8),
    ("nice", 0.6),
    ("perfect", 1.0),
    ("recommend", 0.4),
    ("thanks", 0.2),
    ("underrated", 0.4),
    ("useful", 0.3),
    ("wonderful", 1.0),
    ("wow", 0.1),
    // Negative signals
    ("annoying", -0.8),
    ("awful", -1.0),
    ("bad", -0.7),
    ("boring", -1.0),
    ("clickbait", -0.6),
    ("confusing", -0.4),
    ("disappointed", -0.75),
    ("disappointing", -0.6),
    ("dislike", -0.5),
    ("dull", -0.3),
    ("fake", -0.5),
    ("hate", -0.8),
    ("horrible", -1.0),
    ("lame", -0.5),
    ("mediocre", -0.4),
    ("misleading", -0.5),
    ("poor", -0.4),
    ("sad", -0.5),
    ("scam", -0.7),
    ("stupid", -0.8),
    ("terrible", -1.0),
    ("ugly", -0.7),
    ("useless", -0.5),
    ("waste", -0.6),
    ("worse", -0.4),
    ("worst", -1.0),
    ("wrong", -0.5),
];

/// Multipliers applied to the next sentiment-bearing word.
const INTENSIFIERS: &[(&str, f32)] = &[
    ("absolutely", 1.3),
    ("extremely", 1.5),
    ("incredibly", 1.4),
    ("really", 1.2),
    ("so", 1.2),
    ("super", 1.3),
    ("too", 1.1),
    ("totally", 1.3),
    ("very", 1.3),
    ("slightly", 0.6),
    ("somewhat", 0.7),
];

const NEGATIONS: &[&str] = &["not", "no", "never", "nothing", "neither", "nor", "cannot"];

/// Negated polarity is flipped and halved ("not good" is mildly negative).
const NEGATION_FACTOR: f32 = -0.5;

/// A negation stops applying after this many non-sentiment words.
const NEGATION_WINDOW: usize = 3;

fn lookup(table: &[(&str, f32)], word: &str) -> Option<f32> {
    table.iter().find(|(w, _)| *w == word).map(|&(_, v)| v)
}

fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word) || word.ends_with("n't")
}

/// Score a single text in `[-1.0, 1.0]`.
///
/// Polarity is the mean weight of the lexicon words found in the text,
/// after applying any preceding intensifier or negation. Text with no
/// lexicon words (including the empty string) scores `0.0`.
#[must_use]
pub fn polarity(text: &str) -> f32 {
    let mut total = 0.0_f64;
    let mut matched = 0_usize;
    let mut intensity: Option<f32> = None;
    let mut negation_left = 0_usize;

    for raw in text.split_whitespace() {
        let word = raw
            .trim_matches(|c: char| !c.is_alphabetic() && c != '\'')
            .to_lowercase()
            .replace('\u{2019}', "'");
        if word.is_empty() {
            continue;
        }

        if is_negation(&word) {
            negation_left = NEGATION_WINDOW;
            continue;
        }
        if let Some(factor) = lookup(INTENSIFIERS, &word) {
            intensity = Some(factor);
            continue;
        }

        match lookup(LEXICON, &word) {
            Some(weight) => {
                let mut score = weight * intensity.unwrap_or(1.0);
                if negation_left > 0 {
                    score *= NEGATION_FACTOR;
                }
                total += f64::from(score);
                matched += 1;
                negation_left = 0;
            }
            None => negation_left = negation_left.saturating_sub(1),
        }
        intensity = None;
    }

    if matched == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    let mean = (total / matched as f64) as f32;
    mean.clamp(-1.0, 1.0)
}
