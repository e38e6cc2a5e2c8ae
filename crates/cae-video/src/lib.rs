//! Transcript segmentation and sponsor detection for a single video.
//!
//! [`VideoAnalyzer`] pulls a transcript and the title/description from its
//! collaborators, splits the transcript into fixed word-count scenes, asks a
//! language model to summarise each scene and name any sponsor, and extracts
//! a separate sponsor list from the description.
//!
//! Scene times come from a speech-rate approximation (150 words per 60
//! seconds), not from audio timestamps.

pub mod analyzer;
pub mod chat;
pub mod classify;
pub mod collaborators;
pub mod error;
pub mod segment;
pub mod transcriber;

pub use analyzer::VideoAnalyzer;
pub use chat::ChatClassifier;
pub use classify::{parse_scene_response, parse_sponsor_list, SceneClassification};
pub use collaborators::{MetadataSource, TextClassifier, Transcriber};
pub use error::VideoError;
pub use segment::{chunk_transcript, fallback_summary, TranscriptChunk};
pub use transcriber::YtDlpWhisperTranscriber;
