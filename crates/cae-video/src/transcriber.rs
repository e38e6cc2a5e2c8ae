//! Transcription via `yt-dlp` audio download and a Whisper-compatible server.
//!
//! Audio lands in a per-call temporary directory that is removed when the
//! call returns, whether it succeeded or not. Dropping an in-flight call
//! kills the `yt-dlp` child before the directory goes away.
//!
//! The server is health-checked once with `GET /health`; inference requests
//! go to `POST /inference` and are limited by a semaphore.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tokio::sync::{OnceCell, Semaphore};

use crate::collaborators::Transcriber;
use crate::error::VideoError;

#[derive(Deserialize)]
struct InferenceResponse {
    text: String,
}

pub struct YtDlpWhisperTranscriber {
    client: reqwest::Client,
    ytdlp_path: String,
    whisper_url: String,
    ready: OnceCell<()>,
    permits: Semaphore,
}

impl YtDlpWhisperTranscriber {
    /// `max_concurrent` bounds simultaneous inference requests (minimum 1).
    ///
    /// Only connecting to the server is time-limited; a long video may take
    /// minutes to transcribe.
    ///
    /// # Errors
    ///
    /// Returns [`VideoError::Http`] if the HTTP client cannot be built.
    pub fn new(
        ytdlp_path: &str,
        whisper_url: &str,
        max_concurrent: usize,
        connect_timeout_secs: u64,
    ) -> Result<Self, VideoError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            ytdlp_path: ytdlp_path.to_string(),
            whisper_url: whisper_url.trim_end_matches('/').to_string(),
            ready: OnceCell::new(),
            permits: Semaphore::new(max_concurrent.max(1)),
        })
    }

    /// Check server health once; later calls return immediately.
    async fn ensure_ready(&self) -> Result<(), VideoError> {
        self.ready
            .get_or_try_init(|| async {
                let url = format!("{}/health", self.whisper_url);
                let response = self
                    .client
                    .get(&url)
                    .send()
                    .await
                    .map_err(|e| VideoError::ModelUnavailable(format!("{url}: {e}")))?;
                if !response.status().is_success() {
                    return Err(VideoError::ModelUnavailable(format!(
                        "{url} returned status {}",
                        response.status()
                    )));
                }
                tracing::info!(url = %self.whisper_url, "transcription server ready");
                Ok(())
            })
            .await
            .map(|_| ())
    }

    /// Download the audio track of `video_id` into `dir` and return its path.
    ///
    /// # Errors
    ///
    /// Returns [`VideoError::MediaDownload`] if `yt-dlp` cannot be started,
    /// exits non-zero, or produces no file.
    pub async fn download_audio(&self, video_id: &str, dir: &Path) -> Result<PathBuf, VideoError> {
        let download_error = |message: String| VideoError::MediaDownload {
            video_id: video_id.to_string(),
            message,
        };

        let template = dir.join("%(id)s.%(ext)s");
        let url = format!("https://www.youtube.com/watch?v={video_id}");
        let output = tokio::process::Command::new(&self.ytdlp_path)
            .arg("-f")
            .arg("bestaudio/best")
            .args(["--no-playlist", "--quiet", "--no-warnings", "-o"])
            .arg(&template)
            .arg(&url)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| download_error(format!("{} subprocess error: {e}", self.ytdlp_path)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(download_error(format!(
                "{} exited with {}: {}",
                self.ytdlp_path,
                output.status,
                stderr.trim()
            )));
        }

        let mut entries = tokio::fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                return Ok(entry.path());
            }
        }
        Err(download_error("no media file was written".to_string()))
    }

    /// Upload an audio file for transcription and return the recognized text.
    ///
    /// # Errors
    ///
    /// Returns [`VideoError::ModelUnavailable`] if the health check fails and
    /// [`VideoError::Transcription`] if inference fails or answers badly.
    pub async fn transcribe_file(&self, video_id: &str, path: &Path) -> Result<String, VideoError> {
        self.ensure_ready().await?;
        let transcription_error = |message: String| VideoError::Transcription {
            video_id: video_id.to_string(),
            message,
        };

        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "audio".to_string(), |n| n.to_string_lossy().into_owned());
        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name))
            .text("response_format", "json");

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| VideoError::ModelUnavailable("transcription queue closed".to_string()))?;

        let url = format!("{}/inference", self.whisper_url);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| transcription_error(format!("request failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(transcription_error(format!("{url} returned status {status}")));
        }

        let parsed: InferenceResponse = response
            .json()
            .await
            .map_err(|e| transcription_error(format!("response parse error: {e}")))?;
        Ok(parsed.text.trim().to_string())
    }
}

fn validate_video_id(video_id: &str) -> Result<(), VideoError> {
    let valid = !video_id.is_empty()
        && video_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(VideoError::InvalidInput(format!(
            "invalid video id \"{video_id}\""
        )))
    }
}

#[async_trait]
impl Transcriber for YtDlpWhisperTranscriber {
    async fn transcribe(&self, video_id: &str) -> Result<String, VideoError> {
        validate_video_id(video_id)?;
        self.ensure_ready().await?;

        let workdir = tempfile::Builder::new().prefix("cae-media-").tempdir()?;
        let audio = self.download_audio(video_id, workdir.path()).await?;
        tracing::debug!(video_id, path = %audio.display(), "audio downloaded");

        let text = self.transcribe_file(video_id, &audio).await?;
        tracing::info!(video_id, words = text.split_whitespace().count(), "transcribed video");
        Ok(text)
    }
}
