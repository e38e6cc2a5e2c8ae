use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub youtube_api_key: Option<String>,
    pub youtube_base_url: String,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub thumbnail_timeout_secs: u64,
    pub embedding_url: String,
    pub clip_temperature: f32,
    pub clip_scale: f32,
    pub whisper_url: String,
    pub whisper_max_concurrent: usize,
    pub llm_base_url: String,
    pub llm_api_key: Option<String>,
    pub llm_model: String,
    pub ytdlp_path: String,
    pub cache_dir: PathBuf,
    pub cache_ttl_secs: u64,
    pub cache_max_entries: usize,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field(
                "youtube_api_key",
                &self.youtube_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("youtube_base_url", &self.youtube_base_url)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("thumbnail_timeout_secs", &self.thumbnail_timeout_secs)
            .field("embedding_url", &self.embedding_url)
            .field("clip_temperature", &self.clip_temperature)
            .field("clip_scale", &self.clip_scale)
            .field("whisper_url", &self.whisper_url)
            .field("whisper_max_concurrent", &self.whisper_max_concurrent)
            .field("llm_base_url", &self.llm_base_url)
            .field(
                "llm_api_key",
                &self.llm_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("llm_model", &self.llm_model)
            .field("ytdlp_path", &self.ytdlp_path)
            .field("cache_dir", &self.cache_dir)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .field("cache_max_entries", &self.cache_max_entries)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .finish()
    }
}
