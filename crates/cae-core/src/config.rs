use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable has a default except the two API keys, which stay `None`
/// until a command that needs them checks for their presence.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let env = parse_environment(&or_default("CAE_ENV", "development"))?;
    let log_level = or_default("CAE_LOG_LEVEL", "info");

    let youtube_api_key = optional("YOUTUBE_API_KEY");
    let youtube_base_url = or_default(
        "CAE_YOUTUBE_BASE_URL",
        "https://www.googleapis.com/youtube/v3/",
    );
    let http_timeout_secs = parse_as(
        "CAE_HTTP_TIMEOUT_SECS",
        &or_default("CAE_HTTP_TIMEOUT_SECS", "30"),
    )?;
    let user_agent = or_default("CAE_USER_AGENT", "cae/0.1 (creator-analytics)");

    let thumbnail_timeout_secs = parse_as(
        "CAE_THUMBNAIL_TIMEOUT_SECS",
        &or_default("CAE_THUMBNAIL_TIMEOUT_SECS", "5"),
    )?;
    let embedding_url = or_default("CAE_EMBEDDING_URL", "http://localhost:8080");
    let clip_temperature: f32 = parse_as(
        "CAE_CLIP_TEMPERATURE",
        &or_default("CAE_CLIP_TEMPERATURE", "0.07"),
    )?;
    if clip_temperature <= 0.0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "CAE_CLIP_TEMPERATURE".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let clip_scale = parse_as("CAE_CLIP_SCALE", &or_default("CAE_CLIP_SCALE", "5.0"))?;

    let whisper_url = or_default("CAE_WHISPER_URL", "http://localhost:8178");
    let whisper_max_concurrent: usize = parse_as(
        "CAE_WHISPER_MAX_CONCURRENT",
        &or_default("CAE_WHISPER_MAX_CONCURRENT", "1"),
    )?;
    if whisper_max_concurrent == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "CAE_WHISPER_MAX_CONCURRENT".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let llm_base_url = or_default("CAE_LLM_BASE_URL", "https://api.openai.com/v1");
    let llm_api_key = optional("OPENAI_API_KEY");
    let llm_model = or_default("CAE_LLM_MODEL", "gpt-4.1-mini");
    let ytdlp_path = or_default("CAE_YTDLP_PATH", "yt-dlp");

    let cache_dir = lookup("CAE_CACHE_DIR")
        .map_or_else(|_| std::env::temp_dir().join("cae_cache"), PathBuf::from);
    let cache_ttl_secs = parse_as(
        "CAE_CACHE_TTL_SECS",
        &or_default("CAE_CACHE_TTL_SECS", "3600"),
    )?;
    let cache_max_entries = parse_as(
        "CAE_CACHE_MAX_ENTRIES",
        &or_default("CAE_CACHE_MAX_ENTRIES", "512"),
    )?;

    let max_retries = parse_as("CAE_MAX_RETRIES", &or_default("CAE_MAX_RETRIES", "3"))?;
    let retry_backoff_base_ms = parse_as(
        "CAE_RETRY_BACKOFF_BASE_MS",
        &or_default("CAE_RETRY_BACKOFF_BASE_MS", "1000"),
    )?;

    Ok(AppConfig {
        env,
        log_level,
        youtube_api_key,
        youtube_base_url,
        http_timeout_secs,
        user_agent,
        thumbnail_timeout_secs,
        embedding_url,
        clip_temperature,
        clip_scale,
        whisper_url,
        whisper_max_concurrent,
        llm_base_url,
        llm_api_key,
        llm_model,
        ytdlp_path,
        cache_dir,
        cache_ttl_secs,
        cache_max_entries,
        max_retries,
        retry_backoff_base_ms,
    })
}

fn parse_as<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CAE_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
