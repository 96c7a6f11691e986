use crate::digest::DigestConfig;
use crate::tools::newsapi::NewsApiConfig;
use crate::tools::slack::SlackConfig;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;
use url::Url;

pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u64 = 6000;
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("NEWSDIGEST_GEMINI_API_KEY must not be blank")]
    BlankApiKey,
    #[error("NEWSDIGEST_GEMINI_MODELS must name at least one model")]
    NoModels,
    #[error("Invalid NEWSDIGEST_GEMINI_TEMPERATURE: {0} (expected 0.0 to 2.0)")]
    InvalidTemperature(f64),
    #[error("NEWSDIGEST_GEMINI_MAX_ATTEMPTS must be at least 1")]
    NoAttempts,
    #[error("NEWSDIGEST_DIGEST_CHUNK_CHARS must be at least 1")]
    InvalidChunkChars,
    #[error("NEWSDIGEST_DIGEST_MAX_BLOCKS must be at least 2, got {0}")]
    InvalidMaxBlocks(usize),
    #[error("Invalid NEWSDIGEST_SLACK_WEBHOOK_URL: {0}")]
    InvalidWebhookUrl(String),
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub gemini_api_key: String,
    /// Comma-separated, most preferred first.
    #[serde(default = "default_gemini_models")]
    pub gemini_models: String,
    #[serde(default, deserialize_with = "deserialize_option_parsed")]
    pub gemini_temperature: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_option_parsed")]
    pub gemini_max_output_tokens: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_option_parsed")]
    pub gemini_max_attempts: Option<usize>,

    #[serde(flatten)]
    pub digest: DigestConfig,
    #[serde(flatten)]
    pub slack: SlackConfig,
    #[serde(flatten)]
    pub newsapi: NewsApiConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let config = envy::prefixed("NEWSDIGEST_").from_env::<AppConfig>()?;
        config.validate()?;
        Ok(config)
    }

    /// Ranked model list with blanks removed.
    pub fn models(&self) -> Vec<String> {
        self.gemini_models
            .split(',')
            .map(|entry| entry.trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect()
    }

    pub fn temperature(&self) -> f64 {
        self.gemini_temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    pub fn max_output_tokens(&self) -> u64 {
        self.gemini_max_output_tokens.unwrap_or(DEFAULT_MAX_OUTPUT_TOKENS)
    }

    pub fn max_attempts(&self) -> usize {
        self.gemini_max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gemini_api_key.trim().is_empty() {
            return Err(ConfigError::BlankApiKey);
        }
        if self.models().is_empty() {
            return Err(ConfigError::NoModels);
        }
        let temperature = self.temperature();
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ConfigError::InvalidTemperature(temperature));
        }
        if self.max_attempts() == 0 {
            return Err(ConfigError::NoAttempts);
        }
        if self.digest.chunk_chars == Some(0) {
            return Err(ConfigError::InvalidChunkChars);
        }
        if let Some(max_blocks) = self.digest.max_blocks.filter(|m| *m < 2) {
            return Err(ConfigError::InvalidMaxBlocks(max_blocks));
        }
        match Url::parse(&self.slack.webhook_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => {
                return Err(ConfigError::InvalidWebhookUrl(
                    self.slack.webhook_url.clone(),
                ))
            }
        }
        Ok(())
    }
}

fn default_gemini_models() -> String {
    "gemini-2.5-flash,gemini-2.0-flash,gemini-1.5-flash".to_string()
}

/// Flattened envy structs only see strings, so numeric options are parsed
/// by hand.
pub(crate) fn deserialize_option_parsed<'de, D, T>(
    deserializer: D,
) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.filter(|v| !v.trim().is_empty()) {
        Some(s) => s
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
