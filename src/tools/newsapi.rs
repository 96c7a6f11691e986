use anyhow::Context;
use chrono::{Duration as ChronoDuration, NaiveDate};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

use crate::config::deserialize_option_parsed;

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org";

/// Queries run against the `everything` endpoint, most general first.
pub const DEFAULT_QUERIES: &[&str] = &[
    "artificial intelligence",
    "OpenAI OR Anthropic OR Google AI",
    "AI regulation OR AI policy",
    "NVIDIA OR AMD AI chips",
    "large language model OR LLM",
];

#[derive(Debug, thiserror::Error)]
pub enum NewsApiError {
    #[error("NewsAPI error (status {status}): {body}")]
    ApiStatus { status: u16, body: String },
    #[error("NewsAPI returned status '{status}': {message}")]
    Rejected { status: String, message: String },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct NewsApiConfig {
    #[serde(rename = "newsapi_key")]
    pub api_key: Option<String>,
    #[serde(rename = "newsapi_base_url")]
    pub base_url: Option<String>,
    #[serde(
        rename = "newsapi_max_articles",
        default,
        deserialize_with = "deserialize_option_parsed"
    )]
    pub max_articles: Option<usize>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub source: ArticleSource,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ArticleSource {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Deserialize, Debug)]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Clone)]
pub struct NewsApiClient {
    api_key: String,
    base_url: String,
    max_articles: usize,
    client: Client,
}

impl NewsApiClient {
    /// Returns `None` when no API key is configured.
    pub fn new(config: NewsApiConfig) -> Result<Option<Self>, NewsApiError> {
        let Some(api_key) = config.api_key.filter(|k| !k.trim().is_empty()) else {
            return Ok(None);
        };
        let base_url = config
            .base_url
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent("newsdigest/0.1")
            .build()
            .context("Failed to build NewsAPI HTTP client")?;

        Ok(Some(Self {
            api_key: api_key.trim().to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            max_articles: config.max_articles.unwrap_or(30),
            client,
        }))
    }

    /// Run every query over `[today - lookback_days, today]`, keep the first
    /// article seen for each URL and cap the result.
    ///
    /// A failing query is logged and skipped so one bad query does not sink
    /// the digest.
    pub async fn fetch(
        &self,
        queries: &[&str],
        today: NaiveDate,
        lookback_days: i64,
    ) -> Vec<Article> {
        let from = today - ChronoDuration::days(lookback_days);
        let mut all_articles = Vec::new();

        for query in queries {
            match self.everything(query, from, today).await {
                Ok(articles) => {
                    log::info!("'{}': found {} articles", query, articles.len());
                    all_articles.extend(articles);
                }
                Err(err) => log::warn!("error fetching '{}': {}", query, err),
            }
        }

        let mut seen_urls = HashSet::new();
        let unique = all_articles
            .into_iter()
            .filter(|article| match article.url.as_deref() {
                Some(url) if !url.is_empty() => seen_urls.insert(url.to_string()),
                _ => false,
            })
            .take(self.max_articles)
            .collect::<Vec<_>>();

        log::info!("found {} unique articles", unique.len());
        unique
    }

    async fn everything(
        &self,
        query: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Article>, NewsApiError> {
        let url = format!("{}/v2/everything", self.base_url);
        let from = from.format("%Y-%m-%d").to_string();
        let to = to.format("%Y-%m-%d").to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("from", from.as_str()),
                ("to", to.as_str()),
                ("language", "en"),
                ("sortBy", "relevancy"),
                ("pageSize", "20"),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("NewsAPI request failed")?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(NewsApiError::ApiStatus { status, body });
        }

        let body = response.text().await.context("NewsAPI body")?;
        let data: EverythingResponse = serde_json::from_str(&body).context("NewsAPI JSON")?;
        if data.status != "ok" {
            return Err(NewsApiError::Rejected {
                status: data.status,
                message: data.message.unwrap_or_else(|| "N/A".to_string()),
            });
        }
        Ok(data.articles)
    }
}

/// Render articles as prompt context, one blank-line separated entry each.
pub fn render_context(articles: &[Article]) -> String {
    articles
        .iter()
        .map(|art| {
            format!(
                "**{}**\n{}\nSource: {}\nURL: {}\nPublished: {}",
                art.title.as_deref().unwrap_or("Untitled"),
                art.description.as_deref().unwrap_or("No description"),
                art.source.name.as_deref().unwrap_or("Unknown"),
                art.url.as_deref().unwrap_or_default(),
                art.published_at.as_deref().unwrap_or("unknown")
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
