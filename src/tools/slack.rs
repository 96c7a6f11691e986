use anyhow::Context;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::deserialize_option_parsed;
use crate::digest::blocks::{assemble, BlockSequence, MessageBlock};
use crate::digest::{DEFAULT_MAX_BLOCKS, DEFAULT_TRUNCATION_NOTICE};

const MAX_ERROR_CHARS: usize = 500;

#[derive(Debug, thiserror::Error)]
pub enum SlackError {
    #[error("Slack webhook error (status {status}): {body}")]
    ApiStatus { status: u16, body: String },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Deserialize, Debug, Clone)]
pub struct SlackConfig {
    #[serde(rename = "slack_webhook_url")]
    pub webhook_url: String,
    /// Member ID to mention in the greeting, e.g. `U07ABCDEF`.
    #[serde(rename = "slack_user_id")]
    pub user_id: Option<String>,
    #[serde(
        rename = "slack_timeout_secs",
        default,
        deserialize_with = "deserialize_option_parsed"
    )]
    pub timeout_secs: Option<u64>,
}

impl SlackConfig {
    pub fn mention(&self) -> Option<&str> {
        self.user_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// Body of one incoming-webhook call: a plain-text fallback plus blocks.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct WebhookPayload {
    pub text: String,
    pub blocks: BlockSequence,
}

#[derive(Debug, Clone)]
pub struct SlackWebhook {
    webhook_url: String,
    client: Client,
}

impl SlackWebhook {
    pub fn new(config: SlackConfig) -> Result<Self, SlackError> {
        let timeout_secs = config.timeout_secs.unwrap_or(30);
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent("newsdigest/0.1")
            .build()
            .context("Failed to build Slack HTTP client")?;

        Ok(Self {
            webhook_url: config.webhook_url,
            client,
        })
    }

    pub async fn post(&self, payload: &WebhookPayload) -> Result<(), SlackError> {
        log::info!("posting to Slack ({} blocks)...", payload.blocks.len());
        let response = self
            .client
            .post(&self.webhook_url)
            .json(payload)
            .send()
            .await
            .context("Slack webhook request failed")?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        log::debug!(
            "Slack response: {} | {}",
            status,
            body.chars().take(200).collect::<String>()
        );
        if !status.is_success() {
            return Err(SlackError::ApiStatus {
                status: status.as_u16(),
                body,
            });
        }

        log::info!("posted to Slack");
        Ok(())
    }

    /// Report a failed run with a single error section.
    pub async fn post_failure(&self, title: &str, error: &str) -> Result<(), SlackError> {
        self.post(&failure_payload(title, error)).await
    }
}

pub fn failure_payload(title: &str, error: &str) -> WebhookPayload {
    let error = error.chars().take(MAX_ERROR_CHARS).collect::<String>();
    section_payload(
        &format!("⚠️ {} Failed", title),
        &format!("*Error:*\n```{}```", error),
    )
}

/// A payload holding one mrkdwn section, for notices outside the digest
/// pipeline.
pub fn section_payload(text: &str, section: &str) -> WebhookPayload {
    WebhookPayload {
        text: text.to_string(),
        blocks: assemble(
            &[MessageBlock::section(section)],
            &[],
            &[],
            DEFAULT_MAX_BLOCKS,
            DEFAULT_TRUNCATION_NOTICE,
        ),
    }
}
