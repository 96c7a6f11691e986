pub mod prompt;

use anyhow::{anyhow, Error};
use std::future::Future;

use crate::config::AppConfig;
use crate::digest::DigestLayout;

use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::gemini;

/// Produces raw digest text for a prompt with a named model.
pub trait TextGenerator {
    fn generate(&self, model: &str, prompt: &str) -> impl Future<Output = Result<String, Error>>;
}

pub struct GeminiGenerator {
    client: gemini::Client,
    temperature: f64,
    max_tokens: u64,
}

impl GeminiGenerator {
    pub fn new(config: &AppConfig) -> Result<Self, Error> {
        let client = gemini::Client::new(&config.gemini_api_key)?;
        Ok(Self {
            client,
            temperature: config.temperature(),
            max_tokens: config.max_output_tokens(),
        })
    }
}

impl TextGenerator for GeminiGenerator {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, Error> {
        let agent = self
            .client
            .agent(model)
            .preamble(prompt::PREAMBLE)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build();
        agent
            .prompt(prompt.to_string())
            .await
            .map_err(Error::from)
    }
}

/// Drives a [`TextGenerator`] through a ranked model list.
///
/// Each model gets `max_attempts` tries. A try fails on a generator error,
/// on empty output, or when the text lacks one of the layout's section
/// markers; on the last try of a model, text with missing sections is
/// accepted anyway. Errors move on to the next model.
pub struct Agent<G> {
    generator: G,
    models: Vec<String>,
    max_attempts: usize,
}

impl Agent<GeminiGenerator> {
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let generator = GeminiGenerator::new(config)?;
        Ok(Self::new(generator, config.models(), config.max_attempts()))
    }
}

impl<G: TextGenerator> Agent<G> {
    pub fn new(generator: G, models: Vec<String>, max_attempts: usize) -> Self {
        Self {
            generator,
            models,
            max_attempts: max_attempts.max(1),
        }
    }

    pub async fn write(&self, prompt: &str, layout: &DigestLayout) -> Result<String, Error> {
        let mut last_error: Option<Error> = None;

        for model in &self.models {
            for attempt in 1..=self.max_attempts {
                log::info!(
                    "generating digest with {} (attempt {}/{})...",
                    model,
                    attempt,
                    self.max_attempts
                );
                let text = match self.generator.generate(model, prompt).await {
                    Ok(text) if text.trim().is_empty() => {
                        log::warn!("{} returned empty text", model);
                        last_error = Some(anyhow!("{} returned empty text", model));
                        continue;
                    }
                    Ok(text) => text.trim().to_string(),
                    Err(err) => {
                        log::warn!("generation error from {}: {:#}", model, err);
                        last_error = Some(err);
                        continue;
                    }
                };

                let missing = layout.missing_sections(&text);
                if missing.is_empty() {
                    log::info!("all {} sections found", layout.section_markers.len());
                    return Ok(text);
                }
                if attempt == self.max_attempts {
                    log::warn!(
                        "missing sections {:?}, proceeding anyway (max attempts reached)",
                        missing
                    );
                    return Ok(text);
                }
                log::warn!("missing sections {:?}, retrying", missing);
            }
            log::warn!("giving up on {}", model);
        }

        Err(last_error
            .unwrap_or_else(|| anyhow!("no models configured"))
            .context("All models failed to generate a digest"))
    }
}
