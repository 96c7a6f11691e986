use anyhow::Context;
use chrono::{DateTime, Local};
use env_logger::Env;
use newsdigest::agent::prompt::build_prompt;
use newsdigest::agent::Agent;
use newsdigest::config::AppConfig;
use newsdigest::digest::{self, DigestLayout};
use newsdigest::tools::newsapi::{render_context, NewsApiClient, DEFAULT_QUERIES};
use newsdigest::tools::slack::{section_payload, SlackWebhook, WebhookPayload};
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse the specified (or default) .env file
    let dotenv_path = env::var("NEWSDIGEST_DOTENV_PATH").unwrap_or_else(|_| ".env".to_string());
    let dotenv_result = dotenvy::from_path(&dotenv_path);

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match dotenv_result {
        Ok(()) => log::info!("Loaded env from {}", dotenv_path),
        Err(err) => log::debug!("No .env loaded from {}: {}", dotenv_path, err),
    }

    let config = AppConfig::from_env().context("Reading configuration")?;
    let slack = SlackWebhook::new(config.slack.clone())?;
    let kind = config.digest.kind;
    let now = Local::now();
    log::info!("starting {} for {}", kind.title(), now.format("%Y-%m-%d (%A)"));

    if let Err(err) = run(&config, &slack, now).await {
        log::error!("{} failed: {:#}", kind.title(), err);
        if let Err(report_err) = slack.post_failure(kind.title(), &format!("{:#}", err)).await {
            log::warn!("could not report failure to Slack: {}", report_err);
        }
        return Err(err);
    }

    log::info!("done");
    Ok(())
}

async fn run(config: &AppConfig, slack: &SlackWebhook, now: DateTime<Local>) -> anyhow::Result<()> {
    let kind = config.digest.kind;
    let today = now.date_naive();
    let mention = config.slack.mention();
    let layout = DigestLayout::new(&config.digest);

    let news_client = NewsApiClient::new(config.newsapi.clone())?;
    let articles = match (kind.news_lookback_days(), news_client) {
        (Some(days), Some(client)) => {
            log::info!("fetching the last {} days of AI news...", days);
            Some(client.fetch(DEFAULT_QUERIES, today, days).await)
        }
        _ => None,
    };

    if articles.as_ref().is_some_and(|a| a.is_empty()) {
        log::warn!("no articles found, posting notice instead of a digest");
        let payload = section_payload(
            &kind.fallback_text(today, mention),
            &format!("⚠️ *No AI news found for {}*", today.format("%Y-%m-%d")),
        );
        slack.post(&payload).await?;
        return Ok(());
    }

    let news_context = articles.as_deref().map(render_context);
    let prompt = build_prompt(kind, today, news_context.as_deref());

    let agent = Agent::from_config(config)?;
    let raw = agent
        .write(&prompt, &layout)
        .await
        .context("Generating digest")?;
    log::info!("digest generated ({} chars)", raw.chars().count());

    let time = now.format("%I:%M %p %Z").to_string();
    let preamble = kind.preamble(today, mention);
    let footer = kind.footer(&time, articles.as_ref().map(Vec::len));
    let blocks = digest::render(&layout, &raw, &preamble, &footer);

    let payload = WebhookPayload {
        text: kind.fallback_text(today, mention),
        blocks,
    };
    slack.post(&payload).await.context("Posting digest to Slack")?;
    Ok(())
}
