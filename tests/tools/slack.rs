use newsdigest::digest::blocks::{assemble, MessageBlock};
use newsdigest::tools::slack::{
    failure_payload, SlackConfig, SlackError, SlackWebhook, WebhookPayload,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn webhook(server: &MockServer) -> SlackWebhook {
    SlackWebhook::new(SlackConfig {
        webhook_url: format!("{}/services/T0/B0/X", server.uri()),
        user_id: None,
        timeout_secs: Some(5),
    })
    .expect("Failed to create Slack webhook")
}

#[tokio::test]
async fn posts_text_and_blocks() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/T0/B0/X"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({
            "text": "<@U1> Weekly AI Tech Deep Dive — 2026-10-14",
            "blocks": [
                {"type": "header", "text": {"type": "plain_text", "text": "🔬 Weekly AI Tech Deep Dive — 2026-10-14"}},
                {"type": "divider"},
                {"type": "section", "text": {"type": "mrkdwn", "text": "🔬 *Research*"}},
                {"type": "divider"},
                {"type": "context", "elements": [{"type": "mrkdwn", "text": "_footer_"}]}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let payload = WebhookPayload {
        text: "<@U1> Weekly AI Tech Deep Dive — 2026-10-14".to_string(),
        blocks: assemble(
            &[
                MessageBlock::header("🔬 Weekly AI Tech Deep Dive — 2026-10-14"),
                MessageBlock::Divider,
            ],
            &[newsdigest::digest::chunk::Chunk {
                index: 1,
                text: "🔬 *Research*".to_string(),
            }],
            &[MessageBlock::Divider, MessageBlock::context("_footer_")],
            50,
            "_(truncated)_",
        ),
    };

    webhook(&server)
        .post(&payload)
        .await
        .expect("Slack post failed");
}

#[tokio::test]
async fn surfaces_error_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/T0/B0/X"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid_blocks"))
        .mount(&server)
        .await;

    let result = webhook(&server)
        .post(&failure_payload("Daily Digest", "boom"))
        .await;

    match result {
        Err(SlackError::ApiStatus { status, body }) => {
            assert_eq!(status, 400);
            assert_eq!(body, "invalid_blocks");
        }
        other => panic!("Expected ApiStatus error, got {:?}", other),
    }
}

#[tokio::test]
async fn failure_report_posts_single_error_section() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/T0/B0/X"))
        .and(body_json(serde_json::json!({
            "text": "⚠️ Weekly AI Tech Deep Dive Failed",
            "blocks": [
                {"type": "section", "text": {"type": "mrkdwn", "text": "*Error:*\n```quota exceeded```"}}
            ]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    webhook(&server)
        .post_failure("Weekly AI Tech Deep Dive", "quota exceeded")
        .await
        .expect("failure report failed");
}

#[test]
fn failure_payload_truncates_long_errors() {
    let error = "e".repeat(2000);

    let payload = failure_payload("Digest", &error);

    let text = payload.blocks.blocks()[0].text().expect("section text");
    assert_eq!(text, format!("*Error:*\n```{}```", "e".repeat(500)));
}
