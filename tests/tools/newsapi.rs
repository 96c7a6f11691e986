use chrono::NaiveDate;
use newsdigest::tools::newsapi::{render_context, NewsApiClient, NewsApiConfig};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 14).expect("valid date")
}

fn article(title: &str, url: &str) -> serde_json::Value {
    serde_json::json!({
        "source": {"id": null, "name": "Example News"},
        "title": title,
        "description": format!("About {}", title),
        "url": url,
        "publishedAt": "2026-10-13T08:00:00Z"
    })
}

fn client(server: &MockServer, max_articles: Option<usize>) -> NewsApiClient {
    NewsApiClient::new(NewsApiConfig {
        api_key: Some("news-key".to_string()),
        base_url: Some(server.uri()),
        max_articles,
    })
    .expect("Failed to create NewsAPI client")
    .expect("client should exist with an API key")
}

#[test]
fn no_client_without_api_key() {
    let client = NewsApiClient::new(NewsApiConfig {
        api_key: Some("  ".to_string()),
        ..NewsApiConfig::default()
    })
    .expect("Failed to create NewsAPI client");

    assert!(client.is_none());
}

#[tokio::test]
async fn fetches_deduplicates_and_skips_failed_queries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .and(query_param("q", "chips"))
        .and(query_param("from", "2026-10-07"))
        .and(query_param("to", "2026-10-14"))
        .and(query_param("language", "en"))
        .and(query_param("sortBy", "relevancy"))
        .and(query_param("apiKey", "news-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ok",
            "totalResults": 2,
            "articles": [
                article("GPU launch", "https://example.com/gpu"),
                article("TPU update", "https://example.com/tpu")
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .and(query_param("q", "models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ok",
            "articles": [
                article("GPU launch again", "https://example.com/gpu"),
                article("New LLM", "https://example.com/llm"),
                {"source": {"name": "Removed"}, "title": "[Removed]", "url": null}
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .and(query_param("q", "broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .and(query_param("q", "limited"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "error",
            "code": "rateLimited",
            "message": "Too many requests"
        })))
        .mount(&server)
        .await;

    let articles = client(&server, None)
        .fetch(&["chips", "broken", "models", "limited"], today(), 7)
        .await;

    let urls = articles
        .iter()
        .map(|a| a.url.clone().unwrap_or_default())
        .collect::<Vec<_>>();
    assert_eq!(
        urls,
        vec![
            "https://example.com/gpu",
            "https://example.com/tpu",
            "https://example.com/llm"
        ]
    );
    assert_eq!(articles[0].title.as_deref(), Some("GPU launch"));
}

#[tokio::test]
async fn caps_article_count() {
    let server = MockServer::start().await;

    let many = (0..10)
        .map(|i| article(&format!("Story {}", i), &format!("https://example.com/{}", i)))
        .collect::<Vec<_>>();
    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ok",
            "articles": many
        })))
        .mount(&server)
        .await;

    let articles = client(&server, Some(4))
        .fetch(&["ai"], today(), 1)
        .await;

    assert_eq!(articles.len(), 4);
    assert_eq!(articles[3].title.as_deref(), Some("Story 3"));
}

#[tokio::test]
async fn keeps_articles_without_source() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ok",
            "articles": [
                article("GPU launch", "https://example.com/gpu"),
                {"title": "Sourceless", "url": "https://example.com/sourceless"}
            ]
        })))
        .mount(&server)
        .await;

    let articles = client(&server, None).fetch(&["ai"], today(), 2).await;

    assert_eq!(articles.len(), 2);
    assert_eq!(articles[1].title.as_deref(), Some("Sourceless"));
    assert_eq!(articles[1].source.name, None);
}

#[tokio::test]
async fn renders_articles_as_prompt_context() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ok",
            "articles": [
                article("GPU launch", "https://example.com/gpu"),
                {"source": {"name": null}, "title": "Bare", "description": null, "url": "https://example.com/bare", "publishedAt": null}
            ]
        })))
        .mount(&server)
        .await;

    let articles = client(&server, None).fetch(&["ai"], today(), 2).await;

    assert_eq!(
        render_context(&articles),
        "**GPU launch**\nAbout GPU launch\nSource: Example News\nURL: https://example.com/gpu\nPublished: 2026-10-13T08:00:00Z\n\n\
         **Bare**\nNo description\nSource: Unknown\nURL: https://example.com/bare\nPublished: unknown"
    );
}
