//! End-to-end HTTP tests for both providers against a local mock server.

use providers::gemini::GeminiClient;
use providers::openrouter::OpenRouterClient;
use providers::{ProviderError, RawSource, ReqwestTransport};
use serde_json::json;
use shared::settings::OpenRouterModel;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_openrouter_chat_completion() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(header("X-Title", "AI Multi-Modal Researcher"))
        .and(body_partial_json(json!({
            "model": "google/gemma-7b-it",
            "messages": [{ "role": "user", "content": "Using a web search, summarize" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "Summary [1]" } }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = OpenRouterClient::new(
        "test-key",
        OpenRouterModel::Gemma7bIt,
        Arc::new(ReqwestTransport::new()),
    )
    .with_base_url(&mock_server.uri());

    let out = client.generate("summarize", true).await.unwrap();
    assert_eq!(out.text, "Summary [1]");
    assert!(out.sources.is_empty());
}

#[tokio::test]
async fn test_openrouter_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&mock_server)
        .await;

    let client = OpenRouterClient::new(
        "test-key",
        OpenRouterModel::default(),
        Arc::new(ReqwestTransport::new()),
    )
    .with_base_url(&mock_server.uri());

    let err = client.generate("plan", false).await.unwrap_err();
    assert!(matches!(err, ProviderError::Status { status: 429, .. }));
    assert_eq!(err.to_string(), "OpenRouter API error: 429 - rate limited");
}

#[tokio::test]
async fn test_gemini_grounded_generation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .and(header("x-goog-api-key", "g-key"))
        .and(body_partial_json(json!({
            "generationConfig": { "temperature": 0.5 },
            "tools": [{ "googleSearch": {} }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Grounded report" }] },
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "uri": "https://www.rust-lang.org/", "title": "Rust" } }
                    ]
                }
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GeminiClient::new("g-key", Arc::new(ReqwestTransport::new()))
        .with_base_url(&mock_server.uri());

    let out = client.generate("report", true).await.unwrap();
    assert_eq!(out.text, "Grounded report");
    assert_eq!(
        out.sources,
        vec![RawSource::new("https://www.rust-lang.org/", "Rust")]
    );
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    // Nothing listens on port 9 (discard) on the loopback interface.
    let client = GeminiClient::new("g-key", Arc::new(ReqwestTransport::new()))
        .with_base_url("http://127.0.0.1:9");

    let err = client.generate("plan", false).await.unwrap_err();
    assert!(matches!(err, ProviderError::Transport { .. }));
    assert!(err.to_string().starts_with("Gemini request failed: "));
}

#[tokio::test]
async fn test_requests_carry_a_single_content_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "content": "ok" } }]
        })))
        .mount(&mock_server)
        .await;

    let client = OpenRouterClient::new(
        "test-key",
        OpenRouterModel::default(),
        Arc::new(ReqwestTransport::new()),
    )
    .with_base_url(&mock_server.uri());
    client.generate("plan", false).await.unwrap();

    let gemini = GeminiClient::new("g-key", Arc::new(ReqwestTransport::new()))
        .with_base_url(&mock_server.uri());
    // Reply has no candidates; only the request headers matter here.
    let _ = gemini.generate("plan", false).await;

    let received = mock_server.received_requests().await.unwrap();
    assert_eq!(received.len(), 2);
    for request in &received {
        let values: Vec<_> = request.headers.get_all("content-type").iter().collect();
        assert_eq!(values.len(), 1, "{}", request.url);
        assert_eq!(values[0], "application/json");
    }
}
