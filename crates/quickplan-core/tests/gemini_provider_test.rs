//! Integration tests for `GeminiProvider` against a stub standing in for
//! the Gemini API.

use reqwest::Method;
use serde_json::json;

use quickplan_core::plan::response_schema;
use quickplan_core::provider::{GeminiProvider, PlanProvider, ProviderError, ProviderRequest};
use quickplan_test_utils::{StubEndpoint, sample_plan_json};

fn request() -> ProviderRequest {
    ProviderRequest {
        prompt: "Mission: \"m\"".to_owned(),
        schema: response_schema(),
    }
}

#[tokio::test]
async fn posts_generate_content_with_key_header() {
    let reply = json!({
        "candidates": [
            { "content": { "role": "model", "parts": [{ "text": sample_plan_json() }] } }
        ]
    });
    let stub = StubEndpoint::start(200, reply.to_string()).await;
    let provider = GeminiProvider::new(stub.url(), "gemini-2.5-flash");

    let text = provider.generate("secret-key", &request()).await.unwrap();
    assert_eq!(text, sample_plan_json());

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    let seen = &requests[0];
    assert_eq!(seen.method, Method::POST);
    assert_eq!(seen.path, "/v1beta/models/gemini-2.5-flash:generateContent");
    assert_eq!(seen.header("x-goog-api-key"), Some("secret-key"));
    // The key travels in the header only.
    assert!(seen.query.is_none());

    let body = seen.json();
    assert_eq!(body["contents"][0]["parts"][0]["text"], "Mission: \"m\"");
    assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    assert_eq!(body["generationConfig"]["responseSchema"], response_schema());
}

#[tokio::test]
async fn api_error_carries_status_and_message() {
    let reply = json!({ "error": { "code": 403, "message": "API key not valid." } });
    let stub = StubEndpoint::start(403, reply.to_string()).await;
    let provider = GeminiProvider::new(stub.url(), "gemini-2.5-flash");

    let err = provider.generate("bad", &request()).await.unwrap_err();

    match err {
        ProviderError::Api { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "API key not valid.");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn no_candidates_is_empty_response() {
    let stub = StubEndpoint::start(200, json!({ "candidates": [] }).to_string()).await;
    let provider = GeminiProvider::new(stub.url(), "gemini-2.5-flash");

    let err = provider.generate("k", &request()).await.unwrap_err();

    assert!(matches!(err, ProviderError::EmptyResponse));
}
