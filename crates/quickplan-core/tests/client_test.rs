//! Integration tests for `PlanClient` against an in-process stub endpoint.

use reqwest::Method;
use serde_json::json;

use quickplan_core::{GenerationError, PlanClient};
use quickplan_test_utils::{StubEndpoint, sample_plan, sample_plan_json};

fn client_for(stub: &StubEndpoint) -> PlanClient {
    PlanClient::new(format!("{}/api/gemini", stub.url()))
}

#[tokio::test]
async fn sends_exactly_one_post_with_both_fields() {
    let stub = StubEndpoint::start(200, sample_plan_json()).await;
    let client = client_for(&stub);

    let plan = client
        .generate("Deliver clean water", "Every village has a filter")
        .await
        .unwrap();
    assert_eq!(plan, sample_plan());

    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/api/gemini");
    assert!(
        request
            .header("content-type")
            .is_some_and(|v| v.starts_with("application/json"))
    );
    assert_eq!(
        request.json(),
        json!({ "mission": "Deliver clean water", "vision": "Every village has a filter" })
    );
}

#[tokio::test]
async fn blank_input_never_reaches_endpoint() {
    let stub = StubEndpoint::start(200, sample_plan_json()).await;
    let client = client_for(&stub);

    let err = client.generate("Deliver clean water", "   ").await.unwrap_err();

    assert_eq!(err, GenerationError::missing_input());
    assert!(stub.requests().is_empty());
}

#[tokio::test]
async fn server_error_is_upstream_failure_without_detail() {
    let stub = StubEndpoint::start(
        500,
        json!({ "message": "Failed to generate strategic plan from Gemini API." }).to_string(),
    )
    .await;
    let client = client_for(&stub);

    let err = client.generate("m", "v").await.unwrap_err();

    assert_eq!(err, GenerationError::UpstreamFailure);
    assert!(!err.to_string().contains("Gemini"));
    assert_eq!(stub.requests().len(), 1);
}

#[tokio::test]
async fn non_json_error_body_is_upstream_failure() {
    let stub = StubEndpoint::start(502, "<html>Bad Gateway</html>").await;
    let err = client_for(&stub).generate("m", "v").await.unwrap_err();
    assert_eq!(err, GenerationError::UpstreamFailure);
}

#[tokio::test]
async fn success_missing_field_is_malformed() {
    let mut body: serde_json::Value = serde_json::from_str(&sample_plan_json()).unwrap();
    body.as_object_mut().unwrap().remove("leadership");
    let stub = StubEndpoint::start(200, body.to_string()).await;

    let err = client_for(&stub).generate("m", "v").await.unwrap_err();

    assert_eq!(err, GenerationError::MalformedResponse);
}

#[tokio::test]
async fn success_with_unknown_strategy_is_malformed() {
    let mut body: serde_json::Value = serde_json::from_str(&sample_plan_json()).unwrap();
    body["howToWin"]["strategy"] = json!("QUALITY");
    let stub = StubEndpoint::start(200, body.to_string()).await;

    let err = client_for(&stub).generate("m", "v").await.unwrap_err();

    assert_eq!(err, GenerationError::MalformedResponse);
}
