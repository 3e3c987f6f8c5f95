//! Router-level tests for the poem endpoints, using scripted providers.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use async_trait::async_trait;
use poem_service::services::providers::mock::{MockReply, MockTextProvider};
use poem_service::services::providers::{
    GenerationParams, ProviderError, ProviderResponse, TextProvider,
};
use poem_service::services::PoemGenerator;
use poem_service::startup::{build_router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app_with(reply: MockReply) -> (Router, Arc<MockTextProvider>) {
    let mock = Arc::new(MockTextProvider::new(reply));
    let state = AppState::new(PoemGenerator::new(mock.clone()));
    (build_router(state), mock)
}

fn autumn_request() -> Value {
    json!({
        "theme": "autumn",
        "length": "3",
        "rhyme_scheme": "ABAB",
        "poet_style": "Keats"
    })
}

async fn post_poem(app: Router, body: String) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/generate-poem")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn returns_trimmed_direct_text() {
    let (app, mock) = app_with(MockReply::Text("  Autumn Song\n...\n\n".into()));

    let (status, body) = post_poem(app, autumn_request().to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"poem": "Autumn Song\n..."}));
    assert_eq!(mock.calls(), 1);
    let prompt = mock.last_prompt().unwrap();
    for field in ["autumn", "3", "ABAB", "Keats"] {
        assert!(prompt.contains(field));
    }
}

#[tokio::test]
async fn falls_back_to_first_candidate() {
    let (app, _) = app_with(MockReply::Candidates(vec![
        "\tCandidate One \n".into(),
        "Candidate Two".into(),
    ]));

    let (status, body) = post_poem(app, autumn_request().to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["poem"], "Candidate One");
}

#[tokio::test]
async fn empty_provider_response_is_an_error() {
    let (app, _) = app_with(MockReply::Empty);

    let (status, body) = post_poem(app, autumn_request().to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "No valid poem generated");
}

#[tokio::test]
async fn provider_failure_description_is_forwarded() {
    let (app, mock) = app_with(MockReply::Fail("quota exceeded for project".into()));

    let (status, body) = post_poem(app, autumn_request().to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Poem generation failed"));
    assert!(detail.contains("quota exceeded for project"));
    assert_eq!(mock.calls(), 1, "failed calls are not retried");
}

#[tokio::test]
async fn unconfigured_service_reports_no_ai_service() {
    let app = build_router(AppState::new(PoemGenerator::unconfigured()));

    for _ in 0..2 {
        let (status, body) = post_poem(app.clone(), autumn_request().to_string()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "No AI service available");
    }
}

#[tokio::test]
async fn missing_field_is_unprocessable() {
    let (app, mock) = app_with(MockReply::Text("unused".into()));

    let (status, body) = post_poem(
        app,
        json!({"theme": "autumn", "length": "3", "rhyme_scheme": "ABAB"}).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("poet_style"));
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn preflight_allows_any_origin_with_credentials() {
    let (app, _) = app_with(MockReply::Text("unused".into()));

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/generate-poem")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type,x-custom")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_success());
    let headers = response.headers();
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST");
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
        "content-type,x-custom"
    );
}

#[tokio::test]
async fn cross_origin_post_echoes_origin() {
    let (app, _) = app_with(MockReply::Text("poem".into()));

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/generate-poem")
                .header(header::ORIGIN, "https://poems.example")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(autumn_request().to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://poems.example"
    );
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn poem_options_lists_presets() {
    let app = build_router(AppState::new(PoemGenerator::unconfigured()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/poem-options")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["themes"].as_array().unwrap().contains(&json!("Seasons")));
    assert!(body["rhyme_schemes"].as_array().unwrap().contains(&json!("ABAB")));
    assert_eq!(body["lengths"][1], json!({"value": "medium", "label": "Medium (2 Stanzas)", "stanzas": 2}));
}

struct PanickingProvider;

#[async_trait]
impl TextProvider for PanickingProvider {
    fn name(&self) -> &'static str {
        "panicking"
    }

    fn model(&self) -> &str {
        "panicking-model"
    }

    async fn generate(
        &self,
        _prompt: &str,
        _params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        panic!("unexpected failure inside provider");
    }
}

#[tokio::test]
async fn provider_panic_becomes_generic_internal_error() {
    let app = build_router(AppState::new(PoemGenerator::new(Arc::new(PanickingProvider))));

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/generate-poem")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(autumn_request().to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().contains_key("x-request-id"));
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"detail": "Internal server error"}));
}
