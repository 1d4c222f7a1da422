//! End-to-end tests for the feedback API: multipart submission through the
//! Gemini classifier boundary (mocked) down to the analytics summary.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::util::ServiceExt;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use consult_common::Config;

const BOUNDARY: &str = "test-boundary-7d1a";

fn test_config(endpoint: &str) -> Config {
    let mut config = Config::default();
    config.gemini_api_key = Some("test-key".into());
    config.gemini_endpoint = endpoint.to_string();
    config.classifier_timeout_secs = 5;
    config
}

fn multipart_body(fields: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            BOUNDARY, name, value
        ));
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));
    body
}

async fn post_feedback(app: &Router, fields: &[(&str, &str)]) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/feedback")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(fields)))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get_json(app: &Router, uri: &str) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn gemini_reply(analysis_json: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {
                "parts": [{ "text": format!("```json\n{}\n```", analysis_json) }]
            }
        }]
    })
}

const VALID_FIELDS: &[(&str, &str)] = &[
    ("name", "Ravi Kumar"),
    ("organization", "Retail Association"),
    ("email", "ravi@example.org"),
    ("clause", "Clause 7"),
    ("comment", "Great clause"),
];

#[tokio::test]
async fn submission_flows_through_to_analytics() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/v1beta/models/.*:generateContent$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply(
            r#"{"sentiment": "positive", "sentiment_score": 0.9,
                "key_phrases": ["clear drafting"],
                "suggested_action": "Keep as is", "impact": "Low",
                "relevance": "Relevant", "summary": "Supportive",
                "is_actionable": false, "stakeholder_type": "Organization"}"#,
        )))
        .mount(&server)
        .await;

    let app = consult_api::build_router(&test_config(&server.uri()));

    let (status, body) = post_feedback(&app, VALID_FIELDS).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["submission_id"].as_str().is_some());
    assert_eq!(body["analysis"]["sentiment"], "positive");

    let comments = get_json(&app, "/api/v1/analytics/comments").await;
    assert_eq!(comments.as_array().unwrap().len(), 1);
    assert_eq!(comments[0]["source"], "Ravi Kumar (Retail Association)");
    assert_eq!(comments[0]["isKeyStakeholder"], true);
    assert_eq!(comments[0]["type"], "comment");

    let summary = get_json(&app, "/api/v1/analytics/summary").await;
    assert_eq!(summary["total_comments"], 1);
    assert_eq!(summary["key_stakeholders"], 1);
    assert_eq!(summary["sentiment_distribution"]["positive"], 1);
    assert_eq!(summary["stakeholder_distribution"]["Corporate Bodies"], 1);
    assert_eq!(summary["top_concerns"].as_array().unwrap().len(), 0);

    let submissions = get_json(&app, "/api/v1/submissions/ravi@example.org").await;
    assert_eq!(submissions.as_array().unwrap().len(), 1);
    assert_eq!(submissions[0]["status"], "submitted");
}

#[tokio::test]
async fn classifier_outage_still_accepts_submission() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/v1beta/models/.*:generateContent$"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let app = consult_api::build_router(&test_config(&server.uri()));

    let (status, body) = post_feedback(&app, VALID_FIELDS).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    // The fallback record, not an error.
    assert_eq!(body["analysis"]["sentiment"], "neutral");
    assert_eq!(body["analysis"]["summary"], "Analysis unavailable");
    assert_eq!(body["analysis"]["is_actionable"], false);

    let summary = get_json(&app, "/api/v1/analytics/summary").await;
    assert_eq!(summary["total_comments"], 1);
    assert_eq!(summary["sentiment_distribution"]["neutral"], 1);
}

#[tokio::test]
async fn missing_required_field_is_client_error() {
    let server = MockServer::start().await;
    let app = consult_api::build_router(&test_config(&server.uri()));

    let fields = &[
        ("name", "Ravi Kumar"),
        ("email", "ravi@example.org"),
        ("clause", "Clause 7"),
        // comment omitted
    ];
    let (status, body) = post_feedback(&app, fields).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("comment"));

    // Nothing recorded.
    let summary = get_json(&app, "/api/v1/analytics/summary").await;
    assert_eq!(summary["total_comments"], 0);
}

#[tokio::test]
async fn negative_feedback_gates_top_concerns() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/v1beta/models/.*:generateContent$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_reply(
            r#"{"sentiment": "negative", "sentiment_score": -0.8,
                "key_phrases": ["compliance burden"],
                "suggested_action": "Add a small-company threshold",
                "impact": "High", "relevance": "Very Relevant",
                "summary": "Burden on smaller companies",
                "is_actionable": true, "stakeholder_type": "Industry Body"}"#,
        )))
        .mount(&server)
        .await;

    let app = consult_api::build_router(&test_config(&server.uri()));

    let (_, body) = post_feedback(&app, VALID_FIELDS).await;
    assert_eq!(body["analysis"]["stakeholder_type"], "Industry Body");

    let summary = get_json(&app, "/api/v1/analytics/summary").await;
    assert_eq!(summary["actionable_suggestions"], 1);
    assert_eq!(summary["stakeholder_distribution"]["Industry Associations"], 1);
    assert_eq!(summary["top_concerns"][0], "compliance burden");
}

#[tokio::test]
async fn health_endpoint_responds() {
    let server = MockServer::start().await;
    let app = consult_api::build_router(&test_config(&server.uri()));

    let health = get_json(&app, "/health").await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["service"], "consult-api");
}
