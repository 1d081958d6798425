use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use selfcheck::config::{NotifierConfig, ReportConfig, ScoringConfig};
use selfcheck::notify::SubmissionDispatcher;
use selfcheck::report::ReportFormatter;
use selfcheck::submission::{submission_router, SubmissionService, TRAIT_SUBMIT_PATH};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn notifier_config(server: &MockServer) -> NotifierConfig {
    NotifierConfig {
        bot_token: Some("42:secret".to_string()),
        chat_id: Some("-100777".to_string()),
        api_base: server.uri(),
        timeout: Duration::from_secs(5),
    }
}

fn service(config: &NotifierConfig) -> Arc<SubmissionService> {
    let dispatcher = SubmissionDispatcher::from_config(config).expect("dispatcher builds");
    Arc::new(
        SubmissionService::new(
            ScoringConfig::default(),
            ReportFormatter::new(ReportConfig::default()),
            dispatcher,
        )
        .expect("catalog is valid"),
    )
}

fn submission_body() -> Value {
    let answers: serde_json::Map<String, Value> = (1..=20)
        .map(|id: u8| (id.to_string(), json!(if id <= 10 { 2 } else { 1 })))
        .collect();
    json!({
        "score": 12,
        "level": "low",
        "answers": answers,
        "timestamp": "2025-01-04T23:20:00Z",
        "userAgent": "Mozilla/5.0 (Linux; Android 14) Chrome/126.0 Mobile Safari/537.36",
        "contactPhone": "+880 1700"
    })
}

async fn post_submission(service: Arc<SubmissionService>) -> (StatusCode, Value) {
    let response = submission_router(service)
        .oneshot(
            Request::post(TRAIT_SUBMIT_PATH)
                .header(header::CONTENT_TYPE, "application/json")
                .header("x-real-ip", "198.51.100.20")
                .body(Body::from(submission_body().to_string()))
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

#[tokio::test]
async fn submission_is_scored_server_side_and_delivered_to_telegram() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot42:secret/sendMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = post_submission(service(&notifier_config(&server))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "Result recorded"}));

    let requests = server.received_requests().await.expect("recording enabled");
    let sent: Value = serde_json::from_slice(&requests[0].body).expect("json payload");
    assert_eq!(sent["chat_id"], json!("-100777"));
    assert_eq!(sent["parse_mode"], json!("Markdown"));

    let text = sent["text"].as_str().expect("text field");
    assert!(text.contains("🔴 *Result:* High (30+)"), "client score/level ignored");
    assert!(text.contains("📊 *Total Score:* 30 / 40 (75%)"));
    assert!(text.contains("├ F1 (Interpersonal/Affective): *15*/16"));
    assert!(text.contains("└ F2 (Lifestyle/Antisocial): *15*/24"));
    assert!(text.contains("🌐 IP: `198.51.100.20`"));
    assert!(text.contains("🖥️ Browser: 📱 Chrome"));
    assert!(text.contains("⏰ Time: Jan 5, 2025, 5:20 AM"));
    assert!(text.contains("📱 Phone: +880 1700"));
    assert!(text.ends_with("⚠️ _Not a clinical diagnosis_"));
}

#[tokio::test]
async fn telegram_rejection_yields_notification_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "ok": false,
            "description": "Forbidden: bot was kicked from the group chat"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = post_submission(service(&notifier_config(&server))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": false, "message": "Notification failed"}));
}

#[tokio::test]
async fn missing_credentials_skip_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = notifier_config(&server);
    config.chat_id = None;

    let (status, body) = post_submission(service(&config)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": false, "message": "Notification failed"}));
}
