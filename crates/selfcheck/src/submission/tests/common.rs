use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use serde_json::Value;

use crate::config::ScoringConfig;
use crate::notify::{Notifier, NotifyError, SubmissionDispatcher};
use crate::questionnaire::RawAnswers;
use crate::report::ReportFormatter;
use crate::submission::{submission_router, SubmissionRequest, SubmissionService};

#[derive(Default)]
pub(super) struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub(super) fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("lock").clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        self.messages.lock().expect("lock").push(text.to_string());
        Ok(())
    }
}

pub(super) struct RejectingNotifier;

#[async_trait]
impl Notifier for RejectingNotifier {
    fn name(&self) -> &'static str {
        "rejecting"
    }

    async fn send(&self, _text: &str) -> Result<(), NotifyError> {
        Err(NotifyError::Rejected("Bad Request: chat not found".to_string()))
    }
}

pub(super) fn build_service(
    strict_validation: bool,
) -> (Arc<SubmissionService>, Arc<RecordingNotifier>) {
    let recorder = Arc::new(RecordingNotifier::default());
    let service = service_with_dispatcher(
        strict_validation,
        SubmissionDispatcher::new(recorder.clone()),
    );
    (service, recorder)
}

pub(super) fn service_with_dispatcher(
    strict_validation: bool,
    dispatcher: SubmissionDispatcher,
) -> Arc<SubmissionService> {
    Arc::new(
        SubmissionService::new(
            ScoringConfig { strict_validation },
            ReportFormatter::default(),
            dispatcher,
        )
        .expect("catalog definitions are valid"),
    )
}

pub(super) fn router_with_service(service: Arc<SubmissionService>) -> Router {
    submission_router(service)
}

/// Trait answers where items 1-10 score 2 and 11-20 score 1 (total 30).
pub(super) fn high_trait_answers() -> RawAnswers {
    RawAnswers::from_pairs((1..=20).map(|id| (id, if id <= 10 { 2 } else { 1 })))
}

pub(super) fn trait_request(answers: RawAnswers) -> SubmissionRequest {
    SubmissionRequest {
        answers,
        user_agent: Some("Mozilla/5.0 (iPhone) AppleWebKit Safari".to_string()),
        timestamp: Some("2025-01-04T23:20:00Z".to_string()),
        ..SubmissionRequest::default()
    }
}

pub(super) fn reactions_request(values: [i64; 7]) -> SubmissionRequest {
    SubmissionRequest {
        answers: RawAnswers::from_pairs((1..=7u8).zip(values)),
        ..SubmissionRequest::default()
    }
}

pub(super) fn json_post(path: &str, body: &Value) -> Request<Body> {
    Request::post(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("serializes")))
        .expect("request builds")
}

pub(super) async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}
