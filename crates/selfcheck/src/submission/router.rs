use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::Utc;
use serde_json::json;
use tracing::{error, warn};

use super::domain::{IncompleteSubmissionResponse, SubmissionRequest, SubmissionResponse};
use super::service::{SubmissionError, SubmissionService};
use crate::error::INTERNAL_ERROR_MESSAGE;
use crate::questionnaire::QuestionnaireKind;

pub const TRAIT_SUBMIT_PATH: &str = "/api/submit";
pub const REACTIONS_SUBMIT_PATH: &str = "/api/submit-reactions";

const UNKNOWN_ADDRESS: &str = "Unknown";

/// Router exposing both submission endpoints. Any method other than POST is
/// answered with 405.
pub fn submission_router(service: Arc<SubmissionService>) -> Router {
    Router::new()
        .route(
            TRAIT_SUBMIT_PATH,
            post(submit_traits_handler).fallback(method_not_allowed),
        )
        .route(
            REACTIONS_SUBMIT_PATH,
            post(submit_reactions_handler).fallback(method_not_allowed),
        )
        .with_state(service)
}

pub(crate) async fn submit_traits_handler(
    State(service): State<Arc<SubmissionService>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    payload: Result<Json<SubmissionRequest>, JsonRejection>,
) -> Response {
    handle_submission(
        QuestionnaireKind::TraitInventory,
        &service,
        client_address(&headers, connect_info.map(|ConnectInfo(addr)| addr)),
        payload,
    )
    .await
}

pub(crate) async fn submit_reactions_handler(
    State(service): State<Arc<SubmissionService>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    payload: Result<Json<SubmissionRequest>, JsonRejection>,
) -> Response {
    handle_submission(
        QuestionnaireKind::Reactions,
        &service,
        client_address(&headers, connect_info.map(|ConnectInfo(addr)| addr)),
        payload,
    )
    .await
}

async fn handle_submission(
    kind: QuestionnaireKind,
    service: &SubmissionService,
    remote_addr: String,
    payload: Result<Json<SubmissionRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(quiz = kind.label(), error = %rejection.body_text(), "unreadable submission body");
            return internal_error();
        }
    };

    let context = request.context(remote_addr, Utc::now());
    match service.submit(kind, &request, context).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(SubmissionResponse::from_delivery(outcome.delivered)),
        )
            .into_response(),
        Err(SubmissionError::Incomplete(failure)) => {
            warn!(
                quiz = kind.label(),
                missing = ?failure.missing,
                invalid = ?failure.out_of_domain,
                "rejected incomplete submission"
            );
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(IncompleteSubmissionResponse::from(failure)),
            )
                .into_response()
        }
        Err(other) => {
            error!(quiz = kind.label(), error = %other, "submission failed");
            internal_error()
        }
    }
}

pub(crate) async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
        .into_response()
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "success": false, "error": INTERNAL_ERROR_MESSAGE })),
    )
        .into_response()
}

/// First `X-Forwarded-For` entry, then `X-Real-IP`, then the socket peer.
pub fn client_address(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    if let Some(first) = header("x-forwarded-for")
        .and_then(|chain| chain.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        return first.to_string();
    }

    if let Some(real_ip) = header("x-real-ip") {
        return real_ip.to_string();
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_ADDRESS.to_string())
}
