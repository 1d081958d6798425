use crate::cli::ServeArgs;
use crate::infra::{build_submission_service, AppState};
use crate::routes::with_submission_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use selfcheck::config::AppConfig;
use selfcheck::error::AppError;
use selfcheck::notify::SubmissionDispatcher;
use selfcheck::telemetry;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let dispatcher = SubmissionDispatcher::from_config(&config.notifier)?;
    if dispatcher.is_enabled() {
        info!(chat_id = ?config.notifier.chat_id, "telegram notifications enabled");
    } else {
        warn!("TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID missing; submissions will not be relayed");
    }

    let service = build_submission_service(config.scoring, config.report, dispatcher)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = with_submission_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        strict_validation = config.scoring.strict_validation,
        "selfcheck relay ready"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
