use metrics_exporter_prometheus::PrometheusHandle;
use selfcheck::config::{ReportConfig, ScoringConfig};
use selfcheck::error::AppError;
use selfcheck::notify::SubmissionDispatcher;
use selfcheck::report::ReportFormatter;
use selfcheck::submission::SubmissionService;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn build_submission_service(
    scoring: ScoringConfig,
    report: ReportConfig,
    dispatcher: SubmissionDispatcher,
) -> Result<Arc<SubmissionService>, AppError> {
    let service = SubmissionService::new(scoring, ReportFormatter::new(report), dispatcher)?;
    Ok(Arc::new(service))
}
