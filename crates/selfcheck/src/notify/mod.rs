//! Outbound notification sink and the dispatcher that shields callers from
//! its failures.

mod dispatcher;
mod telegram;

pub use dispatcher::SubmissionDispatcher;
pub use telegram::TelegramNotifier;

use async_trait::async_trait;

/// Destination for rendered reports.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("unable to build HTTP client: {0}")]
    Client(String),
    #[error("request timed out after {0}s")]
    Timeout(u64),
    #[error("network error: {0}")]
    Network(String),
    #[error("sink returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("sink rejected message: {0}")]
    Rejected(String),
    #[error("unreadable sink response: {0}")]
    InvalidResponse(String),
}
