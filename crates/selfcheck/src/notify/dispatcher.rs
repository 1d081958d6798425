use std::sync::Arc;

use tracing::{info, warn};

use super::{Notifier, NotifyError, TelegramNotifier};
use crate::config::NotifierConfig;

/// Relays rendered reports to the configured sink. Delivery failures are
/// logged and reported as `false`; they never reach the HTTP caller.
#[derive(Clone, Default)]
pub struct SubmissionDispatcher {
    notifier: Option<Arc<dyn Notifier>>,
}

impl SubmissionDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier: Some(notifier),
        }
    }

    /// Dispatch short-circuits to `false` without any network I/O.
    pub fn disabled() -> Self {
        Self { notifier: None }
    }

    pub fn from_config(config: &NotifierConfig) -> Result<Self, NotifyError> {
        Ok(match TelegramNotifier::from_config(config)? {
            Some(notifier) => Self::new(Arc::new(notifier)),
            None => Self::disabled(),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.notifier.is_some()
    }

    pub async fn dispatch(&self, report: &str) -> bool {
        let Some(notifier) = &self.notifier else {
            warn!("notification credentials not configured; skipping dispatch");
            return false;
        };

        match notifier.send(report).await {
            Ok(()) => {
                info!(sink = notifier.name(), "submission notification sent");
                true
            }
            Err(err) => {
                warn!(sink = notifier.name(), error = %err, "submission notification failed");
                false
            }
        }
    }
}

impl std::fmt::Debug for SubmissionDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionDispatcher")
            .field("sink", &self.notifier.as_ref().map(|notifier| notifier.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        messages: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notifier for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        async fn send(&self, text: &str) -> Result<(), NotifyError> {
            self.messages.lock().expect("lock").push(text.to_string());
            Ok(())
        }
    }

    struct Unreachable;

    #[async_trait]
    impl Notifier for Unreachable {
        fn name(&self) -> &'static str {
            "unreachable"
        }

        async fn send(&self, _text: &str) -> Result<(), NotifyError> {
            Err(NotifyError::Network("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn missing_credentials_disable_dispatch() {
        let dispatcher =
            SubmissionDispatcher::from_config(&NotifierConfig::disabled()).expect("builds");
        assert!(!dispatcher.is_enabled());
        assert!(!dispatcher.dispatch("report").await);
    }

    #[tokio::test]
    async fn delivers_report_through_notifier() {
        let recorder = Arc::new(Recorder::default());
        let dispatcher = SubmissionDispatcher::new(recorder.clone());
        assert!(dispatcher.dispatch("report body").await);
        assert_eq!(
            *recorder.messages.lock().expect("lock"),
            vec!["report body".to_string()]
        );
    }

    #[tokio::test]
    async fn transport_failure_is_reported_as_false() {
        let dispatcher = SubmissionDispatcher::new(Arc::new(Unreachable));
        assert!(!dispatcher.dispatch("report").await);
    }
}
