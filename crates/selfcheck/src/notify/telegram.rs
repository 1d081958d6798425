use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{Notifier, NotifyError};
use crate::config::NotifierConfig;

/// Telegram Bot API `sendMessage` client.
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
    timeout: Duration,
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

#[derive(Deserialize)]
struct SendMessageResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramNotifier {
    pub fn new(
        api_base: impl Into<String>,
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| NotifyError::Client(err.to_string()))?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            timeout,
        })
    }

    /// `Ok(None)` when credentials are absent.
    pub fn from_config(config: &NotifierConfig) -> Result<Option<Self>, NotifyError> {
        match config.credentials() {
            Some((token, chat_id)) => {
                Self::new(config.api_base.clone(), token, chat_id, config.timeout).map(Some)
            }
            None => Ok(None),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.bot_token)
    }

    fn map_transport_error(&self, err: reqwest::Error) -> NotifyError {
        if err.is_timeout() {
            NotifyError::Timeout(self.timeout.as_secs())
        } else {
            // reqwest embeds the URL, and with it the bot token, in its messages.
            NotifyError::Network(err.without_url().to_string())
        }
    }
}

impl std::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("api_base", &self.api_base)
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &'static str {
        "telegram"
    }

    #[instrument(skip(self, text), fields(chat_id = %self.chat_id, bytes = text.len()))]
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let body = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
            parse_mode: "Markdown",
        };

        let response = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|err| self.map_transport_error(err))?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|err| self.map_transport_error(err))?;
        let parsed = serde_json::from_str::<SendMessageResponse>(&raw);

        if !status.is_success() {
            return Err(match parsed {
                Ok(SendMessageResponse {
                    description: Some(description),
                    ..
                }) => NotifyError::Rejected(description),
                _ => NotifyError::Status {
                    status: status.as_u16(),
                    body: raw,
                },
            });
        }

        match parsed {
            Ok(SendMessageResponse { ok: true, .. }) => Ok(()),
            Ok(SendMessageResponse { description, .. }) => Err(NotifyError::Rejected(
                description.unwrap_or_else(|| "ok=false".to_string()),
            )),
            Err(err) => Err(NotifyError::InvalidResponse(err.to_string())),
        }
    }
}
