//! Telegram Bot API channel

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::config::TelegramConfig;
use crate::error::NotifyError;
use crate::models::Notification;
use crate::services::notifier::Notifier;

const CHANNEL: &str = "telegram";

#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

pub struct TelegramNotifier {
    client: reqwest::Client,
    api_url: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(config: &TelegramConfig, timeout: Duration) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| NotifyError::Http {
                channel: CHANNEL,
                source,
            })?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: &TelegramConfig, client: reqwest::Client) -> Self {
        Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            bot_token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn channel(&self) -> &'static str {
        CHANNEL
    }

    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let url = format!("{}/bot{}/sendMessage", self.api_url, self.bot_token);

        // the URL embeds the bot token, keep it out of error messages
        let response = self
            .client
            .post(&url)
            .form(&[("chat_id", self.chat_id.as_str()), ("text", notification.body.as_str())])
            .send()
            .await
            .map_err(|e| NotifyError::Http {
                channel: CHANNEL,
                source: e.without_url(),
            })?;

        let status = response.status();
        let body: Option<SendMessageResponse> = response.json().await.ok();

        match body {
            Some(SendMessageResponse { ok: true, .. }) if status.is_success() => Ok(()),
            Some(SendMessageResponse { description, .. }) => Err(NotifyError::Rejected {
                channel: CHANNEL,
                reason: description.unwrap_or_else(|| format!("HTTP {}", status)),
            }),
            None => Err(NotifyError::Rejected {
                channel: CHANNEL,
                reason: format!("HTTP {} with unreadable body", status),
            }),
        }
    }
}
