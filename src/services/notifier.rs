//! Notification channel interface and fan-out hub

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::NotifyError;
use crate::models::Notification;
use crate::services::email::EmailNotifier;
use crate::services::telegram::TelegramNotifier;

/// One delivery channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn channel(&self) -> &'static str;

    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Logs messages instead of sending them.
pub struct DryRunNotifier;

#[async_trait]
impl Notifier for DryRunNotifier {
    fn channel(&self) -> &'static str {
        "dry-run"
    }

    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        info!(
            subject = %notification.subject,
            "[DRY RUN] {}",
            notification.body
        );
        Ok(())
    }
}

/// Outcome of one broadcast.
#[derive(Debug, Default)]
pub struct DeliveryReport {
    pub delivered: Vec<&'static str>,
    pub failures: Vec<NotifyError>,
}

impl DeliveryReport {
    pub fn all_delivered(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Fans a notification out to every configured channel.
///
/// Channels are attempted in order and independently; a failing channel never
/// prevents the others from being tried.
#[derive(Default)]
pub struct NotificationHub {
    channels: Vec<Box<dyn Notifier>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_channel(mut self, channel: Box<dyn Notifier>) -> Self {
        self.channels.push(channel);
        self
    }

    /// Build the channels enabled by `config`.
    ///
    /// Dry-run replaces every real channel with a single logging one. Channels whose
    /// credentials are missing are skipped with a warning.
    pub fn from_config(config: &Config, timeout: Duration) -> Result<Self, NotifyError> {
        if config.dry_run {
            info!("NotificationHub: dry run enabled, messages will only be logged");
            return Ok(Self::new().with_channel(Box::new(DryRunNotifier)));
        }

        let mut hub = Self::new();
        match &config.telegram {
            Some(telegram) => {
                hub = hub.with_channel(Box::new(TelegramNotifier::new(telegram, timeout)?));
            }
            None => warn!("Telegram not configured (TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID)"),
        }
        match &config.email {
            Some(email) => {
                hub = hub.with_channel(Box::new(EmailNotifier::new(email, timeout)?));
            }
            None => warn!("Email not configured (EMAIL_USER / EMAIL_PASS / EMAIL_TO)"),
        }
        Ok(hub)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn channel_names(&self) -> Vec<&'static str> {
        self.channels.iter().map(|c| c.channel()).collect()
    }

    pub async fn broadcast(&self, notification: &Notification) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        for channel in &self.channels {
            match channel.send(notification).await {
                Ok(()) => {
                    debug!(channel = channel.channel(), "NotificationHub: delivered");
                    report.delivered.push(channel.channel());
                }
                Err(e) => {
                    error!(
                        channel = channel.channel(),
                        error = %e,
                        "NotificationHub: delivery failed on {}",
                        channel.channel()
                    );
                    report.failures.push(e);
                }
            }
        }

        report
    }
}
