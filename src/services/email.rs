//! SMTP email channel (implicit TLS)

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;

use crate::config::EmailConfig;
use crate::error::NotifyError;
use crate::models::Notification;
use crate::services::notifier::Notifier;

const CHANNEL: &str = "email";

pub struct EmailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl EmailNotifier {
    pub fn new(config: &EmailConfig, timeout: Duration) -> Result<Self, NotifyError> {
        let from: Mailbox = config.user.parse().map_err(|e| NotifyError::Misconfigured {
            channel: CHANNEL,
            reason: format!("invalid EMAIL_USER: {}", e),
        })?;
        let to: Mailbox = config.to.parse().map_err(|e| NotifyError::Misconfigured {
            channel: CHANNEL,
            reason: format!("invalid EMAIL_TO: {}", e),
        })?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| NotifyError::Misconfigured {
                channel: CHANNEL,
                reason: format!("invalid SMTP_HOST {}: {}", config.smtp_host, e),
            })?
            .credentials(Credentials::new(
                config.user.clone(),
                config.password.clone(),
            ))
            .timeout(Some(timeout))
            .build();

        Ok(Self { transport, from, to })
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn channel(&self) -> &'static str {
        CHANNEL
    }

    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(notification.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(notification.body.clone())
            .map_err(|e| NotifyError::Misconfigured {
                channel: CHANNEL,
                reason: e.to_string(),
            })?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Rejected {
                channel: CHANNEL,
                reason: e.to_string(),
            })?;
        Ok(())
    }
}
