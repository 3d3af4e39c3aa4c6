use serde::{Deserialize, Serialize};

/// Outbound message handed to every notification channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Used by channels that have one (email)
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Canned message for `--test` connectivity checks.
    pub fn connectivity_test() -> Self {
        Self::new("✅ Test Alert", "✅ Test alert: this is a test notification.")
    }
}
