//! Notifier Trait

use async_trait::async_trait;
use tracing::{error, info};

use crate::error::Result;

/// Report transport (Strategy pattern)
///
/// Implement this for each delivery channel: SMTP, a chat webhook, a file, etc.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one message
    async fn send(&self, subject: &str, body: &str) -> Result<()>;

    /// Transport name
    fn name(&self) -> &str;

    /// Send and log the outcome. Never fails; returns whether the message
    /// was accepted.
    async fn deliver(&self, subject: &str, body: &str) -> bool {
        match self.send(subject, body).await {
            Ok(()) => {
                info!(transport = self.name(), subject, "Report delivered");
                true
            }
            Err(e) => {
                error!(
                    transport = self.name(),
                    subject,
                    error = %e,
                    retryable = e.is_retryable(),
                    "Report delivery failed"
                );
                false
            }
        }
    }
}
