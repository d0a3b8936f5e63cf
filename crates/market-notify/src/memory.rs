//! In-Memory Notifier
//!
//! Records messages instead of sending them.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{NotifyError, Result};
use crate::notifier::Notifier;

/// A message accepted by [`MemoryNotifier`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentMessage {
    pub subject: String,
    pub body: String,
}

/// In-memory notifier (for development and tests)
#[derive(Default)]
pub struct MemoryNotifier {
    sent: RwLock<Vec<SentMessage>>,
    fail: bool,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier that rejects every message.
    pub fn failing() -> Self {
        Self {
            sent: RwLock::default(),
            fail: true,
        }
    }

    pub async fn sent(&self) -> Vec<SentMessage> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn send(&self, subject: &str, body: &str) -> Result<()> {
        if self.fail {
            return Err(NotifyError::Rejected(format!("{subject}: transport offline")));
        }

        self.sent.write().await.push(SentMessage {
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
