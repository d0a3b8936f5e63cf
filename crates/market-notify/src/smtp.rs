//! SMTP Notifier
//!
//! Sends the report as a plain-text UTF-8 mail through an authenticated
//! STARTTLS relay.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use crate::error::{NotifyError, Result};
use crate::notifier::Notifier;

const DEFAULT_HOST: &str = "smtp.gmail.com";
const DEFAULT_PORT: u16 = 587;

/// SMTP settings
#[derive(Clone)]
pub struct SmtpConfig {
    /// Relay host
    pub host: String,

    /// Submission port (STARTTLS)
    pub port: u16,

    /// Login user
    pub username: String,

    /// Login password (app password for Gmail)
    pub password: String,

    /// From address, defaults to the login user
    pub sender: String,

    /// To address, defaults to the login user
    pub recipient: String,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("sender", &self.sender)
            .field("recipient", &self.recipient)
            .finish()
    }
}

impl SmtpConfig {
    /// Read `MONITOR_SMTP_*`, `MONITOR_SENDER` and `MONITOR_RECIPIENT`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| get(key).ok_or_else(|| NotifyError::Config(format!("{key} not set")));

        let username = required("MONITOR_SMTP_USER")?;
        let password = required("MONITOR_SMTP_PASSWORD")?;

        let port = match get("MONITOR_SMTP_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| NotifyError::Config(format!("MONITOR_SMTP_PORT is not a port: {raw}")))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: get("MONITOR_SMTP_HOST").unwrap_or_else(|| DEFAULT_HOST.into()),
            port,
            sender: get("MONITOR_SENDER").unwrap_or_else(|| username.clone()),
            recipient: get("MONITOR_RECIPIENT").unwrap_or_else(|| username.clone()),
            username,
            password,
        })
    }
}

/// Notifier backed by an SMTP relay
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    recipient: Mailbox,
}

impl SmtpNotifier {
    /// Validate the addresses and prepare the transport. No connection is
    /// made until the first send.
    pub fn new(config: SmtpConfig) -> Result<Self> {
        let sender: Mailbox = config.sender.parse()?;
        let recipient: Mailbox = config.recipient.parse()?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(config.username, config.password))
            .build();

        Ok(Self {
            transport,
            sender,
            recipient,
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, subject: &str, body: &str) -> Result<()> {
        let message = Message::builder()
            .from(self.sender.clone())
            .to(self.recipient.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        let response = self.transport.send(message).await?;
        debug!(code = %response.code(), "SMTP relay accepted message");

        if response.is_positive() {
            Ok(())
        } else {
            Err(NotifyError::Rejected(response.code().to_string()))
        }
    }

    fn name(&self) -> &str {
        "smtp"
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_config_defaults_to_user() {
        let config = SmtpConfig::from_lookup(lookup(&[
            ("MONITOR_SMTP_USER", "me@example.com"),
            ("MONITOR_SMTP_PASSWORD", "app-password"),
        ]))
        .unwrap();

        assert_eq!(config.host, "smtp.gmail.com");
        assert_eq!(config.port, 587);
        assert_eq!(config.sender, "me@example.com");
        assert_eq!(config.recipient, "me@example.com");
    }

    #[test]
    fn test_config_overrides() {
        let config = SmtpConfig::from_lookup(lookup(&[
            ("MONITOR_SMTP_HOST", "mail.example.com"),
            ("MONITOR_SMTP_PORT", "2525"),
            ("MONITOR_SMTP_USER", "bot@example.com"),
            ("MONITOR_SMTP_PASSWORD", "secret"),
            ("MONITOR_RECIPIENT", "desk@example.com"),
        ]))
        .unwrap();

        assert_eq!(config.host, "mail.example.com");
        assert_eq!(config.port, 2525);
        assert_eq!(config.sender, "bot@example.com");
        assert_eq!(config.recipient, "desk@example.com");
    }

    #[test]
    fn test_config_requires_credentials() {
        let err = SmtpConfig::from_lookup(lookup(&[("MONITOR_SMTP_USER", "me@example.com")])).unwrap_err();
        assert!(err.to_string().contains("MONITOR_SMTP_PASSWORD"));

        let err = SmtpConfig::from_lookup(lookup(&[
            ("MONITOR_SMTP_USER", "  "),
            ("MONITOR_SMTP_PASSWORD", "secret"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("MONITOR_SMTP_USER"));
    }

    #[test]
    fn test_config_rejects_bad_port() {
        let err = SmtpConfig::from_lookup(lookup(&[
            ("MONITOR_SMTP_USER", "me@example.com"),
            ("MONITOR_SMTP_PASSWORD", "secret"),
            ("MONITOR_SMTP_PORT", "smtp"),
        ]))
        .unwrap_err();
        assert!(matches!(err, NotifyError::Config(_)));
    }

    #[test]
    fn test_debug_hides_password() {
        let config = SmtpConfig::from_lookup(lookup(&[
            ("MONITOR_SMTP_USER", "me@example.com"),
            ("MONITOR_SMTP_PASSWORD", "hunter2"),
        ]))
        .unwrap();
        assert!(!format!("{config:?}").contains("hunter2"));
    }

    #[test]
    fn test_notifier_rejects_bad_address() {
        let mut config = SmtpConfig::from_lookup(lookup(&[
            ("MONITOR_SMTP_USER", "me@example.com"),
            ("MONITOR_SMTP_PASSWORD", "secret"),
        ]))
        .unwrap();
        config.recipient = "not an address".into();

        assert!(matches!(SmtpNotifier::new(config), Err(NotifyError::Address(_))));
    }
}
