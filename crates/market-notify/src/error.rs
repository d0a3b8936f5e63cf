//! Notification Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, NotifyError>;

/// Delivery errors
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Missing or malformed transport settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// Sender or recipient is not a valid mailbox
    #[error("Invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// Message could not be built
    #[error("Message error: {0}")]
    Message(#[from] lettre::error::Error),

    /// SMTP connection, authentication or delivery failure
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// Transport refused the message
    #[error("Delivery rejected: {0}")]
    Rejected(String),
}

impl NotifyError {
    /// Check if this error is worth another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            NotifyError::Smtp(e) => e.is_transient(),
            NotifyError::Rejected(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable() {
        assert!(NotifyError::Rejected("mailbox busy".into()).is_retryable());
        assert!(!NotifyError::Config("no user".into()).is_retryable());

        let address = "not an address".parse::<lettre::Address>().unwrap_err();
        assert!(!NotifyError::from(address).is_retryable());
    }
}
