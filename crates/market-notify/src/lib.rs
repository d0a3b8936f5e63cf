//! # market-notify
//!
//! Delivery transports for the daily market report.
//!
//! ```text
//! ┌──────────────┐  subject + body  ┌──────────────────┐
//! │    Report    │ ───────────────► │    Notifier      │
//! └──────────────┘                  ├──────────────────┤
//!                                   │ SmtpNotifier     │ STARTTLS relay
//!                                   │ MemoryNotifier   │ tests, dry runs
//!                                   └──────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use market_notify::{Notifier, SmtpConfig, SmtpNotifier};
//!
//! let notifier = SmtpNotifier::new(SmtpConfig::from_env()?)?;
//!
//! // Failures are logged and reported as `false`, never raised
//! let delivered = notifier.deliver(&subject, &body).await;
//! ```

mod error;
mod memory;
mod notifier;
mod smtp;

pub use error::{NotifyError, Result};
pub use memory::{MemoryNotifier, SentMessage};
pub use notifier::Notifier;
pub use smtp::{SmtpConfig, SmtpNotifier};
