pub mod smtp;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info};

use crate::config::MailConfig;

pub use smtp::SmtpTransport;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("could not build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("transport failed: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    /// HTML body
    pub body: String,
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, mail: &OutgoingMail) -> Result<(), NotifyError>;
}

/// Transport used when no SMTP relay is configured.
pub struct LogTransport;

#[async_trait]
impl MailTransport for LogTransport {
    async fn deliver(&self, mail: &OutgoingMail) -> Result<(), NotifyError> {
        info!(to = %mail.to, subject = %mail.subject, "Mail delivery disabled; message logged only");
        Ok(())
    }
}

/// Best-effort sender. `send` never fails: delivery errors are logged
/// and dropped so the triggering workflow is unaffected.
#[derive(Clone)]
pub struct Notifier {
    transport: Arc<dyn MailTransport>,
}

impl Notifier {
    pub fn new(transport: Arc<dyn MailTransport>) -> Self {
        Self { transport }
    }

    pub fn from_config(mail: &MailConfig) -> Result<Self, NotifyError> {
        let transport: Arc<dyn MailTransport> = match &mail.smtp_host {
            Some(_) => Arc::new(SmtpTransport::from_config(mail)?),
            None => {
                tracing::warn!("SMTP_HOST not set; notifications will be logged only");
                Arc::new(LogTransport)
            }
        };
        Ok(Self::new(transport))
    }

    pub async fn send(&self, to: &str, subject: &str, body: &str) {
        let mail = OutgoingMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        };
        match self.transport.deliver(&mail).await {
            Ok(()) => info!(to, "Email sent"),
            Err(e) => error!(error = %e, to, "Email failed to send"),
        }
    }
}
