use crate::error::NotificationError;
use thesis_kernel::domain::config::MailConfig;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

/// Outgoing mail transport.
pub trait Mailer: Send + Sync + 'static {
    fn send(&self, message: &MailMessage) -> impl Future<Output = Result<(), NotificationError>> + Send;
}

/// Writes messages to the log instead of an SMTP relay. With mail disabled
/// the message is dropped.
#[derive(Debug, Clone)]
pub struct LogMailer {
    enabled: bool,
}

impl LogMailer {
    #[must_use]
    pub const fn new(config: &MailConfig) -> Self {
        Self { enabled: config.enabled }
    }
}

impl Mailer for LogMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), NotificationError> {
        if !self.enabled {
            debug!(subject = %message.subject, "Mail disabled, message discarded");
            return Ok(());
        }
        info!(
            from = %message.from,
            to = %message.to.join(", "),
            subject = %message.subject,
            body = %message.body,
            "Mail sent"
        );
        Ok(())
    }
}
