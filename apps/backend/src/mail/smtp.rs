use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use super::{login_email_body, MailError, Notifier, LOGIN_SUBJECT};
use crate::logging::pii::Redacted;

/// SMTP relay settings. Port 587 with STARTTLS is the expected setup.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Envelope sender; defaults to `username`
    pub from: Option<String>,
}

impl SmtpSettings {
    fn credentials(&self) -> Result<Credentials, MailError> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Err(MailError::Config("SMTP credentials not set".to_string()));
        }
        Ok(Credentials::new(
            self.username.clone(),
            self.password.clone(),
        ))
    }

    fn sender(&self) -> &str {
        self.from.as_deref().unwrap_or(self.username.as_str())
    }
}

/// Sends login emails over an authenticated STARTTLS connection.
///
/// The transport is built without pooling: every send opens its own
/// connection, which is closed when the send completes or fails.
pub struct SmtpNotifier {
    settings: SmtpSettings,
}

impl SmtpNotifier {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    pub fn compose(
        &self,
        to: &str,
        action_link: &str,
        display_name: &str,
    ) -> Result<Message, MailError> {
        let from: Mailbox = self.settings.sender().parse()?;
        let to: Mailbox = to.parse()?;

        Ok(Message::builder()
            .from(from)
            .to(to)
            .subject(LOGIN_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(login_email_body(action_link, display_name))?)
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_login_email(
        &self,
        to: &str,
        action_link: &str,
        display_name: &str,
    ) -> Result<(), MailError> {
        let credentials = self.settings.credentials()?;
        let message = self.compose(to, action_link, display_name)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.settings.host)?
            .port(self.settings.port)
            .credentials(credentials)
            .build();

        transport.send(message).await?;

        info!(to = %Redacted(to), "Login email sent");
        Ok(())
    }
}
