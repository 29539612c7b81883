//! Delivery of login links to users.

pub mod smtp;

use async_trait::async_trait;

use crate::error::AppError;
use crate::errors::ErrorCode;

pub use smtp::{SmtpNotifier, SmtpSettings};

pub const LOGIN_SUBJECT: &str = "Your Magic Login Link";

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum MailError {
    #[error("mail transport is not configured: {0}")]
    Config(String),
    #[error("invalid mailbox: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("SMTP delivery failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

impl From<MailError> for AppError {
    fn from(e: MailError) -> Self {
        match e {
            MailError::Config(detail) => AppError::config(detail),
            other => AppError::internal(ErrorCode::EmailDeliveryFailed, other.to_string()),
        }
    }
}

/// Plaintext body of the login email.
pub fn login_email_body(action_link: &str, display_name: &str) -> String {
    format!(
        "Hello {display_name},\n\nClick this link to login: {action_link}\n\nThis link expires in a few minutes."
    )
}

/// Sends the login link to a user.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_login_email(
        &self,
        to: &str,
        action_link: &str,
        display_name: &str,
    ) -> Result<(), MailError>;
}
