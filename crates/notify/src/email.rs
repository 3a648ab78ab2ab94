//! Verification-code delivery via SMTP.
//!
//! [`EmailVerificationSender`] wraps the `lettre` async SMTP transport.
//! Configuration is loaded from environment variables; if `SMTP_HOST` is not
//! set, [`EmailConfig::from_env`] returns `None` and the caller falls back to
//! log delivery.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::{DeliveryError, VerificationRecipient, VerificationSender};

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@thrush.local";

/// Configuration for the SMTP delivery channel.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set.
    ///
    /// | Variable        | Required | Default                 |
    /// |-----------------|----------|-------------------------|
    /// | `SMTP_HOST`     | yes      | --                      |
    /// | `SMTP_PORT`     | no       | `587`                   |
    /// | `SMTP_FROM`     | no       | `noreply@thrush.local`  |
    /// | `SMTP_USER`     | no       | --                      |
    /// | `SMTP_PASSWORD` | no       | --                      |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

/// Sends verification codes by email.
pub struct EmailVerificationSender {
    config: EmailConfig,
}

impl EmailVerificationSender {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Assemble the plain-text verification message.
    pub fn build_message(
        &self,
        recipient: &VerificationRecipient,
        code: u64,
        key: &str,
    ) -> Result<Message, DeliveryError> {
        let body = format!(
            "Hello {},\n\nYour verification code is {code}.\n\
             Submit it together with this key to activate your account:\n{key}\n",
            recipient.username
        );

        Message::builder()
            .from(self.config.from_address.parse()?)
            .to(recipient.email.parse()?)
            .subject("[Thrush] Verify your account")
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| DeliveryError::Build(e.to_string()))
    }
}

#[async_trait]
impl VerificationSender for EmailVerificationSender {
    async fn send_verification_code(
        &self,
        recipient: &VerificationRecipient,
        code: u64,
        key: &str,
    ) -> Result<(), DeliveryError> {
        let email = self.build_message(recipient, code, key)?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(user_id = recipient.user_id, "Verification email sent");
        Ok(())
    }
}
