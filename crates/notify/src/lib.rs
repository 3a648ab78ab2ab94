//! Verification-code delivery.
//!
//! The API hands every freshly issued code to a [`VerificationSender`]. Two
//! channels ship here: [`email::EmailVerificationSender`] over SMTP and
//! [`log::LogVerificationSender`] for deployments without a mail server.

use async_trait::async_trait;
use thrush_core::types::DbId;

pub mod email;
pub mod log;

/// Who a verification code is addressed to.
#[derive(Debug, Clone)]
pub struct VerificationRecipient {
    pub user_id: DbId,
    pub username: String,
    pub email: String,
    pub mobile: Option<String>,
}

/// Error type for delivery failures. Never rolls back the user that triggered it.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

/// A channel that delivers verification codes to users.
#[async_trait]
pub trait VerificationSender: Send + Sync {
    /// Deliver `code` to `recipient`. `key` is the encrypted form the user
    /// submits back alongside the code.
    async fn send_verification_code(
        &self,
        recipient: &VerificationRecipient,
        code: u64,
        key: &str,
    ) -> Result<(), DeliveryError>;
}
