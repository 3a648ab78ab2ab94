//! Log-only delivery channel.

use async_trait::async_trait;

use crate::{DeliveryError, VerificationRecipient, VerificationSender};

/// Writes verification codes to the log instead of sending them.
///
/// Codes are logged at `debug`, so they only appear when that level is enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogVerificationSender;

#[async_trait]
impl VerificationSender for LogVerificationSender {
    async fn send_verification_code(
        &self,
        recipient: &VerificationRecipient,
        code: u64,
        key: &str,
    ) -> Result<(), DeliveryError> {
        tracing::debug!(
            user_id = recipient.user_id,
            username = %recipient.username,
            mobile = ?recipient.mobile,
            code,
            key,
            "Verification code issued (log delivery)",
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn log_delivery_always_succeeds() {
        let recipient = VerificationRecipient {
            user_id: 1,
            username: "alice".into(),
            email: "alice@example.com".into(),
            mobile: Some("09120000000".into()),
        };
        LogVerificationSender
            .send_verification_code(&recipient, 123_456, "key")
            .await
            .unwrap();
    }
}
