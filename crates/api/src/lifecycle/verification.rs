//! Verification codes for new accounts.
//!
//! A code is drawn uniformly from the configured digit range, encrypted with
//! the deployment key, and remembered as `encrypted -> user_id` until its
//! lifetime runs out. The encrypted form travels to the user together with the
//! code and comes back on `POST /auth/verify`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use rand::Rng;
use sqlx::PgPool;
use thrush_core::cache::TtlCache;
use thrush_core::error::CoreError;
use thrush_core::types::DbId;
use thrush_core::verification::{generate_code, CodeCipher, CodeRange};
use thrush_db::error::RepoResult;
use thrush_db::repositories::UserRepo;
use thrush_notify::{VerificationRecipient, VerificationSender};

use super::{CreatedEntity, OnCreateHook};
use crate::config::LifecycleConfig;

/// A freshly issued code and its encrypted lookup key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCode {
    pub code: u64,
    pub key: String,
}

/// Issues and redeems verification codes.
pub struct VerificationCodes {
    cache: TtlCache<DbId>,
    cipher: CodeCipher,
    range: CodeRange,
    life_time: Duration,
}

impl VerificationCodes {
    pub fn new(config: &LifecycleConfig, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            cache: TtlCache::new(clock),
            cipher: config.code_cipher.clone(),
            range: config.code_range,
            life_time: config.code_life_time,
        }
    }

    pub fn issue(&self, user_id: DbId) -> Result<IssuedCode, CoreError> {
        self.issue_with(user_id, &mut rand::rng())
    }

    /// Issue a code drawn from `rng`.
    ///
    /// Earlier codes for the same user stay valid until they expire.
    pub fn issue_with<R: Rng + ?Sized>(
        &self,
        user_id: DbId,
        rng: &mut R,
    ) -> Result<IssuedCode, CoreError> {
        let code = generate_code(self.range, rng);
        let key = self.cipher.encrypt(code)?;
        self.cache.set(key.clone(), user_id, self.life_time);
        Ok(IssuedCode { code, key })
    }

    /// Redeem `code` against `key`, returning the user it was issued to.
    ///
    /// Unknown or expired keys are `NotFoundByKey`; a code that does not match
    /// the key is a validation error and leaves the entry in place.
    pub fn consume(&self, key: &str, code: u64) -> Result<DbId, CoreError> {
        let user_id = self.cache.get(key).ok_or_else(|| CoreError::NotFoundByKey {
            entity: "verification code",
            key: key.to_string(),
        })?;

        if self.cipher.decrypt(key)? != code {
            return Err(CoreError::Validation("Invalid verification code".into()));
        }

        // A concurrent redeem may have taken it first.
        self.cache
            .take(key)
            .filter(|taken| *taken == user_id)
            .ok_or_else(|| CoreError::NotFoundByKey {
                entity: "verification code",
                key: key.to_string(),
            })
    }

    /// Drop expired entries, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.cache.purge_expired()
    }

    pub fn pending(&self) -> usize {
        self.cache.len()
    }
}

/// Post-commit hook issuing a code to every new user and handing it to the
/// delivery channel.
pub struct VerificationIssuer {
    codes: Arc<VerificationCodes>,
    sender: Arc<dyn VerificationSender>,
}

impl VerificationIssuer {
    pub fn new(codes: Arc<VerificationCodes>, sender: Arc<dyn VerificationSender>) -> Self {
        Self { codes, sender }
    }
}

#[async_trait]
impl OnCreateHook for VerificationIssuer {
    fn name(&self) -> &'static str {
        "verification_issuer"
    }

    fn applies_to(&self, model_name: &str) -> bool {
        model_name == "user"
    }

    async fn after_commit(&self, pool: &PgPool, created: &CreatedEntity) -> RepoResult<()> {
        let user = UserRepo::find_by_id(pool, created.object_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "user",
                id: created.object_id,
            })?;

        let issued = self.codes.issue(user.id)?;
        tracing::info!(user_id = user.id, "Issued verification code");

        let recipient = VerificationRecipient {
            user_id: user.id,
            username: user.username,
            email: user.email,
            mobile: user.mobile,
        };

        if let Err(e) = self
            .sender
            .send_verification_code(&recipient, issued.code, &issued.key)
            .await
        {
            tracing::error!(user_id = recipient.user_id, error = %e, "Verification code delivery failed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use thrush_core::test_support::MutableClock;

    const TEST_KEY: &str = "MDEyMzQ1Njc4OWFiY2RlZjAxMjM0NTY3ODlhYmNkZWY=";

    fn codes(clock: Arc<MutableClock>) -> VerificationCodes {
        VerificationCodes {
            cache: TtlCache::new(clock),
            cipher: CodeCipher::from_base64_key(TEST_KEY).unwrap(),
            range: CodeRange::for_digits(6).unwrap(),
            life_time: Duration::from_secs(180),
        }
    }

    #[test]
    fn issued_code_redeems_once() {
        let clock = Arc::new(MutableClock::new(Utc::now()));
        let codes = codes(clock);
        let issued = codes.issue_with(7, &mut StdRng::seed_from_u64(1)).unwrap();

        assert!((100_000..=999_999).contains(&issued.code));
        assert_eq!(codes.consume(&issued.key, issued.code).unwrap(), 7);
        assert_matches!(
            codes.consume(&issued.key, issued.code),
            Err(CoreError::NotFoundByKey { .. })
        );
    }

    #[test]
    fn wrong_code_is_rejected_and_entry_survives() {
        let clock = Arc::new(MutableClock::new(Utc::now()));
        let codes = codes(clock);
        let issued = codes.issue_with(7, &mut StdRng::seed_from_u64(2)).unwrap();
        let wrong = if issued.code == 999_999 { 100_000 } else { issued.code + 1 };

        assert_matches!(
            codes.consume(&issued.key, wrong),
            Err(CoreError::Validation(_))
        );
        assert_eq!(codes.consume(&issued.key, issued.code).unwrap(), 7);
    }

    #[test]
    fn code_expires_after_its_life_time() {
        let clock = Arc::new(MutableClock::new(Utc::now()));
        let codes = codes(clock.clone());
        let issued = codes.issue_with(7, &mut StdRng::seed_from_u64(3)).unwrap();

        clock.advance_seconds(179);
        assert_eq!(codes.pending(), 1);

        clock.advance_seconds(1);
        assert_matches!(
            codes.consume(&issued.key, issued.code),
            Err(CoreError::NotFoundByKey { .. })
        );
    }

    #[test]
    fn repeated_issue_keeps_both_codes_live() {
        let clock = Arc::new(MutableClock::new(Utc::now()));
        let codes = codes(clock);
        let mut rng = StdRng::seed_from_u64(4);
        let first = codes.issue_with(7, &mut rng).unwrap();
        let second = codes.issue_with(7, &mut rng).unwrap();

        assert_ne!(first.key, second.key);
        assert_eq!(codes.pending(), 2);
        assert_eq!(codes.consume(&second.key, second.code).unwrap(), 7);
        assert_eq!(codes.consume(&first.key, first.code).unwrap(), 7);
    }

    #[test]
    fn purge_removes_only_expired_entries() {
        let clock = Arc::new(MutableClock::new(Utc::now()));
        let codes = codes(clock.clone());
        let mut rng = StdRng::seed_from_u64(5);
        codes.issue_with(1, &mut rng).unwrap();
        clock.advance_seconds(100);
        codes.issue_with(2, &mut rng).unwrap();
        clock.advance_seconds(100);

        assert_eq!(codes.purge_expired(), 1);
        assert_eq!(codes.pending(), 1);
    }
}
