//! Verification-code generation and encryption.
//!
//! A code is a uniformly drawn decimal number with a fixed digit count. The
//! code travels to the user in clear text, while the server keeps only its
//! encrypted form (`base64(nonce || AES-256-GCM ciphertext)`) as a lookup key.

use std::fmt;

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose, Engine as _};
use rand::Rng;

use crate::error::CoreError;

/// Default number of digits in a verification code.
pub const DEFAULT_CODE_LENGTH: u32 = 6;

/// Default lifetime of an issued code, in seconds.
pub const DEFAULT_CODE_LIFE_TIME_SECS: u64 = 180;

const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

/// Inclusive numeric range of codes with exactly `digits` decimal digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeRange {
    low: u64,
    high: u64,
}

impl CodeRange {
    /// `[10^(digits-1), 10^digits - 1]`. Accepts 1 to 18 digits.
    pub fn for_digits(digits: u32) -> Result<Self, CoreError> {
        if !(1..=18).contains(&digits) {
            return Err(CoreError::Validation(format!(
                "Verification code length must be between 1 and 18, got {digits}"
            )));
        }
        let low = 10u64.pow(digits - 1);
        let high = 10u64.pow(digits) - 1;
        Ok(Self { low, high })
    }

    pub fn low(&self) -> u64 {
        self.low
    }

    pub fn high(&self) -> u64 {
        self.high
    }

    pub fn contains(&self, code: u64) -> bool {
        (self.low..=self.high).contains(&code)
    }
}

/// Draw a code uniformly from `range`.
pub fn generate_code<R: Rng + ?Sized>(range: CodeRange, rng: &mut R) -> u64 {
    rng.random_range(range.low..=range.high)
}

/// AES-256-GCM cipher for verification codes.
#[derive(Clone)]
pub struct CodeCipher {
    cipher: Aes256Gcm,
}

impl CodeCipher {
    /// Build a cipher from a standard-base64 encoded 32-byte key.
    pub fn from_base64_key(key_b64: &str) -> Result<Self, CoreError> {
        let key_bytes = general_purpose::STANDARD
            .decode(key_b64.trim())
            .map_err(|e| CoreError::Validation(format!("Verification key is not base64: {e}")))?;

        if key_bytes.len() != KEY_LEN {
            return Err(CoreError::Validation(format!(
                "Verification key must be {KEY_LEN} bytes, got {} bytes",
                key_bytes.len()
            )));
        }

        let cipher = Aes256Gcm::new_from_slice(&key_bytes)
            .map_err(|e| CoreError::Internal(format!("Failed to create cipher: {e}")))?;
        Ok(Self { cipher })
    }

    /// Encrypt `code` under a fresh random nonce.
    ///
    /// Two encryptions of the same code yield different outputs.
    pub fn encrypt(&self, code: u64) -> Result<String, CoreError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::rng().fill(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, code.to_string().as_bytes())
            .map_err(|e| CoreError::Internal(format!("Encryption failed: {e}")))?;

        let mut combined = nonce_bytes.to_vec();
        combined.extend_from_slice(&ciphertext);
        Ok(general_purpose::URL_SAFE_NO_PAD.encode(combined))
    }

    /// Recover the code from an encrypted key.
    ///
    /// Malformed, truncated or tampered input is a validation error.
    pub fn decrypt(&self, encrypted: &str) -> Result<u64, CoreError> {
        let invalid = || CoreError::Validation("Invalid verification key".into());

        let combined = general_purpose::URL_SAFE_NO_PAD
            .decode(encrypted)
            .map_err(|_| invalid())?;
        if combined.len() <= NONCE_LEN {
            return Err(invalid());
        }

        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| invalid())?;

        std::str::from_utf8(&plaintext)
            .ok()
            .and_then(|text| text.parse().ok())
            .ok_or_else(invalid)
    }
}

impl fmt::Debug for CodeCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeCipher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rand::{rngs::StdRng, SeedableRng};

    const TEST_KEY: &str = "MDEyMzQ1Njc4OWFiY2RlZjAxMjM0NTY3ODlhYmNkZWY=";

    #[test]
    fn range_for_six_digits() {
        let range = CodeRange::for_digits(6).unwrap();
        assert_eq!((range.low(), range.high()), (100_000, 999_999));
    }

    #[test]
    fn range_for_one_digit_starts_at_one() {
        let range = CodeRange::for_digits(1).unwrap();
        assert_eq!((range.low(), range.high()), (1, 9));
    }

    #[test]
    fn range_rejects_zero_and_overflowing_lengths() {
        assert_matches!(CodeRange::for_digits(0), Err(CoreError::Validation(_)));
        assert_matches!(CodeRange::for_digits(19), Err(CoreError::Validation(_)));
    }

    #[test]
    fn generated_codes_have_exact_digit_count() {
        let range = CodeRange::for_digits(4).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let code = generate_code(range, &mut rng);
            assert!(range.contains(code));
            assert_eq!(code.to_string().len(), 4);
        }
    }

    #[test]
    fn cipher_round_trips_and_uses_fresh_nonces() {
        let cipher = CodeCipher::from_base64_key(TEST_KEY).unwrap();
        let first = cipher.encrypt(123_456).unwrap();
        let second = cipher.encrypt(123_456).unwrap();

        assert_ne!(first, second);
        assert_eq!(cipher.decrypt(&first).unwrap(), 123_456);
        assert_eq!(cipher.decrypt(&second).unwrap(), 123_456);
    }

    #[test]
    fn tampered_key_is_rejected() {
        let cipher = CodeCipher::from_base64_key(TEST_KEY).unwrap();
        let encrypted = cipher.encrypt(424_242).unwrap();

        let mut bytes = general_purpose::URL_SAFE_NO_PAD.decode(&encrypted).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let tampered = general_purpose::URL_SAFE_NO_PAD.encode(bytes);

        assert_matches!(cipher.decrypt(&tampered), Err(CoreError::Validation(_)));
        assert_matches!(cipher.decrypt("not-a-key"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn key_must_be_32_bytes() {
        assert_matches!(
            CodeCipher::from_base64_key("c2hvcnQ="),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            CodeCipher::from_base64_key("%%%"),
            Err(CoreError::Validation(_))
        );
    }
}
