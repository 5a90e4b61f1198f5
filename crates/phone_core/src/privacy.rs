//! Privacy utilities for log redaction
//!
//! Phone numbers are personal data. Nothing in this workspace logs a full
//! number: log lines carry a masked form for humans and a salted fingerprint
//! for correlating entries belonging to the same number.

use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

/// Number of trailing digits left visible when masking
const VISIBLE_DIGITS: usize = 4;

/// Length of the hex fingerprint written to logs
const FINGERPRINT_LEN: usize = 12;

/// Salted pseudonymization of phone numbers
pub struct PrivacyProcessor {
    salt: Vec<u8>,
}

impl PrivacyProcessor {
    /// Create a processor with a fixed salt
    ///
    /// Fingerprints are stable across restarts only when the salt is.
    pub fn new(salt: Vec<u8>) -> Self {
        debug!("Privacy processor initialized with {}-byte salt", salt.len());
        Self { salt }
    }

    /// Create a processor with a random per-process salt
    pub fn with_random_salt() -> Self {
        Self::new(Uuid::new_v4().as_bytes().to_vec())
    }

    /// Short salted SHA-256 fingerprint of a number
    pub fn fingerprint(&self, number: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.salt);
        hasher.update(number.as_bytes());
        let digest = hex::encode(hasher.finalize());
        digest[..FINGERPRINT_LEN].to_string()
    }
}

/// Mask every digit except the last four
///
/// Non-digit characters are kept so the shape of the input stays readable.
pub fn mask_number(number: &str) -> String {
    let total_digits = number.chars().filter(|c| c.is_ascii_digit()).count();
    let hidden = total_digits.saturating_sub(VISIBLE_DIGITS);

    let mut seen = 0;
    number
        .chars()
        .map(|c| {
            if c.is_ascii_digit() {
                seen += 1;
                if seen <= hidden {
                    return '*';
                }
            }
            c
        })
        .collect()
}
