//! Phone number normalization
//!
//! Turns free-form user input into the canonical digit string used by every
//! downstream step: country code followed by the national number, no
//! separators and no leading plus.

use crate::IntelError;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Country calling code for India
pub const INDIA_COUNTRY_CODE: &str = "91";

/// Leading digits that identify a domestic mobile number
const MOBILE_LEADING_DIGITS: [char; 4] = ['6', '7', '8', '9'];

/// A validated phone number
///
/// Holds the caller's input unchanged next to the cleaned and canonical
/// forms. A `PhoneNumber` only exists when validation succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhoneNumber {
    raw: String,
    digits: String,
    canonical: String,
}

impl PhoneNumber {
    /// Parse and validate raw input
    ///
    /// # Returns
    /// * `Ok(PhoneNumber)` when the input matches one of the accepted formats
    /// * `Err(IntelError::EmptyInput)` when the input is empty
    /// * `Err(IntelError::InvalidFormat)` otherwise
    pub fn parse(raw: &str) -> Result<Self, IntelError> {
        if raw.is_empty() {
            return Err(IntelError::EmptyInput);
        }

        let digits = clean(raw);
        let canonical = canonicalize(&digits).ok_or(IntelError::InvalidFormat)?;

        debug!(
            "Normalized input ({} chars) to {}-digit canonical form",
            raw.len(),
            canonical.len()
        );

        Ok(Self {
            raw: raw.to_string(),
            digits,
            canonical,
        })
    }

    /// The input exactly as supplied
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The input with everything but digits and a leading plus removed
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Canonical digits, without a leading plus
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Canonical digits in E.164-style notation, as sent upstream
    pub fn international(&self) -> String {
        format!("+{}", self.canonical)
    }

    pub fn into_canonical(self) -> String {
        self.canonical
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

/// Validate raw input and return its canonical digit string
///
/// Accepted formats, checked in order:
/// 1. `+91` followed by 10 digits: the plus is dropped
/// 2. any other input starting with `+`: the plus is dropped
/// 3. 10 digits starting with 6-9: `91` is prepended
/// 4. 12 digits starting with `91`: returned unchanged
pub fn validate(raw: &str) -> Result<String, IntelError> {
    PhoneNumber::parse(raw).map(PhoneNumber::into_canonical)
}

/// Keep ASCII digits and a plus sign only when it is the first kept character
fn clean(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_digit() || (c == '+' && cleaned.is_empty()) {
            cleaned.push(c);
        }
    }
    cleaned
}

fn canonicalize(cleaned: &str) -> Option<String> {
    if let Some(international) = cleaned.strip_prefix('+') {
        // Covers both "+91XXXXXXXXXX" and every other international form.
        // A bare "+" yields an empty canonical number.
        return Some(international.to_string());
    }

    match cleaned.len() {
        10 if cleaned.starts_with(MOBILE_LEADING_DIGITS) => {
            Some(format!("{}{}", INDIA_COUNTRY_CODE, cleaned))
        }
        12 if cleaned.starts_with(INDIA_COUNTRY_CODE) => Some(cleaned.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ten_digit_mobile_numbers() {
        assert_eq!(validate("9876543210").unwrap(), "919876543210");
        assert_eq!(validate("7012345678").unwrap(), "917012345678");
        assert_eq!(validate("6000000000").unwrap(), "916000000000");
        assert_eq!(validate("8123456789").unwrap(), "918123456789");
    }

    #[test]
    fn test_ten_digit_numbers_with_other_leading_digits() {
        for lead in ['0', '1', '2', '3', '4', '5'] {
            let input = format!("{}123456789", lead);
            assert!(
                matches!(validate(&input), Err(IntelError::InvalidFormat)),
                "{} should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_twelve_digit_canonical_numbers() {
        assert_eq!(validate("919876543210").unwrap(), "919876543210");
        assert!(matches!(validate("929876543210"), Err(IntelError::InvalidFormat)));
    }

    #[test]
    fn test_plus_prefixed_numbers() {
        assert_eq!(validate("+919876543210").unwrap(), "919876543210");
        assert_eq!(validate("+14155550123").unwrap(), "14155550123");
        assert_eq!(validate("+44 20 7946 0958").unwrap(), "442079460958");
    }

    #[test]
    fn test_bare_plus_is_accepted() {
        assert_eq!(validate("+").unwrap(), "");
        assert_eq!(validate("+ -").unwrap(), "");
    }

    #[test]
    fn test_separators_are_stripped() {
        assert_eq!(validate("98765 43210").unwrap(), "919876543210");
        assert_eq!(validate("(987) 654-3210").unwrap(), "919876543210");
        assert_eq!(validate("+91-98765-43210").unwrap(), "919876543210");
        assert_eq!(validate("91.9876.543.210").unwrap(), "919876543210");
    }

    #[test]
    fn test_only_a_leading_plus_is_kept() {
        let phone = PhoneNumber::parse("++91 98765 43210").unwrap();
        assert_eq!(phone.digits(), "+919876543210");
        assert_eq!(phone.canonical(), "919876543210");

        // A plus after the first digit is dropped, leaving 12 digits
        assert_eq!(validate("91+9876543210").unwrap(), "919876543210");
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(validate(""), Err(IntelError::EmptyInput)));
    }

    #[test]
    fn test_invalid_formats() {
        assert!(matches!(validate("12345"), Err(IntelError::InvalidFormat)));
        assert!(matches!(validate("   "), Err(IntelError::InvalidFormat)));
        assert!(matches!(validate("abcdefghij"), Err(IntelError::InvalidFormat)));
        assert!(matches!(validate("98765432101"), Err(IntelError::InvalidFormat)));
        assert!(matches!(validate("9198765432101"), Err(IntelError::InvalidFormat)));
    }

    #[test]
    fn test_validation_is_idempotent() {
        for input in ["9876543210", "+919876543210", "919876543210", "7012345678"] {
            let canonical = validate(input).unwrap();
            assert_eq!(validate(&canonical).unwrap(), canonical);
        }
    }

    #[test]
    fn test_domestic_canonical_form_is_twelve_digits() {
        for input in ["9876543210", "+919876543210", "919876543210"] {
            let phone = PhoneNumber::parse(input).unwrap();
            assert_eq!(phone.canonical().len(), 12);
            assert!(phone.canonical().starts_with(INDIA_COUNTRY_CODE));
            assert!(phone.canonical().chars().all(|c| c.is_ascii_digit()));
        }

        assert_eq!(PhoneNumber::parse("+14155550123").unwrap().canonical(), "14155550123");
    }

    #[test]
    fn test_raw_input_is_preserved() {
        let phone = PhoneNumber::parse(" +91 98765-43210 ").unwrap();
        assert_eq!(phone.raw(), " +91 98765-43210 ");
        assert_eq!(phone.international(), "+919876543210");
        assert_eq!(phone.to_string(), "919876543210");
    }
}
