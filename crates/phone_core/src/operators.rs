//! Telecom operator and circle classification
//!
//! Maps the two-digit number series that follows the country code onto the
//! operator and licensing circle it was administratively assigned to. The
//! table is a fixed snapshot and does not account for number portability, so
//! every classification is an estimate.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

/// Placeholder for any field the table cannot resolve
pub const UNKNOWN: &str = "Unknown";

/// Number of digits in an Indian national number
const NATIONAL_NUMBER_LEN: usize = 10;

/// Operator record for a number series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorInfo {
    pub name: &'static str,
    pub network_type: &'static str,
    pub circle: &'static str,
}

/// Prefix table: series, operator, network, circle
const OPERATOR_TABLE: [(&str, &str, &str, &str); 24] = [
    ("70", "BSNL", "GSM", "Delhi"),
    ("77", "Airtel", "GSM", "Madhya Pradesh"),
    ("78", "Airtel", "GSM", "Madhya Pradesh"),
    ("79", "BSNL", "GSM", "Bihar"),
    ("80", "Airtel", "GSM", "Tamil Nadu"),
    ("81", "Airtel", "GSM", "Kolkata"),
    ("82", "Jio", "GSM", "Kolkata"),
    ("83", "Jio", "GSM", "Kolkata"),
    ("84", "Jio", "GSM", "Kolkata"),
    ("85", "Jio", "GSM", "Kolkata"),
    ("86", "Jio", "GSM", "Kolkata"),
    ("87", "Vi", "GSM", "Mumbai"),
    ("88", "Airtel", "GSM", "Karnataka"),
    ("89", "Airtel", "GSM", "Andhra Pradesh"),
    ("90", "Airtel", "GSM", "Haryana"),
    ("91", "Airtel", "GSM", "Punjab"),
    ("92", "Airtel", "GSM", "Punjab"),
    ("93", "Airtel", "GSM", "Uttar Pradesh"),
    ("94", "BSNL", "GSM", "Uttar Pradesh"),
    ("95", "Airtel", "GSM", "Uttar Pradesh"),
    ("96", "Airtel", "GSM", "Himachal Pradesh"),
    ("97", "Airtel", "GSM", "Assam"),
    ("98", "Airtel", "GSM", "Gujarat"),
    ("99", "Airtel", "GSM", "Kerala"),
];

static DIRECTORY: LazyLock<OperatorDirectory> = LazyLock::new(OperatorDirectory::new);

/// Line type guessed from the number series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LineType {
    Mobile,
    Landline,
}

impl LineType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineType::Mobile => "Mobile",
            LineType::Landline => "Landline",
        }
    }
}

impl fmt::Display for LineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying a canonical number
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    /// Series used as the lookup key
    pub prefix: String,
    pub operator_name: &'static str,
    pub circle_name: &'static str,
    pub network_type: &'static str,
    /// Heuristic only: any series missing from the table is reported as a landline
    pub line_type: LineType,
}

/// Immutable lookup over the operator table
pub struct OperatorDirectory {
    operators: HashMap<&'static str, OperatorInfo>,
}

impl OperatorDirectory {
    fn new() -> Self {
        let operators: HashMap<_, _> = OPERATOR_TABLE
            .iter()
            .map(|&(prefix, name, network_type, circle)| {
                (
                    prefix,
                    OperatorInfo {
                        name,
                        network_type,
                        circle,
                    },
                )
            })
            .collect();

        debug!("Operator directory initialized with {} series", operators.len());

        Self { operators }
    }

    /// Shared directory built from the static table
    pub fn global() -> &'static OperatorDirectory {
        &DIRECTORY
    }

    /// Look up an exact two-digit series
    pub fn lookup(&self, prefix: &str) -> Option<&OperatorInfo> {
        self.operators.get(prefix)
    }

    /// Classify a number by its series
    ///
    /// Never fails: unknown series produce an all-`"Unknown"` landline result.
    pub fn classify(&self, number: &str) -> ClassificationResult {
        let prefix = series_prefix(number);

        match self.lookup(&prefix) {
            Some(info) => ClassificationResult {
                prefix,
                operator_name: info.name,
                circle_name: info.circle,
                network_type: info.network_type,
                line_type: LineType::Mobile,
            },
            None => {
                debug!("Series {:?} not in operator table", prefix);
                ClassificationResult {
                    prefix,
                    operator_name: UNKNOWN,
                    circle_name: UNKNOWN,
                    network_type: UNKNOWN,
                    line_type: LineType::Landline,
                }
            }
        }
    }

    /// Number of series in the table
    pub fn series_count(&self) -> usize {
        self.operators.len()
    }
}

/// Classify a canonical number against the static operator table
pub fn classify(canonical: &str) -> ClassificationResult {
    OperatorDirectory::global().classify(canonical)
}

/// First two digits of the trailing national number
///
/// Inputs shorter than a national number fall back to their first two digits.
pub fn series_prefix(number: &str) -> String {
    let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();

    let start = digits.len().saturating_sub(NATIONAL_NUMBER_LEN);
    let end = (start + 2).min(digits.len());
    digits[start..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::validate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_directory_creation() {
        let directory = OperatorDirectory::global();
        assert_eq!(directory.series_count(), OPERATOR_TABLE.len());
    }

    #[test]
    fn test_airtel_gujarat() {
        let canonical = validate("9876543210").unwrap();
        let result = classify(&canonical);

        assert_eq!(result.prefix, "98");
        assert_eq!(result.operator_name, "Airtel");
        assert_eq!(result.circle_name, "Gujarat");
        assert_eq!(result.network_type, "GSM");
        assert_eq!(result.line_type, LineType::Mobile);
    }

    #[test]
    fn test_bsnl_delhi() {
        let canonical = validate("7012345678").unwrap();
        let result = classify(&canonical);

        assert_eq!(result.prefix, "70");
        assert_eq!(result.operator_name, "BSNL");
        assert_eq!(result.circle_name, "Delhi");
        assert_eq!(result.line_type, LineType::Mobile);
    }

    #[test]
    fn test_unknown_series_is_landline() {
        // Series 60 is a valid mobile lead digit but not in the table
        let result = classify("916012345678");

        assert_eq!(result.prefix, "60");
        assert_eq!(result.operator_name, UNKNOWN);
        assert_eq!(result.circle_name, UNKNOWN);
        assert_eq!(result.network_type, UNKNOWN);
        assert_eq!(result.line_type, LineType::Landline);
    }

    #[test]
    fn test_series_prefix_extraction() {
        assert_eq!(series_prefix("919876543210"), "98");
        assert_eq!(series_prefix("9876543210"), "98");
        assert_eq!(series_prefix("14155550123"), "41");
        assert_eq!(series_prefix("12345"), "12");
        assert_eq!(series_prefix("7"), "7");
        assert_eq!(series_prefix(""), "");
        assert_eq!(series_prefix("+91 98765-43210"), "98");
    }

    #[test]
    fn test_short_and_empty_numbers_classify_without_panicking() {
        let result = classify("");
        assert_eq!(result.prefix, "");
        assert_eq!(result.operator_name, UNKNOWN);
        assert_eq!(result.line_type, LineType::Landline);

        let result = classify("7");
        assert_eq!(result.operator_name, UNKNOWN);
    }

    #[test]
    fn test_classify_is_total_over_valid_numbers() {
        for lead in 60..100 {
            let canonical = validate(&format!("{}12345678", lead)).unwrap();
            let result = classify(&canonical);

            assert_eq!(result.prefix, lead.to_string());
            match result.line_type {
                LineType::Mobile => {
                    let info = OperatorDirectory::global().lookup(&result.prefix).unwrap();
                    assert_eq!(result.operator_name, info.name);
                    assert_eq!(result.circle_name, info.circle);
                }
                LineType::Landline => {
                    assert_eq!(result.operator_name, UNKNOWN);
                    assert_eq!(result.circle_name, UNKNOWN);
                }
            }
        }
    }

    #[test]
    fn test_operators_are_known_brands() {
        for (_, name, _, _) in OPERATOR_TABLE {
            assert!(["BSNL", "Airtel", "Jio", "Vi"].contains(&name));
        }
    }
}
