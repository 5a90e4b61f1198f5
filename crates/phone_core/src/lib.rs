//! # phone_core
//!
//! Phone number normalization, telecom operator classification and
//! caller-ID report assembly for Indian mobile numbers.
//!
//! ## Features
//!
//! - **Normalization** of free-form input into a canonical digit string
//! - **Operator/circle classification** from a static prefix table
//! - **Caller-ID lookup** against an external service with sequential fallback
//! - **Report assembly** that degrades to placeholder values on upstream failure
//! - **Log redaction** of phone numbers via masking and salted fingerprints
//!
//! ## Example
//!
//! ```rust,no_run
//! use phone_core::{IntelConfig, IntelPipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = IntelPipeline::new(IntelConfig::default())?;
//!
//!     let report = pipeline.generate_report("9876543210").await?;
//!     println!("Operator: {}", report.telecom_details.operator);
//!
//!     Ok(())
//! }
//! ```

pub mod caller_id;
pub mod normalizer;
pub mod operators;
pub mod privacy;
pub mod report;

use thiserror::Error;

/// Configuration for the outbound caller-ID lookup
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// Direct profile endpoint, tried first
    pub profile_url: String,
    /// Search endpoint, tried second
    pub search_url: String,
    /// Keyword search endpoint, tried last
    pub keywords_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Bearer credential sent in the Authorization header
    pub bearer_token: String,
    /// Client identifier sent in the `clientId` header
    pub client_id: String,
    /// User-Agent presented to the upstream service
    pub user_agent: String,
    /// Accept-Language header value
    pub accept_language: String,
    /// Country code query parameter
    pub country_code: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            profile_url: "https://profile5.truecaller.com/v1/profile".to_string(),
            search_url: "https://search5.truecaller.com/v2/search".to_string(),
            keywords_url: "https://api4.truecaller.com/v1/keywords/search".to_string(),
            timeout_secs: 15,
            bearer_token: String::new(),
            client_id: String::new(),
            user_agent: "Truecaller/12.30.8 (Android;10)".to_string(),
            accept_language: "en-IN".to_string(),
            country_code: "IN".to_string(),
        }
    }
}

/// Configuration for the intelligence pipeline
#[derive(Debug, Clone, Default)]
pub struct IntelConfig {
    pub lookup: LookupConfig,
}

/// Errors that can occur while producing a report
#[derive(Error, Debug)]
pub enum IntelError {
    #[error("Phone number is required")]
    EmptyInput,
    #[error("Invalid phone number format")]
    InvalidFormat,
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl IntelError {
    /// Whether the error was caused by the caller's input
    pub fn is_input_error(&self) -> bool {
        matches!(self, IntelError::EmptyInput | IntelError::InvalidFormat)
    }
}

pub type Result<T> = std::result::Result<T, IntelError>;

// Re-export main types
pub use caller_id::{CallerIdClient, CallerIdRecord, LookupError, LookupSource};
pub use normalizer::{validate, PhoneNumber};
pub use operators::{classify, ClassificationResult, LineType};
pub use report::{IntelPipeline, PhoneReport};
pub use IntelConfig as Config;
