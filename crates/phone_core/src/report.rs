//! Report assembly
//!
//! Coordinates normalization, operator classification and the caller-ID
//! lookup, then merges everything into a single [`PhoneReport`]. Only input
//! errors escape this module: upstream failures are logged and replaced with
//! placeholder values.

use crate::{
    caller_id::{CallerIdClient, CallerIdRecord},
    normalizer::PhoneNumber,
    operators::{classify, ClassificationResult, OperatorDirectory},
    privacy::{mask_number, PrivacyProcessor},
    IntelConfig, IntelError, LookupError, LookupSource,
};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// Timestamp format used in every response body
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NOT_AVAILABLE: &str = "Not Available";
const NOT_PUBLIC: &str = "Not Public";

/// Current UTC time in response format
pub fn timestamp_now() -> String {
    chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Spam risk categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Low,    // 0-30
    Medium, // 31-70
    High,   // 71-100
}

impl From<u8> for RiskLevel {
    fn from(spam_score: u8) -> Self {
        match spam_score {
            0..=30 => RiskLevel::Low,
            31..=70 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PersonalInformation {
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub email: String,
    pub date_of_birth: String,
    pub company: String,
    pub job_title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationAddress {
    pub city: String,
    pub state: String,
    pub country: String,
    pub zipcode: String,
    pub full_address: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TelecomDetails {
    pub operator: String,
    pub circle: String,
    pub network_type: String,
    pub number_series: String,
    pub line_type: String,
    /// Line type comes from the number series alone
    pub line_type_is_estimate: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerificationStatus {
    pub verified: bool,
    pub verification_level: String,
    pub trust_score: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpamAnalysis {
    pub spam_score: u8,
    pub spam_type: String,
    pub reports_count: u32,
    pub risk_level: RiskLevel,
}

/// Assumed registration status on consumer apps
///
/// These values are fixed and are not derived from any lookup.
#[derive(Debug, Clone, Serialize)]
pub struct DigitalPresence {
    pub whatsapp: &'static str,
    pub telegram: &'static str,
    pub facebook: &'static str,
    pub instagram: &'static str,
    pub paytm: &'static str,
    pub google_pay: &'static str,
    pub amazon: &'static str,
}

impl Default for DigitalPresence {
    fn default() -> Self {
        Self {
            whatsapp: "Registered",
            telegram: "Potential",
            facebook: "Linked",
            instagram: "Possible",
            paytm: "Registered",
            google_pay: "Linked",
            amazon: "Potential",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub data_source: String,
    pub last_updated: &'static str,
    pub privacy_level: &'static str,
}

/// Complete intelligence report for one phone number
#[derive(Debug, Clone, Serialize)]
pub struct PhoneReport {
    pub status: &'static str,
    pub timestamp: String,
    pub phone_input: String,
    pub formatted_number: String,
    pub personal_information: PersonalInformation,
    pub location_address: LocationAddress,
    pub telecom_details: TelecomDetails,
    pub verification_status: VerificationStatus,
    pub spam_analysis: SpamAnalysis,
    pub digital_presence: DigitalPresence,
    pub metadata: ReportMetadata,
}

/// Main pipeline producing phone reports
pub struct IntelPipeline {
    caller_id: CallerIdClient,
    privacy: PrivacyProcessor,
    config: IntelConfig,
}

impl IntelPipeline {
    /// Create a new pipeline with the given configuration
    ///
    /// # Returns
    /// * `Ok(IntelPipeline)` on success
    /// * `Err(IntelError::ConfigurationError)` if a configured header value is invalid
    /// * `Err(IntelError::InternalError)` if the HTTP client cannot be built
    pub fn new(config: IntelConfig) -> Result<Self, IntelError> {
        info!("Initializing intelligence pipeline");

        let caller_id = CallerIdClient::new(config.lookup.clone())?;
        let privacy = PrivacyProcessor::with_random_salt();

        info!("Intelligence pipeline initialized successfully");

        Ok(Self {
            caller_id,
            privacy,
            config,
        })
    }

    /// Produce a report for raw user input
    ///
    /// # Returns
    /// * `Ok(PhoneReport)` whenever the number is valid, whatever the upstream did
    /// * `Err(IntelError::EmptyInput | IntelError::InvalidFormat)` for bad input
    #[instrument(skip(self, raw), fields(input = %mask_number(raw)))]
    pub async fn generate_report(&self, raw: &str) -> Result<PhoneReport, IntelError> {
        let phone = PhoneNumber::parse(raw)?;
        let fingerprint = self.privacy.fingerprint(phone.canonical());

        // Step 1: static classification
        let classification = classify(phone.canonical());
        debug!(
            fingerprint = %fingerprint,
            "Classified series {:?} as {} / {}",
            classification.prefix, classification.operator_name, classification.circle_name
        );

        // Step 2: caller-ID lookup, absorbed on failure
        let lookup = self.caller_id.lookup(&phone).await;
        match &lookup {
            Ok(record) => debug!(fingerprint = %fingerprint, "Caller-ID data from {}", record.source),
            Err(e) => {
                log_lookup_failure(e);
                warn!(fingerprint = %fingerprint, "Caller-ID lookup failed, using placeholders: {}", e);
            }
        }

        Ok(assemble(&phone, &classification, lookup.ok(), timestamp_now()))
    }

    /// Get pipeline statistics for monitoring
    pub fn get_stats(&self) -> PipelineStats {
        PipelineStats {
            operator_series_count: OperatorDirectory::global().series_count(),
            lookup_endpoints: LookupSource::FALLBACK_ORDER
                .iter()
                .map(|source| self.caller_id.endpoint_url(*source).to_string())
                .collect(),
            lookup_timeout_secs: self.config.lookup.timeout_secs,
        }
    }
}

/// Log each failed attempt under its failure category
fn log_lookup_failure(err: &LookupError) {
    let attempts = match err {
        LookupError::Unavailable { attempts } => attempts.as_slice(),
        other => std::slice::from_ref(other),
    };

    for attempt in attempts {
        if attempt.is_shape_mismatch() {
            debug!("Upstream answered with unusable data: {}", attempt);
        } else if attempt.is_unavailable() {
            debug!("Upstream unavailable: {}", attempt);
        }
    }
}

/// Statistics about the pipeline
#[derive(Debug, Clone, Serialize)]
pub struct PipelineStats {
    pub operator_series_count: usize,
    pub lookup_endpoints: Vec<String>,
    pub lookup_timeout_secs: u64,
}

/// Merge classification and caller-ID data into a report
///
/// `record` is `None` when every upstream endpoint failed; each upstream field
/// then takes its placeholder value.
pub fn assemble(
    phone: &PhoneNumber,
    classification: &ClassificationResult,
    record: Option<CallerIdRecord>,
    timestamp: String,
) -> PhoneReport {
    let data_source = record
        .as_ref()
        .map(|r| r.source.label().to_string())
        .unwrap_or_else(|| "Multiple APIs".to_string());

    let CallerIdRecord {
        name,
        first_name,
        last_name,
        gender,
        email,
        date_of_birth,
        company,
        job_title,
        address,
        spam,
        verification,
        ..
    } = record.unwrap_or_else(|| CallerIdRecord::empty(LookupSource::Profile));

    let text = |value: Option<String>, default: &str| value.unwrap_or_else(|| default.to_string());
    let spam_score = spam.score.unwrap_or(0);

    let number_series = if phone.canonical().len() >= 10 {
        classification.prefix.clone()
    } else {
        "Unknown".to_string()
    };

    PhoneReport {
        status: "success",
        timestamp,
        phone_input: phone.raw().to_string(),
        formatted_number: phone.canonical().to_string(),

        personal_information: PersonalInformation {
            full_name: text(name, "Data Not Available"),
            first_name: text(first_name, NOT_AVAILABLE),
            last_name: text(last_name, NOT_AVAILABLE),
            gender: text(gender, "Not Detected"),
            email: text(email, NOT_PUBLIC),
            date_of_birth: text(date_of_birth, NOT_PUBLIC),
            company: text(company, NOT_AVAILABLE),
            job_title: text(job_title, NOT_AVAILABLE),
        },

        location_address: LocationAddress {
            city: text(address.city, NOT_AVAILABLE),
            state: text(address.state, NOT_AVAILABLE),
            country: text(address.country, "India"),
            zipcode: text(address.zipcode, NOT_AVAILABLE),
            full_address: text(address.full_address, "Address Not Public"),
        },

        telecom_details: TelecomDetails {
            operator: classification.operator_name.to_string(),
            circle: classification.circle_name.to_string(),
            network_type: classification.network_type.to_string(),
            number_series,
            line_type: classification.line_type.to_string(),
            line_type_is_estimate: true,
        },

        verification_status: VerificationStatus {
            verified: verification.verified.unwrap_or(false),
            verification_level: text(verification.level, "Low"),
            trust_score: 100u8.saturating_sub(spam_score),
        },

        spam_analysis: SpamAnalysis {
            spam_score,
            spam_type: text(spam.spam_type, "Clean"),
            reports_count: spam.reports_count.unwrap_or(0),
            risk_level: RiskLevel::from(spam_score),
        },

        digital_presence: DigitalPresence::default(),

        metadata: ReportMetadata {
            data_source,
            last_updated: "Real-time",
            privacy_level: "Public Data Only",
        },
    }
}
