//! Caller-ID lookup against the external profile/search service
//!
//! The upstream service exposes three endpoints with different response
//! shapes. They are tried one after another, profile first, and the first
//! endpoint that answers with usable data wins. There is no racing, no
//! backoff and no retry of the same endpoint.
//!
//! Upstream payloads are loosely shaped. Every field is decoded leniently:
//! a missing field or one of the wrong type is simply absent, never an error.

use anyhow::Context;
use crate::{normalizer::PhoneNumber, privacy::mask_number, IntelError, LookupConfig};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE, USER_AGENT},
    StatusCode,
};
use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Upstream endpoint that produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LookupSource {
    Profile,
    Search,
    Keywords,
}

impl LookupSource {
    /// Order in which endpoints are tried
    pub const FALLBACK_ORDER: [LookupSource; 3] =
        [LookupSource::Profile, LookupSource::Search, LookupSource::Keywords];

    /// Human-readable name reported as the data source
    pub fn label(&self) -> &'static str {
        match self {
            LookupSource::Profile => "Truecaller Profile API",
            LookupSource::Search => "Truecaller Search API",
            LookupSource::Keywords => "Truecaller Keywords API",
        }
    }
}

impl fmt::Display for LookupSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors from a caller-ID lookup
///
/// None of these reach the API caller; the report assembler replaces the
/// missing data with placeholders.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: LookupSource, status: u16 },
    #[error("{endpoint} request failed: {reason}")]
    Transport {
        endpoint: LookupSource,
        reason: String,
        timed_out: bool,
    },
    #[error("{endpoint} response did not match the expected shape: {reason}")]
    ShapeMismatch { endpoint: LookupSource, reason: String },
    #[error("{endpoint} returned no data")]
    NoData { endpoint: LookupSource },
    #[error("caller-ID lookup unavailable after {} attempt(s)", .attempts.len())]
    Unavailable { attempts: Vec<LookupError> },
}

impl LookupError {
    /// Whether the failure came from the upstream service being unreachable or refusing
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            LookupError::Status { .. } | LookupError::Transport { .. } | LookupError::Unavailable { .. }
        )
    }

    /// Whether the upstream answered but the payload was unusable
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(self, LookupError::ShapeMismatch { .. } | LookupError::NoData { .. })
    }
}

/// Postal address reported upstream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddressRecord {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub zipcode: Option<String>,
    pub full_address: Option<String>,
}

/// Spam reputation reported upstream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SpamRecord {
    /// Spam likelihood, clamped to 0-100
    pub score: Option<u8>,
    pub spam_type: Option<String>,
    pub reports_count: Option<u32>,
}

/// Identity verification reported upstream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerificationRecord {
    pub verified: Option<bool>,
    pub level: Option<String>,
}

/// Normalized caller-ID data from whichever endpoint answered
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallerIdRecord {
    pub source: LookupSource,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub image_url: Option<String>,
    pub address: AddressRecord,
    pub spam: SpamRecord,
    pub verification: VerificationRecord,
}

impl CallerIdRecord {
    /// Record with every field absent
    pub fn empty(source: LookupSource) -> Self {
        Self {
            source,
            name: None,
            first_name: None,
            last_name: None,
            gender: None,
            email: None,
            date_of_birth: None,
            company: None,
            job_title: None,
            image_url: None,
            address: AddressRecord::default(),
            spam: SpamRecord::default(),
            verification: VerificationRecord::default(),
        }
    }
}

const UNKNOWN: &str = "Unknown";
const NOT_AVAILABLE: &str = "Not Available";

fn or_default(value: Option<String>, default: &str) -> Option<String> {
    Some(value.unwrap_or_else(|| default.to_string()))
}

// Upstream response shapes

/// `{ data: { profile: {...}, addresses: [...] } }`
#[derive(Debug, Deserialize)]
struct ProfileResponse {
    #[serde(default)]
    data: Option<ProfileData>,
}

#[derive(Debug, Default, Deserialize)]
struct ProfileData {
    #[serde(default)]
    profile: Option<RawPerson>,
    #[serde(default, deserialize_with = "lenient::list")]
    addresses: Vec<RawAddress>,
}

/// `{ data: [ { name, spamScore, ... } ] }`, shared by search and keywords
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default, deserialize_with = "lenient::list")]
    data: Vec<RawPerson>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPerson {
    #[serde(default, deserialize_with = "lenient::text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    gender: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    email: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    date_of_birth: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    company: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    job_title: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    image: Option<String>,
    #[serde(default, deserialize_with = "lenient::score")]
    spam_score: Option<u8>,
    #[serde(default, deserialize_with = "lenient::text")]
    spam_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    reports_count: Option<u32>,
    #[serde(default, deserialize_with = "lenient::flag")]
    verified: Option<bool>,
    #[serde(default, deserialize_with = "lenient::text")]
    verification_level: Option<String>,
    #[serde(default, deserialize_with = "lenient::list")]
    addresses: Vec<RawAddress>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAddress {
    #[serde(default, deserialize_with = "lenient::text")]
    city: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    state: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    country: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    country_code: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    zip_code: Option<String>,
    #[serde(default, rename = "address", deserialize_with = "lenient::text")]
    full_address: Option<String>,
}

impl RawAddress {
    fn into_record(self) -> AddressRecord {
        AddressRecord {
            city: self.city,
            state: self.state,
            country: self.country.or(self.country_code),
            zipcode: self.zip_code,
            full_address: self.full_address,
        }
    }
}

impl ProfileResponse {
    /// Profile answers fill every field, using their own defaults for gaps
    fn into_record(self) -> Option<CallerIdRecord> {
        let data = self.data?;
        let person = data.profile.unwrap_or_default();
        let address = data.addresses.into_iter().next().unwrap_or_default();

        let mut record = CallerIdRecord::empty(LookupSource::Profile);
        record.name = or_default(person.name, UNKNOWN);
        record.first_name = or_default(person.first_name, "");
        record.last_name = or_default(person.last_name, "");
        record.gender = or_default(person.gender, UNKNOWN);
        record.email = or_default(person.email, NOT_AVAILABLE);
        record.date_of_birth = or_default(person.date_of_birth, NOT_AVAILABLE);
        record.company = or_default(person.company, NOT_AVAILABLE);
        record.job_title = or_default(person.job_title, NOT_AVAILABLE);
        record.address = AddressRecord {
            city: or_default(address.city, NOT_AVAILABLE),
            state: or_default(address.state, NOT_AVAILABLE),
            country: or_default(address.country.or(address.country_code), NOT_AVAILABLE),
            zipcode: or_default(address.zip_code, NOT_AVAILABLE),
            full_address: or_default(address.full_address, NOT_AVAILABLE),
        };
        record.spam = SpamRecord {
            score: Some(person.spam_score.unwrap_or(0)),
            spam_type: or_default(person.spam_type, "Not Spam"),
            reports_count: Some(person.reports_count.unwrap_or(0)),
        };
        record.verification = VerificationRecord {
            verified: Some(person.verified.unwrap_or(false)),
            level: or_default(person.verification_level, "Low"),
        };
        Some(record)
    }
}

impl SearchResponse {
    fn into_record(self, source: LookupSource) -> Option<CallerIdRecord> {
        let person = self.data.into_iter().next()?;

        let mut record = CallerIdRecord::empty(source);
        record.name = or_default(person.name, UNKNOWN);
        record.spam.score = Some(person.spam_score.unwrap_or(0));

        if source == LookupSource::Search {
            record.first_name = or_default(person.first_name, "");
            record.last_name = or_default(person.last_name, "");
            record.gender = or_default(person.gender, UNKNOWN);
            record.image_url = or_default(person.image, NOT_AVAILABLE);
            record.address = person
                .addresses
                .into_iter()
                .next()
                .map(RawAddress::into_record)
                .unwrap_or_default();
        }
        Some(record)
    }
}

/// HTTP client for the caller-ID service
#[derive(Debug)]
pub struct CallerIdClient {
    client: reqwest::Client,
    config: LookupConfig,
}

impl CallerIdClient {
    /// Build a client with the fixed upstream headers and request timeout
    pub fn new(config: LookupConfig) -> Result<Self, IntelError> {
        let headers = Self::default_headers(&config)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .context("Failed to build caller-ID HTTP client")?;

        debug!(
            "Caller-ID client initialized - timeout: {}s, endpoints: {}",
            config.timeout_secs,
            LookupSource::FALLBACK_ORDER.len()
        );

        Ok(Self { client, config })
    }

    fn default_headers(config: &LookupConfig) -> Result<HeaderMap, IntelError> {
        let value = |name: &str, raw: &str| {
            HeaderValue::from_str(raw)
                .map_err(|_| IntelError::ConfigurationError(format!("invalid characters in {name} header")))
        };

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, value("User-Agent", &config.user_agent)?);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_LANGUAGE, value("Accept-Language", &config.accept_language)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if !config.bearer_token.is_empty() {
            headers.insert(
                AUTHORIZATION,
                value("Authorization", &format!("Bearer {}", config.bearer_token))?,
            );
        }
        if !config.client_id.is_empty() {
            headers.insert(HeaderName::from_static("clientid"), value("clientId", &config.client_id)?);
        }

        Ok(headers)
    }

    /// URL for an endpoint
    pub fn endpoint_url(&self, source: LookupSource) -> &str {
        match source {
            LookupSource::Profile => &self.config.profile_url,
            LookupSource::Search => &self.config.search_url,
            LookupSource::Keywords => &self.config.keywords_url,
        }
    }

    /// Look a number up, falling back through the endpoints in order
    ///
    /// # Returns
    /// * `Ok(CallerIdRecord)` from the first endpoint that answered with data
    /// * `Err(LookupError::Unavailable)` with every endpoint's failure otherwise
    #[instrument(skip(self, phone), fields(number = %mask_number(phone.canonical())))]
    pub async fn lookup(&self, phone: &PhoneNumber) -> Result<CallerIdRecord, LookupError> {
        let international = phone.international();
        let mut attempts = Vec::with_capacity(LookupSource::FALLBACK_ORDER.len());

        for source in LookupSource::FALLBACK_ORDER {
            match self.query(source, &international).await {
                Ok(record) => {
                    debug!("Caller-ID data found via {}", source);
                    return Ok(record);
                }
                Err(e) => {
                    debug!("Caller-ID endpoint failed, trying next: {}", e);
                    attempts.push(e);
                }
            }
        }

        warn!("All {} caller-ID endpoints failed", attempts.len());
        Err(LookupError::Unavailable { attempts })
    }

    /// Query a single endpoint
    pub async fn query(&self, source: LookupSource, international: &str) -> Result<CallerIdRecord, LookupError> {
        let country = self.config.country_code.as_str();
        let params: Vec<(&str, &str)> = match source {
            LookupSource::Profile => vec![("phone", international), ("countryCode", country), ("type", "number")],
            LookupSource::Search => vec![("q", international), ("countryCode", country)],
            LookupSource::Keywords => vec![("q", international), ("countryCode", country), ("type", "4")],
        };

        let transport = |e: reqwest::Error| LookupError::Transport {
            endpoint: source,
            timed_out: e.is_timeout(),
            reason: e.to_string(),
        };

        let response = self
            .client
            .get(self.endpoint_url(source))
            .query(&params)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(LookupError::Status {
                endpoint: source,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        let shape = |e: serde_json::Error| LookupError::ShapeMismatch {
            endpoint: source,
            reason: e.to_string(),
        };

        let record = match source {
            LookupSource::Profile => serde_json::from_slice::<ProfileResponse>(&body)
                .map_err(shape)?
                .into_record(),
            LookupSource::Search | LookupSource::Keywords => serde_json::from_slice::<SearchResponse>(&body)
                .map_err(shape)?
                .into_record(source),
        };

        record.ok_or(LookupError::NoData { endpoint: source })
    }
}

/// Field decoders that turn type mismatches into absent values
mod lenient {
    use serde::{de::DeserializeOwned, Deserialize, Deserializer};
    use serde_json::Value;

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
    }

    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
        Ok(number(Value::deserialize(deserializer)?).map(|n| n.clamp(0.0, u32::MAX as f64) as u32))
    }

    pub fn score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u8>, D::Error> {
        Ok(number(Value::deserialize(deserializer)?).map(|n| n.round().clamp(0.0, 100.0) as u8))
    }

    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Bool(b) => Some(b),
            Value::Number(n) => n.as_i64().map(|n| n != 0),
            Value::String(s) => s.parse().ok(),
            _ => None,
        })
    }

    /// Array elements that fail to decode are skipped
    pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        })
    }

    fn number(value: Value) -> Option<f64> {
        let n = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        n.filter(|n| n.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> LookupConfig {
        LookupConfig {
            profile_url: format!("{}/v1/profile", server.uri()),
            search_url: format!("{}/v2/search", server.uri()),
            keywords_url: format!("{}/v1/keywords/search", server.uri()),
            timeout_secs: 2,
            bearer_token: "test-token".to_string(),
            client_id: "test-client".to_string(),
            ..LookupConfig::default()
        }
    }

    fn phone() -> PhoneNumber {
        PhoneNumber::parse("9876543210").unwrap()
    }

    async fn mount_status(server: &MockServer, route: &str, status: u16, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_profile_success_stops_fallback() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/profile"))
            .and(query_param("phone", "+919876543210"))
            .and(query_param("countryCode", "IN"))
            .and(query_param("type", "number"))
            .and(header("Authorization", "Bearer test-token"))
            .and(header("clientId", "test-client"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "profile": {
                        "name": "Asha Verma",
                        "firstName": "Asha",
                        "lastName": "Verma",
                        "gender": "Female",
                        "spamScore": 12,
                        "verified": true,
                        "verificationLevel": "High"
                    },
                    "addresses": [
                        { "city": "Ahmedabad", "state": "Gujarat", "zipCode": "380001" }
                    ]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;
        mount_status(&server, "/v2/search", 200, 0).await;
        mount_status(&server, "/v1/keywords/search", 200, 0).await;

        let client = CallerIdClient::new(config_for(&server)).unwrap();
        let record = client.lookup(&phone()).await.unwrap();

        assert_eq!(record.source, LookupSource::Profile);
        assert_eq!(record.name.as_deref(), Some("Asha Verma"));
        assert_eq!(record.gender.as_deref(), Some("Female"));
        assert_eq!(record.email.as_deref(), Some("Not Available"));
        assert_eq!(record.address.city.as_deref(), Some("Ahmedabad"));
        assert_eq!(record.address.zipcode.as_deref(), Some("380001"));
        assert_eq!(record.address.country.as_deref(), Some("Not Available"));
        assert_eq!(record.spam.score, Some(12));
        assert_eq!(record.spam.spam_type.as_deref(), Some("Not Spam"));
        assert_eq!(record.verification.verified, Some(true));
        assert_eq!(record.verification.level.as_deref(), Some("High"));
    }

    #[tokio::test]
    async fn test_falls_back_to_search() {
        let server = MockServer::start().await;

        mount_status(&server, "/v1/profile", 503, 1).await;
        Mock::given(method("GET"))
            .and(path("/v2/search"))
            .and(query_param("q", "+919876543210"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {
                        "name": "Ravi K",
                        "spamScore": "64.6",
                        "image": "https://img.example/ravi.png",
                        "addresses": [{ "city": "Surat", "countryCode": "IN" }]
                    }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;
        mount_status(&server, "/v1/keywords/search", 200, 0).await;

        let client = CallerIdClient::new(config_for(&server)).unwrap();
        let record = client.lookup(&phone()).await.unwrap();

        assert_eq!(record.source, LookupSource::Search);
        assert_eq!(record.name.as_deref(), Some("Ravi K"));
        assert_eq!(record.first_name.as_deref(), Some(""));
        assert_eq!(record.gender.as_deref(), Some("Unknown"));
        assert_eq!(record.spam.score, Some(65));
        assert_eq!(record.image_url.as_deref(), Some("https://img.example/ravi.png"));
        assert_eq!(record.address.city.as_deref(), Some("Surat"));
        assert_eq!(record.address.country.as_deref(), Some("IN"));
        assert_eq!(record.address.zipcode, None);
    }

    #[tokio::test]
    async fn test_falls_back_to_keywords() {
        let server = MockServer::start().await;

        mount_status(&server, "/v1/profile", 404, 1).await;
        mount_status(&server, "/v2/search", 429, 1).await;
        Mock::given(method("GET"))
            .and(path("/v1/keywords/search"))
            .and(query_param("type", "4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "name": "Spam Caller", "spamScore": 250 }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = CallerIdClient::new(config_for(&server)).unwrap();
        let record = client.lookup(&phone()).await.unwrap();

        assert_eq!(record.source, LookupSource::Keywords);
        assert_eq!(record.name.as_deref(), Some("Spam Caller"));
        assert_eq!(record.spam.score, Some(100));
        assert_eq!(record.gender, None);
    }

    #[tokio::test]
    async fn test_all_endpoints_failing_is_unavailable() {
        let server = MockServer::start().await;

        mount_status(&server, "/v1/profile", 500, 1).await;
        mount_status(&server, "/v2/search", 500, 1).await;
        mount_status(&server, "/v1/keywords/search", 401, 1).await;

        let client = CallerIdClient::new(config_for(&server)).unwrap();
        let err = client.lookup(&phone()).await.unwrap_err();

        assert!(err.is_unavailable());
        match err {
            LookupError::Unavailable { attempts } => {
                assert_eq!(attempts.len(), 3);
                assert!(matches!(
                    attempts[2],
                    LookupError::Status {
                        endpoint: LookupSource::Keywords,
                        status: 401
                    }
                ));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_and_empty_bodies_fall_through() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>blocked</html>"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .expect(1)
            .mount(&server)
            .await;
        mount_status(&server, "/v1/keywords/search", 500, 1).await;

        let client = CallerIdClient::new(config_for(&server)).unwrap();
        let err = client.lookup(&phone()).await.unwrap_err();

        let LookupError::Unavailable { attempts } = err else {
            panic!("expected Unavailable");
        };
        assert!(matches!(attempts[0], LookupError::ShapeMismatch { endpoint: LookupSource::Profile, .. }));
        assert!(matches!(attempts[1], LookupError::NoData { endpoint: LookupSource::Search }));
        assert!(attempts[1].is_shape_mismatch());
    }

    #[tokio::test]
    async fn test_wrongly_typed_fields_are_absent() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "profile": {
                        "name": ["not", "a", "string"],
                        "spamScore": { "value": 3 },
                        "reportsCount": "7",
                        "verified": 1
                    },
                    "addresses": "none"
                }
            })))
            .mount(&server)
            .await;

        let client = CallerIdClient::new(config_for(&server)).unwrap();
        let record = client.lookup(&phone()).await.unwrap();

        assert_eq!(record.name.as_deref(), Some("Unknown"));
        assert_eq!(record.spam.score, Some(0));
        assert_eq!(record.spam.reports_count, Some(7));
        assert_eq!(record.verification.verified, Some(true));
        assert_eq!(record.address.city.as_deref(), Some("Not Available"));
    }

    #[tokio::test]
    async fn test_timeout_is_reported_as_transport_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/profile"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;
        mount_status(&server, "/v2/search", 500, 1).await;
        mount_status(&server, "/v1/keywords/search", 500, 1).await;

        let config = LookupConfig {
            timeout_secs: 1,
            ..config_for(&server)
        };
        let client = CallerIdClient::new(config).unwrap();
        let LookupError::Unavailable { attempts } = client.lookup(&phone()).await.unwrap_err() else {
            panic!("expected Unavailable");
        };

        assert!(matches!(
            attempts[0],
            LookupError::Transport {
                endpoint: LookupSource::Profile,
                timed_out: true,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host() {
        let config = LookupConfig {
            profile_url: "http://127.0.0.1:1/v1/profile".to_string(),
            search_url: "http://127.0.0.1:1/v2/search".to_string(),
            keywords_url: "http://127.0.0.1:1/v1/keywords/search".to_string(),
            timeout_secs: 1,
            ..LookupConfig::default()
        };
        let client = CallerIdClient::new(config).unwrap();
        let err = client.lookup(&phone()).await.unwrap_err();

        assert!(err.is_unavailable());
        assert_eq!(err.to_string(), "caller-ID lookup unavailable after 3 attempt(s)");
    }

    #[test]
    fn test_invalid_header_configuration() {
        let config = LookupConfig {
            bearer_token: "line\nbreak".to_string(),
            ..LookupConfig::default()
        };
        assert!(matches!(
            CallerIdClient::new(config),
            Err(IntelError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_fallback_order() {
        assert_eq!(
            LookupSource::FALLBACK_ORDER,
            [LookupSource::Profile, LookupSource::Search, LookupSource::Keywords]
        );
        assert_eq!(LookupSource::Search.label(), "Truecaller Search API");
    }
}
