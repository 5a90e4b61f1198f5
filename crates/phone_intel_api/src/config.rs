//! Configuration management for the phone intelligence API
//!
//! This module handles loading configuration from defaults, an optional
//! `Config.toml` and environment variables using the figment crate.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional configuration file, read from the working directory
pub const CONFIG_FILE: &str = "Config.toml";

/// Prefix for environment overrides, e.g. `PHONE_INTEL_LOOKUP__TIMEOUT_SECS`
pub const ENV_PREFIX: &str = "PHONE_INTEL_";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub lookup: LookupConfig,
    pub observability: ObservabilityConfig,
    pub security: SecurityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Caller-ID lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    pub profile_url: String,
    pub search_url: String,
    pub keywords_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Bearer credential for the upstream service
    pub bearer_token: String,
    /// Client identifier for the upstream service
    pub client_id: String,
    pub user_agent: String,
    pub accept_language: String,
    pub country_code: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        phone_core::LookupConfig::default().into()
    }
}

impl From<phone_core::LookupConfig> for LookupConfig {
    fn from(config: phone_core::LookupConfig) -> Self {
        Self {
            profile_url: config.profile_url,
            search_url: config.search_url,
            keywords_url: config.keywords_url,
            timeout_secs: config.timeout_secs,
            bearer_token: config.bearer_token,
            client_id: config.client_id,
            user_agent: config.user_agent,
            accept_language: config.accept_language,
            country_code: config.country_code,
        }
    }
}

impl From<LookupConfig> for phone_core::LookupConfig {
    fn from(config: LookupConfig) -> Self {
        Self {
            profile_url: config.profile_url,
            search_url: config.search_url,
            keywords_url: config.keywords_url,
            timeout_secs: config.timeout_secs,
            bearer_token: config.bearer_token,
            client_id: config.client_id,
            user_agent: config.user_agent,
            accept_language: config.accept_language,
            country_code: config.country_code,
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Enable JSON structured logging
    pub json_logs: bool,
    /// Log level filter, used when RUST_LOG is unset
    pub log_level: String,
    /// Service name reported by the health endpoint
    pub service_name: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            json_logs: false,
            log_level: "info".to_string(),
            service_name: "Advanced Phone Intelligence API".to_string(),
        }
    }
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Enable permissive CORS
    pub enable_cors: bool,
    /// Maximum request body size in bytes
    pub max_body_size_bytes: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_cors: true,
            max_body_size_bytes: 1024, // a phone number fits comfortably
        }
    }
}

impl AppConfig {
    /// Core pipeline configuration derived from this configuration
    pub fn intel_config(&self) -> phone_core::IntelConfig {
        phone_core::IntelConfig {
            lookup: self.lookup.clone().into(),
        }
    }
}

/// Build the layered configuration source
///
/// Later layers win: defaults, `Config.toml`, `PHONE_INTEL_*` variables, then
/// a bare `PORT` variable as set by most hosting platforms.
pub fn figment() -> Figment {
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

    if Path::new(CONFIG_FILE).exists() {
        figment = figment.merge(Toml::file(CONFIG_FILE));
    }

    figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .merge(Env::raw().only(&["PORT"]).map(|_| "server.port".into()))
}

/// Load application configuration from environment and files
pub fn load_config() -> Result<AppConfig, figment::Error> {
    figment().extract()
}

/// Environment variable names for configuration
#[allow(dead_code)]
pub mod env_vars {
    pub const SERVER_HOST: &str = "PHONE_INTEL_SERVER__HOST";
    pub const SERVER_PORT: &str = "PHONE_INTEL_SERVER__PORT";
    pub const PORT: &str = "PORT";
    pub const LOOKUP_TIMEOUT_SECS: &str = "PHONE_INTEL_LOOKUP__TIMEOUT_SECS";
    pub const LOOKUP_BEARER_TOKEN: &str = "PHONE_INTEL_LOOKUP__BEARER_TOKEN";
    pub const LOOKUP_CLIENT_ID: &str = "PHONE_INTEL_LOOKUP__CLIENT_ID";
    pub const JSON_LOGS: &str = "PHONE_INTEL_OBSERVABILITY__JSON_LOGS";
    pub const LOG_LEVEL: &str = "PHONE_INTEL_OBSERVABILITY__LOG_LEVEL";
}
