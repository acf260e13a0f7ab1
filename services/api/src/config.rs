//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

use crate::adapters::gemini::{GeminiConfig, DEFAULT_GEMINI_BASE_URL};

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    /// `production` hides error details from API responses.
    pub app_env: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub gemini_timeout: Duration,
    pub chat_max_output_tokens: u32,
    pub cors_origin: String,
    pub max_upload_bytes: usize,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var_or =
            |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        // --- Server and Database Settings ---
        let bind_address = parse_var("BIND_ADDRESS", &var_or("BIND_ADDRESS", "0.0.0.0:3000"))?;

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let log_level_str = var_or("RUST_LOG", "INFO");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let app_env = var_or("APP_ENV", "development");

        // --- Gemini Settings (the key is optional, chat answers 500 without it) ---
        let gemini_api_key = lookup("GEMINI_API_KEY").filter(|key| !key.trim().is_empty());
        let gemini_model = var_or("GEMINI_MODEL", "gemini-1.5-flash");
        let gemini_base_url = var_or("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL);
        let gemini_timeout =
            Duration::from_secs(parse_var(
                "GEMINI_TIMEOUT_SECS",
                &var_or("GEMINI_TIMEOUT_SECS", "30"),
            )?);
        let chat_max_output_tokens =
            parse_var("CHAT_MAX_OUTPUT_TOKENS", &var_or("CHAT_MAX_OUTPUT_TOKENS", "1024"))?;

        // --- HTTP Settings ---
        let cors_origin = var_or("CORS_ORIGIN", "http://localhost:5173");
        let max_upload_bytes =
            parse_var("MAX_UPLOAD_BYTES", &var_or("MAX_UPLOAD_BYTES", "10485760"))?;

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            app_env,
            gemini_api_key,
            gemini_model,
            gemini_base_url,
            gemini_timeout,
            chat_max_output_tokens,
            cors_origin,
            max_upload_bytes,
        })
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    /// The Gemini client settings, or `None` when no API key is configured.
    pub fn gemini(&self) -> Option<GeminiConfig> {
        self.gemini_api_key.as_ref().map(|api_key| GeminiConfig {
            api_key: api_key.clone(),
            model: self.gemini_model.clone(),
            base_url: self.gemini_base_url.clone(),
            timeout: self.gemini_timeout,
        })
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string()))
}
