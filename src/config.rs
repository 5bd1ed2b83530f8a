// Configuration management

use crate::core::crypto::SigningKey;
use crate::core::errors::AuthError;
use secrecy::{ExposeSecret, Secret};
use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
///
/// Attendee records come either from PostgreSQL or from a YAML file.
/// The signing key comes from `SIGNING_KEY`, `SIGNING_KEY_PATH`, or is
/// generated at startup when neither is set.
#[derive(Debug, Clone)]
pub struct Config {
    // Server configuration
    pub bind_address: String,
    pub port: u16,

    // Credential store configuration (exactly one)
    pub database_url: Option<String>,
    pub attendees_yaml_path: Option<PathBuf>,

    // Signing key configuration (at most one)
    pub signing_key: Option<Secret<String>>,
    pub signing_key_path: Option<PathBuf>,

    // Middleware configuration
    pub request_timeout_secs: u64,
    pub body_size_limit_bytes: usize,

    // Logging configuration
    pub log_level: String,
    pub log_format: String, // "json" or "text"
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Supports `.env` file loading in development (via dotenv crate).
    pub fn from_env() -> Result<Self, AuthError> {
        // Skip in tests so .env files cannot leak into test environments
        #[cfg(not(test))]
        {
            dotenv::dotenv().ok();
        }

        let config = Self {
            bind_address: Self::get_env_or_default("BIND_ADDRESS", "0.0.0.0"),
            port: Self::parse_port()?,
            database_url: Self::get_optional_env("DATABASE_URL"),
            attendees_yaml_path: Self::get_optional_env("ATTENDEES_YAML_PATH").map(PathBuf::from),
            signing_key: Self::get_optional_env("SIGNING_KEY").map(Secret::new),
            signing_key_path: Self::get_optional_env("SIGNING_KEY_PATH").map(PathBuf::from),
            request_timeout_secs: Self::parse_u64_or_default("REQUEST_TIMEOUT_SECS", 30)?,
            body_size_limit_bytes: Self::parse_usize_or_default("BODY_SIZE_LIMIT_BYTES", 64 * 1024)?,
            log_level: Self::get_env_or_default("LOG_LEVEL", "info"),
            log_format: Self::get_env_or_default("LOG_FORMAT", "json"),
        };

        config.validate()?;

        Ok(config)
    }

    /// Resolve the signing key this configuration points at
    ///
    /// Returns `None` when no key is configured; the caller decides whether
    /// to fall back to an ephemeral key.
    pub fn load_signing_key(&self) -> Result<Option<SigningKey>, AuthError> {
        if let Some(ref secret) = self.signing_key {
            return Ok(Some(SigningKey::from_base64(secret.expose_secret())?));
        }
        if let Some(ref path) = self.signing_key_path {
            return Ok(Some(SigningKey::from_file(path)?));
        }
        Ok(None)
    }

    /// Get environment variable or return default value
    fn get_env_or_default(key: &str, default: &str) -> String {
        env::var(key).unwrap_or_else(|_| default.to_string())
    }

    /// Get optional environment variable (empty counts as unset)
    fn get_optional_env(key: &str) -> Option<String> {
        match env::var(key) {
            Ok(value) if !value.is_empty() => Some(value),
            _ => None,
        }
    }

    /// Parse port from PORT environment variable
    fn parse_port() -> Result<u16, AuthError> {
        let port_str = env::var("PORT").unwrap_or_else(|_| "8000".to_string());
        let port = port_str.parse::<u16>().map_err(|e| {
            AuthError::Configuration(format!("Invalid PORT value '{}': {}", port_str, e))
        })?;

        if port == 0 {
            return Err(AuthError::Configuration(
                "PORT must be between 1 and 65535".to_string(),
            ));
        }

        Ok(port)
    }

    /// Parse u64 from environment variable or return default
    fn parse_u64_or_default(key: &str, default: u64) -> Result<u64, AuthError> {
        match env::var(key) {
            Ok(value) => Self::parse_positive(key, &value),
            _ => Ok(default),
        }
    }

    /// Parse usize from environment variable or return default
    fn parse_usize_or_default(key: &str, default: usize) -> Result<usize, AuthError> {
        match env::var(key) {
            Ok(value) => Self::parse_positive(key, &value),
            _ => Ok(default),
        }
    }

    fn parse_positive<T>(key: &str, value: &str) -> Result<T, AuthError>
    where
        T: std::str::FromStr + PartialEq + Default,
        T::Err: std::fmt::Display,
    {
        let parsed = value.parse::<T>().map_err(|e| {
            AuthError::Configuration(format!("Invalid {} value '{}': {}", key, value, e))
        })?;

        if parsed == T::default() {
            return Err(AuthError::Configuration(format!(
                "{} must be greater than 0",
                key
            )));
        }

        Ok(parsed)
    }

    /// Validate all configuration values
    fn validate(&self) -> Result<(), AuthError> {
        match (&self.database_url, &self.attendees_yaml_path) {
            (None, None) => {
                return Err(AuthError::Configuration(
                    "Either DATABASE_URL or ATTENDEES_YAML_PATH must be set".to_string(),
                ))
            }
            (Some(_), Some(_)) => {
                return Err(AuthError::Configuration(
                    "DATABASE_URL and ATTENDEES_YAML_PATH are mutually exclusive".to_string(),
                ))
            }
            _ => {}
        }

        if let Some(ref url) = self.database_url {
            Self::validate_url(url, "Database URL")?;
        }
        if let Some(ref path) = self.attendees_yaml_path {
            Self::validate_file_path(path, "Attendees YAML file")?;
        }

        if self.signing_key.is_some() && self.signing_key_path.is_some() {
            return Err(AuthError::Configuration(
                "SIGNING_KEY and SIGNING_KEY_PATH are mutually exclusive".to_string(),
            ));
        }
        if let Some(ref path) = self.signing_key_path {
            Self::validate_file_path(path, "Signing key file")?;
        }

        Self::validate_log_level(&self.log_level)?;
        Self::validate_log_format(&self.log_format)?;

        Ok(())
    }

    /// Validate that a file path exists and is readable
    fn validate_file_path(path: &PathBuf, description: &str) -> Result<(), AuthError> {
        if !path.exists() {
            return Err(AuthError::Configuration(format!(
                "{} not found at {:?}",
                description, path
            )));
        }

        if !path.is_file() {
            return Err(AuthError::Configuration(format!(
                "{} is not a file: {:?}",
                description, path
            )));
        }

        std::fs::File::open(path).map_err(|e| {
            AuthError::Configuration(format!("Cannot read {} at {:?}: {}", description, path, e))
        })?;

        Ok(())
    }

    /// Validate URL format
    fn validate_url(url: &str, description: &str) -> Result<(), AuthError> {
        url::Url::parse(url).map_err(|e| {
            AuthError::Configuration(format!("Invalid {} '{}': {}", description, url, e))
        })?;
        Ok(())
    }

    /// Validate log level
    fn validate_log_level(level: &str) -> Result<(), AuthError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&level.to_lowercase().as_str()) {
            return Err(AuthError::Configuration(format!(
                "Invalid LOG_LEVEL '{}': must be one of {}",
                level,
                valid_levels.join(", ")
            )));
        }
        Ok(())
    }

    /// Validate log format
    fn validate_log_format(format: &str) -> Result<(), AuthError> {
        if format != "json" && format != "text" {
            return Err(AuthError::Configuration(format!(
                "Invalid LOG_FORMAT '{}': must be 'json' or 'text'",
                format
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Create a test configuration
    ///
    /// Bypasses environment variable loading and file validation.
    pub fn test_config() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8000,
            database_url: None,
            attendees_yaml_path: Some(PathBuf::from("/tmp/test_attendees.yaml")),
            signing_key: None,
            signing_key_path: None,
            request_timeout_secs: 30,
            body_size_limit_bytes: 64 * 1024,
            log_level: "info".to_string(),
            log_format: "json".to_string(),
        }
    }
}
