//! Configuration for the consultation feedback services.
//!
//! All values are environment-sourced with sensible defaults; the Gemini
//! API key in particular is never read from anywhere but the environment.

use thiserror::Error;

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address for the HTTP server
    pub host: String,
    /// Bind port for the HTTP server
    pub port: u16,
    /// Gemini API key (environment-only secret)
    pub gemini_api_key: Option<String>,
    /// Gemini model to use for feedback analysis
    pub gemini_model: String,
    /// Base endpoint for the Gemini API (overridable for tests)
    pub gemini_endpoint: String,
    /// Request timeout for classifier calls, in seconds
    pub classifier_timeout_secs: u64,
    /// Base log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Log output format ("json" or "pretty")
    pub log_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            gemini_api_key: None,
            gemini_model: "gemini-2.0-flash".to_string(),
            gemini_endpoint: "https://generativelanguage.googleapis.com".to_string(),
            classifier_timeout_secs: 60,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the environment, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate().map_err(|e| anyhow::anyhow!("{}", e))?;
        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("CONSULT_HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("CONSULT_PORT") {
            if let Ok(port) = port.parse() {
                self.port = port;
            }
        }
        if let Ok(key) = std::env::var("GEMINI_API_KEY").or_else(|_| std::env::var("GOOGLE_API_KEY"))
        {
            if !key.is_empty() {
                self.gemini_api_key = Some(key);
            }
        }
        if let Ok(model) = std::env::var("CONSULT_GEMINI_MODEL") {
            self.gemini_model = model;
        }
        if let Ok(endpoint) = std::env::var("CONSULT_GEMINI_ENDPOINT") {
            self.gemini_endpoint = endpoint;
        }
        if let Ok(secs) = std::env::var("CONSULT_CLASSIFIER_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                self.classifier_timeout_secs = secs;
            }
        }
        if let Ok(level) = std::env::var("CONSULT_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Ok(format) = std::env::var("CONSULT_LOG_FORMAT") {
            self.log_format = format;
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "log_level".into(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            });
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.log_format.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "log_format".into(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            });
        }

        if self.classifier_timeout_secs == 0 {
            return Err(ValidationError::InvalidValue {
                field: "classifier_timeout_secs".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.gemini_endpoint.is_empty() {
            return Err(ValidationError::MissingField {
                field: "gemini_endpoint".into(),
            });
        }

        Ok(())
    }
}
