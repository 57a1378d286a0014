//! Configuration for the Extractor

use investa_llm::ollama::{
    DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_PROBE_TIMEOUT_SECS, DEFAULT_TEMPERATURE,
    DEFAULT_TIMEOUT_SECS,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the generation service is asked to shape its output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Plain JSON mode (`"format": "json"`)
    #[default]
    Json,
    /// Schema-constrained output using the profile JSON Schema
    Schema,
}

/// Configuration for the Extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Base URL of the generation service
    pub endpoint: String,

    /// Model identifier sent with the generation request
    pub model: String,

    /// Maximum time for the liveness probe (seconds)
    pub probe_timeout_secs: u64,

    /// Maximum time for the generation request (seconds)
    pub generation_timeout_secs: u64,

    /// Sampling temperature
    pub temperature: f64,

    /// Output shaping requested from the service
    pub response_format: ResponseFormat,
}

impl ExtractorConfig {
    /// Get the probe timeout as a Duration
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Get the generation timeout as a Duration
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.trim().is_empty() {
            return Err("endpoint must not be empty".to_string());
        }
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(format!("endpoint '{}' must be an http(s) URL", self.endpoint));
        }
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.probe_timeout_secs == 0 {
            return Err("probe_timeout_secs must be greater than 0".to_string());
        }
        if self.generation_timeout_secs == 0 {
            return Err("generation_timeout_secs must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!("temperature {} out of range [0.0, 2.0]", self.temperature));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str)
            .map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    /// Local Ollama on its standard port, running mistral
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            generation_timeout_secs: DEFAULT_TIMEOUT_SECS,
            temperature: DEFAULT_TEMPERATURE,
            response_format: ResponseFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.endpoint, "http://localhost:11434");
        assert_eq!(config.model, "mistral");
        assert_eq!(config.probe_timeout(), Duration::from_secs(5));
        assert_eq!(config.generation_timeout(), Duration::from_secs(30));
        assert_eq!(config.temperature, 0.3);
        assert_eq!(config.response_format, ResponseFormat::Json);
    }

    #[test]
    fn test_invalid_endpoint() {
        let mut config = ExtractorConfig::default();
        config.endpoint = "localhost:11434".to_string();
        assert!(config.validate().is_err());

        config.endpoint = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_model() {
        let mut config = ExtractorConfig::default();
        config.model = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_timeouts() {
        let mut config = ExtractorConfig::default();
        config.probe_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = ExtractorConfig::default();
        config.generation_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_temperature() {
        let mut config = ExtractorConfig::default();
        config.temperature = 2.5;
        assert!(config.validate().is_err());

        config.temperature = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ExtractorConfig::from_toml(
            r#"
            model = "llama3"
            response_format = "schema"
            "#,
        )
        .unwrap();

        assert_eq!(config.model, "llama3");
        assert_eq!(config.response_format, ResponseFormat::Schema);
        assert_eq!(config.endpoint, "http://localhost:11434");
        assert_eq!(config.generation_timeout_secs, 30);
    }

    #[test]
    fn test_toml_rejects_unknown_format() {
        assert!(ExtractorConfig::from_toml(r#"response_format = "yaml""#).is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = ExtractorConfig::default();
        config.endpoint = "http://ollama.internal:11434".to_string();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.endpoint, parsed.endpoint);
        assert_eq!(config.model, parsed.model);
        assert_eq!(config.probe_timeout_secs, parsed.probe_timeout_secs);
        assert_eq!(config.response_format, parsed.response_format);
    }
}
