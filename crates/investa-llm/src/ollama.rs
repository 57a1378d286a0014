//! Ollama Provider Implementation
//!
//! Provides integration with Ollama's local LLM API.
//!
//! # Features
//!
//! - Blocking HTTP communication with the Ollama API
//! - Liveness probe against `/api/tags`
//! - JSON mode and schema-constrained output on `/api/generate`
//! - Separate probe and generation timeouts
//!
//! # Examples
//!
//! ```no_run
//! use investa_llm::OllamaProvider;
//! use investa_domain::traits::LlmProvider;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "mistral");
//! provider.check_health()?;
//! let reply = provider.generate_structured("Describe yourself as JSON", "json")?;
//! # Ok::<(), investa_llm::LlmError>(())
//! ```

use crate::LlmError;
use investa_domain::traits::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "mistral";

/// Default timeout for the liveness probe (5 seconds)
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;

/// Default timeout for generation requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f64 = 0.3;

/// Ollama API provider for local LLM inference
///
/// This provider communicates with a local Ollama instance to generate text.
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::blocking::Client,
    probe_timeout: Duration,
    generation_timeout: Duration,
    temperature: f64,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<Value>,
    options: OllamaOptions,
}

/// Sampling options for Ollama generate API
#[derive(Serialize)]
struct OllamaOptions {
    temperature: f64,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
    #[serde(default)]
    #[allow(dead_code)]
    done: bool,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "mistral", "llama3")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();

        Self {
            endpoint,
            model: model.into(),
            client: reqwest::blocking::Client::new(),
            probe_timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
            generation_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Create a new Ollama provider with default settings
    ///
    /// Uses `http://localhost:11434` as endpoint and requires a model name.
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the liveness probe timeout
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Set the generation request timeout
    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Endpoint this provider talks to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Model identifier sent with every generation request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Probe `/api/tags` to confirm the service is up
    ///
    /// # Errors
    ///
    /// Returns error if the service cannot be reached within the probe
    /// timeout or answers with a non-2xx status.
    pub fn check_health(&self) -> Result<(), LlmError> {
        let url = format!("{}/api/tags", self.endpoint);

        let response = self
            .client
            .get(&url)
            .timeout(self.probe_timeout)
            .send()
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::Communication(format!(
                "Health check failed: HTTP {}",
                status
            )));
        }

        Ok(())
    }

    /// Generate text using Ollama API
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Ollama is not running
    /// - Model is not available
    /// - Network communication fails or times out
    /// - Response format is invalid
    pub fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.send_generate(prompt, None)
    }

    /// Generate output constrained to JSON
    ///
    /// `schema` is either `"json"` for Ollama's JSON mode or a JSON Schema
    /// document, which Ollama uses for structured outputs.
    pub fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, LlmError> {
        let format = format_value(schema)?;
        self.send_generate(prompt, Some(format))
    }

    fn send_generate(&self, prompt: &str, format: Option<Value>) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.endpoint);

        let request_body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format,
            options: OllamaOptions {
                temperature: self.temperature,
            },
        };

        debug!("POST {} (model {}, {} prompt chars)", url, self.model, prompt.len());

        let response = self
            .client
            .post(&url)
            .timeout(self.generation_timeout)
            .json(&request_body)
            .send()
            .map_err(request_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimitExceeded);
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body = response.text().map_err(request_error)?;
        let ollama_response: OllamaGenerateResponse = serde_json::from_str(&body)
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(ollama_response.response)
    }
}

/// Translate the `schema` argument into Ollama's `format` field
fn format_value(schema: &str) -> Result<Value, LlmError> {
    let trimmed = schema.trim();
    if trimmed.eq_ignore_ascii_case("json") {
        return Ok(Value::String("json".to_string()));
    }

    serde_json::from_str(trimmed)
        .map_err(|e| LlmError::Other(format!("Invalid output schema: {}", e)))
}

fn request_error(e: reqwest::Error) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout(e.to_string())
    } else {
        LlmError::Communication(format!("Request failed: {}", e))
    }
}

impl LlmProviderTrait for OllamaProvider {
    type Error = LlmError;

    fn check_health(&self) -> Result<(), Self::Error> {
        OllamaProvider::check_health(self)
    }

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        OllamaProvider::generate(self, prompt)
    }

    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error> {
        OllamaProvider::generate_structured(self, prompt, schema)
    }
}
