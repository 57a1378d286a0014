//! Investa LLM Provider Layer
//!
//! # Architecture
//!
//! This crate provides implementations of the `LlmProvider` trait from `investa-domain`.
//! Every provider is synchronous: a call blocks until the backend answers or
//! its timeout elapses. Nothing here retries.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OllamaProvider`: Local Ollama API integration
//!
//! # Examples
//!
//! ```
//! use investa_llm::MockProvider;
//! use investa_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new("Hello from LLM!");
//! provider.check_health().unwrap();
//! let result = provider.generate("test prompt").unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod ollama;

use investa_domain::traits::LlmProvider as LlmProviderTrait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use ollama::OllamaProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Request did not complete within its timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

const ERROR_MARKER: &str = "ERROR";

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network calls.
/// Probes and generations are counted separately so callers can assert how
/// often the backend would have been hit.
///
/// # Examples
///
/// ```
/// use investa_llm::MockProvider;
/// use investa_domain::traits::LlmProvider;
///
/// // Simple fixed response
/// let provider = MockProvider::new("Fixed response");
/// assert_eq!(provider.generate("any prompt").unwrap(), "Fixed response");
///
/// // Multiple responses
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// provider.add_response("prompt2", "response2");
/// assert_eq!(provider.generate("prompt1").unwrap(), "response1");
/// assert_eq!(provider.generate("prompt2").unwrap(), "response2");
///
/// // Service down
/// let provider = MockProvider::unreachable();
/// assert!(provider.check_health().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, String>>>,
    reachable: Arc<AtomicBool>,
    health_times_out: Arc<AtomicBool>,
    probe_count: Arc<AtomicUsize>,
    call_count: Arc<AtomicUsize>,
    last_schema: Arc<Mutex<Option<String>>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            reachable: Arc::new(AtomicBool::new(true)),
            health_times_out: Arc::new(AtomicBool::new(false)),
            probe_count: Arc::new(AtomicUsize::new(0)),
            call_count: Arc::new(AtomicUsize::new(0)),
            last_schema: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a MockProvider whose liveness probe always fails
    pub fn unreachable() -> Self {
        let provider = Self::default();
        provider.set_reachable(false);
        provider
    }

    /// Create a MockProvider whose health check always times out
    pub fn timing_out() -> Self {
        let provider = Self::default();
        provider.set_reachable(false);
        provider.health_times_out.store(true, Ordering::SeqCst);
        provider
    }

    /// Toggle whether the liveness probe succeeds
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.insert(prompt.into(), response.into());
        }
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        self.add_response(prompt, ERROR_MARKER);
    }

    /// Get the number of times check_health was called
    pub fn probe_count(&self) -> usize {
        self.probe_count.load(Ordering::SeqCst)
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Reset both counters
    pub fn reset_call_count(&self) {
        self.probe_count.store(0, Ordering::SeqCst);
        self.call_count.store(0, Ordering::SeqCst);
    }

    /// Schema passed to the most recent structured generation, if any
    pub fn last_schema(&self) -> Option<String> {
        self.last_schema.lock().ok().and_then(|schema| schema.clone())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn check_health(&self) -> Result<(), Self::Error> {
        self.probe_count.fetch_add(1, Ordering::SeqCst);
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else if self.health_times_out.load(Ordering::SeqCst) {
            Err(LlmError::Timeout("Mock health check timed out".to_string()))
        } else {
            Err(LlmError::Communication("Mock service unreachable".to_string()))
        }
    }

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        let responses = self
            .responses
            .lock()
            .map_err(|e| LlmError::Other(format!("Mock state poisoned: {}", e)))?;
        if let Some(response) = responses.get(prompt) {
            if response == ERROR_MARKER {
                return Err(LlmError::Other("Mock error".to_string()));
            }
            return Ok(response.clone());
        }

        Ok(self.default_response.clone())
    }

    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error> {
        if let Ok(mut last) = self.last_schema.lock() {
            *last = Some(schema.to_string());
        }
        self.generate(prompt)
    }
}
