//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during extraction
///
/// `Extractor::extract` never returns these; it logs them and falls back to
/// the default profile. `Extractor::try_extract` hands them to the caller.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Liveness probe failed or timed out
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Generation request failed
    #[error("LLM error: {0}")]
    Llm(String),

    /// No JSON object in the model output, or it did not parse
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A field was present but could not be converted to its type
    #[error("Cannot coerce field '{field}': {reason}")]
    Coercion {
        /// Name of the offending field
        field: &'static str,
        /// What went wrong
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::MalformedResponse(format!("JSON parse error: {}", e))
    }
}
