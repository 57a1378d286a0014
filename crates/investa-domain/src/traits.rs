//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (investa-llm). All calls block
/// the current thread until the provider answers or its timeout elapses.
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Lightweight reachability probe, issued before any generation request
    fn check_health(&self) -> Result<(), Self::Error>;

    /// Generate free-form text completion
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Generate with constrained output
    ///
    /// `schema` is either the literal `"json"` (plain JSON mode) or a JSON
    /// Schema document describing the expected object.
    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error>;
}
