//! Core Extractor implementation

use crate::config::{ExtractorConfig, ResponseFormat};
use crate::error::ExtractorError;
use crate::parser::parse_llm_response;
use crate::prompt::{profile_json_schema, PromptBuilder};
use crate::types::{Extraction, ProfileSource};
use investa_domain::traits::LlmProvider;
use investa_domain::InvestorProfile;
use investa_llm::OllamaProvider;
use std::fmt::Display;
use tracing::{debug, info, warn};

/// The Extractor turns free text into an `InvestorProfile`
///
/// Each call performs one liveness probe and at most one generation request.
/// The extractor keeps no state between calls, so a shared reference can be
/// used from several threads when the provider allows it.
pub struct Extractor<L>
where
    L: LlmProvider,
{
    llm_provider: L,
    config: ExtractorConfig,
}

impl Extractor<OllamaProvider> {
    /// Create an Extractor backed by Ollama, as described by `config`
    pub fn from_config(config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;

        let provider = OllamaProvider::new(config.endpoint.clone(), config.model.clone())
            .with_probe_timeout(config.probe_timeout())
            .with_generation_timeout(config.generation_timeout())
            .with_temperature(config.temperature);

        Ok(Self::new(provider, config))
    }
}

impl<L> Extractor<L>
where
    L: LlmProvider,
    L::Error: Display,
{
    /// Create a new Extractor over any provider
    ///
    /// Only `response_format` is read from `config` here; transport settings
    /// belong to the provider itself.
    pub fn new(llm_provider: L, config: ExtractorConfig) -> Self {
        Self {
            llm_provider,
            config,
        }
    }

    /// The underlying provider
    pub fn provider(&self) -> &L {
        &self.llm_provider
    }

    /// The active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract a profile, substituting defaults on any failure
    ///
    /// Never fails. A failure is logged at `warn` level and yields
    /// `InvestorProfile::default()`, which callers cannot tell apart from a
    /// genuine extraction. Use [`Extractor::extract_detailed`] or
    /// [`Extractor::try_extract`] when that matters.
    pub fn extract(&self, text: &str) -> InvestorProfile {
        self.extract_detailed(text).profile
    }

    /// Extract a profile with defaults on failure, reporting the provenance
    pub fn extract_detailed(&self, text: &str) -> Extraction {
        match self.try_extract(text) {
            Ok(profile) => Extraction {
                profile,
                source: ProfileSource::Model,
            },
            Err(e) => {
                warn!("Extraction error: {}", e);
                Extraction {
                    profile: InvestorProfile::default(),
                    source: ProfileSource::Fallback {
                        reason: e.to_string(),
                    },
                }
            }
        }
    }

    /// Extract a profile, returning the failure instead of defaults
    pub fn try_extract(&self, text: &str) -> Result<InvestorProfile, ExtractorError> {
        info!("Starting profile extraction, text length {}", text.len());

        let prompt = PromptBuilder::new(text).build();
        debug!("Prompt length: {} chars", prompt.len());

        self.llm_provider
            .check_health()
            .map_err(|e| ExtractorError::ServiceUnavailable(e.to_string()))?;

        let schema = match self.config.response_format {
            ResponseFormat::Json => "json",
            ResponseFormat::Schema => profile_json_schema(),
        };

        let llm_response = self
            .llm_provider
            .generate_structured(&prompt, schema)
            .map_err(|e| ExtractorError::Llm(e.to_string()))?;

        debug!("LLM response length: {} chars", llm_response.len());

        let profile = parse_llm_response(&llm_response)?;

        info!("Extraction complete");
        debug!("Extracted profile: {}", profile);

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use investa_llm::MockProvider;

    fn create_test_extractor(response: &str) -> Extractor<MockProvider> {
        Extractor::new(MockProvider::new(response), ExtractorConfig::default())
    }

    #[test]
    fn test_extract_empty_object() {
        let extractor = create_test_extractor("{}");

        let extraction = extractor.extract_detailed("Some text");
        assert_eq!(extraction.source, ProfileSource::Model);
        assert!(extraction.profile.is_default());
    }

    #[test]
    fn test_json_mode_is_requested_by_default() {
        let extractor = create_test_extractor("{}");
        extractor.extract("Some text");
        assert_eq!(extractor.provider().last_schema().as_deref(), Some("json"));
    }

    #[test]
    fn test_schema_mode_sends_profile_schema() {
        let mut config = ExtractorConfig::default();
        config.response_format = ResponseFormat::Schema;
        let extractor = Extractor::new(MockProvider::new("{}"), config);

        extractor.extract("Some text");
        assert_eq!(
            extractor.provider().last_schema().as_deref(),
            Some(profile_json_schema())
        );
    }

    #[test]
    fn test_from_config_rejects_invalid_config() {
        let mut config = ExtractorConfig::default();
        config.model = String::new();

        let result = Extractor::from_config(config);
        assert!(matches!(result, Err(ExtractorError::Config(_))));
    }

    #[test]
    fn test_from_config_builds_ollama_provider() {
        let mut config = ExtractorConfig::default();
        config.endpoint = "http://127.0.0.1:11500/".to_string();
        config.model = "llama3".to_string();

        let extractor = Extractor::from_config(config).unwrap();
        assert_eq!(extractor.provider().endpoint(), "http://127.0.0.1:11500");
        assert_eq!(extractor.provider().model(), "llama3");
        assert_eq!(extractor.config().model, "llama3");
    }
}
