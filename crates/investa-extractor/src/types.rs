//! Result types for extraction

use investa_domain::InvestorProfile;

/// Where the values of an extracted profile came from
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileSource {
    /// Parsed from the model's response
    Model,

    /// Defaults substituted after a failure
    Fallback {
        /// Text of the error that caused the fallback
        reason: String,
    },
}

/// A profile together with its provenance
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// The extracted (or default) profile
    pub profile: InvestorProfile,

    /// Whether the profile came from the model or from defaults
    pub source: ProfileSource,
}

impl Extraction {
    /// True when defaults were substituted because extraction failed
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, ProfileSource::Fallback { .. })
    }
}
