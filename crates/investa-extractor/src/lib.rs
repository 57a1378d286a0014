//! Investa Extractor
//!
//! Converts free text describing an investor into a fully populated
//! `InvestorProfile` using a local LLM.
//!
//! # Architecture
//!
//! ```text
//! Text → Prompt → probe /api/tags → /api/generate → {...} span → coercion → InvestorProfile
//! ```
//!
//! # Key Features
//!
//! - **Total extraction**: `extract` always returns all six fields, substituting
//!   defaults on any failure
//! - **Tagged failures**: `try_extract` reports which stage failed
//! - **Provenance**: `extract_detailed` tells model output from fallback defaults
//! - **Per-field coercion**: thousands separators, stringly-typed numbers and
//!   falsy values are handled field by field
//!
//! # Example Usage
//!
//! ```no_run
//! use investa_extractor::{Extractor, ExtractorConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = Extractor::from_config(ExtractorConfig::default())?;
//!
//! let profile = extractor.extract(
//!     "I'm 45, earn 60k a year and want to put 80,000 to work from May 2023 \
//!      for a year. No oil stocks please.",
//! );
//!
//! println!("Age: {}", profile.age);
//! println!("Budget: {:.2}", profile.budget);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod config;
mod types;
mod prompt;
mod parser;
mod extractor;


pub use error::ExtractorError;
pub use config::{ExtractorConfig, ResponseFormat};
pub use types::{Extraction, ProfileSource};
pub use prompt::{profile_json_schema, PromptBuilder};
pub use parser::{extract_json_span, parse_llm_response};
pub use extractor::Extractor;
pub use investa_domain::InvestorProfile;
