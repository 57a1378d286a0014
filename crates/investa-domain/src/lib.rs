//! Investa Domain Layer
//!
//! This crate contains the domain model for Investa. It has ZERO external
//! dependencies and defines the record every extraction produces plus the
//! trait boundary to the language-model infrastructure.
//!
//! ## Key Concepts
//!
//! - **InvestorProfile**: The six-field record (age, budget, date range,
//!   exclusions, salary) that is always fully populated
//! - **Default record**: The fallback profile returned when nothing can be extracted
//! - **LlmProvider**: The boundary to a text-generation service
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure value types only
//! - Infrastructure implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod profile;
pub mod traits;

// Re-exports for convenience
pub use profile::InvestorProfile;
pub use traits::LlmProvider;
