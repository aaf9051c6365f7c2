//! Analysis Module - Pure domain services for ethical profile analysis.
//!
//! # Components
//!
//! - `ProfileAnalyzer` - Per-topic statistics, tendency, consistency, patterns
//! - `summarize` - English text rendering of an analysis
//! - `EthicalProfile` - Analysis, summary and answers bundled for presentation
//!
//! All functions are pure and stateless. Profiles are recomputed on demand
//! and never persisted.

mod profile_analyzer;
mod summary;

pub use profile_analyzer::{
    EthicalProfileAnalysis, ProfileAnalyzer, ProfilePatterns, ResponseDistribution,
    TopicStatistics, ACCEPTANCE_THRESHOLD, NEUTRAL_TENDENCY, REJECTION_THRESHOLD,
};
pub use summary::{
    consistency_label, summarize, tendency_label, EthicalProfile, EMPTY_PROFILE_SUMMARY,
};
