//! Dilemma Generator Port - Interface for on-demand dilemma generation.
//!
//! The session controller asks a generator for a new dilemma after each
//! answer and on explicit request. Any failure makes the controller fall back
//! to the static corpus, so implementations should fail fast rather than
//! invent content.
//!
//! # Example
//!
//! ```ignore
//! struct FixedGenerator;
//!
//! #[async_trait]
//! impl DilemmaGenerator for FixedGenerator {
//!     async fn generate(&self, request: GenerationRequest) -> Result<GeneratedDilemma, GenerationError> {
//!         Ok(GeneratedDilemma::new("Is it acceptable to...?", request.topic, request.intensity))
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::domain::dilemma::{GeneratedDilemma, Intensity, Topic};
use crate::domain::foundation::ErrorCode;

/// Port for generating new dilemmas.
#[async_trait]
pub trait DilemmaGenerator: Send + Sync {
    /// Generates a dilemma for the requested topic and intensity.
    ///
    /// # Errors
    ///
    /// Returns a `GenerationError` describing why no dilemma was produced.
    async fn generate(&self, request: GenerationRequest)
        -> Result<GeneratedDilemma, GenerationError>;
}

/// What to generate, plus a short description of the user's history.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub topic: Topic,
    pub intensity: Intensity,
    /// Free-text context, e.g. the number of answers so far.
    pub context: String,
}

impl GenerationRequest {
    pub fn new(topic: Topic, intensity: Intensity, context: impl Into<String>) -> Self {
        Self {
            topic,
            intensity,
            context: context.into(),
        }
    }
}

/// Why a generation (or narration) attempt failed.
///
/// The session controller treats every variant the same way but keeps the
/// message so callers can surface it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// Provider is unavailable or not configured.
    #[error("generator unavailable: {message}")]
    Unavailable { message: String },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    /// Reply could not be parsed.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Reply parsed but contained no dilemma text.
    #[error("generator returned an empty dilemma")]
    EmptyDilemma,
}

impl GenerationError {
    pub fn network(message: impl Into<String>) -> Self {
        GenerationError::Network(message.into())
    }

    pub fn rate_limited(retry_after_secs: u32) -> Self {
        GenerationError::RateLimited { retry_after_secs }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        GenerationError::Unavailable {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        GenerationError::MalformedResponse(message.into())
    }

    /// Returns true if the same request may succeed when retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::Network(_)
                | GenerationError::RateLimited { .. }
                | GenerationError::Unavailable { .. }
                | GenerationError::Timeout { .. }
        )
    }

    pub fn code(&self) -> ErrorCode {
        ErrorCode::GenerationFailed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_maps_to_generation_failed() {
        assert_eq!(GenerationError::EmptyDilemma.code(), ErrorCode::GenerationFailed);
        assert_eq!(GenerationError::rate_limited(1).code(), ErrorCode::GenerationFailed);
    }

    #[test]
    fn retryable_errors() {
        assert!(GenerationError::network("reset").is_retryable());
        assert!(GenerationError::rate_limited(5).is_retryable());
        assert!(GenerationError::unavailable("down").is_retryable());
        assert!(GenerationError::Timeout { timeout_secs: 30 }.is_retryable());

        assert!(!GenerationError::AuthenticationFailed.is_retryable());
        assert!(!GenerationError::malformed("not json").is_retryable());
        assert!(!GenerationError::EmptyDilemma.is_retryable());
    }

    #[test]
    fn error_messages_keep_details() {
        assert_eq!(
            GenerationError::unavailable("no api key").to_string(),
            "generator unavailable: no api key"
        );
        assert_eq!(
            GenerationError::rate_limited(12).to_string(),
            "rate limited: retry after 12s"
        );
    }

    #[test]
    fn request_builder_keeps_fields() {
        let request = GenerationRequest::new(
            Topic::new("Everyday Microethics").unwrap(),
            Intensity::Extreme,
            "context",
        );
        assert_eq!(request.topic.as_str(), "Everyday Microethics");
        assert_eq!(request.intensity, Intensity::Extreme);
        assert_eq!(request.context, "context");
    }
}
