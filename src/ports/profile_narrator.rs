//! Profile Narrator Port - Free-text narrative over an ethical profile.
//!
//! Consumed by the presentation layer; the session controller never calls it.

use async_trait::async_trait;

use super::GenerationError;
use crate::domain::analysis::EthicalProfile;

/// Port for turning a computed profile into a narrative.
#[async_trait]
pub trait ProfileNarrator: Send + Sync {
    /// Writes a narrative for `profile`.
    ///
    /// # Errors
    ///
    /// Returns a `GenerationError` when no narrative could be produced.
    async fn narrate(&self, profile: &EthicalProfile) -> Result<String, GenerationError>;
}
