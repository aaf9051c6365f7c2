//! Offline generator used when no AI provider is configured.
//!
//! Every call fails with `Unavailable`, so the session controller serves the
//! corpus and presentation falls back to its own narrative.

use async_trait::async_trait;

use crate::domain::analysis::EthicalProfile;
use crate::domain::dilemma::GeneratedDilemma;
use crate::ports::{
    DilemmaGenerator, GenerationError, GenerationRequest, ProfileNarrator,
};

const OFFLINE_REASON: &str = "no AI provider configured";

#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGenerator;

#[async_trait]
impl DilemmaGenerator for OfflineGenerator {
    async fn generate(
        &self,
        _request: GenerationRequest,
    ) -> Result<GeneratedDilemma, GenerationError> {
        Err(GenerationError::unavailable(OFFLINE_REASON))
    }
}

#[async_trait]
impl ProfileNarrator for OfflineGenerator {
    async fn narrate(&self, _profile: &EthicalProfile) -> Result<String, GenerationError> {
        Err(GenerationError::unavailable(OFFLINE_REASON))
    }
}
