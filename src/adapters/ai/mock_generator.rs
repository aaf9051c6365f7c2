//! Mock dilemma generator for testing.
//!
//! Provides a configurable implementation of the DilemmaGenerator port,
//! allowing tests to run without calling a real model.
//!
//! # Features
//!
//! - Queued responses and injected errors
//! - Simulated delays
//! - A gate that holds each call until the test releases it
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let generator = MockDilemmaGenerator::new()
//!     .with_dilemma("Is it acceptable to...?")
//!     .with_error(GenerationError::unavailable("down"));
//!
//! let first = generator.generate(request.clone()).await?;
//! assert!(generator.generate(request).await.is_err());
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::sleep;

use crate::domain::dilemma::GeneratedDilemma;
use crate::ports::{DilemmaGenerator, GenerationError, GenerationRequest};

/// Configured result for a single call
#[derive(Debug, Clone)]
pub enum MockGeneration {
    /// Text of the generated dilemma; topic and intensity echo the request
    Dilemma(String),
    Error(GenerationError),
}

/// Mock generator with scripted replies
#[derive(Debug, Clone, Default)]
pub struct MockDilemmaGenerator {
    replies: Arc<Mutex<VecDeque<MockGeneration>>>,
    calls: Arc<Mutex<Vec<GenerationRequest>>>,
    delay: Duration,
    gate: Option<Arc<Notify>>,
    entered: Arc<Notify>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockDilemmaGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply
    pub fn with_dilemma(self, text: impl Into<String>) -> Self {
        lock(&self.replies).push_back(MockGeneration::Dilemma(text.into()));
        self
    }

    /// Queue a failure
    pub fn with_error(self, error: GenerationError) -> Self {
        lock(&self.replies).push_back(MockGeneration::Error(error));
        self
    }

    /// Fail every call that has no queued reply
    pub fn always_failing() -> Self {
        Self::new()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Hold every call until `gate` is notified
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Notified each time a call has been recorded
    pub fn entered(&self) -> Arc<Notify> {
        self.entered.clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn get_calls(&self) -> Vec<GenerationRequest> {
        lock(&self.calls).clone()
    }

    fn next_reply(&self) -> MockGeneration {
        lock(&self.replies).pop_front().unwrap_or_else(|| {
            MockGeneration::Error(GenerationError::unavailable("no mock reply queued"))
        })
    }
}

#[async_trait]
impl DilemmaGenerator for MockDilemmaGenerator {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GeneratedDilemma, GenerationError> {
        // Record the call before waiting so tests can observe it in flight
        lock(&self.calls).push(request.clone());
        self.entered.notify_one();

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_reply() {
            MockGeneration::Dilemma(text) => Ok(GeneratedDilemma::new(
                text,
                request.topic,
                request.intensity,
            )),
            MockGeneration::Error(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dilemma::{Intensity, Topic};

    fn request() -> GenerationRequest {
        GenerationRequest::new(
            Topic::new("Radical Otherness").unwrap(),
            Intensity::Medium,
            "context",
        )
    }

    #[tokio::test]
    async fn replies_are_returned_in_order() {
        let generator = MockDilemmaGenerator::new()
            .with_dilemma("first")
            .with_error(GenerationError::EmptyDilemma);

        let first = generator.generate(request()).await.unwrap();
        assert_eq!(first.text, "first");
        assert_eq!(first.topic.as_str(), "Radical Otherness");
        assert_eq!(first.intensity, Intensity::Medium);

        assert_eq!(
            generator.generate(request()).await.unwrap_err(),
            GenerationError::EmptyDilemma
        );
    }

    #[tokio::test]
    async fn exhausted_queue_is_unavailable() {
        let generator = MockDilemmaGenerator::always_failing();
        assert!(matches!(
            generator.generate(request()).await,
            Err(GenerationError::Unavailable { .. })
        ));
    }

    #[tokio::test]
    async fn calls_are_tracked() {
        let generator = MockDilemmaGenerator::new().with_dilemma("x");
        generator.generate(request()).await.unwrap();
        assert_eq!(generator.call_count(), 1);
        assert_eq!(generator.get_calls()[0].context, "context");
    }

    #[tokio::test]
    async fn delay_postpones_reply() {
        let generator = MockDilemmaGenerator::new()
            .with_dilemma("slow")
            .with_delay(Duration::from_millis(20));

        let started = std::time::Instant::now();
        let result = generator.generate(request()).await.unwrap();

        assert_eq!(result.text, "slow");
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[tokio::test]
    async fn gate_holds_call_until_released() {
        let gate = Arc::new(Notify::new());
        let generator = MockDilemmaGenerator::new()
            .with_dilemma("held")
            .with_gate(gate.clone());
        let entered = generator.entered();

        let task = {
            let generator = generator.clone();
            tokio::spawn(async move { generator.generate(request()).await })
        };

        entered.notified().await;
        assert_eq!(generator.call_count(), 1);
        assert!(!task.is_finished());

        gate.notify_one();
        let result = task.await.unwrap().unwrap();
        assert_eq!(result.text, "held");
    }
}
