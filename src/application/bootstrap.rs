//! Wiring from `AppConfig` to ready-to-use application services.
//!
//! Without an API key the offline generator is used, so the session serves
//! the corpus and narratives fall back to the built-in template.

use std::sync::Arc;

use super::{SessionController, TopicSelector};
use crate::adapters::ai::{
    ChatClientConfig, ChatCompletionsClient, ChatDilemmaGenerator, ChatProfileNarrator,
    OfflineGenerator,
};
use crate::adapters::storage::{FileKeyValueStore, InMemoryKeyValueStore};
use crate::config::{AppConfig, SessionConfig, StorageBackend, StorageConfig, ValidationError};
use crate::domain::dilemma::{CorpusError, DilemmaCorpus, Topic};
use crate::ports::{DilemmaGenerator, GenerationError, KeyValueStore, ProfileNarrator};

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ValidationError),

    #[error("Failed to load corpus: {0}")]
    Corpus(#[from] CorpusError),

    #[error("Failed to build AI client: {0}")]
    Client(#[from] GenerationError),
}

/// Validates `config` and builds a session controller from it.
pub fn build_controller(config: &AppConfig) -> Result<Arc<SessionController>, BootstrapError> {
    config.validate()?;

    let corpus = Arc::new(load_corpus(&config.session)?);
    let store = build_store(&config.storage);
    let generator: Arc<dyn DilemmaGenerator> = match build_client(config)? {
        Some(client) => Arc::new(ChatDilemmaGenerator::new(client, Arc::clone(&corpus))),
        None => {
            tracing::info!("No AI API key configured; serving corpus dilemmas only");
            Arc::new(OfflineGenerator)
        }
    };
    let selector = build_selector(&config.session, &corpus);

    tracing::info!(
        corpus_size = corpus.len(),
        storage = ?config.storage.backend,
        "Session controller ready"
    );
    Ok(Arc::new(SessionController::new(store, generator, corpus, selector)))
}

/// Builds the profile narrator for `config`.
pub fn build_narrator(config: &AppConfig) -> Result<Arc<dyn ProfileNarrator>, BootstrapError> {
    config.validate()?;
    Ok(match build_client(config)? {
        Some(client) => Arc::new(ChatProfileNarrator::new(client)),
        None => Arc::new(OfflineGenerator),
    })
}

fn build_client(config: &AppConfig) -> Result<Option<Arc<ChatCompletionsClient>>, BootstrapError> {
    match ChatClientConfig::from_app_config(&config.ai) {
        Some(client_config) => Ok(Some(Arc::new(ChatCompletionsClient::new(client_config)?))),
        None => Ok(None),
    }
}

fn load_corpus(config: &SessionConfig) -> Result<DilemmaCorpus, CorpusError> {
    match &config.corpus_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Loading corpus file");
            DilemmaCorpus::from_path(path)
        }
        None => DilemmaCorpus::builtin(),
    }
}

fn build_store(config: &StorageConfig) -> Arc<dyn KeyValueStore> {
    match config.backend {
        StorageBackend::Memory => Arc::new(InMemoryKeyValueStore::new()),
        StorageBackend::File => Arc::new(FileKeyValueStore::new(&config.data_dir)),
    }
}

/// Topics the generator is asked for: those of the corpus, or the defaults
/// for an empty corpus.
fn selector_topics(corpus: &DilemmaCorpus) -> Vec<Topic> {
    let topics = corpus.topics();
    if topics.is_empty() {
        Topic::defaults()
    } else {
        topics
    }
}

fn build_selector(config: &SessionConfig, corpus: &DilemmaCorpus) -> TopicSelector {
    let topics = selector_topics(corpus);
    match config.rng_seed {
        Some(seed) => TopicSelector::seeded(topics, seed),
        None => TopicSelector::from_entropy(topics),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::ControllerPhase;
    use secrecy::Secret;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[tokio::test]
    async fn default_config_builds_offline_controller() {
        let controller = build_controller(&AppConfig::default()).unwrap();
        let snapshot = controller.initialize().await.unwrap();
        assert_eq!(snapshot.phase, ControllerPhase::Active);
        assert!(snapshot.current.is_some());

        // Offline generation always falls back to the corpus
        let outcome = controller.answer_current(0.5).await.unwrap();
        assert!(matches!(
            outcome.next.error(),
            Some(GenerationError::Unavailable { .. })
        ));
        assert_eq!(
            outcome.next.presented().unwrap().dilemma.id(),
            controller.corpus().get(1).unwrap().id()
        );
    }

    #[tokio::test]
    async fn file_backend_persists_between_controllers() {
        let dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::File;
        config.storage.data_dir = dir.path().to_path_buf();

        let first = build_controller(&config).unwrap();
        let id = first.initialize().await.unwrap().session_id;
        first.answer_current(0.7).await.unwrap();

        let second = build_controller(&config).unwrap();
        let snapshot = second.initialize().await.unwrap();
        assert_eq!(snapshot.session_id, id);
        assert_eq!(snapshot.answered_count, 1);
    }

    #[test]
    fn custom_corpus_path_is_loaded() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "- {{ id: X1, text: Only one, topic: T, intensity: Medium }}").unwrap();

        let mut config = AppConfig::default();
        config.session.corpus_path = Some(file.path().to_path_buf());

        let controller = build_controller(&config).unwrap();
        assert_eq!(controller.corpus().len(), 1);
    }

    #[test]
    fn selector_follows_corpus_topics() {
        let corpus = DilemmaCorpus::from_yaml_str(
            "- { id: X1, text: one, topic: Custom, intensity: Soft }\n\
             - { id: X2, text: two, topic: Other, intensity: Soft }",
        )
        .unwrap();
        let selector = build_selector(&SessionConfig::default(), &corpus);
        let names: Vec<_> = selector.topics().iter().map(|t| t.as_str()).collect();
        assert_eq!(names, vec!["Custom", "Other"]);
    }

    #[test]
    fn empty_corpus_selects_default_topics() {
        let corpus = DilemmaCorpus::default();
        assert_eq!(selector_topics(&corpus), Topic::defaults());
    }

    #[test]
    fn seeded_selector_over_custom_corpus_picks_its_topic() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "- {{ id: X1, text: Only one, topic: Custom, intensity: Soft }}").unwrap();
        let mut config = AppConfig::default();
        config.session.corpus_path = Some(file.path().to_path_buf());
        config.session.rng_seed = Some(7);

        let corpus = load_corpus(&config.session).unwrap();
        let mut selector = build_selector(&config.session, &corpus);
        for _ in 0..10 {
            assert_eq!(selector.pick_topic().as_str(), "Custom");
        }
    }

    #[test]
    fn missing_corpus_file_is_an_error() {
        let mut config = AppConfig::default();
        config.session.corpus_path = Some("/nonexistent/kantify/corpus.yaml".into());
        assert!(matches!(
            build_controller(&config),
            Err(BootstrapError::Corpus(_))
        ));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = AppConfig::default();
        config.ai.temperature = 5.0;
        assert!(matches!(
            build_controller(&config),
            Err(BootstrapError::Config(_))
        ));
    }

    #[tokio::test]
    async fn offline_narrator_is_unavailable() {
        let narrator = build_narrator(&AppConfig::default()).unwrap();
        let profile = crate::domain::analysis::EthicalProfile::from_log(&[]);
        assert!(matches!(
            narrator.narrate(&profile).await,
            Err(GenerationError::Unavailable { .. })
        ));
    }

    #[test]
    fn api_key_selects_chat_narrator() {
        let mut config = AppConfig::default();
        config.ai.api_key = Some(Secret::new("test-key".to_string()));
        assert!(build_narrator(&config).is_ok());
    }
}
