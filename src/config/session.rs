//! Session behaviour configuration

use serde::Deserialize;
use std::path::PathBuf;

/// Session configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SessionConfig {
    /// Seed for topic/intensity selection; random when unset
    pub rng_seed: Option<u64>,

    /// YAML corpus to load instead of the built-in one
    pub corpus_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_defaults() {
        let config = SessionConfig::default();
        assert!(config.rng_seed.is_none());
        assert!(config.corpus_path.is_none());
    }

    #[test]
    fn test_session_deserialization() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"rng_seed": 42, "corpus_path": "corpus.yaml"}"#).unwrap();
        assert_eq!(config.rng_seed, Some(42));
        assert_eq!(config.corpus_path, Some(PathBuf::from("corpus.yaml")));
    }
}
