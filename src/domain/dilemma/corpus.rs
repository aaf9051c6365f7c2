//! Static, ordered corpus of pre-authored dilemmas.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use super::{Dilemma, Intensity, Topic};
use crate::domain::foundation::{DilemmaId, ValidationError};

const BUILTIN_CORPUS: &str = include_str!("../../../data/corpus.yaml");

/// Errors raised while loading a corpus.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("Failed to read corpus file: {0}")]
    Io(String),

    #[error("Failed to parse corpus: {0}")]
    Parse(String),

    #[error("Invalid corpus entry '{id}': {source}")]
    InvalidEntry {
        id: String,
        #[source]
        source: ValidationError,
    },

    #[error("Duplicate dilemma id in corpus: {0}")]
    DuplicateId(DilemmaId),
}

/// On-disk shape of a corpus entry.
#[derive(Debug, Deserialize)]
struct CorpusEntry {
    id: String,
    text: String,
    topic: String,
    intensity: Intensity,
    #[serde(default)]
    philosophical_foundation: Option<String>,
}

impl CorpusEntry {
    fn into_dilemma(self) -> Result<Dilemma, CorpusError> {
        let id = self.id;
        let invalid = |source| CorpusError::InvalidEntry {
            id: id.clone(),
            source,
        };

        let dilemma_id = DilemmaId::new(id.clone()).map_err(invalid)?;
        let topic = Topic::new(self.topic).map_err(invalid)?;
        let mut dilemma =
            Dilemma::corpus(dilemma_id, self.text, topic, self.intensity).map_err(invalid)?;
        if let Some(foundation) = self.philosophical_foundation {
            dilemma = dilemma.with_philosophical_foundation(foundation);
        }
        Ok(dilemma)
    }
}

/// Fixed, ordered set of dilemmas available offline.
///
/// Iteration is cyclic and deterministic; ids are unique.
#[derive(Debug, Clone, Default)]
pub struct DilemmaCorpus {
    dilemmas: Vec<Dilemma>,
}

impl DilemmaCorpus {
    /// Builds a corpus from dilemmas, rejecting duplicate ids.
    pub fn new(dilemmas: Vec<Dilemma>) -> Result<Self, CorpusError> {
        let mut seen = HashSet::new();
        for dilemma in &dilemmas {
            if !seen.insert(dilemma.id().clone()) {
                return Err(CorpusError::DuplicateId(dilemma.id().clone()));
            }
        }
        Ok(Self { dilemmas })
    }

    /// The corpus shipped with the crate.
    pub fn builtin() -> Result<Self, CorpusError> {
        Self::from_yaml_str(BUILTIN_CORPUS)
    }

    /// Parses a YAML list of corpus entries.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CorpusError> {
        let entries: Vec<CorpusEntry> =
            serde_yaml::from_str(yaml).map_err(|e| CorpusError::Parse(e.to_string()))?;
        let dilemmas = entries
            .into_iter()
            .map(CorpusEntry::into_dilemma)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(dilemmas)
    }

    /// Reads and parses a YAML corpus file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CorpusError> {
        let yaml = std::fs::read_to_string(path.as_ref())
            .map_err(|e| CorpusError::Io(format!("{}: {}", path.as_ref().display(), e)))?;
        Self::from_yaml_str(&yaml)
    }

    pub fn len(&self) -> usize {
        self.dilemmas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dilemmas.is_empty()
    }

    /// Returns the dilemma at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Dilemma> {
        self.dilemmas.get(index)
    }

    /// Returns the cursor following `cursor`, wrapping at the end.
    ///
    /// `None` for an empty corpus.
    pub fn next_index(&self, cursor: usize) -> Option<usize> {
        if self.dilemmas.is_empty() {
            return None;
        }
        Some((cursor + 1) % self.dilemmas.len())
    }

    /// Dilemmas of a topic, in corpus order.
    pub fn by_topic<'a>(&'a self, topic: &'a Topic) -> impl Iterator<Item = &'a Dilemma> + 'a {
        self.dilemmas.iter().filter(move |d| d.topic() == topic)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dilemma> {
        self.dilemmas.iter()
    }

    /// Distinct topics in order of first appearance.
    pub fn topics(&self) -> Vec<Topic> {
        let mut topics: Vec<Topic> = Vec::new();
        for dilemma in &self.dilemmas {
            if !topics.contains(dilemma.topic()) {
                topics.push(dilemma.topic().clone());
            }
        }
        topics
    }
}
