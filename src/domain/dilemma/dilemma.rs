//! Dilemma entity and its classification value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{DilemmaId, ValidationError};

/// Ethical topics the built-in corpus and the generator cover.
pub const DEFAULT_TOPICS: &[&str] = &[
    "Moral Temporality",
    "Radical Otherness",
    "Universalization Imperative",
    "Ontology of Ignorance",
    "Moral Economy of Desire",
    "Everyday Microethics",
];

/// Topic classification of a dilemma.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Topic(String);

impl Topic {
    /// Creates a topic, trimming whitespace and rejecting blank names.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("topic"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the topic name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The built-in topic list.
    pub fn defaults() -> Vec<Topic> {
        DEFAULT_TOPICS
            .iter()
            .map(|name| Topic((*name).to_string()))
            .collect()
    }
}

impl TryFrom<String> for Topic {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Topic> for String {
    fn from(topic: Topic) -> Self {
        topic.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How confronting a dilemma is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intensity {
    Soft,
    Medium,
    Extreme,
}

impl Intensity {
    /// All intensities, mildest first.
    pub const ALL: [Intensity; 3] = [Intensity::Soft, Intensity::Medium, Intensity::Extreme];

    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            Intensity::Soft => "Soft",
            Intensity::Medium => "Medium",
            Intensity::Extreme => "Extreme",
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Intensity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "soft" => Ok(Intensity::Soft),
            "medium" => Ok(Intensity::Medium),
            "extreme" => Ok(Intensity::Extreme),
            other => Err(ValidationError::invalid_format(
                "intensity",
                format!("unknown intensity '{}'", other),
            )),
        }
    }
}

/// Where a dilemma came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Corpus,
    Generated,
}

/// A single ethical scenario. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dilemma {
    id: DilemmaId,
    text: String,
    topic: Topic,
    intensity: Intensity,
    origin: Origin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    philosophical_foundation: Option<String>,
}

impl Dilemma {
    /// Creates a pre-authored corpus dilemma.
    pub fn corpus(
        id: DilemmaId,
        text: impl Into<String>,
        topic: Topic,
        intensity: Intensity,
    ) -> Result<Self, ValidationError> {
        Self::build(id, text.into(), topic, intensity, Origin::Corpus, None)
    }

    /// Creates a generated dilemma from a generator draft, minting a fresh id.
    pub fn generated(draft: GeneratedDilemma) -> Result<Self, ValidationError> {
        Self::build(
            DilemmaId::generated(),
            draft.text,
            draft.topic,
            draft.intensity,
            Origin::Generated,
            draft.philosophical_foundation,
        )
    }

    /// Attaches the philosophical foundation note.
    pub fn with_philosophical_foundation(mut self, foundation: impl Into<String>) -> Self {
        self.philosophical_foundation = Some(foundation.into());
        self
    }

    fn build(
        id: DilemmaId,
        text: String,
        topic: Topic,
        intensity: Intensity,
        origin: Origin,
        philosophical_foundation: Option<String>,
    ) -> Result<Self, ValidationError> {
        if text.trim().is_empty() {
            return Err(ValidationError::empty_field("text"));
        }
        Ok(Self {
            id,
            text,
            topic,
            intensity,
            origin,
            philosophical_foundation: philosophical_foundation.filter(|f| !f.trim().is_empty()),
        })
    }

    pub fn id(&self) -> &DilemmaId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn intensity(&self) -> Intensity {
        self.intensity
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn philosophical_foundation(&self) -> Option<&str> {
        self.philosophical_foundation.as_deref()
    }
}

/// A dilemma as returned by a generator, before the core mints its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedDilemma {
    pub text: String,
    pub topic: Topic,
    pub intensity: Intensity,
    pub philosophical_foundation: Option<String>,
}

impl GeneratedDilemma {
    pub fn new(text: impl Into<String>, topic: Topic, intensity: Intensity) -> Self {
        Self {
            text: text.into(),
            topic,
            intensity,
            philosophical_foundation: None,
        }
    }

    pub fn with_philosophical_foundation(mut self, foundation: impl Into<String>) -> Self {
        self.philosophical_foundation = Some(foundation.into());
        self
    }
}
