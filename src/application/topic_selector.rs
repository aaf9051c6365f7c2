//! Random topic and intensity selection for generated dilemmas.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};

use crate::domain::dilemma::{Intensity, Topic};

/// Picks the topic and intensity of the next generated dilemma.
///
/// The randomness source is injected so tests can make picks deterministic.
pub struct TopicSelector {
    topics: Vec<Topic>,
    rng: Box<dyn RngCore + Send>,
}

impl TopicSelector {
    /// Selects among `topics`, or the default topics if the list is empty.
    pub fn new(topics: Vec<Topic>, rng: impl RngCore + Send + 'static) -> Self {
        let topics = if topics.is_empty() {
            Topic::defaults()
        } else {
            topics
        };
        Self {
            topics,
            rng: Box::new(rng),
        }
    }

    /// Reproducible selector over `topics`.
    pub fn seeded(topics: Vec<Topic>, seed: u64) -> Self {
        Self::new(topics, StdRng::seed_from_u64(seed))
    }

    /// Selector seeded from OS entropy.
    pub fn from_entropy(topics: Vec<Topic>) -> Self {
        Self::new(topics, StdRng::from_entropy())
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn pick_topic(&mut self) -> Topic {
        self.topics
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_else(|| Topic::defaults().remove(0))
    }

    pub fn pick_intensity(&mut self) -> Intensity {
        *Intensity::ALL
            .choose(&mut self.rng)
            .unwrap_or(&Intensity::Soft)
    }

    /// Picks a topic and an intensity independently.
    pub fn pick(&mut self) -> (Topic, Intensity) {
        let topic = self.pick_topic();
        let intensity = self.pick_intensity();
        (topic, intensity)
    }
}

impl std::fmt::Debug for TopicSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopicSelector")
            .field("topics", &self.topics)
            .finish_non_exhaustive()
    }
}
