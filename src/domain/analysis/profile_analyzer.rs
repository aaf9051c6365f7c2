//! Ethical profile analysis - statistics over answered dilemmas.

use serde::{Deserialize, Serialize};

use crate::domain::dilemma::{AnsweredDilemma, Topic};

/// Responses strictly below this count as rejection.
pub const REJECTION_THRESHOLD: f64 = 0.3;

/// Responses strictly above this count as acceptance.
pub const ACCEPTANCE_THRESHOLD: f64 = 0.7;

/// Tendency reported when nothing has been answered.
pub const NEUTRAL_TENDENCY: f64 = 0.5;

/// Mean and spread of the responses given on one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicStatistics {
    pub topic: Topic,
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation (divides by n).
    pub std_dev: f64,
}

/// Topics that stand out at either end of the scale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePatterns {
    /// Lowest mean response.
    pub most_conservative_topic: Option<Topic>,
    /// Highest mean response.
    pub most_liberal_topic: Option<Topic>,
    /// Lowest standard deviation.
    pub most_consistent_topic: Option<Topic>,
    /// Highest standard deviation.
    pub least_consistent_topic: Option<Topic>,
}

/// Share of responses per bucket, as percentages of all responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseDistribution {
    pub rejection: f64,
    pub neutral: f64,
    pub acceptance: f64,
}

impl ResponseDistribution {
    pub fn total(&self) -> f64 {
        self.rejection + self.neutral + self.acceptance
    }
}

/// Statistical ethical profile derived from an answered log.
///
/// Never persisted; always recomputable from the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EthicalProfileAnalysis {
    /// Per-topic statistics in order of first occurrence.
    pub topics: Vec<TopicStatistics>,
    /// Mean of all responses.
    pub overall_tendency: f64,
    /// `max(0, 1 - 2 * overall std dev)`.
    pub consistency: f64,
    pub patterns: ProfilePatterns,
    pub distribution: ResponseDistribution,
}

impl EthicalProfileAnalysis {
    /// The profile of an empty log.
    pub fn neutral() -> Self {
        Self {
            topics: Vec::new(),
            overall_tendency: NEUTRAL_TENDENCY,
            consistency: 0.0,
            patterns: ProfilePatterns::default(),
            distribution: ResponseDistribution::default(),
        }
    }

    /// Mean response on `topic`, if it was answered.
    pub fn topic_average(&self, topic: &Topic) -> Option<f64> {
        self.topic(topic).map(|s| s.mean)
    }

    /// Standard deviation on `topic`, if it was answered.
    pub fn topic_std_dev(&self, topic: &Topic) -> Option<f64> {
        self.topic(topic).map(|s| s.std_dev)
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    fn topic(&self, topic: &Topic) -> Option<&TopicStatistics> {
        self.topics.iter().find(|s| &s.topic == topic)
    }
}

/// Pure analysis of answered dilemmas.
pub struct ProfileAnalyzer;

impl ProfileAnalyzer {
    /// Computes the ethical profile of an answered log.
    ///
    /// Total and deterministic. An empty log yields
    /// [`EthicalProfileAnalysis::neutral`].
    ///
    /// Consistency is a heuristic linear penalty on the overall spread, not a
    /// statistical confidence measure. Pattern ties keep the topic that was
    /// answered first.
    pub fn analyze(answered_log: &[AnsweredDilemma]) -> EthicalProfileAnalysis {
        if answered_log.is_empty() {
            return EthicalProfileAnalysis::neutral();
        }

        let mut grouped: Vec<(Topic, Vec<f64>)> = Vec::new();
        for answered in answered_log {
            let topic = answered.dilemma().topic();
            let value = answered.response().value();
            match grouped.iter_mut().find(|(t, _)| t == topic) {
                Some((_, values)) => values.push(value),
                None => grouped.push((topic.clone(), vec![value])),
            }
        }

        let topics: Vec<TopicStatistics> = grouped
            .into_iter()
            .map(|(topic, values)| TopicStatistics {
                topic,
                count: values.len(),
                mean: mean(&values),
                std_dev: population_std_dev(&values),
            })
            .collect();

        let all: Vec<f64> = answered_log.iter().map(|a| a.response().value()).collect();
        let overall_tendency = mean(&all);
        let consistency = (1.0 - 2.0 * population_std_dev(&all)).clamp(0.0, 1.0);

        let patterns = ProfilePatterns {
            most_conservative_topic: extreme_topic(&topics, |s| s.mean, |a, b| a < b),
            most_liberal_topic: extreme_topic(&topics, |s| s.mean, |a, b| a > b),
            most_consistent_topic: extreme_topic(&topics, |s| s.std_dev, |a, b| a < b),
            least_consistent_topic: extreme_topic(&topics, |s| s.std_dev, |a, b| a > b),
        };

        EthicalProfileAnalysis {
            topics,
            overall_tendency,
            consistency,
            patterns,
            distribution: distribution(&all),
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Reduces over topics, replacing the current pick only on a strict win.
fn extreme_topic(
    topics: &[TopicStatistics],
    key: impl Fn(&TopicStatistics) -> f64,
    beats: impl Fn(f64, f64) -> bool,
) -> Option<Topic> {
    let mut iter = topics.iter();
    let first = iter.next()?;
    let best = iter.fold(first, |best, candidate| {
        if beats(key(candidate), key(best)) {
            candidate
        } else {
            best
        }
    });
    Some(best.topic.clone())
}

fn distribution(values: &[f64]) -> ResponseDistribution {
    if values.is_empty() {
        return ResponseDistribution::default();
    }
    let total = values.len() as f64;
    let rejection = values.iter().filter(|v| **v < REJECTION_THRESHOLD).count() as f64;
    let acceptance = values.iter().filter(|v| **v > ACCEPTANCE_THRESHOLD).count() as f64;
    let neutral = total - rejection - acceptance;

    ResponseDistribution {
        rejection: rejection / total * 100.0,
        neutral: neutral / total * 100.0,
        acceptance: acceptance / total * 100.0,
    }
}
