//! Plain-text summary of an ethical profile.

use serde::{Deserialize, Serialize};

use super::{EthicalProfileAnalysis, ProfileAnalyzer};
use crate::domain::dilemma::AnsweredDilemma;

/// Summary shown before any dilemma has been answered.
pub const EMPTY_PROFILE_SUMMARY: &str =
    "You have not answered any dilemma yet. Explore a few dilemmas to build your ethical profile.";

/// Reading of the overall tendency.
pub fn tendency_label(tendency: f64) -> &'static str {
    if tendency < 0.4 {
        "cautious"
    } else if tendency > 0.6 {
        "liberal"
    } else {
        "balanced"
    }
}

/// Reading of the consistency score.
pub fn consistency_label(consistency: f64) -> &'static str {
    if consistency > 0.7 {
        "very consistent"
    } else if consistency > 0.4 {
        "moderately consistent"
    } else {
        "variable"
    }
}

fn distribution_sentence(analysis: &EthicalProfileAnalysis) -> &'static str {
    let d = &analysis.distribution;
    if d.acceptance > 60.0 {
        "Most of your decisions show openness and acceptance towards the situations presented."
    } else if d.rejection > 60.0 {
        "Caution and scepticism dominate your moral decisions."
    } else if d.neutral > 40.0 {
        "Your approach leans towards reflective ambivalence, weighing each situation on its merits."
    } else {
        "Your decisions balance openness, caution and contextual reflection."
    }
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// Renders the profile as a short English text.
///
/// `total_count` is the number of answered dilemmas; zero yields
/// [`EMPTY_PROFILE_SUMMARY`].
pub fn summarize(analysis: &EthicalProfileAnalysis, total_count: usize) -> String {
    if total_count == 0 {
        return EMPTY_PROFILE_SUMMARY.to_string();
    }

    let mut text = format!(
        "You have reflected on {}, exploring {} of moral philosophy.\n\n\
         Your profile shows a {} ethical tendency with a {} decision pattern. {}",
        plural(total_count, "ethical dilemma", "ethical dilemmas"),
        plural(analysis.topic_count(), "dimension", "dimensions"),
        tendency_label(analysis.overall_tendency),
        consistency_label(analysis.consistency),
        distribution_sentence(analysis),
    );

    let patterns = &analysis.patterns;
    match (
        &patterns.most_conservative_topic,
        &patterns.most_liberal_topic,
        &patterns.most_consistent_topic,
    ) {
        (Some(cautious), Some(open), _) if cautious != open => {
            text.push_str(&format!(
                "\n\nPatterns identified:\n\
                 - Most cautious on {}\n\
                 - Most open on {}\n\n\
                 This tension between topics points to an ethics that adapts its principles to context.",
                cautious, open
            ));
        }
        (_, _, Some(consistent)) => {
            text.push_str(&format!(
                "\n\nStandout pattern:\nYou are most consistent when deciding on {}, \
                 which suggests well-defined principles in that area.",
                consistent
            ));
        }
        _ => {}
    }

    text
}

/// Profile payload handed to presentation and narrative generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EthicalProfile {
    pub summary: String,
    pub analysis: EthicalProfileAnalysis,
    pub total_answered: usize,
    /// Answered dilemmas, newest first.
    pub answered: Vec<AnsweredDilemma>,
}

impl EthicalProfile {
    /// Analyzes and summarizes an answered log.
    pub fn from_log(answered_log: &[AnsweredDilemma]) -> Self {
        let analysis = ProfileAnalyzer::analyze(answered_log);
        let summary = summarize(&analysis, answered_log.len());
        Self {
            summary,
            analysis,
            total_answered: answered_log.len(),
            answered: answered_log.iter().rev().cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_answered == 0
    }
}
