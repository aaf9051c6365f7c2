//! Profile narrator backed by a chat-completions model.
//!
//! Asks for a Kantian "what if everyone..." reflection over the whole
//! profile, returned as `{"narrative": "..."}`.

use async_trait::async_trait;
use std::sync::Arc;

use super::chat_client::{extract_json_field, ChatCompletionsClient};
use crate::domain::analysis::EthicalProfile;
use crate::ports::{GenerationError, ProfileNarrator};

/// Answered dilemmas quoted in the prompt
const MAX_PROMPT_EXAMPLES: usize = 5;

/// Characters of each quoted dilemma
const EXCERPT_CHARS: usize = 100;

const SYSTEM_PROMPT: &str = "You are a philosopher specialised in Kantian ethics. You analyse \
complete moral profiles and reflect on what would happen if their patterns of conduct became \
universal law. Write reflective, respectful and constructive narratives.";

pub struct ChatProfileNarrator {
    client: Arc<ChatCompletionsClient>,
}

impl ChatProfileNarrator {
    pub fn new(client: Arc<ChatCompletionsClient>) -> Self {
        Self { client }
    }
}

fn excerpt(text: &str) -> String {
    if text.chars().count() <= EXCERPT_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(EXCERPT_CHARS).collect();
    format!("{}...", cut)
}

/// Builds the user prompt describing `profile`.
pub(crate) fn build_narrative_prompt(profile: &EthicalProfile) -> String {
    let analysis = &profile.analysis;
    let or_na = |topic: &Option<crate::domain::dilemma::Topic>| {
        topic
            .as_ref()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    };

    let topics = analysis
        .topics
        .iter()
        .map(|s| format!("- {}: {:.2} mean (std dev {:.2})", s.topic, s.mean, s.std_dev))
        .collect::<Vec<_>>()
        .join("\n");

    let examples = profile
        .answered
        .iter()
        .take(MAX_PROMPT_EXAMPLES)
        .enumerate()
        .map(|(i, a)| {
            format!(
                "{}. \"{}\" -> response {}",
                i + 1,
                excerpt(a.dilemma().text()),
                a.response()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analyse the following ethical profile and write a Kantian narrative.\n\n\
         Profile summary:\n\
         - Dilemmas answered: {total}\n\
         - Overall tendency (0-1): {tendency:.2}\n\
         - Consistency: {consistency:.0}%\n\n\
         Mean response per topic:\n{topics}\n\n\
         Response distribution:\n\
         - Rejection (< 0.3): {rejection:.0}%\n\
         - Neutral (0.3-0.7): {neutral:.0}%\n\
         - Acceptance (> 0.7): {acceptance:.0}%\n\n\
         Patterns:\n\
         - Most cautious on: {cautious}\n\
         - Most open on: {open}\n\
         - Most consistent on: {consistent}\n\n\
         Recent answers:\n{examples}\n\n\
         Write a 200-300 word narrative in the form \"What if everyone...\" that identifies the \
         implicit maxims, explores their universalisation, notes tensions or virtues and ends \
         with a reflective question.\n\n\
         Return ONLY a JSON object with this structure:\n\
         {{\n  \"narrative\": \"The complete narrative...\"\n}}",
        total = profile.total_answered,
        tendency = analysis.overall_tendency,
        consistency = analysis.consistency * 100.0,
        topics = topics,
        rejection = analysis.distribution.rejection,
        neutral = analysis.distribution.neutral,
        acceptance = analysis.distribution.acceptance,
        cautious = or_na(&analysis.patterns.most_conservative_topic),
        open = or_na(&analysis.patterns.most_liberal_topic),
        consistent = or_na(&analysis.patterns.most_consistent_topic),
        examples = examples,
    )
}

/// Narrative shown when the model cannot produce one.
pub fn fallback_narrative(profile: &EthicalProfile) -> String {
    let analysis = &profile.analysis;
    let coherence = if analysis.consistency > 0.6 {
        "notable coherence"
    } else {
        "adaptive flexibility"
    };
    let world = if analysis.distribution.acceptance > 50.0 {
        "openness and acceptance prevail"
    } else if analysis.distribution.rejection > 50.0 {
        "caution and scepticism are valued"
    } else {
        "balance and moderation guide action"
    };

    format!(
        "Reflection on your ethical profile\n\n\
         You have explored {} moral dilemmas. With an overall tendency of {:.2} \
         (0 is very cautious, 1 is very open), your decisions show {} across ethical contexts.\n\n\
         If everyone adopted your pattern of decision, we would see a world where {}.\n\n\
         Could your decisions become universal law without contradiction?",
        profile.total_answered, analysis.overall_tendency, coherence, world
    )
}

#[async_trait]
impl ProfileNarrator for ChatProfileNarrator {
    async fn narrate(&self, profile: &EthicalProfile) -> Result<String, GenerationError> {
        let prompt = build_narrative_prompt(profile);
        let content = self.client.complete_json(SYSTEM_PROMPT, &prompt).await?;
        let narrative = extract_json_field(&content, "narrative")?;
        if narrative.is_empty() {
            return Err(GenerationError::malformed("Narrative is empty"));
        }
        Ok(narrative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dilemma::{AnsweredDilemma, Dilemma, Intensity, Topic};
    use crate::domain::foundation::{DilemmaId, ResponseValue};

    fn profile() -> EthicalProfile {
        let answered: Vec<AnsweredDilemma> = [("D1", "Alpha", 0.1), ("D2", "Beta", 0.9)]
            .iter()
            .map(|(id, topic, v)| {
                let dilemma = Dilemma::corpus(
                    DilemmaId::new(*id).unwrap(),
                    "x".repeat(150),
                    Topic::new(*topic).unwrap(),
                    Intensity::Soft,
                )
                .unwrap();
                AnsweredDilemma::record(dilemma, ResponseValue::try_new(*v).unwrap())
            })
            .collect();
        EthicalProfile::from_log(&answered)
    }

    #[test]
    fn prompt_contains_statistics_and_patterns() {
        let prompt = build_narrative_prompt(&profile());
        assert!(prompt.contains("Dilemmas answered: 2"));
        assert!(prompt.contains("- Alpha: 0.10 mean"));
        assert!(prompt.contains("Most cautious on: Alpha"));
        assert!(prompt.contains("Most open on: Beta"));
        assert!(prompt.contains("\"narrative\""));
    }

    #[test]
    fn prompt_truncates_long_dilemmas() {
        let prompt = build_narrative_prompt(&profile());
        assert!(prompt.contains(&format!("\"{}...\"", "x".repeat(100))));
        assert!(!prompt.contains(&"x".repeat(101)));
    }

    #[test]
    fn prompt_handles_empty_profile() {
        let prompt = build_narrative_prompt(&EthicalProfile::from_log(&[]));
        assert!(prompt.contains("Most cautious on: N/A"));
    }

    #[test]
    fn fallback_reflects_distribution() {
        let narrative = fallback_narrative(&profile());
        assert!(narrative.contains("2 moral dilemmas"));
        assert!(narrative.contains("balance and moderation"));
        assert!(narrative.contains("adaptive flexibility"));
    }
}
