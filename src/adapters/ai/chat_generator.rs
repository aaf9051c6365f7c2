//! Dilemma generator backed by a chat-completions model.
//!
//! The prompt shows the model corpus dilemmas of the requested topic as
//! style examples and asks for a single new one as `{"dilemmaText": "..."}`.

use async_trait::async_trait;
use std::sync::Arc;

use super::chat_client::{extract_json_field, ChatCompletionsClient};
use crate::domain::dilemma::{Dilemma, DilemmaCorpus, GeneratedDilemma};
use crate::ports::{DilemmaGenerator, GenerationError, GenerationRequest};

/// Corpus dilemmas shown to the model per request
const MAX_SEED_EXAMPLES: usize = 3;

const SYSTEM_PROMPT: &str = "You are an expert philosopher and psychologist designing ethical \
dilemmas for the Kantify app. Your task is to write original, thought-provoking dilemmas that \
invite deep reflection.";

pub struct ChatDilemmaGenerator {
    client: Arc<ChatCompletionsClient>,
    corpus: Arc<DilemmaCorpus>,
}

impl ChatDilemmaGenerator {
    pub fn new(client: Arc<ChatCompletionsClient>, corpus: Arc<DilemmaCorpus>) -> Self {
        Self { client, corpus }
    }

    fn seed_examples<'a>(&'a self, request: &'a GenerationRequest) -> Vec<&'a Dilemma> {
        let same_topic: Vec<&Dilemma> = self
            .corpus
            .by_topic(&request.topic)
            .take(MAX_SEED_EXAMPLES)
            .collect();
        if same_topic.is_empty() {
            self.corpus.iter().take(MAX_SEED_EXAMPLES).collect()
        } else {
            same_topic
        }
    }
}

/// Builds the user prompt for a generation request.
pub(crate) fn build_dilemma_prompt(request: &GenerationRequest, seeds: &[&Dilemma]) -> String {
    let examples = seeds
        .iter()
        .enumerate()
        .map(|(i, d)| match d.philosophical_foundation() {
            Some(foundation) => format!("Example {}: {} (Foundation: {})", i + 1, d.text(), foundation),
            None => format!("Example {}: {}", i + 1, d.text()),
        })
        .collect::<Vec<_>>()
        .join("\n");

    let context = if request.context.trim().is_empty() {
        String::new()
    } else {
        format!(
            "\nTake into account the following context about the user, based on their previous answers:\n'{}'\n",
            request.context.trim()
        )
    };

    format!(
        "Based on the following examples of dilemmas on the topic '{topic}' with intensity '{intensity}':\n\n\
         {examples}\n\
         {context}\n\
         Write ONE NEW AND ORIGINAL ethical dilemma that:\n\
         1. Clearly belongs to the topic '{topic}'.\n\
         2. Has an intensity comparable to '{intensity}'.\n\
         3. Ends with a question the user can answer on a scale from unacceptable to acceptable.\n\
         4. Is concise and clear, in the style of the examples.\n\
         5. Does NOT repeat the examples.\n\n\
         Return your answer ONLY as a valid JSON object with exactly this structure:\n\
         {{\n  \"dilemmaText\": \"The text of the new dilemma...\"\n}}",
        topic = request.topic,
        intensity = request.intensity,
        examples = examples,
        context = context,
    )
}

#[async_trait]
impl DilemmaGenerator for ChatDilemmaGenerator {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GeneratedDilemma, GenerationError> {
        let prompt = build_dilemma_prompt(&request, &self.seed_examples(&request));

        tracing::debug!(topic = %request.topic, intensity = %request.intensity, "Requesting dilemma");
        let content = self.client.complete_json(SYSTEM_PROMPT, &prompt).await?;
        let text = extract_json_field(&content, "dilemmaText")?;
        if text.is_empty() {
            return Err(GenerationError::EmptyDilemma);
        }

        Ok(GeneratedDilemma::new(text, request.topic, request.intensity))
    }
}
