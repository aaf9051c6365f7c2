//! Chat-completions client for OpenAI-compatible APIs.
//!
//! Defaults target Groq's hosted Llama models, but any endpoint that speaks
//! `POST {base_url}/chat/completions` with bearer auth works.
//!
//! # Configuration
//!
//! ```ignore
//! let config = ChatClientConfig::new(api_key)
//!     .with_model("llama-3.3-70b-versatile")
//!     .with_base_url("https://api.groq.com/openai/v1");
//!
//! let client = ChatCompletionsClient::new(config)?;
//! let content = client.complete_json(system_prompt, user_prompt).await?;
//! ```
//!
//! Every request asks for a JSON object reply. Retryable failures are
//! retried with exponential backoff up to `max_retries` times.

use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::AiConfig;
use crate::ports::GenerationError;

/// Default retry-after when a 429 carries no hint
const DEFAULT_RETRY_AFTER_SECS: u32 = 30;

#[derive(Debug, Clone)]
pub struct ChatClientConfig {
    api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further attempt
    pub initial_backoff: Duration,
}

impl ChatClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "llama-3.3-70b-versatile".to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            temperature: 0.8,
            max_tokens: 2048,
            timeout: Duration::from_secs(30),
            max_retries: 2,
            initial_backoff: Duration::from_secs(1),
        }
    }

    /// Builds a client config from application config, if an API key is set.
    pub fn from_app_config(config: &AiConfig) -> Option<Self> {
        if !config.has_api_key() {
            return None;
        }
        let api_key = config.api_key.as_ref()?.expose_secret().trim().to_string();
        Some(
            Self::new(api_key)
                .with_model(config.model.clone())
                .with_base_url(config.base_url.clone())
                .with_temperature(config.temperature)
                .with_max_tokens(config.max_tokens)
                .with_timeout(config.timeout())
                .with_max_retries(config.max_retries),
        )
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    /// Delay before retry number `retry_count` (0-based): 1x, 2x, 4x, ...
    fn backoff_delay(&self, retry_count: u32) -> Duration {
        self.initial_backoff * (1u32 << retry_count.min(16))
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

pub struct ChatCompletionsClient {
    config: ChatClientConfig,
    client: Client,
}

impl ChatCompletionsClient {
    pub fn new(config: ChatClientConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::unavailable(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ChatClientConfig {
        &self.config
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    fn build_request<'a>(&'a self, system_prompt: &'a str, user_prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        }
    }

    async fn send_request(&self, request: &ChatRequest<'_>) -> Result<Response, GenerationError> {
        self.client
            .post(self.completions_url())
            .bearer_auth(self.config.api_key())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    GenerationError::network(format!("Connection failed: {}", e))
                } else {
                    GenerationError::network(e.to_string())
                }
            })
    }

    async fn parse_response(&self, response: Response) -> Result<String, GenerationError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status.as_u16(), &body));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::malformed(format!("Failed to parse response: {}", e)))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| GenerationError::malformed("No content in response"))
    }

    async fn attempt(&self, request: &ChatRequest<'_>) -> Result<String, GenerationError> {
        let response = self.send_request(request).await?;
        self.parse_response(response).await
    }

    /// Sends one system and one user message and returns the raw content of
    /// the first choice.
    pub async fn complete_json(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, GenerationError> {
        let request = self.build_request(system_prompt, user_prompt);
        let mut retry_count = 0;

        loop {
            match self.attempt(&request).await {
                Ok(content) => return Ok(content),
                Err(err) => {
                    if !err.is_retryable() || retry_count >= self.config.max_retries {
                        tracing::warn!(
                            model = %self.config.model,
                            attempts = retry_count + 1,
                            error = %err,
                            "Chat completion failed"
                        );
                        return Err(err);
                    }

                    let delay = self.config.backoff_delay(retry_count);
                    tracing::debug!(
                        attempt = retry_count + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Retrying chat completion"
                    );
                    sleep(delay).await;
                    retry_count += 1;
                }
            }
        }
    }
}

/// Maps a non-success HTTP status to a generation error.
pub(crate) fn error_for_status(status: u16, body: &str) -> GenerationError {
    match status {
        401 | 403 => GenerationError::AuthenticationFailed,
        429 => GenerationError::rate_limited(parse_retry_after(body)),
        500..=599 => GenerationError::unavailable(format!("Server error {}: {}", status, body)),
        _ => GenerationError::network(format!("Unexpected status {}: {}", status, body)),
    }
}

/// Extracts the "try again in Xs" hint providers put in rate-limit errors.
fn parse_retry_after(body: &str) -> u32 {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|parsed| {
            parsed
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .and_then(|message| {
            let idx = message.find("try again in ")?;
            let rest = &message[idx + "try again in ".len()..];
            let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse::<u32>().ok()
        })
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

/// Reads a string field from a JSON object reply.
///
/// Tolerates replies wrapped in a Markdown code fence. The returned text is
/// trimmed and may be empty.
pub(crate) fn extract_json_field(content: &str, field: &str) -> Result<String, GenerationError> {
    let trimmed = content.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);

    let value: serde_json::Value = serde_json::from_str(unfenced.trim())
        .map_err(|e| GenerationError::malformed(format!("Reply is not JSON: {}", e)))?;

    value
        .get(field)
        .and_then(|v| v.as_str())
        .map(|s| s.trim().to_string())
        .ok_or_else(|| GenerationError::malformed(format!("Reply has no string field '{}'", field)))
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_target_groq() {
        let config = ChatClientConfig::new("gsk_test");
        assert_eq!(config.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(config.model, "llama-3.3-70b-versatile");
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.api_key(), "gsk_test");
    }

    #[test]
    fn backoff_doubles_from_initial_delay() {
        let config = ChatClientConfig::new("k").with_initial_backoff(Duration::from_millis(250));
        assert_eq!(config.backoff_delay(0), Duration::from_millis(250));
        assert_eq!(config.backoff_delay(1), Duration::from_millis(500));
        assert_eq!(config.backoff_delay(3), Duration::from_secs(2));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ChatCompletionsClient::new(
            ChatClientConfig::new("k").with_base_url("http://localhost:8080/v1/"),
        )
        .unwrap();
        assert_eq!(client.completions_url(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn from_app_config_requires_api_key() {
        assert!(ChatClientConfig::from_app_config(&AiConfig::default()).is_none());

        let app = AiConfig {
            api_key: Some(Secret::new("gsk_live".to_string())),
            model: "mixtral-8x7b-32768".to_string(),
            timeout_secs: 5,
            ..Default::default()
        };
        let config = ChatClientConfig::from_app_config(&app).unwrap();
        assert_eq!(config.model, "mixtral-8x7b-32768");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn request_body_asks_for_json_object() {
        let client = ChatCompletionsClient::new(ChatClientConfig::new("k")).unwrap();
        let request = client.build_request("system", "user");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["response_format"]["type"], "json_object");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "user");
        assert_eq!(json["max_tokens"], 2048);
    }

    #[test]
    fn status_mapping() {
        assert_eq!(error_for_status(401, ""), GenerationError::AuthenticationFailed);
        assert!(matches!(
            error_for_status(503, "down"),
            GenerationError::Unavailable { .. }
        ));
        assert!(matches!(error_for_status(418, ""), GenerationError::Network(_)));
    }

    #[test]
    fn rate_limit_reads_retry_hint() {
        let body = r#"{"error":{"message":"Rate limit reached. Please try again in 12s."}}"#;
        assert_eq!(error_for_status(429, body), GenerationError::rate_limited(12));
        assert_eq!(
            error_for_status(429, "not json"),
            GenerationError::rate_limited(DEFAULT_RETRY_AFTER_SECS)
        );
    }

    #[test]
    fn extract_field_reads_plain_and_fenced_json() {
        let plain = r#"{"dilemmaText": "  Is it fair?  "}"#;
        assert_eq!(extract_json_field(plain, "dilemmaText").unwrap(), "Is it fair?");

        let fenced = "```json\n{\"narrative\": \"And if everyone...\"}\n```";
        assert_eq!(
            extract_json_field(fenced, "narrative").unwrap(),
            "And if everyone..."
        );
    }

    #[test]
    fn extract_field_reports_malformed_replies() {
        assert!(matches!(
            extract_json_field("plain text", "dilemmaText"),
            Err(GenerationError::MalformedResponse(_))
        ));
        assert!(matches!(
            extract_json_field(r#"{"other": "x"}"#, "dilemmaText"),
            Err(GenerationError::MalformedResponse(_))
        ));
        assert!(matches!(
            extract_json_field(r#"{"dilemmaText": 3}"#, "dilemmaText"),
            Err(GenerationError::MalformedResponse(_))
        ));
    }
}
