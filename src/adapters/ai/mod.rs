//! AI Adapters.
//!
//! Implementations of the DilemmaGenerator and ProfileNarrator ports.
//!
//! ## Available Adapters
//!
//! - `ChatCompletionsClient` - OpenAI-compatible HTTP client (Groq by default)
//! - `ChatDilemmaGenerator` - Generates dilemmas through the chat client
//! - `ChatProfileNarrator` - Writes profile narratives through the chat client
//! - `OfflineGenerator` - Always unavailable; used when no API key is set
//! - `MockDilemmaGenerator` - Configurable mock for testing

mod chat_client;
mod chat_generator;
mod chat_narrator;
mod mock_generator;
mod offline;

pub use chat_client::{ChatClientConfig, ChatCompletionsClient};
pub use chat_generator::ChatDilemmaGenerator;
pub use chat_narrator::{fallback_narrative, ChatProfileNarrator};
pub use mock_generator::{MockDilemmaGenerator, MockGeneration};
pub use offline::OfflineGenerator;
