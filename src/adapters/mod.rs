//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Chat-completions generator and narrator, offline and mock generators
//! - `storage` - In-memory and file-backed key-value stores

pub mod ai;
pub mod storage;

pub use ai::{
    ChatClientConfig, ChatCompletionsClient, ChatDilemmaGenerator, ChatProfileNarrator,
    MockDilemmaGenerator, OfflineGenerator,
};
pub use storage::{FileKeyValueStore, InMemoryKeyValueStore};
