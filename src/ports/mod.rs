//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `DilemmaGenerator` - Produces new dilemmas on demand
//! - `KeyValueStore` - Durable persistence of the session id and answers
//! - `ProfileNarrator` - Free-text narrative over a computed profile

mod dilemma_generator;
mod key_value_store;
mod profile_narrator;

pub use dilemma_generator::{DilemmaGenerator, GenerationError, GenerationRequest};
pub use key_value_store::{answers_key, KeyValueStore, StoreError, SESSION_ID_KEY};
pub use profile_narrator::ProfileNarrator;
