//! Application layer - session orchestration and wiring.
//!
//! `SessionController` coordinates the domain with the generator and store
//! ports. `bootstrap` builds it from configuration.

pub mod bootstrap;
mod session_controller;
mod topic_selector;

pub use bootstrap::{build_controller, build_narrator, BootstrapError};
pub use session_controller::{
    AnswerOutcome, GenerationOutcome, SessionController, SessionSnapshot,
    FIRST_GENERATION_CONTEXT,
};
pub use topic_selector::TopicSelector;
