//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types that form the
//! vocabulary of the Kantify domain.

mod errors;
mod ids;
mod response_value;
mod state_machine;
mod timestamp;

pub use errors::{ErrorCode, ValidationError};
pub use ids::{DilemmaId, SessionId};
pub use response_value::ResponseValue;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
