//! Session domain module.
//!
//! Holds the per-user session record and the lifecycle phases of the
//! session controller.
//!
//! A session owns its answered log and the dilemma currently presented. It
//! is restored from storage on initialize and replaced by a fresh one on
//! clear.

mod errors;
mod phase;
#[allow(clippy::module_inception)]
mod session;

pub use errors::SessionError;
pub use phase::ControllerPhase;
pub use session::Session;
