//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `dilemma` - Dilemmas, answers and the static corpus
//! - `analysis` - Pure ethical profile analysis
//! - `session` - Session record and controller lifecycle phases

pub mod analysis;
pub mod dilemma;
pub mod foundation;
pub mod session;
