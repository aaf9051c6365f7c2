//! Kantify - reflective ethical dilemmas and moral profiles.
//!
//! Presents pre-authored and AI-generated ethical dilemmas, records the
//! user's answers on a [0, 1] scale and derives an ethical profile from them.
//!
//! Layout follows hexagonal architecture:
//! - `domain` - dilemmas, sessions and profile analysis
//! - `ports` - generator, narrator and key-value store contracts
//! - `adapters` - chat-completions client, mock and offline generators, stores
//! - `application` - the session controller and its wiring
//! - `config` - environment configuration and tracing setup

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
