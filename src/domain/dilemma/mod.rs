//! Dilemma module - dilemmas, answers and the static corpus.

mod answered;
mod corpus;
#[allow(clippy::module_inception)]
mod dilemma;

pub use answered::{find_answer, AnsweredDilemma, PresentedDilemma};
pub use corpus::{CorpusError, DilemmaCorpus};
pub use dilemma::{Dilemma, GeneratedDilemma, Intensity, Origin, Topic, DEFAULT_TOPICS};
