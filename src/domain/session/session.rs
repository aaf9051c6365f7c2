//! Session record - identity, answered log and the presented dilemma.
//!
//! # Invariants
//!
//! - `answered_log` is append-only and holds at most one entry per dilemma id
//! - `corpus_cursor` is always a valid index when the corpus is non-empty
//! - a presented corpus dilemma carries its prior answer, if any

use serde::{Deserialize, Serialize};

use super::SessionError;
use crate::domain::dilemma::{AnsweredDilemma, Dilemma, DilemmaCorpus, PresentedDilemma};
use crate::domain::foundation::{DilemmaId, ResponseValue, SessionId};

/// A single user's dilemma session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    answered_log: Vec<AnsweredDilemma>,
    current: Option<PresentedDilemma>,
    corpus_cursor: usize,
}

impl Session {
    /// Starts a session over a restored answered log, with nothing presented.
    pub fn start(id: SessionId, answered_log: Vec<AnsweredDilemma>) -> Self {
        Self {
            id,
            answered_log,
            current: None,
            corpus_cursor: 0,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn answered_log(&self) -> &[AnsweredDilemma] {
        &self.answered_log
    }

    pub fn answered_count(&self) -> usize {
        self.answered_log.len()
    }

    pub fn last_answer(&self) -> Option<&AnsweredDilemma> {
        self.answered_log.last()
    }

    pub fn current(&self) -> Option<&PresentedDilemma> {
        self.current.as_ref()
    }

    pub fn corpus_cursor(&self) -> usize {
        self.corpus_cursor
    }

    /// Returns true if `id` has an entry in the answered log.
    pub fn has_answered(&self, id: &DilemmaId) -> bool {
        self.answered_log.iter().any(|a| a.dilemma().id() == id)
    }

    /// Presents the corpus dilemma at `index`, moving the cursor there.
    ///
    /// # Errors
    ///
    /// - `EmptyCorpus` if `index` is past the end of the corpus
    pub fn present_corpus(
        &mut self,
        corpus: &DilemmaCorpus,
        index: usize,
    ) -> Result<&PresentedDilemma, SessionError> {
        let dilemma = corpus.get(index).ok_or(SessionError::EmptyCorpus)?.clone();
        self.corpus_cursor = index;
        Ok(self.present(PresentedDilemma::new(dilemma, &self.answered_log)))
    }

    /// Moves the cursor forward one step, wrapping at the end of the corpus.
    ///
    /// Never appends to the answered log.
    pub fn advance_corpus(
        &mut self,
        corpus: &DilemmaCorpus,
    ) -> Result<&PresentedDilemma, SessionError> {
        let next = corpus
            .next_index(self.corpus_cursor)
            .ok_or(SessionError::EmptyCorpus)?;
        self.present_corpus(corpus, next)
    }

    /// Presents a freshly generated dilemma, replacing the current one.
    pub fn present_generated(&mut self, dilemma: Dilemma) -> &PresentedDilemma {
        self.present(PresentedDilemma::fresh(dilemma))
    }

    fn present(&mut self, presented: PresentedDilemma) -> &PresentedDilemma {
        self.current.insert(presented)
    }

    /// Records `response` for the current dilemma.
    ///
    /// Returns the new log entry, or `None` when the dilemma was already
    /// answered, in which case the prior answer stands.
    ///
    /// # Errors
    ///
    /// - `NoActiveDilemma` if nothing is presented
    pub fn record_answer(
        &mut self,
        response: ResponseValue,
    ) -> Result<Option<AnsweredDilemma>, SessionError> {
        let current = self.current.as_ref().ok_or(SessionError::NoActiveDilemma)?;
        if self.has_answered(current.dilemma.id()) {
            return Ok(None);
        }
        let answered = AnsweredDilemma::record(current.dilemma.clone(), response);
        self.answered_log.push(answered.clone());
        Ok(Some(answered))
    }

    /// Removes the entry appended by the last successful `record_answer`.
    pub fn undo_answer(&mut self, answered: &AnsweredDilemma) {
        if self.answered_log.last() == Some(answered) {
            self.answered_log.pop();
        }
    }

    /// Returns true if the opening corpus dilemma is still shown unanswered.
    pub fn is_on_unanswered_opening(&self, corpus: &DilemmaCorpus) -> bool {
        match (&self.current, corpus.get(0)) {
            (Some(current), Some(opening)) => {
                self.corpus_cursor == 0
                    && current.dilemma.id() == opening.id()
                    && !self.has_answered(opening.id())
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dilemma::{GeneratedDilemma, Intensity, Topic};

    const CORPUS: &str = r#"
- { id: C1, text: first, topic: A, intensity: Soft }
- { id: C2, text: second, topic: B, intensity: Medium }
- { id: C3, text: third, topic: A, intensity: Extreme }
"#;

    fn corpus() -> DilemmaCorpus {
        DilemmaCorpus::from_yaml_str(CORPUS).unwrap()
    }

    fn response(v: f64) -> ResponseValue {
        ResponseValue::try_new(v).unwrap()
    }

    fn started() -> Session {
        let mut session = Session::start(SessionId::new(), Vec::new());
        session.present_corpus(&corpus(), 0).unwrap();
        session
    }

    #[test]
    fn record_answer_requires_current_dilemma() {
        let mut session = Session::start(SessionId::new(), Vec::new());
        assert!(matches!(
            session.record_answer(response(0.5)),
            Err(SessionError::NoActiveDilemma)
        ));
    }

    #[test]
    fn record_answer_appends_current_dilemma() {
        let mut session = started();
        let answered = session.record_answer(response(0.4)).unwrap().unwrap();
        assert_eq!(answered.dilemma().id().as_str(), "C1");
        assert_eq!(session.answered_count(), 1);
    }

    #[test]
    fn answering_twice_does_not_duplicate() {
        let mut session = started();
        session.record_answer(response(0.4)).unwrap();
        assert!(session.record_answer(response(0.9)).unwrap().is_none());
        assert_eq!(session.answered_count(), 1);
        assert_eq!(session.answered_log()[0].response().value(), 0.4);
    }

    #[test]
    fn advancing_wraps_and_attaches_prior_answer() {
        let corpus = corpus();
        let mut session = started();
        session.record_answer(response(0.2)).unwrap();

        session.advance_corpus(&corpus).unwrap();
        session.advance_corpus(&corpus).unwrap();
        let presented = session.advance_corpus(&corpus).unwrap();

        assert_eq!(presented.dilemma.id().as_str(), "C1");
        assert_eq!(presented.prior_answer.as_ref().unwrap().response().value(), 0.2);
        assert_eq!(session.corpus_cursor(), 0);
        assert_eq!(session.answered_count(), 1);
    }

    #[test]
    fn advancing_empty_corpus_fails() {
        let mut session = Session::start(SessionId::new(), Vec::new());
        assert!(matches!(
            session.advance_corpus(&DilemmaCorpus::default()),
            Err(SessionError::EmptyCorpus)
        ));
    }

    #[test]
    fn generated_dilemma_replaces_current() {
        let mut session = started();
        let draft = GeneratedDilemma::new("new", Topic::new("A").unwrap(), Intensity::Soft);
        let presented = session.present_generated(Dilemma::generated(draft).unwrap());
        assert!(!presented.is_answered());
        assert!(presented.dilemma.id().as_str().starts_with("gen-"));
        assert!(!session.is_on_unanswered_opening(&corpus()));
    }

    #[test]
    fn undo_answer_removes_last_entry_only() {
        let mut session = started();
        let answered = session.record_answer(response(0.4)).unwrap().unwrap();
        session.undo_answer(&answered);
        assert_eq!(session.answered_count(), 0);
    }

    #[test]
    fn opening_check_tracks_answer_state() {
        let corpus = corpus();
        let mut session = started();
        assert!(session.is_on_unanswered_opening(&corpus));
        session.record_answer(response(0.4)).unwrap();
        assert!(!session.is_on_unanswered_opening(&corpus));
    }
}
