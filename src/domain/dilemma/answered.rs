//! Answer records and the presented-dilemma view.

use serde::{Deserialize, Serialize};

use super::Dilemma;
use crate::domain::foundation::{DilemmaId, ResponseValue, Timestamp};

/// A recorded answer. Created once per answer and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnsweredDilemma {
    dilemma: Dilemma,
    response: ResponseValue,
    answered_at: Timestamp,
}

impl AnsweredDilemma {
    /// Records an answer to `dilemma` at the current time.
    pub fn record(dilemma: Dilemma, response: ResponseValue) -> Self {
        Self::record_at(dilemma, response, Timestamp::now())
    }

    /// Records an answer with an explicit timestamp.
    pub fn record_at(dilemma: Dilemma, response: ResponseValue, answered_at: Timestamp) -> Self {
        Self {
            dilemma,
            response,
            answered_at,
        }
    }

    pub fn dilemma(&self) -> &Dilemma {
        &self.dilemma
    }

    pub fn response(&self) -> ResponseValue {
        self.response
    }

    pub fn answered_at(&self) -> Timestamp {
        self.answered_at
    }
}

/// The dilemma currently shown to the user.
///
/// When the dilemma was already answered in this session the earlier answer
/// rides along so it can be shown read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentedDilemma {
    pub dilemma: Dilemma,
    pub prior_answer: Option<AnsweredDilemma>,
}

impl PresentedDilemma {
    /// Presents a dilemma, attaching the first log entry with the same id.
    pub fn new(dilemma: Dilemma, answered_log: &[AnsweredDilemma]) -> Self {
        let prior_answer = find_answer(answered_log, dilemma.id()).cloned();
        Self {
            dilemma,
            prior_answer,
        }
    }

    /// Presents a freshly generated dilemma, which cannot have been answered.
    pub fn fresh(dilemma: Dilemma) -> Self {
        Self {
            dilemma,
            prior_answer: None,
        }
    }

    /// Returns true if the user already answered this dilemma.
    pub fn is_answered(&self) -> bool {
        self.prior_answer.is_some()
    }
}

/// Finds the recorded answer for a dilemma id.
pub fn find_answer<'a>(
    answered_log: &'a [AnsweredDilemma],
    id: &DilemmaId,
) -> Option<&'a AnsweredDilemma> {
    answered_log.iter().find(|a| a.dilemma().id() == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dilemma::{Intensity, Topic};

    fn dilemma(id: &str) -> Dilemma {
        Dilemma::corpus(
            DilemmaId::new(id).unwrap(),
            format!("Scenario {}", id),
            Topic::new("A").unwrap(),
            Intensity::Soft,
        )
        .unwrap()
    }

    fn response(v: f64) -> ResponseValue {
        ResponseValue::try_new(v).unwrap()
    }

    #[test]
    fn record_keeps_dilemma_verbatim() {
        let d = dilemma("D1");
        let answered = AnsweredDilemma::record(d.clone(), response(0.3));
        assert_eq!(answered.dilemma(), &d);
        assert_eq!(answered.response().value(), 0.3);
    }

    #[test]
    fn presented_attaches_prior_answer() {
        let log = vec![AnsweredDilemma::record(dilemma("D1"), response(0.9))];
        let presented = PresentedDilemma::new(dilemma("D1"), &log);
        assert!(presented.is_answered());
        assert_eq!(presented.prior_answer.unwrap().response().value(), 0.9);
    }

    #[test]
    fn presented_without_prior_answer() {
        let log = vec![AnsweredDilemma::record(dilemma("D1"), response(0.9))];
        let presented = PresentedDilemma::new(dilemma("D2"), &log);
        assert!(!presented.is_answered());
    }

    #[test]
    fn answered_dilemma_roundtrips_through_json() {
        let answered = AnsweredDilemma::record(dilemma("D7"), response(0.55));
        let json = serde_json::to_string(&answered).unwrap();
        let restored: AnsweredDilemma = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, answered);
    }
}
