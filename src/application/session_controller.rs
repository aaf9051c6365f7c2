//! SessionController - orchestrates a single user's dilemma session.
//!
//! The controller owns the authoritative session state behind one async
//! mutex. Store calls are made with the lock held. Generator calls are made
//! with the lock released and the phase set to `Generating`, so profile and
//! corpus navigation stay responsive while a dilemma is being generated.
//!
//! Each generation captures the session id it was requested for. When the
//! result arrives for a session that has since been cleared it is discarded.

use std::sync::Arc;
use tokio::sync::Mutex;

use super::TopicSelector;
use crate::domain::analysis::EthicalProfile;
use crate::domain::dilemma::{
    find_answer, AnsweredDilemma, Dilemma, DilemmaCorpus, GeneratedDilemma, Intensity,
    PresentedDilemma, Topic,
};
use crate::domain::foundation::{ResponseValue, SessionId, StateMachine};
use crate::domain::session::{ControllerPhase, Session, SessionError};
use crate::ports::{
    answers_key, DilemmaGenerator, GenerationError, GenerationRequest, KeyValueStore, StoreError,
    SESSION_ID_KEY,
};

/// Context sent with the first generation of a session.
pub const FIRST_GENERATION_CONTEXT: &str = "This is the first dilemma generated for the user.";

/// What happened to a generation request.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// The generated dilemma is now current.
    Generated(PresentedDilemma),
    /// Generation failed; the next corpus dilemma is now current.
    CorpusFallback {
        presented: PresentedDilemma,
        reason: GenerationError,
    },
    /// The session was cleared while generating; the result was dropped.
    Discarded,
    /// Generation failed and the corpus is empty; the current dilemma is unchanged.
    Unavailable { reason: GenerationError },
}

impl GenerationOutcome {
    /// The dilemma that became current, if any.
    pub fn presented(&self) -> Option<&PresentedDilemma> {
        match self {
            GenerationOutcome::Generated(presented)
            | GenerationOutcome::CorpusFallback { presented, .. } => Some(presented),
            GenerationOutcome::Discarded | GenerationOutcome::Unavailable { .. } => None,
        }
    }

    /// The generator error, for outcomes caused by one.
    pub fn error(&self) -> Option<&GenerationError> {
        match self {
            GenerationOutcome::CorpusFallback { reason, .. }
            | GenerationOutcome::Unavailable { reason } => Some(reason),
            _ => None,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, GenerationOutcome::Generated(_))
    }
}

/// Result of answering the current dilemma.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    /// The new log entry; `None` if the dilemma had already been answered.
    pub recorded: Option<AnsweredDilemma>,
    /// Log length after the answer.
    pub answered_count: usize,
    /// How the next dilemma was obtained.
    pub next: GenerationOutcome,
}

/// Read-only view of the controller state.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub phase: ControllerPhase,
    pub session_id: Option<SessionId>,
    pub current: Option<PresentedDilemma>,
    pub answered_count: usize,
    pub corpus_cursor: usize,
}

struct ControllerInner {
    phase: ControllerPhase,
    session: Option<Session>,
    selector: TopicSelector,
}

fn move_phase(phase: &mut ControllerPhase, target: ControllerPhase) -> Result<(), SessionError> {
    *phase = phase
        .transition_to(target)
        .map_err(SessionError::InvalidTransition)?;
    Ok(())
}

impl ControllerInner {
    fn transition(&mut self, target: ControllerPhase) -> Result<(), SessionError> {
        move_phase(&mut self.phase, target)
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            session_id: self.session.as_ref().map(|s| *s.id()),
            current: self.session.as_ref().and_then(|s| s.current().cloned()),
            answered_count: self.session.as_ref().map_or(0, |s| s.answered_count()),
            corpus_cursor: self.session.as_ref().map_or(0, |s| s.corpus_cursor()),
        }
    }
}

/// Orchestrates corpus dilemmas, generated dilemmas and profile computation
/// for one session.
pub struct SessionController {
    store: Arc<dyn KeyValueStore>,
    generator: Arc<dyn DilemmaGenerator>,
    corpus: Arc<DilemmaCorpus>,
    inner: Arc<Mutex<ControllerInner>>,
}

impl SessionController {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        generator: Arc<dyn DilemmaGenerator>,
        corpus: Arc<DilemmaCorpus>,
        selector: TopicSelector,
    ) -> Self {
        Self {
            store,
            generator,
            corpus,
            inner: Arc::new(Mutex::new(ControllerInner {
                phase: ControllerPhase::Uninitialized,
                session: None,
                selector,
            })),
        }
    }

    pub fn corpus(&self) -> &DilemmaCorpus {
        &self.corpus
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Restores (or creates) the persisted session and presents the opening
    /// corpus dilemma.
    ///
    /// # Errors
    ///
    /// - `AlreadyGenerating` while a generation is in flight
    /// - `Storage` if the store cannot be read or the new id cannot be saved
    pub async fn initialize(&self) -> Result<SessionSnapshot, SessionError> {
        let mut guard = self.inner.lock().await;
        if guard.phase.is_generating() {
            return Err(SessionError::AlreadyGenerating);
        }

        let session_id = match self.read_session_id().await? {
            Some(id) => id,
            None => {
                let id = SessionId::new();
                self.write_session_id(&id).await?;
                tracing::info!(session_id = %id, "Created new session");
                id
            }
        };
        let answered_log = self.read_answers(&session_id).await?;

        if guard.phase != ControllerPhase::Uninitialized {
            guard.transition(ControllerPhase::Uninitialized)?;
        }
        guard.session = Some(self.open_session(session_id, answered_log));
        guard.transition(ControllerPhase::Active)?;

        tracing::info!(
            session_id = %session_id,
            answered = guard.snapshot().answered_count,
            "Session initialized"
        );
        Ok(guard.snapshot())
    }

    /// Records `value` for the current dilemma, persists the log and asks the
    /// generator for the next dilemma.
    ///
    /// A dilemma that is already in the log is not recorded again. Generation
    /// failures fall back to the corpus and are reported in
    /// [`AnswerOutcome::next`], never as errors.
    ///
    /// # Errors
    ///
    /// - `InvalidResponse` if `value` is outside [0, 1]
    /// - `AlreadyGenerating` while a generation is in flight
    /// - `NoActiveDilemma` if nothing is presented
    /// - `Storage` if the log cannot be persisted (the answer is rolled back)
    pub async fn answer_current(&self, value: f64) -> Result<AnswerOutcome, SessionError> {
        let response = ResponseValue::try_new(value).map_err(SessionError::InvalidResponse)?;

        let (session_id, request, recorded, answered_count) = {
            let mut guard = self.inner.lock().await;
            let inner = &mut *guard;
            if inner.phase.is_generating() {
                return Err(SessionError::AlreadyGenerating);
            }
            let session = inner.session.as_mut().ok_or(SessionError::NoActiveDilemma)?;
            let (answered_id, answered_topic) = session
                .current()
                .map(|p| (p.dilemma.id().clone(), p.dilemma.topic().clone()))
                .ok_or(SessionError::NoActiveDilemma)?;

            let recorded = session.record_answer(response)?;
            if let Some(answered) = &recorded {
                if let Err(err) = self.write_answers(session).await {
                    session.undo_answer(answered);
                    tracing::warn!(session_id = %session.id(), error = %err, "Failed to persist answer");
                    return Err(err.into());
                }
            }

            tracing::debug!(
                session_id = %session.id(),
                topic = %answered_topic,
                response = %response,
                recorded = recorded.is_some(),
                "Answer submitted"
            );

            // An already-answered dilemma keeps its first response
            let logged_response = find_answer(session.answered_log(), &answered_id)
                .map_or(response, |a| a.response());
            let context =
                answer_context(session.answered_count(), &answered_topic, logged_response);
            let (topic, intensity) = inner.selector.pick();
            let session_id = *session.id();
            let answered_count = session.answered_count();
            inner.transition(ControllerPhase::Generating)?;

            (
                session_id,
                GenerationRequest::new(topic, intensity, context),
                recorded,
                answered_count,
            )
        };

        let next = self.run_generation(session_id, request).await?;
        Ok(AnswerOutcome {
            recorded,
            answered_count,
            next,
        })
    }

    /// Moves to the next corpus dilemma, wrapping at the end.
    ///
    /// Allowed while generating; the pending generation still replaces the
    /// current dilemma when it completes.
    ///
    /// # Errors
    ///
    /// - `NotInitialized` before `initialize`
    /// - `EmptyCorpus` if there is nothing to present
    pub async fn advance_corpus(&self) -> Result<PresentedDilemma, SessionError> {
        let mut guard = self.inner.lock().await;
        let session = guard.session.as_mut().ok_or(SessionError::NotInitialized)?;
        let presented = session.advance_corpus(&self.corpus)?.clone();
        tracing::debug!(
            session_id = %session.id(),
            cursor = session.corpus_cursor(),
            "Advanced corpus"
        );
        Ok(presented)
    }

    /// Asks the generator for a dilemma of the given topic and intensity.
    ///
    /// On failure the next corpus dilemma is presented and the generator's
    /// error is returned in the outcome.
    ///
    /// # Errors
    ///
    /// - `AlreadyGenerating` while a generation is in flight
    /// - `NotInitialized` before `initialize`
    pub async fn generate_on_demand(
        &self,
        topic: Topic,
        intensity: Intensity,
    ) -> Result<GenerationOutcome, SessionError> {
        let (session_id, request) = {
            let mut guard = self.inner.lock().await;
            if guard.phase.is_generating() {
                return Err(SessionError::AlreadyGenerating);
            }
            let session = guard.session.as_ref().ok_or(SessionError::NotInitialized)?;
            let context = history_context(session);
            let session_id = *session.id();
            guard.transition(ControllerPhase::Generating)?;
            (session_id, GenerationRequest::new(topic, intensity, context))
        };

        self.run_generation(session_id, request).await
    }

    /// Computes the ethical profile of the committed answered log.
    pub async fn compute_profile(&self) -> EthicalProfile {
        let guard = self.inner.lock().await;
        let log = guard
            .session
            .as_ref()
            .map(|s| s.answered_log())
            .unwrap_or_default();
        EthicalProfile::from_log(log)
    }

    /// Erases the persisted session and starts a fresh one.
    ///
    /// Allowed while generating; the pending result is discarded.
    ///
    /// # Errors
    ///
    /// - `Storage` if the old session cannot be erased or the new id saved
    pub async fn clear(&self) -> Result<SessionSnapshot, SessionError> {
        let mut guard = self.inner.lock().await;

        let old_id = match guard.session.as_ref() {
            Some(session) => Some(*session.id()),
            None => match self.read_session_id().await {
                Ok(id) => id,
                // A malformed id cannot own an answers key; deleting it is enough
                Err(err @ StoreError::DeserializationFailed { .. }) => {
                    tracing::warn!(error = %err, "Discarding unreadable session id during clear");
                    None
                }
                Err(err) => return Err(err.into()),
            },
        };
        if let Some(id) = &old_id {
            self.store.delete(&answers_key(id)).await?;
        }
        self.store.delete(SESSION_ID_KEY).await?;

        guard.transition(ControllerPhase::Cleared)?;
        guard.session = None;

        let session_id = SessionId::new();
        self.write_session_id(&session_id).await?;
        guard.transition(ControllerPhase::Uninitialized)?;
        guard.session = Some(self.open_session(session_id, Vec::new()));
        guard.transition(ControllerPhase::Active)?;

        tracing::info!(
            old_session_id = ?old_id.map(|id| id.to_string()),
            session_id = %session_id,
            "Session cleared"
        );
        Ok(guard.snapshot())
    }

    /// Tries to replace the opening corpus dilemma with a generated one of
    /// the same topic and intensity.
    ///
    /// The replacement is applied only if the user is still looking at the
    /// unanswered opening dilemma of the same session. Generation failures
    /// keep the corpus dilemma.
    ///
    /// Returns the new current dilemma when it was replaced.
    ///
    /// # Errors
    ///
    /// - `NotInitialized` before `initialize`
    pub async fn refresh_opening_dilemma(
        &self,
    ) -> Result<Option<PresentedDilemma>, SessionError> {
        let (session_id, request) = {
            let guard = self.inner.lock().await;
            let session = guard.session.as_ref().ok_or(SessionError::NotInitialized)?;
            if guard.phase.is_generating() || !session.is_on_unanswered_opening(&self.corpus) {
                return Ok(None);
            }
            let Some(opening) = self.corpus.get(0) else {
                return Ok(None);
            };
            (
                *session.id(),
                GenerationRequest::new(
                    opening.topic().clone(),
                    opening.intensity(),
                    history_context(session),
                ),
            )
        };

        let draft = match self.generator.generate(request).await {
            Ok(draft) => draft,
            Err(err) => {
                tracing::warn!(session_id = %session_id, error = %err, "Keeping corpus opening dilemma");
                return Ok(None);
            }
        };
        let dilemma = match Dilemma::generated(draft) {
            Ok(dilemma) => dilemma,
            Err(err) => {
                tracing::warn!(session_id = %session_id, error = %err, "Generated opening dilemma rejected");
                return Ok(None);
            }
        };

        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        match inner.session.as_mut() {
            Some(session)
                if *session.id() == session_id
                    && !inner.phase.is_generating()
                    && session.is_on_unanswered_opening(&self.corpus) =>
            {
                tracing::info!(session_id = %session_id, "Replaced opening dilemma");
                Ok(Some(session.present_generated(dilemma).clone()))
            }
            _ => {
                tracing::debug!(session_id = %session_id, "Opening dilemma moved on; dropping replacement");
                Ok(None)
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock().await.snapshot()
    }

    pub async fn phase(&self) -> ControllerPhase {
        self.inner.lock().await.phase
    }

    pub async fn session_id(&self) -> Option<SessionId> {
        self.inner.lock().await.session.as_ref().map(|s| *s.id())
    }

    pub async fn current_dilemma(&self) -> Option<PresentedDilemma> {
        let guard = self.inner.lock().await;
        guard.session.as_ref().and_then(|s| s.current().cloned())
    }

    /// The committed answered log, oldest first.
    pub async fn answered_log(&self) -> Vec<AnsweredDilemma> {
        let guard = self.inner.lock().await;
        guard
            .session
            .as_ref()
            .map(|s| s.answered_log().to_vec())
            .unwrap_or_default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn open_session(&self, id: SessionId, answered_log: Vec<AnsweredDilemma>) -> Session {
        let mut session = Session::start(id, answered_log);
        if self.corpus.is_empty() {
            tracing::warn!(session_id = %id, "Corpus is empty; no opening dilemma");
        } else if let Err(err) = session.present_corpus(&self.corpus, 0) {
            tracing::warn!(session_id = %id, error = %err, "Could not present opening dilemma");
        }
        session
    }

    /// Runs the generator off-lock in its own task, then applies the result.
    ///
    /// The task keeps running if the caller stops waiting, so the phase
    /// always leaves `Generating`.
    async fn run_generation(
        &self,
        session_id: SessionId,
        request: GenerationRequest,
    ) -> Result<GenerationOutcome, SessionError> {
        let generator = Arc::clone(&self.generator);
        let inner = Arc::clone(&self.inner);
        let corpus = Arc::clone(&self.corpus);

        tracing::debug!(
            session_id = %session_id,
            topic = %request.topic,
            intensity = %request.intensity,
            "Requesting generated dilemma"
        );

        let task = tokio::spawn(async move {
            let result = generator.generate(request).await;
            finish_generation(&inner, &corpus, session_id, result).await
        });

        match task.await {
            Ok(outcome) => outcome,
            Err(join_error) => {
                let reason =
                    GenerationError::unavailable(format!("generator task failed: {}", join_error));
                finish_generation(&self.inner, &self.corpus, session_id, Err(reason)).await
            }
        }
    }

    async fn read_session_id(&self) -> Result<Option<SessionId>, StoreError> {
        let Some(bytes) = self.store.get(SESSION_ID_KEY).await? else {
            return Ok(None);
        };
        let text = String::from_utf8(bytes)
            .map_err(|e| StoreError::deserialization(SESSION_ID_KEY, e.to_string()))?;
        text.parse::<SessionId>()
            .map(Some)
            .map_err(|e| StoreError::deserialization(SESSION_ID_KEY, e.to_string()))
    }

    async fn write_session_id(&self, id: &SessionId) -> Result<(), StoreError> {
        self.store
            .set(SESSION_ID_KEY, id.to_string().into_bytes())
            .await
    }

    async fn read_answers(&self, id: &SessionId) -> Result<Vec<AnsweredDilemma>, StoreError> {
        let key = answers_key(id);
        match self.store.get(&key).await? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::deserialization(key, e.to_string())),
            None => Ok(Vec::new()),
        }
    }

    async fn write_answers(&self, session: &Session) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(session.answered_log())
            .map_err(|e| StoreError::SerializationFailed(e.to_string()))?;
        self.store.set(&answers_key(session.id()), bytes).await
    }
}

/// Applies a generator result to the session it was requested for.
async fn finish_generation(
    inner: &Mutex<ControllerInner>,
    corpus: &DilemmaCorpus,
    session_id: SessionId,
    result: Result<GeneratedDilemma, GenerationError>,
) -> Result<GenerationOutcome, SessionError> {
    let mut guard = inner.lock().await;
    let inner = &mut *guard;

    let session = match inner.session.as_mut() {
        Some(session) if *session.id() == session_id && inner.phase.is_generating() => session,
        _ => {
            tracing::info!(session_id = %session_id, "Session changed while generating; discarding result");
            return Ok(GenerationOutcome::Discarded);
        }
    };

    let reason = match result.and_then(|draft| {
        Dilemma::generated(draft).map_err(|_| GenerationError::EmptyDilemma)
    }) {
        Ok(dilemma) => {
            let presented = session.present_generated(dilemma).clone();
            move_phase(&mut inner.phase, ControllerPhase::Active)?;
            tracing::debug!(session_id = %session_id, dilemma_id = %presented.dilemma.id(), "Presented generated dilemma");
            return Ok(GenerationOutcome::Generated(presented));
        }
        Err(reason) => reason,
    };

    tracing::warn!(session_id = %session_id, error = %reason, "Generation failed; falling back to corpus");
    move_phase(&mut inner.phase, ControllerPhase::CorpusFallback)?;
    let outcome = match session.advance_corpus(corpus) {
        Ok(presented) => GenerationOutcome::CorpusFallback {
            presented: presented.clone(),
            reason,
        },
        Err(_) => GenerationOutcome::Unavailable { reason },
    };
    move_phase(&mut inner.phase, ControllerPhase::Active)?;
    Ok(outcome)
}

/// Context after an answer: count so far plus the latest topic and response.
fn answer_context(answered_count: usize, topic: &Topic, response: ResponseValue) -> String {
    format!(
        "The user has answered {} dilemmas. The latest response on topic '{}' was {:.2}.",
        answered_count,
        topic,
        response.value()
    )
}

fn history_context(session: &Session) -> String {
    match session.last_answer() {
        Some(last) => answer_context(session.answered_count(), last.dilemma().topic(), last.response()),
        None => FIRST_GENERATION_CONTEXT.to_string(),
    }
}
