use std::sync::Arc;

use quiz_core::model::{LearnerId, LessonId, QuestionResponse, SubjectKey};
use storage::repository::{ContentRepository, ProgressRepository};

use super::pool::{PoolBuilder, QuizScope};
use super::service::{AnswerOutcome, QuizOutcome, QuizSession, SessionStep};
use crate::Clock;
use crate::error::SessionError;
use crate::ledger::ProgressLedger;

/// Where the quiz stands after an advance or a timeout fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStep {
    /// The next question is awaiting an answer.
    Next,
    /// The session completed; the outcome has been computed and the attempt
    /// appended to the progress ledger.
    Finished(QuizOutcome),
}

/// Result of a timer tick that fired the countdown.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerFire {
    pub outcome: AnswerOutcome,
    pub step: QuizStep,
}

/// Orchestrates session start, answering, timing, and attempt persistence.
///
/// One session is in flight per presentation context; starting a new quiz
/// while another session value is still around simply abandons the old one
/// (dropping it persists nothing and kills its countdown).
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    content: Arc<dyn ContentRepository>,
    ledger: ProgressLedger,
    shuffle: bool,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        content: Arc<dyn ContentRepository>,
        progress: Arc<dyn ProgressRepository>,
    ) -> Self {
        Self {
            clock,
            content,
            ledger: ProgressLedger::new(progress),
            shuffle: true,
        }
    }

    /// Enable or disable pool shuffling, for deterministic tests.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// The ledger this service persists through, for stats and lesson
    /// completion reads.
    #[must_use]
    pub fn ledger(&self) -> &ProgressLedger {
        &self.ledger
    }

    /// Start a new quiz session for the given subject and scope.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveLearner` when no learner is selected
    /// (checked before anything else mutates or loads),
    /// `SessionError::Storage` when the subject cannot be fetched, and
    /// `SessionError::EmptyPool` when the scope holds no questions.
    pub async fn start_quiz(
        &self,
        learner: Option<&LearnerId>,
        subject_path: &str,
        scope: &QuizScope,
        timer_enabled: bool,
    ) -> Result<QuizSession, SessionError> {
        let learner = learner.ok_or(SessionError::NoActiveLearner)?.clone();
        let subject = self.content.get_subject(subject_path).await?;
        let pool = PoolBuilder::new(&subject)
            .with_shuffle(self.shuffle)
            .build(scope);

        let session = QuizSession::new(
            learner,
            subject.key(),
            scope.mode(),
            pool,
            timer_enabled,
            self.clock.now(),
        )?;
        log::debug!(
            "started {} quiz for {} with {} questions",
            session.mode().as_str(),
            session.subject(),
            session.total()
        );
        Ok(session)
    }

    /// Score the current question from a learner response.
    ///
    /// # Errors
    ///
    /// Propagates the session's submission errors unchanged.
    pub fn submit(
        &self,
        session: &mut QuizSession,
        response: &QuestionResponse,
    ) -> Result<AnswerOutcome, SessionError> {
        session.submit_response(response)
    }

    /// Advance past an evaluated question, finalizing on completion.
    ///
    /// # Errors
    ///
    /// Returns session ordering errors, or `SessionError::Ledger` when the
    /// completed attempt cannot be persisted (the outcome stays on the
    /// session; retry through [`Self::finalize`]).
    pub async fn advance(&self, session: &mut QuizSession) -> Result<QuizStep, SessionError> {
        match session.advance(self.clock.now())? {
            SessionStep::Next => Ok(QuizStep::Next),
            SessionStep::Finished => {
                let outcome = self.record_attempt(session).await?;
                Ok(QuizStep::Finished(outcome))
            }
        }
    }

    /// Poll the countdown, firing the timeout transition when it has run out.
    ///
    /// Returns `Ok(None)` when nothing fired. Fires at time-left zero, not
    /// before, and at most once per question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Ledger` when a timeout completes the session
    /// and the attempt cannot be persisted.
    pub async fn tick(
        &self,
        session: &mut QuizSession,
    ) -> Result<Option<TimerFire>, SessionError> {
        let Some(fired) = session.handle_timeout(self.clock.now()) else {
            return Ok(None);
        };
        let step = match fired.step {
            SessionStep::Next => QuizStep::Next,
            SessionStep::Finished => QuizStep::Finished(self.record_attempt(session).await?),
        };
        Ok(Some(TimerFire {
            outcome: fired.outcome,
            step,
        }))
    }

    /// Finalize a completed session, persisting the attempt if a prior
    /// append failed, and hand back the outcome.
    ///
    /// The finalized result lives on the session until it has been durably
    /// recorded, so a transient storage failure loses nothing; calling this
    /// again retries the same append.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotComplete` while questions remain and
    /// `SessionError::Ledger` when persistence fails.
    pub async fn finalize(&self, session: &mut QuizSession) -> Result<QuizOutcome, SessionError> {
        self.record_attempt(session).await
    }

    /// Mark a lesson complete for the active learner.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoActiveLearner` when no learner is selected,
    /// before any state mutation, and `SessionError::Ledger` on persistence
    /// failures.
    pub async fn mark_lesson_complete(
        &self,
        learner: Option<&LearnerId>,
        subject: &SubjectKey,
        lesson: LessonId,
    ) -> Result<bool, SessionError> {
        let learner = learner.ok_or(SessionError::NoActiveLearner)?;
        Ok(self
            .ledger
            .mark_lesson_complete(learner, subject, lesson)
            .await?)
    }

    async fn record_attempt(&self, session: &mut QuizSession) -> Result<QuizOutcome, SessionError> {
        let outcome = session.outcome()?;
        if !session.attempt_recorded() {
            let attempt = session.build_attempt()?;
            self.ledger
                .record_attempt(session.learner(), session.subject(), attempt)
                .await?;
            session.set_attempt_recorded();
            log::debug!(
                "recorded attempt for {}: {}% ({} stars)",
                session.subject(),
                outcome.percentage,
                outcome.stars.as_u8()
            );
        }
        Ok(outcome)
    }
}
