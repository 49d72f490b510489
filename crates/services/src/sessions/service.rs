use chrono::{DateTime, Utc};
use std::fmt;

use quiz_core::evaluate::evaluate;
use quiz_core::model::{
    LearnerId, Question, QuestionKind, QuestionResponse, QuizAttempt, QuizMode, SubjectKey,
};
use quiz_core::scoring::{self, StarRating};

use super::progress::SessionProgress;
use super::timer::Countdown;
use crate::error::SessionError;

//
// ─── ANSWER OUTCOME ────────────────────────────────────────────────────────────
//

/// How one question in a session was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerVerdict {
    Correct,
    Incorrect,
    /// The countdown ran out before a response was recorded.
    TimedOut,
    /// Unsupported kind, skipped without learner input.
    Skipped,
}

impl AnswerVerdict {
    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, AnswerVerdict::Correct)
    }
}

/// Per-question entry in the session's evaluation log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub index: usize,
    pub kind: QuestionKind,
    pub verdict: AnswerVerdict,
}

/// Where the session stands after advancing past an evaluated question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStep {
    /// A next question is awaiting an answer.
    Next,
    /// The last question has been evaluated; the session is complete.
    Finished,
}

/// Result of a countdown firing: the auto-scored outcome plus the step taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutAdvance {
    pub outcome: AnswerOutcome,
    pub step: SessionStep,
}

//
// ─── VIEWS ─────────────────────────────────────────────────────────────────────
//

/// Render request for the question currently awaiting an answer.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionView<'a> {
    pub index: usize,
    pub total: usize,
    pub question: &'a Question,
    /// Present only while the timer is enabled and running.
    pub timer_seconds_remaining: Option<i64>,
}

/// Finalize event handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizOutcome {
    pub percentage: u8,
    pub stars: StarRating,
    pub correct_count: u32,
    pub total: u32,
    /// True only for a three-star finish.
    pub celebrate: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory quiz session over a shuffled question pool.
///
/// An explicitly constructed value passed to and returned from engine calls;
/// there is no ambient current-session state. The machine walks
/// `AwaitingAnswer(i) -> Evaluated(i) -> AwaitingAnswer(i+1)` until the last
/// question is evaluated, then the loop service finalizes the outcome into a
/// persisted attempt. An abandoned session is simply dropped; nothing is
/// persisted and its countdown dies with it. Replaying is a new session, not
/// a rehydration.
pub struct QuizSession {
    learner: LearnerId,
    subject: SubjectKey,
    mode: QuizMode,
    timer_enabled: bool,
    questions: Vec<Question>,
    current: usize,
    correct: u32,
    outcomes: Vec<AnswerOutcome>,
    countdown: Option<Countdown>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    attempt_recorded: bool,
}

impl QuizSession {
    /// Create a session over an already-shuffled pool.
    ///
    /// `started_at` should come from the services layer clock. Unsupported
    /// questions at the front of the pool are skipped immediately; a pool of
    /// nothing but unsupported items completes on the spot.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyPool` if no questions are provided.
    pub fn new(
        learner: LearnerId,
        subject: SubjectKey,
        mode: QuizMode,
        questions: Vec<Question>,
        timer_enabled: bool,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::EmptyPool);
        }

        let mut session = Self {
            learner,
            subject,
            mode,
            timer_enabled,
            questions,
            current: 0,
            correct: 0,
            outcomes: Vec::new(),
            countdown: None,
            started_at,
            completed_at: None,
            attempt_recorded: false,
        };
        session.enter_current(started_at);
        Ok(session)
    }

    #[must_use]
    pub fn learner(&self) -> &LearnerId {
        &self.learner
    }

    #[must_use]
    pub fn subject(&self) -> &SubjectKey {
        &self.subject
    }

    #[must_use]
    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    #[must_use]
    pub fn attempt_recorded(&self) -> bool {
        self.attempt_recorded
    }

    /// Total number of questions in this session.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// 0-based index of the question the session is standing on.
    ///
    /// Equals `total()` once every question has been evaluated.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Running count of correctly answered questions.
    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn outcomes(&self) -> &[AnswerOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total(),
            answered: self.outcomes.len(),
            remaining: self.total().saturating_sub(self.outcomes.len()),
            is_complete: self.is_complete(),
        }
    }

    /// Render request for the current question, with time remaining when the
    /// timer is running.
    #[must_use]
    pub fn view(&self, now: DateTime<Utc>) -> Option<QuestionView<'_>> {
        let question = self.current_question()?;
        Some(QuestionView {
            index: self.current,
            total: self.total(),
            question,
            timer_seconds_remaining: self
                .countdown
                .as_ref()
                .map(|countdown| countdown.remaining_seconds(now)),
        })
    }

    /// True while the current question has been evaluated but not advanced
    /// past.
    #[must_use]
    pub fn awaiting_advance(&self) -> bool {
        !self.is_complete() && self.outcomes.len() > self.current
    }

    /// Score the current question from a learner response.
    ///
    /// Recording a response cancels the countdown for this index. The call
    /// does not advance; the presentation layer advances after its feedback
    /// delay (or the timeout path advances on its own).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` on a finished session,
    /// `SessionError::AlreadyAnswered` when this index was already scored
    /// (re-submissions never change the correct count), and
    /// `SessionError::Evaluate` when the response does not fit the question.
    pub fn submit_response(
        &mut self,
        response: &QuestionResponse,
    ) -> Result<AnswerOutcome, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        if self.outcomes.len() > self.current {
            return Err(SessionError::AlreadyAnswered {
                index: self.current,
            });
        }

        let question = &self.questions[self.current];
        let correct = evaluate(question, response)?;
        let kind = question.kind();
        self.countdown = None;

        let verdict = if correct {
            self.correct += 1;
            AnswerVerdict::Correct
        } else {
            AnswerVerdict::Incorrect
        };
        let outcome = AnswerOutcome {
            index: self.current,
            kind,
            verdict,
        };
        self.outcomes.push(outcome.clone());
        Ok(outcome)
    }

    /// Move off an evaluated question to the next one, or complete.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` on a finished session and
    /// `SessionError::NotYetAnswered` while the current question is still
    /// awaiting a response.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<SessionStep, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        if self.outcomes.len() == self.current {
            return Err(SessionError::NotYetAnswered {
                index: self.current,
            });
        }
        Ok(self.advance_evaluated(now))
    }

    /// Fire the countdown for the current question if it has expired.
    ///
    /// Scores the question as incorrect and advances, exactly as if an
    /// incorrect response had been evaluated. Returns `None` when there is
    /// nothing to fire: timer disabled, countdown still running, question
    /// already evaluated, or session finished. A countdown left over from an
    /// earlier index is discarded without firing.
    pub fn handle_timeout(&mut self, now: DateTime<Utc>) -> Option<TimeoutAdvance> {
        if self.is_complete() {
            return None;
        }
        let countdown = self.countdown.as_ref()?;
        let owner = countdown.question_index();
        let expired = countdown.is_expired(now);
        if owner != self.current || self.outcomes.len() > self.current {
            self.countdown = None;
            return None;
        }
        if !expired {
            return None;
        }

        self.countdown = None;
        let outcome = AnswerOutcome {
            index: self.current,
            kind: self.questions[self.current].kind(),
            verdict: AnswerVerdict::TimedOut,
        };
        self.outcomes.push(outcome.clone());
        let step = self.advance_evaluated(now);
        Some(TimeoutAdvance { outcome, step })
    }

    /// Compute the finalize event for a completed session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotComplete` while questions remain.
    #[allow(clippy::cast_possible_truncation)]
    pub fn outcome(&self) -> Result<QuizOutcome, SessionError> {
        if !self.is_complete() {
            return Err(SessionError::NotComplete);
        }
        let total = self.total() as u32;
        let percentage = scoring::percentage(self.correct, total);
        let stars = StarRating::from_percentage(percentage);
        Ok(QuizOutcome {
            percentage,
            stars,
            correct_count: self.correct,
            total,
            celebrate: stars.celebrates(),
        })
    }

    /// Build the attempt record for a completed session, stamped with the
    /// completion time.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotComplete` while questions remain.
    pub fn build_attempt(&self) -> Result<QuizAttempt, SessionError> {
        let completed_at = self.completed_at.ok_or(SessionError::NotComplete)?;
        let outcome = self.outcome()?;
        Ok(QuizAttempt::new(
            outcome.percentage,
            outcome.stars,
            self.mode,
            completed_at,
        ))
    }

    pub(crate) fn set_attempt_recorded(&mut self) {
        self.attempt_recorded = true;
    }

    fn advance_evaluated(&mut self, now: DateTime<Utc>) -> SessionStep {
        self.current += 1;
        self.enter_current(now);
        if self.is_complete() {
            SessionStep::Finished
        } else {
            SessionStep::Next
        }
    }

    /// Entering `AwaitingAnswer(current)`: skip unsupported items, complete
    /// when past the end, otherwise arm the countdown.
    fn enter_current(&mut self, now: DateTime<Utc>) {
        self.countdown = None;

        while let Some(question) = self.questions.get(self.current) {
            if question.is_supported() {
                break;
            }
            // Content bug surfacing at runtime; scored as a skip, no input.
            log::warn!(
                "skipping unsupported question at index {} of {}",
                self.current,
                self.total()
            );
            self.outcomes.push(AnswerOutcome {
                index: self.current,
                kind: QuestionKind::Unsupported,
                verdict: AnswerVerdict::Skipped,
            });
            self.current += 1;
        }

        if self.current >= self.questions.len() {
            self.completed_at = Some(now);
            return;
        }

        if self.timer_enabled {
            self.countdown = Some(Countdown::start(self.current, now));
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("learner", &self.learner)
            .field("subject", &self.subject)
            .field("mode", &self.mode)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("correct", &self.correct)
            .field("timer_enabled", &self.timer_enabled)
            .field("completed_at", &self.completed_at)
            .field("attempt_recorded", &self.attempt_recorded)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
