use std::sync::Arc;

use quiz_core::model::{LearnerId, LessonId, ProgressRecord, QuizAttempt, SubjectKey};
use storage::repository::{ProgressKey, ProgressRepository};

use crate::error::LedgerError;

/// Presentation-agnostic stats for one subject's progress screen.
///
/// Timestamps and star counts stay raw; the UI formats them as needed.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectStats {
    pub completed_lessons: usize,
    pub total_lessons: usize,
    /// Rounded share of completed lessons, 0 for a subject with no lessons.
    pub completion_percent: u8,
    /// Attempts most recent first.
    pub attempts: Vec<QuizAttempt>,
}

/// Durable per-learner, per-subject progress operations.
///
/// Every mutation is read-modify-write against the record's own key and is
/// persisted immediately; records under other keys are never touched.
#[derive(Clone)]
pub struct ProgressLedger {
    progress: Arc<dyn ProgressRepository>,
}

impl ProgressLedger {
    #[must_use]
    pub fn new(progress: Arc<dyn ProgressRepository>) -> Self {
        Self { progress }
    }

    fn key(learner: &LearnerId, subject: &SubjectKey) -> ProgressKey {
        ProgressKey::new(learner.clone(), subject.clone())
    }

    /// The stored record, or a fresh empty default on a miss.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` on storage failures; a missing record
    /// is not a failure.
    pub async fn read_record(
        &self,
        learner: &LearnerId,
        subject: &SubjectKey,
    ) -> Result<ProgressRecord, LedgerError> {
        let record = self
            .progress
            .get_record(&Self::key(learner, subject))
            .await?
            .unwrap_or_default();
        Ok(record)
    }

    /// Idempotent insert into the completed-lesson set.
    ///
    /// Returns whether the set changed; an unchanged record is not written
    /// again.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if the updated record cannot be
    /// persisted.
    pub async fn mark_lesson_complete(
        &self,
        learner: &LearnerId,
        subject: &SubjectKey,
        lesson: LessonId,
    ) -> Result<bool, LedgerError> {
        let key = Self::key(learner, subject);
        let mut record = self.progress.get_record(&key).await?.unwrap_or_default();
        if !record.mark_lesson_complete(lesson) {
            return Ok(false);
        }
        self.progress.put_record(&key, &record).await?;
        Ok(true)
    }

    /// Append one finalized attempt and persist immediately.
    ///
    /// Safe to retry after a failure: the attempt carries its own timestamp
    /// and the append mutates only this record's key.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if the updated record cannot be
    /// persisted.
    pub async fn record_attempt(
        &self,
        learner: &LearnerId,
        subject: &SubjectKey,
        attempt: QuizAttempt,
    ) -> Result<(), LedgerError> {
        let key = Self::key(learner, subject);
        let mut record = self.progress.get_record(&key).await?.unwrap_or_default();
        record.record_attempt(attempt);
        self.progress.put_record(&key, &record).await?;
        Ok(())
    }

    /// Remove every record owned by a learner (profile deletion or explicit
    /// reset); returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` on storage failures.
    pub async fn clear_learner(&self, learner: &LearnerId) -> Result<u64, LedgerError> {
        Ok(self.progress.delete_learner(learner).await?)
    }

    /// Stats for a subject's progress screen.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` on storage failures.
    pub async fn subject_stats(
        &self,
        learner: &LearnerId,
        subject: &SubjectKey,
        total_lessons: usize,
    ) -> Result<SubjectStats, LedgerError> {
        let record = self.read_record(learner, subject).await?;
        Ok(SubjectStats {
            completed_lessons: record.completed_count(),
            total_lessons,
            completion_percent: record.completion_percent(total_lessons),
            attempts: record.attempts_newest_first().cloned().collect(),
        })
    }
}
