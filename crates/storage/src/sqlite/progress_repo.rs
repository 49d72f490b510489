use chrono::Utc;
use quiz_core::model::{LearnerId, LessonId, ProgressRecord, QuizAttempt};
use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{ProgressKey, ProgressRepository, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn map_record_row(row: &sqlx::sqlite::SqliteRow) -> Result<ProgressRecord, StorageError> {
    let completed: String = row.try_get("completed_lessons").map_err(ser)?;
    let attempts: String = row.try_get("quiz_attempts").map_err(ser)?;

    let completed_lessons: Vec<LessonId> = serde_json::from_str(&completed).map_err(ser)?;
    let quiz_attempts: Vec<QuizAttempt> = serde_json::from_str(&attempts).map_err(ser)?;

    Ok(ProgressRecord {
        completed_lessons,
        quiz_attempts,
    })
}

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn get_record(
        &self,
        key: &ProgressKey,
    ) -> Result<Option<ProgressRecord>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT completed_lessons, quiz_attempts
                FROM progress_records
                WHERE learner_id = ?1 AND grade = ?2 AND subject_id = ?3
            ",
        )
        .bind(key.learner.as_str())
        .bind(i64::from(key.subject.grade))
        .bind(key.subject.subject_id.as_str())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        row.as_ref().map(map_record_row).transpose()
    }

    async fn put_record(
        &self,
        key: &ProgressKey,
        record: &ProgressRecord,
    ) -> Result<(), StorageError> {
        let completed = serde_json::to_string(&record.completed_lessons).map_err(ser)?;
        let attempts = serde_json::to_string(&record.quiz_attempts).map_err(ser)?;

        // Whole-record replace: the persistence contract has no
        // partial-field updates.
        sqlx::query(
            r"
                INSERT OR REPLACE INTO progress_records (
                    learner_id, grade, subject_id,
                    completed_lessons, quiz_attempts, updated_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(key.learner.as_str())
        .bind(i64::from(key.subject.grade))
        .bind(key.subject.subject_id.as_str())
        .bind(completed)
        .bind(attempts)
        .bind(Utc::now())
        .execute(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn delete_learner(&self, learner: &LearnerId) -> Result<u64, StorageError> {
        let res = sqlx::query("DELETE FROM progress_records WHERE learner_id = ?1")
            .bind(learner.as_str())
            .execute(self.pool())
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(res.rows_affected())
    }
}
