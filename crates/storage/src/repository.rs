use async_trait::async_trait;
use quiz_core::model::{LearnerId, ProgressRecord, SubjectDocument, SubjectId, SubjectKey};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── KEYS ──────────────────────────────────────────────────────────────────────
//

/// Composite key addressing one progress record.
///
/// Renders as `progress:{learner}:{grade}:{subject}`, the key scheme of the
/// persistence boundary. Records under distinct keys are fully independent;
/// a write to one can never touch another.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProgressKey {
    pub learner: LearnerId,
    pub subject: SubjectKey,
}

impl ProgressKey {
    #[must_use]
    pub fn new(learner: LearnerId, subject: SubjectKey) -> Self {
        Self { learner, subject }
    }
}

impl fmt::Display for ProgressKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "progress:{}:{}:{}",
            self.learner, self.subject.grade, self.subject.subject_id
        )
    }
}

/// Listing entry for one stored subject document.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestEntry {
    pub path: String,
    pub grade: u32,
    pub subject_id: SubjectId,
    pub label: String,
}

//
// ─── REPOSITORY CONTRACTS ──────────────────────────────────────────────────────
//

/// Read-mostly store of subject documents, keyed by content path.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Fetch a subject document by path.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_subject(&self, path: &str) -> Result<SubjectDocument, StorageError>;

    /// Insert or replace a subject document under the given path.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be stored.
    async fn upsert_subject(
        &self,
        path: &str,
        document: &SubjectDocument,
    ) -> Result<(), StorageError>;

    /// List every stored document's manifest fields, ordered by path.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_entries(&self) -> Result<Vec<ManifestEntry>, StorageError>;
}

/// Key-value surface for progress records.
///
/// `put_record` overwrites the full record under its key; there are no
/// partial-field updates. A missing key reads as `None` and the caller
/// substitutes the empty default.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the record stored under a key, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures. A miss is `Ok(None)`.
    async fn get_record(
        &self,
        key: &ProgressKey,
    ) -> Result<Option<ProgressRecord>, StorageError>;

    /// Store the full record under its key, replacing any prior value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn put_record(
        &self,
        key: &ProgressKey,
        record: &ProgressRecord,
    ) -> Result<(), StorageError>;

    /// Remove every record owned by a learner; returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn delete_learner(&self, learner: &LearnerId) -> Result<u64, StorageError>;
}

//
// ─── IN-MEMORY IMPLEMENTATION ──────────────────────────────────────────────────
//

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    subjects: Arc<Mutex<HashMap<String, SubjectDocument>>>,
    records: Arc<Mutex<HashMap<String, ProgressRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentRepository for InMemoryRepository {
    async fn get_subject(&self, path: &str) -> Result<SubjectDocument, StorageError> {
        let guard = self
            .subjects
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(path).cloned().ok_or(StorageError::NotFound)
    }

    async fn upsert_subject(
        &self,
        path: &str,
        document: &SubjectDocument,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .subjects
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(path.to_owned(), document.clone());
        Ok(())
    }

    async fn list_entries(&self) -> Result<Vec<ManifestEntry>, StorageError> {
        let guard = self
            .subjects
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut entries: Vec<ManifestEntry> = guard
            .iter()
            .map(|(path, doc)| ManifestEntry {
                path: path.clone(),
                grade: doc.meta.grade,
                subject_id: doc.meta.subject_id.clone(),
                label: doc.meta.label.clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn get_record(
        &self,
        key: &ProgressKey,
    ) -> Result<Option<ProgressRecord>, StorageError> {
        let guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&key.to_string()).cloned())
    }

    async fn put_record(
        &self,
        key: &ProgressKey,
        record: &ProgressRecord,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_string(), record.clone());
        Ok(())
    }

    async fn delete_learner(&self, learner: &LearnerId) -> Result<u64, StorageError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let prefix = format!("progress:{learner}:");
        let before = guard.len();
        guard.retain(|key, _| !key.starts_with(&prefix));
        Ok((before - guard.len()) as u64)
    }
}

//
// ─── STORAGE AGGREGATE ─────────────────────────────────────────────────────────
//

/// Aggregates the content and progress repositories behind trait objects for
/// easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub content: Arc<dyn ContentRepository>,
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let content: Arc<dyn ContentRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo);
        Self { content, progress }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{LessonId, QuizAttempt, QuizMode, SubjectMeta};
    use quiz_core::scoring::StarRating;
    use quiz_core::time::fixed_now;

    fn build_subject(subject_id: &str) -> SubjectDocument {
        SubjectDocument {
            meta: SubjectMeta {
                grade: 1,
                subject_id: SubjectId::new(subject_id),
                label: format!("Subject {subject_id}"),
            },
            lessons: Vec::new(),
        }
    }

    fn key(learner: &str, subject: &str) -> ProgressKey {
        ProgressKey::new(
            LearnerId::new(learner),
            SubjectKey::new(1, SubjectId::new(subject)),
        )
    }

    #[test]
    fn progress_key_renders_the_key_scheme() {
        assert_eq!(key("p_17", "math").to_string(), "progress:p_17:1:math");
    }

    #[tokio::test]
    async fn missing_subject_is_not_found() {
        let repo = InMemoryRepository::new();
        let err = repo.get_subject("data/none.json").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn subject_round_trips_and_lists() {
        let repo = InMemoryRepository::new();
        repo.upsert_subject("data/math.json", &build_subject("math"))
            .await
            .unwrap();
        repo.upsert_subject("data/art.json", &build_subject("art"))
            .await
            .unwrap();

        let doc = repo.get_subject("data/math.json").await.unwrap();
        assert_eq!(doc.meta.label, "Subject math");

        let entries = repo.list_entries().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, "data/art.json");
    }

    #[tokio::test]
    async fn put_record_overwrites_the_full_record() {
        let repo = InMemoryRepository::new();
        let key = key("p_1", "math");

        assert!(repo.get_record(&key).await.unwrap().is_none());

        let mut record = ProgressRecord::default();
        record.mark_lesson_complete(LessonId::new("l1"));
        repo.put_record(&key, &record).await.unwrap();

        let mut replacement = ProgressRecord::default();
        replacement.record_attempt(QuizAttempt::new(
            100,
            StarRating::Three,
            QuizMode::Subject,
            fixed_now(),
        ));
        repo.put_record(&key, &replacement).await.unwrap();

        let stored = repo.get_record(&key).await.unwrap().unwrap();
        assert_eq!(stored, replacement);
        assert_eq!(stored.completed_count(), 0);
    }

    #[tokio::test]
    async fn delete_learner_removes_only_that_learner() {
        let repo = InMemoryRepository::new();
        repo.put_record(&key("p_1", "math"), &ProgressRecord::default())
            .await
            .unwrap();
        repo.put_record(&key("p_1", "art"), &ProgressRecord::default())
            .await
            .unwrap();
        repo.put_record(&key("p_2", "math"), &ProgressRecord::default())
            .await
            .unwrap();

        let removed = repo.delete_learner(&LearnerId::new("p_1")).await.unwrap();
        assert_eq!(removed, 2);
        assert!(
            repo.get_record(&key("p_2", "math"))
                .await
                .unwrap()
                .is_some()
        );
        assert!(repo.get_record(&key("p_1", "math")).await.unwrap().is_none());
    }
}
