use quiz_core::model::{SubjectDocument, SubjectId};
use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{ContentRepository, ManifestEntry, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn grade_from_i64(v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid grade: {v}")))
}

#[async_trait::async_trait]
impl ContentRepository for SqliteRepository {
    async fn get_subject(&self, path: &str) -> Result<SubjectDocument, StorageError> {
        let row = sqlx::query("SELECT document FROM subjects WHERE path = ?1")
            .bind(path)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?
            .ok_or(StorageError::NotFound)?;

        let document: String = row.try_get("document").map_err(ser)?;
        serde_json::from_str(&document).map_err(ser)
    }

    async fn upsert_subject(
        &self,
        path: &str,
        document: &SubjectDocument,
    ) -> Result<(), StorageError> {
        let body = serde_json::to_string(document).map_err(ser)?;

        // Manifest fields live in their own columns; listings never parse
        // the stored document bodies.
        sqlx::query(
            r"
                INSERT INTO subjects (path, grade, subject_id, label, document)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(path) DO UPDATE SET
                    grade = excluded.grade,
                    subject_id = excluded.subject_id,
                    label = excluded.label,
                    document = excluded.document
            ",
        )
        .bind(path)
        .bind(i64::from(document.meta.grade))
        .bind(document.meta.subject_id.as_str())
        .bind(&document.meta.label)
        .bind(body)
        .execute(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn list_entries(&self) -> Result<Vec<ManifestEntry>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT path, grade, subject_id, label
                FROM subjects
                ORDER BY path ASC
            ",
        )
        .fetch_all(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            entries.push(ManifestEntry {
                path: row.try_get("path").map_err(ser)?,
                grade: grade_from_i64(row.try_get::<i64, _>("grade").map_err(ser)?)?,
                subject_id: SubjectId::new(row.try_get::<String, _>("subject_id").map_err(ser)?),
                label: row.try_get("label").map_err(ser)?,
            });
        }
        Ok(entries)
    }
}
