use quiz_core::model::{
    LearnerId, Lesson, LessonId, ProgressRecord, Question, QuizAttempt, QuizMode, SubjectDocument,
    SubjectId, SubjectKey, SubjectMeta,
};
use quiz_core::scoring::StarRating;
use quiz_core::time::fixed_now;
use storage::repository::{ContentRepository, ProgressKey, ProgressRepository};
use storage::sqlite::SqliteRepository;

fn build_subject() -> SubjectDocument {
    SubjectDocument {
        meta: SubjectMeta {
            grade: 2,
            subject_id: SubjectId::new("science"),
            label: "Science Grade 2".to_owned(),
        },
        lessons: vec![Lesson {
            id: LessonId::new("l1"),
            title: "Plants".to_owned(),
            content: Some("<p>Plants need water.</p>".to_owned()),
            image: None,
            quiz: vec![Question::TrueFalse {
                question: "Plants need water".to_owned(),
                answer: true,
            }],
        }],
    }
}

fn progress_key(learner: &str) -> ProgressKey {
    ProgressKey::new(
        LearnerId::new(learner),
        SubjectKey::new(2, SubjectId::new("science")),
    )
}

#[tokio::test]
async fn sqlite_round_trips_subject_documents() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_subjects?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let doc = build_subject();
    repo.upsert_subject("data/science.json", &doc).await.unwrap();

    let fetched = repo.get_subject("data/science.json").await.unwrap();
    assert_eq!(fetched, doc);

    let entries = repo.list_entries().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, "data/science.json");
    assert_eq!(entries[0].grade, 2);
    assert_eq!(entries[0].label, "Science Grade 2");

    let err = repo.get_subject("data/other.json").await.unwrap_err();
    assert!(matches!(err, storage::StorageError::NotFound));
}

#[tokio::test]
async fn sqlite_overwrites_progress_records_whole() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_progress?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let key = progress_key("p_1");
    assert!(repo.get_record(&key).await.unwrap().is_none());

    let mut record = ProgressRecord::default();
    record.mark_lesson_complete(LessonId::new("l1"));
    record.record_attempt(QuizAttempt::new(
        90,
        StarRating::Three,
        QuizMode::Subject,
        fixed_now(),
    ));
    repo.put_record(&key, &record).await.unwrap();

    let stored = repo.get_record(&key).await.unwrap().unwrap();
    assert_eq!(stored, record);

    // A second put replaces the row instead of merging fields.
    let replacement = ProgressRecord::default();
    repo.put_record(&key, &replacement).await.unwrap();
    let stored = repo.get_record(&key).await.unwrap().unwrap();
    assert_eq!(stored.completed_count(), 0);
    assert!(stored.quiz_attempts.is_empty());
}

#[tokio::test]
async fn sqlite_deletes_all_records_for_a_learner() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_delete?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let other_subject = ProgressKey::new(
        LearnerId::new("p_1"),
        SubjectKey::new(2, SubjectId::new("math")),
    );
    repo.put_record(&progress_key("p_1"), &ProgressRecord::default())
        .await
        .unwrap();
    repo.put_record(&other_subject, &ProgressRecord::default())
        .await
        .unwrap();
    repo.put_record(&progress_key("p_2"), &ProgressRecord::default())
        .await
        .unwrap();

    let removed = repo.delete_learner(&LearnerId::new("p_1")).await.unwrap();
    assert_eq!(removed, 2);

    assert!(repo.get_record(&progress_key("p_1")).await.unwrap().is_none());
    assert!(repo.get_record(&progress_key("p_2")).await.unwrap().is_some());
}
