use serde::{Deserialize, Serialize};

use super::ids::{LessonId, SubjectId, SubjectKey};
use super::question::Question;

/// Header fields of a subject document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectMeta {
    #[serde(default)]
    pub grade: u32,
    #[serde(rename = "subjectId")]
    pub subject_id: SubjectId,
    pub label: String,
}

/// One lesson: reading content plus an optional embedded quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub quiz: Vec<Question>,
}

impl Lesson {
    #[must_use]
    pub fn has_quiz(&self) -> bool {
        !self.quiz.is_empty()
    }
}

/// A full subject document as supplied by the content store.
///
/// Owned by the content layer; the engine reads lessons and quiz lists out
/// of it but never writes back. Malformed documents fail at parse time, so
/// a session never encounters a structurally broken question list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectDocument {
    pub meta: SubjectMeta,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

impl SubjectDocument {
    /// Progress-space key for this subject.
    #[must_use]
    pub fn key(&self) -> SubjectKey {
        SubjectKey::new(self.meta.grade, self.meta.subject_id.clone())
    }

    #[must_use]
    pub fn lesson(&self, index: usize) -> Option<&Lesson> {
        self.lessons.get(index)
    }

    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.lessons.len()
    }

    /// Total number of quiz questions across every lesson.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.lessons.iter().map(|lesson| lesson.quiz.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_subject_document() {
        let json = r#"{
            "meta": {"grade": 1, "subjectId": "math", "label": "Math Grade 1"},
            "lessons": [
                {
                    "id": "l1",
                    "title": "Counting",
                    "content": "<p>Count to ten.</p>",
                    "quiz": [
                        {"type": "true_false", "question": "5 comes after 4", "answer": true}
                    ]
                },
                {"id": "l2", "title": "Shapes"}
            ]
        }"#;
        let doc: SubjectDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.lesson_count(), 2);
        assert_eq!(doc.question_count(), 1);
        assert!(doc.lesson(0).unwrap().has_quiz());
        assert!(!doc.lesson(1).unwrap().has_quiz());
        assert_eq!(doc.key().to_string(), "1:math");
    }

    #[test]
    fn missing_lessons_default_to_empty() {
        let json = r#"{"meta": {"subjectId": "art", "label": "Art"}}"#;
        let doc: SubjectDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.meta.grade, 0);
        assert_eq!(doc.lesson_count(), 0);
    }
}
