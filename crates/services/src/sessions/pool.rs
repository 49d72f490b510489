use rand::rng;
use rand::seq::SliceRandom;

use quiz_core::model::{Question, QuizMode, SubjectDocument};

/// Which part of a subject a quiz session draws from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizScope {
    /// The quiz embedded in one lesson.
    Lesson { lesson_index: usize },
    /// Every lesson's quiz, concatenated in document order.
    Subject,
}

impl QuizScope {
    /// Mode tag recorded on the finished attempt.
    #[must_use]
    pub fn mode(&self) -> QuizMode {
        match self {
            QuizScope::Lesson { .. } => QuizMode::Lesson,
            QuizScope::Subject => QuizMode::Subject,
        }
    }
}

/// Flattens a subject's question lists into one session pool.
///
/// The pool is shuffled once here; the session keeps the resulting order
/// fixed for its whole lifetime. An out-of-range lesson index or a scope
/// with no questions yields an empty pool, which the session constructor
/// reports as `SessionError::EmptyPool`.
pub struct PoolBuilder<'a> {
    subject: &'a SubjectDocument,
    shuffle: bool,
}

impl<'a> PoolBuilder<'a> {
    #[must_use]
    pub fn new(subject: &'a SubjectDocument) -> Self {
        Self {
            subject,
            shuffle: true,
        }
    }

    /// Enable or disable shuffling, for deterministic tests.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Build the flat question pool for the given scope.
    #[must_use]
    pub fn build(self, scope: &QuizScope) -> Vec<Question> {
        let mut pool: Vec<Question> = match scope {
            QuizScope::Lesson { lesson_index } => self
                .subject
                .lesson(*lesson_index)
                .map(|lesson| lesson.quiz.clone())
                .unwrap_or_default(),
            QuizScope::Subject => self
                .subject
                .lessons
                .iter()
                .flat_map(|lesson| lesson.quiz.iter().cloned())
                .collect(),
        };

        if self.shuffle {
            let mut rng = rng();
            pool.as_mut_slice().shuffle(&mut rng);
        }

        pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Lesson, LessonId, SubjectId, SubjectMeta};

    fn question(prompt: &str) -> Question {
        Question::TrueFalse {
            question: prompt.to_owned(),
            answer: true,
        }
    }

    fn build_subject() -> SubjectDocument {
        SubjectDocument {
            meta: SubjectMeta {
                grade: 1,
                subject_id: SubjectId::new("math"),
                label: "Math".to_owned(),
            },
            lessons: vec![
                Lesson {
                    id: LessonId::new("l1"),
                    title: "Counting".to_owned(),
                    content: None,
                    image: None,
                    quiz: vec![question("q1"), question("q2")],
                },
                Lesson {
                    id: LessonId::new("l2"),
                    title: "Shapes".to_owned(),
                    content: None,
                    image: None,
                    quiz: Vec::new(),
                },
                Lesson {
                    id: LessonId::new("l3"),
                    title: "Adding".to_owned(),
                    content: None,
                    image: None,
                    quiz: vec![question("q3")],
                },
            ],
        }
    }

    #[test]
    fn lesson_scope_takes_one_lesson_only() {
        let subject = build_subject();
        let pool = PoolBuilder::new(&subject)
            .with_shuffle(false)
            .build(&QuizScope::Lesson { lesson_index: 0 });
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn subject_scope_concatenates_in_document_order() {
        let subject = build_subject();
        let pool = PoolBuilder::new(&subject)
            .with_shuffle(false)
            .build(&QuizScope::Subject);
        assert_eq!(pool.len(), 3);
        assert_eq!(pool[2].prompt(), Some("q3"));
    }

    #[test]
    fn empty_scopes_yield_empty_pools() {
        let subject = build_subject();
        let no_quiz = PoolBuilder::new(&subject)
            .with_shuffle(false)
            .build(&QuizScope::Lesson { lesson_index: 1 });
        assert!(no_quiz.is_empty());

        let out_of_range = PoolBuilder::new(&subject)
            .with_shuffle(false)
            .build(&QuizScope::Lesson { lesson_index: 9 });
        assert!(out_of_range.is_empty());
    }

    #[test]
    fn shuffled_pool_keeps_the_same_questions() {
        let subject = build_subject();
        let mut pool = PoolBuilder::new(&subject).build(&QuizScope::Subject);
        assert_eq!(pool.len(), 3);
        pool.sort_by_key(|q| q.prompt().unwrap_or_default().to_owned());
        let prompts: Vec<_> = pool.iter().filter_map(Question::prompt).collect();
        assert_eq!(prompts, vec!["q1", "q2", "q3"]);
    }

    #[test]
    fn scope_maps_to_attempt_mode() {
        assert_eq!(QuizScope::Subject.mode(), QuizMode::Subject);
        assert_eq!(QuizScope::Lesson { lesson_index: 0 }.mode(), QuizMode::Lesson);
    }
}
