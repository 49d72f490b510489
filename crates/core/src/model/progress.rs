use serde::{Deserialize, Serialize};

use super::attempt::QuizAttempt;
use super::ids::LessonId;

/// Durable per-learner, per-subject progress aggregate.
///
/// Holds the set of completed lessons (insertion order, no duplicates) and
/// the append-only history of quiz attempts. A missing record reads as
/// `Default`, so first use needs no explicit creation step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    #[serde(default)]
    pub completed_lessons: Vec<LessonId>,
    #[serde(default)]
    pub quiz_attempts: Vec<QuizAttempt>,
}

impl ProgressRecord {
    /// Idempotent insert into the completed set.
    ///
    /// Returns false when the lesson was already recorded, in which case the
    /// record is unchanged and needs no persisting.
    pub fn mark_lesson_complete(&mut self, lesson: LessonId) -> bool {
        if self.completed_lessons.contains(&lesson) {
            return false;
        }
        self.completed_lessons.push(lesson);
        true
    }

    /// Appends one finalized attempt. Attempts are never removed singly.
    pub fn record_attempt(&mut self, attempt: QuizAttempt) {
        self.quiz_attempts.push(attempt);
    }

    #[must_use]
    pub fn is_lesson_complete(&self, lesson: &LessonId) -> bool {
        self.completed_lessons.contains(lesson)
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed_lessons.len()
    }

    /// Rounded share of completed lessons; 0 for a subject with no lessons.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn completion_percent(&self, lesson_count: usize) -> u8 {
        if lesson_count == 0 {
            return 0;
        }
        (self.completed_count() as f64 / lesson_count as f64 * 100.0).round() as u8
    }

    /// Attempts in display order, most recent first.
    pub fn attempts_newest_first(&self) -> impl Iterator<Item = &QuizAttempt> {
        self.quiz_attempts.iter().rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuizMode;
    use crate::scoring::StarRating;
    use crate::time::fixed_now;

    #[test]
    fn marking_a_lesson_twice_keeps_one_entry() {
        let mut record = ProgressRecord::default();
        assert!(record.mark_lesson_complete(LessonId::new("l1")));
        assert!(!record.mark_lesson_complete(LessonId::new("l1")));
        assert_eq!(record.completed_count(), 1);
    }

    #[test]
    fn completion_percent_rounds() {
        let mut record = ProgressRecord::default();
        record.mark_lesson_complete(LessonId::new("l1"));
        assert_eq!(record.completion_percent(3), 33);
        record.mark_lesson_complete(LessonId::new("l2"));
        assert_eq!(record.completion_percent(3), 67);
        assert_eq!(record.completion_percent(0), 0);
    }

    #[test]
    fn attempts_list_newest_first() {
        let mut record = ProgressRecord::default();
        record.record_attempt(QuizAttempt::new(
            50,
            StarRating::One,
            QuizMode::Lesson,
            fixed_now(),
        ));
        record.record_attempt(QuizAttempt::new(
            90,
            StarRating::Three,
            QuizMode::Subject,
            fixed_now(),
        ));
        let scores: Vec<u8> = record.attempts_newest_first().map(|a| a.score).collect();
        assert_eq!(scores, vec![90, 50]);
    }

    #[test]
    fn record_reads_stored_camel_case_json() {
        let json = r#"{
            "completedLessons": ["l1", "l2"],
            "quizAttempts": [
                {"score": 80, "date": 1720000000000, "stars": 2, "mode": "lesson"}
            ]
        }"#;
        let record: ProgressRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.completed_count(), 2);
        assert_eq!(record.quiz_attempts[0].stars, StarRating::Two);
    }
}
