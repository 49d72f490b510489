use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::StarRating;

/// Which scope a quiz was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizMode {
    Lesson,
    Subject,
}

impl QuizMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuizMode::Lesson => "lesson",
            QuizMode::Subject => "subject",
        }
    }
}

/// Immutable record of one completed quiz session.
///
/// Appended to the owning progress record at finalization and never mutated
/// afterwards. The `date` field travels as epoch milliseconds, matching the
/// stored record shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizAttempt {
    /// Percentage score, 0 to 100.
    pub score: u8,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,
    pub stars: StarRating,
    pub mode: QuizMode,
}

impl QuizAttempt {
    #[must_use]
    pub fn new(score: u8, stars: StarRating, mode: QuizMode, date: DateTime<Utc>) -> Self {
        Self {
            score,
            date,
            stars,
            mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn attempt_serializes_to_the_stored_shape() {
        let attempt = QuizAttempt::new(90, StarRating::Three, QuizMode::Subject, fixed_now());
        let json = serde_json::to_value(&attempt).unwrap();
        assert_eq!(json["score"], 90);
        assert_eq!(json["date"], 1_720_000_000_000_i64);
        assert_eq!(json["stars"], 3);
        assert_eq!(json["mode"], "subject");
    }

    #[test]
    fn attempt_round_trips() {
        let attempt = QuizAttempt::new(67, StarRating::One, QuizMode::Lesson, fixed_now());
        let json = serde_json::to_string(&attempt).unwrap();
        let back: QuizAttempt = serde_json::from_str(&json).unwrap();
        assert_eq!(back, attempt);
    }
}
