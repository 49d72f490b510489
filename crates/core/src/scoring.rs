use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StarRatingError {
    #[error("invalid star rating value: {0}")]
    InvalidStars(u8),
}

//
// ─── STAR RATING ───────────────────────────────────────────────────────────────
//

/// Mastery rating awarded for a finished quiz.
///
/// A deterministic, monotonic function of the percentage score, evaluated
/// highest threshold first: 90 and up earns three stars, 70 two, 50 one.
/// Stored as the integer 0 to 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum StarRating {
    None,
    One,
    Two,
    Three,
}

impl StarRating {
    /// Rating for a percentage score.
    #[must_use]
    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            90..=u8::MAX => Self::Three,
            70..=89 => Self::Two,
            50..=69 => Self::One,
            _ => Self::None,
        }
    }

    /// Converts the stored 0-3 value back to a rating.
    ///
    /// # Errors
    ///
    /// Returns `StarRatingError::InvalidStars` if the value is not in 0-3.
    pub fn from_u8(value: u8) -> Result<Self, StarRatingError> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            _ => Err(StarRatingError::InvalidStars(value)),
        }
    }

    #[must_use]
    pub fn as_u8(self) -> u8 {
        match self {
            StarRating::None => 0,
            StarRating::One => 1,
            StarRating::Two => 2,
            StarRating::Three => 3,
        }
    }

    /// Whether this rating triggers the celebration effect.
    ///
    /// Only a three-star finish celebrates; the signal depends on nothing
    /// but the final percentage.
    #[must_use]
    pub fn celebrates(self) -> bool {
        matches!(self, StarRating::Three)
    }
}

impl TryFrom<u8> for StarRating {
    type Error = StarRatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value)
    }
}

impl From<StarRating> for u8 {
    fn from(rating: StarRating) -> Self {
        rating.as_u8()
    }
}

//
// ─── SCORING ───────────────────────────────────────────────────────────────────
//

/// Integer percentage score, rounded to nearest.
///
/// Sessions never start with zero questions, so `total` is positive in
/// practice; a zero total yields 0.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn percentage(correct: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    (f64::from(correct) / f64::from(total) * 100.0).round() as u8
}

/// Post-quiz encouragement line, banded at the star thresholds.
#[must_use]
pub fn encouragement(percentage: u8) -> &'static str {
    if percentage >= 90 {
        return "Amazing work! You're a superstar! 🌟";
    }
    if percentage >= 70 {
        return "Great job — keep going! 👍";
    }
    if percentage >= 50 {
        return "Nice try — a little more practice and you'll ace it! 💪";
    }
    "Don't worry — try again and you'll improve! 😊"
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_match_exactly() {
        assert_eq!(StarRating::from_percentage(100), StarRating::Three);
        assert_eq!(StarRating::from_percentage(90), StarRating::Three);
        assert_eq!(StarRating::from_percentage(89), StarRating::Two);
        assert_eq!(StarRating::from_percentage(70), StarRating::Two);
        assert_eq!(StarRating::from_percentage(69), StarRating::One);
        assert_eq!(StarRating::from_percentage(50), StarRating::One);
        assert_eq!(StarRating::from_percentage(49), StarRating::None);
        assert_eq!(StarRating::from_percentage(0), StarRating::None);
    }

    #[test]
    fn rating_is_monotonic_in_percentage() {
        let mut previous = StarRating::None;
        for percent in 0..=100 {
            let rating = StarRating::from_percentage(percent);
            assert!(rating >= previous, "rating dropped at {percent}%");
            previous = rating;
        }
    }

    #[test]
    fn percentage_rounds_to_nearest() {
        assert_eq!(percentage(9, 10), 90);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(0, 4), 0);
        assert_eq!(percentage(4, 4), 100);
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn only_three_stars_celebrate() {
        assert!(StarRating::Three.celebrates());
        assert!(!StarRating::Two.celebrates());
        assert!(!StarRating::One.celebrates());
        assert!(!StarRating::None.celebrates());
    }

    #[test]
    fn numeric_conversion_round_trips() {
        for value in 0..=3_u8 {
            assert_eq!(StarRating::from_u8(value).unwrap().as_u8(), value);
        }
        let err = StarRating::from_u8(4).unwrap_err();
        assert!(matches!(err, StarRatingError::InvalidStars(4)));
    }

    #[test]
    fn encouragement_bands_follow_thresholds() {
        assert!(encouragement(95).contains("superstar"));
        assert!(encouragement(75).contains("Great job"));
        assert!(encouragement(55).contains("practice"));
        assert!(encouragement(10).contains("try again"));
    }
}
