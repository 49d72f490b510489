use chrono::{DateTime, Duration, Utc};

/// Seconds a learner gets per question when the timer is enabled.
pub const QUESTION_TIME_LIMIT_SECS: i64 = 30;

/// Cancellable countdown scoped to a single question index.
///
/// The countdown is plain data: a deadline plus the index it belongs to.
/// The session polls it through `tick` events and drops it on every
/// transition away from the owning index, so an expired deadline can never
/// score a later question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    question_index: usize,
    expires_at: DateTime<Utc>,
}

impl Countdown {
    /// Starts the standard per-question countdown.
    #[must_use]
    pub fn start(question_index: usize, now: DateTime<Utc>) -> Self {
        Self::with_duration(question_index, now, QUESTION_TIME_LIMIT_SECS)
    }

    /// Starts a countdown with an explicit duration in seconds.
    #[must_use]
    pub fn with_duration(question_index: usize, now: DateTime<Utc>, seconds: i64) -> Self {
        Self {
            question_index,
            expires_at: now + Duration::seconds(seconds),
        }
    }

    /// Index of the question this countdown belongs to.
    #[must_use]
    pub fn question_index(&self) -> usize {
        self.question_index
    }

    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whole seconds left, rounded up, clamped at zero.
    ///
    /// Reaches zero exactly when `is_expired` turns true, so a displayed
    /// "0s" always means the timeout has fired or is about to.
    #[must_use]
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> i64 {
        let millis = (self.expires_at - now).num_milliseconds();
        if millis <= 0 {
            return 0;
        }
        (millis + 999) / 1000
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[test]
    fn counts_down_to_zero() {
        let now = fixed_now();
        let countdown = Countdown::start(0, now);
        assert_eq!(countdown.remaining_seconds(now), 30);
        assert_eq!(
            countdown.remaining_seconds(now + Duration::seconds(29)),
            1
        );
        assert_eq!(
            countdown.remaining_seconds(now + Duration::seconds(30)),
            0
        );
        assert_eq!(
            countdown.remaining_seconds(now + Duration::seconds(45)),
            0
        );
    }

    #[test]
    fn expires_exactly_at_the_deadline() {
        let now = fixed_now();
        let countdown = Countdown::with_duration(2, now, 10);
        assert!(!countdown.is_expired(now + Duration::milliseconds(9_999)));
        assert!(countdown.is_expired(now + Duration::seconds(10)));
        assert_eq!(countdown.question_index(), 2);
    }

    #[test]
    fn partial_seconds_round_up_for_display() {
        let now = fixed_now();
        let countdown = Countdown::with_duration(0, now, 10);
        assert_eq!(
            countdown.remaining_seconds(now + Duration::milliseconds(9_500)),
            1
        );
    }
}
