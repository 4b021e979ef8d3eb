//! Fixed-interval review scheduling.
//!
//! A correct answer pushes the next review out by a difficulty-dependent
//! interval; a wrong answer brings the card back after four hours. There is
//! no ease factor or streak tracking.

use time::{Duration, OffsetDateTime};

use crate::types::Difficulty;

pub const RETRY_INTERVAL: Duration = Duration::hours(4);

pub fn review_interval(difficulty: Difficulty, is_correct: bool) -> Duration {
    if !is_correct {
        return RETRY_INTERVAL;
    }
    match difficulty {
        Difficulty::Easy => Duration::days(7),
        Difficulty::Medium => Duration::days(3),
        Difficulty::Hard => Duration::days(1),
    }
}

/// Review timestamps after answering a card at `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewSchedule {
    pub last_reviewed: OffsetDateTime,
    pub next_review: OffsetDateTime,
}

pub fn schedule_next_review(
    difficulty: Difficulty,
    is_correct: bool,
    now: OffsetDateTime,
) -> ReviewSchedule {
    ReviewSchedule {
        last_reviewed: now,
        next_review: now + review_interval(difficulty, is_correct),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2024-03-10 12:00:00 UTC);

    #[test]
    fn correct_answers_use_difficulty_interval() {
        for (difficulty, days) in [
            (Difficulty::Easy, 7),
            (Difficulty::Medium, 3),
            (Difficulty::Hard, 1),
        ] {
            let s = schedule_next_review(difficulty, true, NOW);
            assert_eq!(s.next_review - NOW, Duration::days(days), "{difficulty:?}");
            assert_eq!(s.last_reviewed, NOW);
        }
    }

    #[test]
    fn wrong_answers_retry_after_four_hours() {
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let s = schedule_next_review(difficulty, false, NOW);
            assert_eq!(s.next_review - NOW, Duration::hours(4), "{difficulty:?}");
            assert_eq!(s.last_reviewed, NOW);
        }
    }

    #[test]
    fn schedule_is_deterministic() {
        assert_eq!(
            schedule_next_review(Difficulty::Medium, true, NOW),
            schedule_next_review(Difficulty::Medium, true, NOW)
        );
    }
}
