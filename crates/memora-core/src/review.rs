//! The spaced-repetition review scheduler.
//!
//! [`next_review_state`] is a pure function from the current [`ReviewState`]
//! and a [`Rating`] to the next state; the wall clock is injected for
//! testability. The arithmetic is a simplified ease-factor/interval model:
//! `again` resets the interval to a fixed 1.0 days, every other rating
//! multiplies the existing interval.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Lower clamp bound for the ease factor, in basis points (1300 = 1.3x).
pub const EASE_FACTOR_FLOOR: i32 = 1300;

/// Upper clamp bound for the ease factor, in basis points (3000 = 3.0x).
pub const EASE_FACTOR_CEILING: i32 = 3000;

/// Seed ease factor for a card's first review (2500 = 2.5x).
pub const EASE_FACTOR_SEED: i32 = 2500;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Per-(card, user) spaced-repetition bookkeeping.
///
/// A record exists if and only if the user has reviewed the card at least
/// once; absence is the definition of "unstudied".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
    /// Interval growth multiplier, basis-point scaled and clamped to
    /// [`EASE_FACTOR_FLOOR`]..=[`EASE_FACTOR_CEILING`] after every update.
    pub ease_factor: i32,
    /// Current review interval in days, always >= 0.
    pub interval: f64,
    /// Completed reviews, monotonically non-decreasing.
    pub reps: u32,
    /// Count of `again` ratings, monotonically non-decreasing.
    pub lapses: u32,
    /// The card is due when `now >= due_at`.
    pub due_at: DateTime<Utc>,
    /// Timestamp of the most recent review.
    pub last_reviewed_at: DateTime<Utc>,
}

impl ReviewState {
    /// The default state substituted when a card has never been reviewed.
    pub fn seed() -> Self {
        ReviewState {
            ease_factor: EASE_FACTOR_SEED,
            interval: 0.0,
            reps: 0,
            lapses: 0,
            due_at: DateTime::UNIX_EPOCH,
            last_reviewed_at: DateTime::UNIX_EPOCH,
        }
    }

    /// Returns `true` if the card is due for review at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.due_at
    }
}

/// Qualitative answer quality for one review.
///
/// Deserialization doubles as validation: an unknown rating string never
/// reaches the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Again,
    Hard,
    Good,
    Easy,
}

impl Rating {
    /// Returns the wire-level rating string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Again => "again",
            Rating::Hard => "hard",
            Rating::Good => "good",
            Rating::Easy => "easy",
        }
    }
}

/// Computes the state after one review, leaving `current` untouched.
///
/// | rating | ease delta | reps | lapses | interval  |
/// |--------|-----------|------|--------|-----------|
/// | again  | -200      | +1   | +1     | := 1.0    |
/// | hard   | -150      | +1   | +0     | x1.2      |
/// | good   | 0         | +1   | +0     | x1.5      |
/// | easy   | +150      | +1   | +0     | x2.0      |
///
/// The ease factor is clamped (pulled to the nearest bound) after the delta,
/// then `last_reviewed_at = now` and `due_at = now + interval days`.
///
/// Multiplicative ratings keep a zero interval at zero, so a never-lapsed
/// card stays due until its first `again` seeds 1.0. This reproduces the
/// observed scheduling behavior; see DESIGN.md before changing it.
pub fn next_review_state(
    current: &ReviewState,
    rating: Rating,
    now: DateTime<Utc>,
) -> ReviewState {
    // Truncate to whole milliseconds so stored timestamps round-trip exactly
    // through the SQLite backend and the cursor codec.
    let now = DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now);

    let mut next = current.clone();
    match rating {
        Rating::Again => {
            next.ease_factor -= 200;
            next.lapses += 1;
            next.interval = 1.0;
        }
        Rating::Hard => {
            next.ease_factor -= 150;
            next.interval *= 1.2;
        }
        Rating::Good => {
            next.interval *= 1.5;
        }
        Rating::Easy => {
            next.ease_factor += 150;
            next.interval *= 2.0;
        }
    }
    next.reps += 1;
    next.ease_factor = next.ease_factor.clamp(EASE_FACTOR_FLOOR, EASE_FACTOR_CEILING);
    next.last_reviewed_at = now;
    next.due_at = now + Duration::milliseconds((next.interval * MILLIS_PER_DAY) as i64);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn state_with(ease: i32, interval: f64) -> ReviewState {
        ReviewState {
            ease_factor: ease,
            interval,
            reps: 3,
            lapses: 1,
            due_at: fixed_now(),
            last_reviewed_at: fixed_now(),
        }
    }

    #[test]
    fn again_resets_interval_and_counts_a_lapse() {
        let next = next_review_state(&state_with(2500, 10.0), Rating::Again, fixed_now());
        assert_eq!(next.ease_factor, 2300);
        assert_eq!(next.interval, 1.0);
        assert_eq!(next.reps, 4);
        assert_eq!(next.lapses, 2);
    }

    #[test]
    fn hard_multiplies_interval_by_1_2() {
        let next = next_review_state(&state_with(2500, 10.0), Rating::Hard, fixed_now());
        assert_eq!(next.ease_factor, 2350);
        assert_eq!(next.interval, 12.0);
        assert_eq!(next.lapses, 1);
    }

    #[test]
    fn good_keeps_ease_and_multiplies_interval_by_1_5() {
        let next = next_review_state(&state_with(2500, 10.0), Rating::Good, fixed_now());
        assert_eq!(next.ease_factor, 2500);
        assert_eq!(next.interval, 15.0);
    }

    #[test]
    fn easy_raises_ease_and_doubles_interval() {
        let next = next_review_state(&state_with(2500, 10.0), Rating::Easy, fixed_now());
        assert_eq!(next.ease_factor, 2650);
        assert_eq!(next.interval, 20.0);
    }

    #[test]
    fn ease_factor_clamps_at_the_floor() {
        let next = next_review_state(&state_with(1400, 2.0), Rating::Again, fixed_now());
        assert_eq!(next.ease_factor, EASE_FACTOR_FLOOR);
    }

    #[test]
    fn ease_factor_clamps_at_the_ceiling() {
        let next = next_review_state(&state_with(2950, 2.0), Rating::Easy, fixed_now());
        assert_eq!(next.ease_factor, EASE_FACTOR_CEILING);
    }

    #[test]
    fn due_at_is_last_reviewed_plus_interval_days() {
        let now = fixed_now();
        let next = next_review_state(&state_with(2500, 10.0), Rating::Good, now);
        assert_eq!(next.last_reviewed_at, now);
        // good: 10.0 * 1.5 = 15 days
        assert_eq!(next.due_at, now + Duration::days(15));
    }

    #[test]
    fn again_on_seed_state_matches_the_observed_scenario() {
        // ease 2500 -> 2300, interval := 1.0, lapses 0 -> 1
        let next = next_review_state(&ReviewState::seed(), Rating::Again, fixed_now());
        assert_eq!(next.ease_factor, 2300);
        assert_eq!(next.interval, 1.0);
        assert_eq!(next.lapses, 1);
        assert_eq!(next.reps, 1);
        assert_eq!(next.due_at, fixed_now() + Duration::days(1));
    }

    #[test]
    fn first_good_rating_keeps_zero_interval() {
        // Reproduced quirk: multiplying the seed interval of 0 stays 0, so
        // the card remains immediately due until an `again` seeds 1.0.
        let next = next_review_state(&ReviewState::seed(), Rating::Good, fixed_now());
        assert_eq!(next.interval, 0.0);
        assert_eq!(next.due_at, next.last_reviewed_at);
        assert!(next.is_due(fixed_now()));
    }

    #[test]
    fn sub_millisecond_now_is_truncated() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
            + Duration::nanoseconds(1_234_567);
        let next = next_review_state(&ReviewState::seed(), Rating::Again, now);
        assert_eq!(
            next.last_reviewed_at.timestamp_millis(),
            now.timestamp_millis()
        );
        assert_eq!(next.last_reviewed_at.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn rating_deserializes_from_lowercase_strings() {
        for (raw, rating) in [
            ("\"again\"", Rating::Again),
            ("\"hard\"", Rating::Hard),
            ("\"good\"", Rating::Good),
            ("\"easy\"", Rating::Easy),
        ] {
            let parsed: Rating = serde_json::from_str(raw).unwrap();
            assert_eq!(parsed, rating);
            assert_eq!(format!("\"{}\"", rating.as_str()), raw);
        }
        assert!(serde_json::from_str::<Rating>("\"perfect\"").is_err());
    }

    proptest! {
        #[test]
        fn ease_factor_is_always_within_bounds(
            ease in 0i32..6000,
            interval in 0f64..3650.0,
            rating_idx in 0usize..4,
        ) {
            let rating = [Rating::Again, Rating::Hard, Rating::Good, Rating::Easy][rating_idx];
            let next = next_review_state(&state_with(ease, interval), rating, fixed_now());
            prop_assert!(next.ease_factor >= EASE_FACTOR_FLOOR);
            prop_assert!(next.ease_factor <= EASE_FACTOR_CEILING);
            prop_assert!(next.interval >= 0.0);
            prop_assert!(next.reps > 0);
        }
    }
}
