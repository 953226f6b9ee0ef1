//! Priority scoring helpers.
//!
//! Three bounded integer signals are extracted from a normalized item:
//! - `sentiment` : 1..=3 from the star rating (negative feedback weighs most)
//! - `likes`     : 0..=3 bucket of helpful votes / likes
//! - `recency`   : 1..=3 bucket of the age in whole days
//!
//! total = sentiment + likes + recency, mapped to a tier by [`Priority::from_total`].
//! `now` is always passed in; nothing here reads the clock.

use chrono::{DateTime, Utc};

use crate::feedback::{Priority, RawFeedbackItem};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Missing rating counts as neutral. Out-of-range ratings are not rejected.
pub fn sentiment_score(rating: Option<i32>) -> u8 {
    match rating {
        None => 2,
        Some(r) if r <= 2 => 3,
        Some(3) => 2,
        Some(_) => 1,
    }
}

pub fn likes_score(likes: u32) -> u8 {
    match likes {
        0 => 0,
        1..=9 => 1,
        10..=50 => 2,
        _ => 3,
    }
}

/// Whole days between `date` and `now`, rounded up. Direction is ignored, so a
/// future date counts the same as an equally old one.
pub fn age_in_days(date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let diff_ms = (now - date).num_milliseconds().saturating_abs();
    diff_ms / DAY_MS + i64::from(diff_ms % DAY_MS != 0)
}

pub fn recency_score(date: DateTime<Utc>, now: DateTime<Utc>) -> u8 {
    match age_in_days(date, now) {
        d if d < 7 => 3,
        7..=30 => 2,
        _ => 1,
    }
}

/// Per-item breakdown; `total` is always the plain sum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub sentiment: u8,
    pub likes: u8,
    pub recency: u8,
    pub total: u8,
}

impl ScoreBreakdown {
    pub fn new(sentiment: u8, likes: u8, recency: u8) -> Self {
        Self {
            sentiment,
            likes,
            recency,
            total: sentiment + likes + recency,
        }
    }

    pub fn compute(item: &RawFeedbackItem, now: DateTime<Utc>) -> Self {
        Self::new(
            sentiment_score(item.rating),
            likes_score(item.likes),
            recency_score(item.date, now),
        )
    }

    pub fn priority(&self) -> Priority {
        Priority::from_total(self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    #[test]
    fn sentiment_is_non_increasing_in_rating() {
        let scores: Vec<u8> = (1..=5).map(|r| sentiment_score(Some(r))).collect();
        assert_eq!(scores, vec![3, 3, 2, 1, 1]);
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(sentiment_score(None), 2);
    }

    #[test]
    fn likes_buckets_are_inclusive_at_lower_bound() {
        assert_eq!(likes_score(0), 0);
        assert_eq!(likes_score(1), 1);
        assert_eq!(likes_score(9), 1);
        assert_eq!(likes_score(10), 2);
        assert_eq!(likes_score(50), 2);
        assert_eq!(likes_score(51), 3);
        assert_eq!(likes_score(u32::MAX), 3);
    }

    #[test]
    fn likes_score_is_non_decreasing() {
        let mut prev = 0;
        for l in 0..200 {
            let s = likes_score(l);
            assert!(s >= prev && s <= 3);
            prev = s;
        }
    }

    #[test]
    fn age_rounds_partial_days_up() {
        let n = now();
        assert_eq!(age_in_days(n, n), 0);
        assert_eq!(age_in_days(n - Duration::hours(1), n), 1);
        assert_eq!(age_in_days(n - Duration::days(6), n), 6);
        assert_eq!(age_in_days(n - Duration::days(6) - Duration::minutes(1), n), 7);
    }

    #[test]
    fn recency_boundaries() {
        let n = now();
        assert_eq!(recency_score(n - Duration::days(6), n), 3);
        assert_eq!(recency_score(n - Duration::days(7), n), 2);
        assert_eq!(recency_score(n - Duration::days(30), n), 2);
        assert_eq!(recency_score(n - Duration::days(31), n), 1);
    }

    #[test]
    fn future_dates_score_like_past_dates() {
        let n = now();
        assert_eq!(
            recency_score(n + Duration::days(45), n),
            recency_score(n - Duration::days(45), n)
        );
        assert_eq!(recency_score(n + Duration::days(2), n), 3);
    }

    #[test]
    fn breakdown_sums_and_maps_to_tier() {
        let b = ScoreBreakdown::new(3, 3, 3);
        assert_eq!(b.total, 9);
        assert_eq!(b.priority(), Priority::High);

        let b = ScoreBreakdown::new(1, 0, 1);
        assert_eq!(b.total, 2);
        assert_eq!(b.priority(), Priority::Low);
    }
}
