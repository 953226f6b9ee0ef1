//! Ordering of the prioritized list.

use std::cmp::Ordering;

use crate::feedback::ScoredFeedback;

/// priority tier desc → total score desc → date desc.
pub fn compare_prioritized(a: &ScoredFeedback, b: &ScoredFeedback) -> Ordering {
    b.priority
        .rank()
        .cmp(&a.priority.rank())
        .then_with(|| b.total_score.cmp(&a.total_score))
        .then_with(|| b.date.cmp(&a.date))
}

/// Stable: items equal on all three keys keep their input order.
pub fn sort_prioritized(items: &mut [ScoredFeedback]) {
    items.sort_by(compare_prioritized);
}
