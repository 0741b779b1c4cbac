use std::cmp::Ordering;

use crate::models::ScoredCandidate;

/// Order candidates by final score, highest first
///
/// The sort is stable: candidates with equal scores keep their input order.
/// The pool is traversed in ascending global rank, so ties go to the
/// better-ranked game. Do not replace this with `sort_unstable_by`.
pub fn rank(mut candidates: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
    candidates.sort_by(|a, b| compare_scores(a.final_score, b.final_score));
    candidates
}

/// Descending comparison with NaN sorted last
#[inline]
fn compare_scores(a: f64, b: f64) -> Ordering {
    sort_key(b).total_cmp(&sort_key(a))
}

#[inline]
fn sort_key(score: f64) -> f64 {
    if score.is_nan() {
        f64::NEG_INFINITY
    } else {
        score
    }
}
