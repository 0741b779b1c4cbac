use crate::models::{
    AttributeEstimate, CandidateGame, Dimension, PreferenceProfile, ScoreBreakdown, ScoringWeights,
};

/// Linear bonus for globally well-ranked games
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankBoost {
    /// Rank at which the bonus reaches zero, exclusive of `max_rank + 1`
    pub max_rank: u32,
    /// Bonus awarded to rank 1
    pub max_boost: f64,
}

impl Default for RankBoost {
    fn default() -> Self {
        Self {
            max_rank: 5000,
            max_boost: 0.5,
        }
    }
}

/// Calculate the personalized composite score for a candidate
///
/// Scoring formula:
/// composite = (
///     consensus_score * 0.5 +     # community average bucket
///     complexity_score * 0.3 +    # resolved weight bucket
///     recency_score * 0.2         # publication year bucket
/// )
pub fn calculate_composite_score(
    candidate: &CandidateGame,
    attributes: &AttributeEstimate,
    profile: &PreferenceProfile,
    weights: &ScoringWeights,
) -> f64 {
    let complexity_score = profile.score(Dimension::Weight, attributes.complexity_weight);
    let consensus_score = profile.score(Dimension::Community, candidate.community_average);
    let recency_score = profile.score(Dimension::Year, candidate.publication_year as f64);

    consensus_score * weights.consensus
        + complexity_score * weights.complexity
        + recency_score * weights.recency
}

/// Calculate the rank boost, bounded to `[0, max_boost]`
///
/// Rank 1 earns the full bonus, decaying linearly to zero past `max_rank`.
/// Missing or zero ranks earn nothing.
#[inline]
pub fn calculate_rank_boost(global_rank: Option<u32>, boost: &RankBoost) -> f64 {
    match global_rank {
        Some(rank) if rank >= 1 && boost.max_rank >= 1 => {
            let span = boost.max_rank as f64;
            ((span + 1.0 - rank as f64) / span * boost.max_boost).max(0.0)
        }
        _ => 0.0,
    }
}

/// Round to a fixed number of decimal places
///
/// Scales by `10^places` and rounds half away from zero on the scaled
/// value. This is not round-half-even on the exact decimal, so binary
/// edge cases such as `1.0005` may land on the other neighbour.
#[inline]
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Combines the composite score and rank boost into a final score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreEngine {
    weights: ScoringWeights,
    rank_boost: RankBoost,
    precision: u32,
}

impl Default for ScoreEngine {
    fn default() -> Self {
        Self::new(ScoringWeights::default(), RankBoost::default(), 3)
    }
}

impl ScoreEngine {
    pub fn new(weights: ScoringWeights, rank_boost: RankBoost, precision: u32) -> Self {
        Self {
            weights,
            rank_boost,
            precision,
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn rank_boost(&self) -> &RankBoost {
        &self.rank_boost
    }

    pub fn score(
        &self,
        candidate: &CandidateGame,
        attributes: &AttributeEstimate,
        profile: &PreferenceProfile,
    ) -> ScoreBreakdown {
        let composite_score = calculate_composite_score(candidate, attributes, profile, &self.weights);
        let rank_boost = calculate_rank_boost(candidate.global_rank, &self.rank_boost);

        ScoreBreakdown {
            composite_score,
            rank_boost,
            final_score: round_to(composite_score + rank_boost, self.precision),
        }
    }
}
