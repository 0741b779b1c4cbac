use std::collections::{HashMap, HashSet};

use crate::core::{
    attributes::AttributeResolver,
    filters::{screen_candidate, Screening},
    ranker,
    scoring::ScoreEngine,
};
use crate::models::{
    AttributeRecord, CandidateGame, ExclusionSet, GameRecord, PreferenceProfile, ScoredCandidate,
};

/// Counts of what happened to the candidate pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecommendationReport {
    pub total_candidates: usize,
    pub unranked: usize,
    pub out_of_range: usize,
    pub excluded: usize,
    pub expansions: usize,
    pub duplicates: usize,
    pub scored: usize,
    pub returned: usize,
}

/// Result of the recommendation process
#[derive(Debug)]
pub struct RecommendationResult {
    pub recommendations: Vec<ScoredCandidate>,
    pub report: RecommendationReport,
}

impl RecommendationResult {
    /// Public output records, in ranked order
    pub fn records(&self) -> Vec<GameRecord> {
        self.recommendations.iter().map(GameRecord::from).collect()
    }
}

/// Pipeline behavior that is not part of scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolOptions {
    pub max_rank: u32,
    /// Keep only the first occurrence of each id
    pub deduplicate: bool,
    pub limit: Option<usize>,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max_rank: 5000,
            deduplicate: true,
            limit: None,
        }
    }
}

/// Main recommendation orchestrator
///
/// # Pipeline Stages
/// 1. Pool screening (rank, ownership, expansions)
/// 2. Duplicate id removal
/// 3. Attribute resolution
/// 4. Scoring
/// 5. Stable ranking and optional truncation
#[derive(Debug, Clone, Default)]
pub struct Recommender {
    resolver: AttributeResolver,
    engine: ScoreEngine,
    options: PoolOptions,
}

impl Recommender {
    pub fn new(resolver: AttributeResolver, engine: ScoreEngine, options: PoolOptions) -> Self {
        Self {
            resolver,
            engine,
            options,
        }
    }

    pub fn options(&self) -> &PoolOptions {
        &self.options
    }

    /// Score and rank the candidate pool for one user
    ///
    /// # Arguments
    /// * `profile` - The user's preference profile
    /// * `exclusions` - Ids the user owns or previously owned
    /// * `pool` - Candidates in ascending global rank order
    /// * `authoritative` - Attribute records from the user's collection, by id
    pub fn recommend<I>(
        &self,
        profile: &PreferenceProfile,
        exclusions: &ExclusionSet,
        pool: I,
        authoritative: &HashMap<String, AttributeRecord>,
    ) -> RecommendationResult
    where
        I: IntoIterator<Item = CandidateGame>,
    {
        let mut report = RecommendationReport::default();
        let mut seen: HashSet<String> = HashSet::new();
        let mut scored = Vec::new();

        for candidate in pool {
            report.total_candidates += 1;

            // Stage 1: pool screening
            match screen_candidate(&candidate, exclusions, self.options.max_rank) {
                Screening::Keep => {}
                Screening::Unranked => {
                    report.unranked += 1;
                    continue;
                }
                Screening::OutOfRange => {
                    report.out_of_range += 1;
                    continue;
                }
                Screening::Excluded => {
                    report.excluded += 1;
                    continue;
                }
                Screening::Expansion => {
                    report.expansions += 1;
                    continue;
                }
            }

            // Stage 2: duplicate ids
            if self.options.deduplicate && !seen.insert(candidate.id.clone()) {
                tracing::warn!(id = %candidate.id, name = %candidate.name, "Dropping duplicate candidate id");
                report.duplicates += 1;
                continue;
            }

            // Stage 3 & 4: resolve attributes and score
            scored.push(self.score_candidate(candidate, profile, authoritative));
        }

        report.scored = scored.len();

        // Stage 5: rank
        let mut recommendations = ranker::rank(scored);
        if let Some(limit) = self.options.limit {
            recommendations.truncate(limit);
        }
        report.returned = recommendations.len();

        tracing::info!(
            total = report.total_candidates,
            unranked = report.unranked,
            out_of_range = report.out_of_range,
            excluded = report.excluded,
            expansions = report.expansions,
            duplicates = report.duplicates,
            returned = report.returned,
            "Ranked candidate pool"
        );

        RecommendationResult {
            recommendations,
            report,
        }
    }

    fn score_candidate(
        &self,
        candidate: CandidateGame,
        profile: &PreferenceProfile,
        authoritative: &HashMap<String, AttributeRecord>,
    ) -> ScoredCandidate {
        let (attributes, source) = self.resolver.resolve_with_source(&candidate, authoritative);
        let breakdown = self.engine.score(&candidate, &attributes, profile);

        tracing::trace!(
            id = %candidate.id,
            ?source,
            final_score = breakdown.final_score,
            "Scored candidate"
        );

        ScoredCandidate {
            candidate,
            attributes,
            composite_score: breakdown.composite_score,
            rank_boost: breakdown.rank_boost,
            final_score: breakdown.final_score,
        }
    }
}
