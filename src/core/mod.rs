// Core algorithm exports
pub mod attributes;
pub mod filters;
pub mod profile;
pub mod ranker;
pub mod recommender;
pub mod scoring;

pub use attributes::{AttributeCatalog, AttributeResolver, AttributeSource, CategoryEstimate};
pub use filters::{screen_candidate, BrowseFilter, ComplexityBand, DurationBand, Screening};
pub use profile::{BucketTables, PreferenceModel, ProfileError};
pub use recommender::{PoolOptions, RecommendationReport, RecommendationResult, Recommender};
pub use scoring::{calculate_composite_score, calculate_rank_boost, RankBoost, ScoreEngine};
