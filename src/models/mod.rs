// Model exports
pub mod domain;
pub mod output;
pub mod rows;

pub use domain::{
    AttributeEstimate, AttributeRecord, Bucket, CandidateGame, Category, Dimension, ExclusionSet,
    PreferenceProfile, RatingRecord, ScoreBreakdown, ScoredCandidate, ScoringWeights,
};
pub use output::GameRecord;
pub use rows::{CollectionRow, CorrectionRow, RankingRow};
