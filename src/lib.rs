//! Boardgame Recs - personalized board game buy recommendations
//!
//! This library scores games a user does not own against a preference
//! profile built from their rating history, blends in global popularity,
//! and produces a deterministic ranked list.

pub mod config;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use config::Settings;
pub use crate::core::{AttributeResolver, PreferenceModel, Recommender, ScoreEngine};
pub use models::{CandidateGame, ExclusionSet, GameRecord, PreferenceProfile, RatingRecord};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let profile = PreferenceModel::default()
            .build(&[RatingRecord {
                rating: 7.0,
                complexity_weight: 3.0,
                community_average: 7.8,
                publication_year: 2021,
            }])
            .unwrap();
        assert_eq!(profile.baseline_rating, 7.0);
    }
}
