use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::Settings;
use crate::core::{BrowseFilter, ProfileError, RecommendationReport};
use crate::models::{AttributeRecord, CandidateGame, ExclusionSet, GameRecord, PreferenceProfile};
use crate::services::{
    collection::read_collection,
    corrections::read_corrections,
    rankings::read_rankings,
    store::{self, StoreError},
};

/// Errors that abort a pipeline run
///
/// Missing inputs are reported before any output file is written.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Preference profile not found at {}; run the `profile` command first", .0.display())]
    MissingProfile(PathBuf),

    #[error("Exclusion set not found at {}; run the `exclusions` command first", .0.display())]
    MissingExclusionSet(PathBuf),

    #[error("Recommendations not found at {}; run the `recommend` command first", .0.display())]
    MissingRecommendations(PathBuf),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Profile(#[from] ProfileError),
}

/// Build the preference profile from the collection and persist it
pub fn build_profile(settings: &Settings) -> Result<PreferenceProfile, PipelineError> {
    let collection = read_collection(&settings.paths.collection)?;
    let records = collection.rating_records();

    let profile = settings.preference_model().build(&records)?;
    store::save_profile(&settings.paths.profile, &profile)?;

    tracing::info!(
        rated_games = records.len(),
        baseline_rating = profile.baseline_rating,
        path = %settings.paths.profile.display(),
        "Saved preference profile"
    );
    Ok(profile)
}

/// Summary of the exclusion export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExclusionSummary {
    pub excluded: usize,
    pub owned: usize,
}

/// Write the exclusion set and the owned-games list from the collection
pub fn build_exclusions(settings: &Settings) -> Result<ExclusionSummary, PipelineError> {
    let collection = read_collection(&settings.paths.collection)?;
    let exclusions = collection.exclusion_set();
    let owned = collection.owned_games();

    store::save_exclusions(&settings.paths.exclusions, &exclusions)?;
    store::save_records(&settings.paths.owned_games, &owned)?;

    let summary = ExclusionSummary {
        excluded: exclusions.len(),
        owned: owned.len(),
    };
    tracing::info!(excluded = summary.excluded, owned = summary.owned, "Saved exclusion set and owned games");
    Ok(summary)
}

/// Run the personalized recommendation pipeline end to end
///
/// # Pipeline Stages
/// 1. Load the preference profile (fatal if absent)
/// 2. Load the exclusion set (fatal if absent)
/// 3. Read the global pool and, when present, collection attributes
/// 4. Screen, resolve, score and rank
/// 5. Write the public output records
pub fn run_recommendations(settings: &Settings) -> Result<RecommendationReport, PipelineError> {
    let paths = &settings.paths;

    let profile = store::load_profile(&paths.profile)?
        .ok_or_else(|| PipelineError::MissingProfile(paths.profile.clone()))?;
    tracing::info!(baseline_rating = profile.baseline_rating, "Loaded preference profile");

    let exclusions = store::load_exclusions(&paths.exclusions)?
        .ok_or_else(|| PipelineError::MissingExclusionSet(paths.exclusions.clone()))?;
    tracing::info!(excluded = exclusions.len(), "Loaded exclusion set");

    let pool = read_rankings(&paths.rankings, settings.fallback_year())?;
    let authoritative = load_authoritative(settings)?;

    let (records, report) = recommend(settings, &profile, &exclusions, pool, &authoritative);
    store::save_records(&paths.output, &records)?;

    tracing::info!(
        recommendations = records.len(),
        path = %paths.output.display(),
        "Saved recommendations"
    );
    Ok(report)
}

/// Pure part of the pipeline: rank the pool and strip internal fields
pub fn recommend<I>(
    settings: &Settings,
    profile: &PreferenceProfile,
    exclusions: &ExclusionSet,
    pool: I,
    authoritative: &HashMap<String, AttributeRecord>,
) -> (Vec<GameRecord>, RecommendationReport)
where
    I: IntoIterator<Item = CandidateGame>,
{
    let result = settings
        .recommender()
        .recommend(profile, exclusions, pool, authoritative);
    (result.records(), result.report)
}

/// Collection attributes are optional; a missing export only loses precision
fn load_authoritative(settings: &Settings) -> Result<HashMap<String, AttributeRecord>, PipelineError> {
    let path = &settings.paths.collection;
    if !path.exists() {
        tracing::warn!(path = %path.display(), "Collection export not found, using category estimates only");
        return Ok(HashMap::new());
    }
    Ok(read_collection(path)?.authoritative_records())
}

/// Write wishlist-based recommendations from the collection alone
pub fn build_wishlist(settings: &Settings, include_tracked: bool) -> Result<usize, PipelineError> {
    let collection = read_collection(&settings.paths.collection)?;
    let games = collection.wishlist_recommendations(include_tracked);
    store::save_records(&settings.paths.output, &games)?;

    tracing::info!(games = games.len(), include_tracked, "Saved wishlist recommendations");
    Ok(games.len())
}

/// Load the published recommendations and apply a browse filter
pub fn browse(settings: &Settings, filter: &BrowseFilter) -> Result<Vec<GameRecord>, PipelineError> {
    let path = &settings.paths.output;
    let games = store::load_records(path)?
        .ok_or_else(|| PipelineError::MissingRecommendations(path.clone()))?;

    let matched: Vec<GameRecord> = filter.apply(&games).into_iter().cloned().collect();
    tracing::info!(total = games.len(), matched = matched.len(), "Applied browse filter");
    Ok(matched)
}

/// Summary of an id correction pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrectionSummary {
    pub corrections: usize,
    pub updated: usize,
}

/// Rewrite ids in the published recommendations from the corrections sheet
///
/// Both files must exist; the output is rewritten even when nothing changed.
pub fn apply_corrections(settings: &Settings) -> Result<CorrectionSummary, PipelineError> {
    let paths = &settings.paths;
    let mut games = store::load_records(&paths.output)?
        .ok_or_else(|| PipelineError::MissingRecommendations(paths.output.clone()))?;
    let corrections = read_corrections(&paths.corrections)?;

    let updated = corrections.apply(&mut games);
    store::save_records(&paths.output, &games)?;

    let summary = CorrectionSummary {
        corrections: corrections.len(),
        updated,
    };
    tracing::info!(
        corrections = summary.corrections,
        updated = summary.updated,
        path = %paths.output.display(),
        "Applied id corrections"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PathSettings;
    use std::fs;
    use tempfile::TempDir;

    fn settings_in(dir: &TempDir) -> Settings {
        let root = dir.path();
        Settings {
            paths: PathSettings {
                collection: root.join("collection.csv"),
                rankings: root.join("ranks.csv"),
                profile: root.join("profile.json"),
                exclusions: root.join("excluded.json"),
                owned_games: root.join("owned.json"),
                output: root.join("out/recommendations.json"),
                corrections: root.join("corrections.csv"),
            },
            ..Settings::default()
        }
    }

    #[test]
    fn test_missing_profile_aborts_without_output() {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(&dir);
        store::save_exclusions(&settings.paths.exclusions, &ExclusionSet::new()).unwrap();

        let err = run_recommendations(&settings).unwrap_err();
        assert!(matches!(err, PipelineError::MissingProfile(_)));
        assert!(!settings.paths.output.exists());
    }

    #[test]
    fn test_missing_exclusions_aborts_without_output() {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(&dir);
        let profile = settings
            .preference_model()
            .build(&[crate::models::RatingRecord {
                rating: 7.0,
                complexity_weight: 2.0,
                community_average: 7.0,
                publication_year: 2020,
            }])
            .unwrap();
        store::save_profile(&settings.paths.profile, &profile).unwrap();

        let err = run_recommendations(&settings).unwrap_err();
        assert!(matches!(err, PipelineError::MissingExclusionSet(_)));
        assert!(!settings.paths.output.exists());
    }

    #[test]
    fn test_browse_requires_output() {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(&dir);

        let err = browse(&settings, &BrowseFilter::default()).unwrap_err();
        assert!(matches!(err, PipelineError::MissingRecommendations(_)));
    }

    #[test]
    fn test_corrections_require_both_files() {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(&dir);

        let err = apply_corrections(&settings).unwrap_err();
        assert!(matches!(err, PipelineError::MissingRecommendations(_)));

        store::save_records(&settings.paths.output, &[]).unwrap();
        let err = apply_corrections(&settings).unwrap_err();
        assert!(matches!(err, PipelineError::Store(StoreError::Missing(_))));
    }

    #[test]
    fn test_profile_from_unrated_collection_fails() {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(&dir);
        fs::write(
            &settings.paths.collection,
            "objectid,objectname,rating,own\n1,Unrated,,1\n",
        )
        .unwrap();

        let err = build_profile(&settings).unwrap_err();
        assert!(matches!(err, PipelineError::Profile(ProfileError::InsufficientData)));
        assert!(!settings.paths.profile.exists());
    }
}
