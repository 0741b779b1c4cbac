use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationError};

use crate::models::{Bucket, Dimension, PreferenceProfile, RatingRecord};

/// Errors raised while building a preference profile
#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    #[error("Insufficient data: cannot build a preference profile from an empty rating history")]
    InsufficientData,
}

/// Bucket tables copied into every profile the model builds
///
/// Tables are scanned in order and the first matching bucket wins, so
/// entries should not overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct BucketTables {
    #[validate(custom(function = "validate_buckets"))]
    pub weight: Vec<Bucket>,
    #[validate(custom(function = "validate_buckets"))]
    pub community: Vec<Bucket>,
    #[validate(custom(function = "validate_buckets"))]
    pub year: Vec<Bucket>,
}

impl Default for BucketTables {
    fn default() -> Self {
        Self {
            weight: vec![
                Bucket::new(1.0, 1.5, 6.13),
                Bucket::new(1.5, 2.0, 6.63),
                Bucket::new(2.0, 2.5, 7.01),
                Bucket::new(2.5, 3.0, 6.80),
                Bucket::new(3.0, 3.5, 7.45),
                Bucket::new(3.5, 4.0, 7.82),
                Bucket::new(4.0, 6.0, 8.55),
            ],
            community: vec![
                Bucket::new(8.0, 10.0, 7.90),
                Bucket::new(7.5, 8.0, 7.50),
                Bucket::new(7.0, 7.5, 6.88),
                Bucket::new(6.5, 7.0, 6.09),
                Bucket::new(6.0, 6.5, 5.48),
                Bucket::new(0.0, 6.0, 4.04),
            ],
            year: vec![
                Bucket::new(2020.0, 2030.0, 7.19),
                Bucket::new(2015.0, 2020.0, 6.66),
                Bucket::new(2010.0, 2015.0, 6.42),
                Bucket::new(2000.0, 2010.0, 6.59),
                Bucket::new(0.0, 2000.0, 5.25),
            ],
        }
    }
}

fn validate_buckets(buckets: &[Bucket]) -> Result<(), ValidationError> {
    let malformed = buckets
        .iter()
        .any(|b| !b.lower.is_finite() || !b.upper.is_finite() || !b.score.is_finite() || b.lower >= b.upper);

    if malformed {
        let mut err = ValidationError::new("bucket_bounds");
        err.message = Some("every bucket needs finite bounds with lower < upper".into());
        return Err(err);
    }
    Ok(())
}

/// Builds preference profiles from a rating history
#[derive(Debug, Clone, Default)]
pub struct PreferenceModel {
    tables: BucketTables,
}

impl PreferenceModel {
    pub fn new(tables: BucketTables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &BucketTables {
        &self.tables
    }

    /// Build a profile from the user's rating history
    ///
    /// Only the baseline is derived from `records`; the bucket tables are
    /// the configured ones.
    pub fn build(&self, records: &[RatingRecord]) -> Result<PreferenceProfile, ProfileError> {
        if records.is_empty() {
            return Err(ProfileError::InsufficientData);
        }

        let total: f64 = records.iter().map(|r| r.rating).sum();
        let baseline_rating = total / records.len() as f64;

        tracing::debug!(
            records = records.len(),
            baseline_rating,
            "Built preference profile"
        );

        Ok(PreferenceProfile {
            baseline_rating,
            weight_preferences: self.tables.weight.clone(),
            bgg_preferences: self.tables.community.clone(),
            year_preferences: self.tables.year.clone(),
        })
    }
}

impl PreferenceProfile {
    pub fn buckets(&self, dimension: Dimension) -> &[Bucket] {
        match dimension {
            Dimension::Weight => &self.weight_preferences,
            Dimension::Community => &self.bgg_preferences,
            Dimension::Year => &self.year_preferences,
        }
    }

    /// Score `value` along `dimension`, falling back to the baseline
    #[inline]
    pub fn score(&self, dimension: Dimension, value: f64) -> f64 {
        bucket_score(self.buckets(dimension), value, self.baseline_rating)
    }
}

/// First bucket containing `value` wins; `fallback` when none does
#[inline]
pub fn bucket_score(buckets: &[Bucket], value: f64, fallback: f64) -> f64 {
    buckets
        .iter()
        .find(|b| b.contains(value))
        .map_or(fallback, |b| b.score)
}
