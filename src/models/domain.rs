use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// One historical rating from the user's collection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingRecord {
    pub rating: f64,
    pub complexity_weight: f64,
    pub community_average: f64,
    pub publication_year: i32,
}

/// Half-open interval `[lower, upper)` mapped to a fixed score
///
/// Serialized as a `[lower, upper, score]` triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64, f64)", into = "(f64, f64, f64)")]
pub struct Bucket {
    pub lower: f64,
    pub upper: f64,
    pub score: f64,
}

impl Bucket {
    pub const fn new(lower: f64, upper: f64, score: f64) -> Self {
        Self { lower, upper, score }
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value < self.upper
    }
}

impl From<(f64, f64, f64)> for Bucket {
    fn from((lower, upper, score): (f64, f64, f64)) -> Self {
        Self::new(lower, upper, score)
    }
}

impl From<Bucket> for (f64, f64, f64) {
    fn from(bucket: Bucket) -> Self {
        (bucket.lower, bucket.upper, bucket.score)
    }
}

/// Preference dimension scored by the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// Complexity weight (1.0 - 5.0)
    Weight,
    /// Community average rating
    Community,
    /// Publication year
    Year,
}

/// Persisted user preference profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceProfile {
    #[serde(rename = "baselineRating", alias = "baseline_rating")]
    pub baseline_rating: f64,
    #[serde(rename = "weightPreferences", alias = "weight_preferences")]
    pub weight_preferences: Vec<Bucket>,
    #[serde(rename = "bggPreferences", alias = "bgg_preferences")]
    pub bgg_preferences: Vec<Bucket>,
    #[serde(rename = "yearPreferences", alias = "year_preferences")]
    pub year_preferences: Vec<Bucket>,
}

/// Category tag from the global rankings
///
/// Declaration order is the default resolution priority, most complex first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Wargame,
    Strategy,
    Thematic,
    Family,
    CustomizableCard,
    Abstract,
    Party,
    Children,
}

impl Category {
    pub const PRIORITY: [Category; 8] = [
        Category::Wargame,
        Category::Strategy,
        Category::Thematic,
        Category::Family,
        Category::CustomizableCard,
        Category::Abstract,
        Category::Party,
        Category::Children,
    ];
}

/// A game from the global pool under consideration
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateGame {
    pub id: String,
    pub name: String,
    /// Global rank, lower is better. `None` for unranked entries.
    pub global_rank: Option<u32>,
    pub is_expansion: bool,
    pub community_average: f64,
    pub publication_year: i32,
    pub categories: BTreeSet<Category>,
}

/// Attribute tuple where any field may be absent
///
/// Used for collection records and for category estimates. A zero value is
/// treated the same as a missing one during resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeRecord {
    #[serde(default)]
    pub complexity_weight: Option<f64>,
    #[serde(default)]
    pub playing_time: Option<u32>,
    #[serde(default)]
    pub min_players: Option<u32>,
    #[serde(default)]
    pub max_players: Option<u32>,
}

impl AttributeRecord {
    pub fn new(complexity_weight: f64, playing_time: u32, min_players: u32, max_players: u32) -> Self {
        Self {
            complexity_weight: Some(complexity_weight),
            playing_time: Some(playing_time),
            min_players: Some(min_players),
            max_players: Some(max_players),
        }
    }
}

/// Fully resolved attributes for a candidate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttributeEstimate {
    pub complexity_weight: f64,
    pub playing_time: u32,
    pub min_players: u32,
    pub max_players: u32,
}

impl Default for AttributeEstimate {
    fn default() -> Self {
        Self {
            complexity_weight: 2.5,
            playing_time: 60,
            min_players: 2,
            max_players: 6,
        }
    }
}

/// Score components for one candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub composite_score: f64,
    pub rank_boost: f64,
    pub final_score: f64,
}

/// Candidate with resolved attributes and its score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: CandidateGame,
    pub attributes: AttributeEstimate,
    pub composite_score: f64,
    pub rank_boost: f64,
    pub final_score: f64,
}

/// Ids of games the user owns or previously owned
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExclusionSet(HashSet<String>);

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.0.insert(id.into())
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Ids in ascending order, for stable output files
    pub fn sorted_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.0.iter().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl<S: Into<String>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Dimension weights for the composite score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub consensus: f64,
    pub complexity: f64,
    pub recency: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            consensus: 0.5,
            complexity: 0.3,
            recency: 0.2,
        }
    }
}
