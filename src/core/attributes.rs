use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::{Validate, ValidationError};

use crate::models::{AttributeEstimate, AttributeRecord, CandidateGame, Category};

/// Fixed attribute estimate for one category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryEstimate {
    pub category: Category,
    pub estimate: AttributeRecord,
}

/// Category estimate table, priority order and global defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_catalog"))]
pub struct AttributeCatalog {
    pub defaults: AttributeEstimate,
    pub categories: Vec<CategoryEstimate>,
    /// Scanned front to back; the first category the candidate belongs to wins
    pub priority: Vec<Category>,
}

impl Default for AttributeCatalog {
    fn default() -> Self {
        let estimate = |category, weight, time, min, max| CategoryEstimate {
            category,
            estimate: AttributeRecord::new(weight, time, min, max),
        };

        Self {
            defaults: AttributeEstimate::default(),
            categories: vec![
                estimate(Category::Wargame, 3.8, 180, 2, 2),
                estimate(Category::Strategy, 3.2, 90, 2, 4),
                estimate(Category::Thematic, 3.0, 120, 1, 5),
                estimate(Category::Family, 2.0, 45, 2, 5),
                estimate(Category::CustomizableCard, 2.6, 45, 2, 2),
                estimate(Category::Abstract, 2.2, 30, 2, 2),
                estimate(Category::Party, 1.3, 30, 4, 10),
                estimate(Category::Children, 1.2, 20, 2, 4),
            ],
            priority: Category::PRIORITY.to_vec(),
        }
    }
}

impl AttributeCatalog {
    pub fn estimate_for(&self, category: Category) -> Option<&AttributeRecord> {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map(|c| &c.estimate)
    }
}

fn validate_catalog(catalog: &AttributeCatalog) -> Result<(), ValidationError> {
    if catalog.priority.is_empty() {
        let mut err = ValidationError::new("empty_priority");
        err.message = Some("category priority order must not be empty".into());
        return Err(err);
    }

    if let Some(missing) = catalog
        .priority
        .iter()
        .find(|c| catalog.estimate_for(**c).is_none())
    {
        let mut err = ValidationError::new("missing_category_estimate");
        err.message = Some(format!("no estimate configured for prioritized category {:?}", missing).into());
        return Err(err);
    }

    let d = &catalog.defaults;
    if !(d.complexity_weight > 0.0) || d.playing_time == 0 || d.min_players == 0 || d.max_players == 0 {
        let mut err = ValidationError::new("zero_default");
        err.message = Some("attribute defaults must all be positive".into());
        return Err(err);
    }

    Ok(())
}

/// Where a candidate's attributes came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeSource {
    /// The user's own collection record
    Collection,
    Category(Category),
    Default,
}

/// Resolves attribute estimates for candidates
///
/// Source selection is all-or-nothing: a collection record wins over any
/// category estimate even when partially populated. Afterwards each absent
/// or zero field is patched from the global defaults.
#[derive(Debug, Clone, Default)]
pub struct AttributeResolver {
    catalog: AttributeCatalog,
}

impl AttributeResolver {
    pub fn new(catalog: AttributeCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &AttributeCatalog {
        &self.catalog
    }

    pub fn resolve(
        &self,
        candidate: &CandidateGame,
        authoritative: &HashMap<String, AttributeRecord>,
    ) -> AttributeEstimate {
        self.resolve_with_source(candidate, authoritative).0
    }

    pub fn resolve_with_source(
        &self,
        candidate: &CandidateGame,
        authoritative: &HashMap<String, AttributeRecord>,
    ) -> (AttributeEstimate, AttributeSource) {
        let (record, source) = self.select_source(candidate, authoritative);
        (fill_defaults(&record, &self.catalog.defaults), source)
    }

    fn select_source(
        &self,
        candidate: &CandidateGame,
        authoritative: &HashMap<String, AttributeRecord>,
    ) -> (AttributeRecord, AttributeSource) {
        if let Some(record) = authoritative.get(&candidate.id) {
            return (*record, AttributeSource::Collection);
        }

        let by_category = self
            .catalog
            .priority
            .iter()
            .filter(|category| candidate.categories.contains(*category))
            .find_map(|category| {
                self.catalog
                    .estimate_for(*category)
                    .map(|estimate| (*estimate, AttributeSource::Category(*category)))
            });

        by_category.unwrap_or((AttributeRecord::default(), AttributeSource::Default))
    }
}

/// Replace every absent or zero field with its default
pub fn fill_defaults(record: &AttributeRecord, defaults: &AttributeEstimate) -> AttributeEstimate {
    AttributeEstimate {
        complexity_weight: record
            .complexity_weight
            .filter(|w| w.is_finite() && *w > 0.0)
            .unwrap_or(defaults.complexity_weight),
        playing_time: record.playing_time.filter(|v| *v > 0).unwrap_or(defaults.playing_time),
        min_players: record.min_players.filter(|v| *v > 0).unwrap_or(defaults.min_players),
        max_players: record.max_players.filter(|v| *v > 0).unwrap_or(defaults.max_players),
    }
}
