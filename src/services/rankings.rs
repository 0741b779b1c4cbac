use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::models::{
    rows::{parse_f64, parse_flag, parse_i32, parse_u32},
    CandidateGame, Category, RankingRow,
};
use crate::services::store::StoreError;

impl RankingRow {
    /// Convert a raw row into a candidate, degrading malformed fields
    ///
    /// A missing rank stays `None` so the pipeline can screen it out. A
    /// missing or malformed year becomes `fallback_year`; a malformed
    /// average becomes 0.
    pub fn into_candidate(self, fallback_year: i32) -> CandidateGame {
        let publication_year = parse_i32(&self.yearpublished).unwrap_or_else(|| {
            if !self.yearpublished.trim().is_empty() {
                tracing::debug!(id = %self.id, raw = %self.yearpublished, "Malformed year, using fallback");
            }
            fallback_year
        });

        let community_average = parse_f64(&self.average).unwrap_or_else(|| {
            tracing::debug!(id = %self.id, raw = %self.average, "Missing community average, using 0");
            0.0
        });

        let categories = self.categories();

        CandidateGame {
            id: self.id.trim().to_string(),
            name: self.name,
            global_rank: parse_u32(&self.rank),
            is_expansion: parse_flag(&self.is_expansion),
            community_average,
            publication_year,
            categories,
        }
    }

    /// Categories whose rank column holds a positive rank
    fn categories(&self) -> BTreeSet<Category> {
        [
            (Category::Wargame, &self.wargames_rank),
            (Category::Strategy, &self.strategygames_rank),
            (Category::Thematic, &self.thematic_rank),
            (Category::Family, &self.familygames_rank),
            (Category::CustomizableCard, &self.cgs_rank),
            (Category::Abstract, &self.abstracts_rank),
            (Category::Party, &self.partygames_rank),
            (Category::Children, &self.childrensgames_rank),
        ]
        .into_iter()
        .filter(|(_, raw)| parse_u32(raw).is_some_and(|rank| rank > 0))
        .map(|(category, _)| category)
        .collect()
    }
}

/// Parse the global rankings dump, preserving file order
pub fn parse_pool<R: Read>(reader: R, fallback_year: i32) -> Result<Vec<CandidateGame>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    csv_reader
        .deserialize::<RankingRow>()
        .map(|row| row.map(|r| r.into_candidate(fallback_year)))
        .collect()
}

/// Read the global rankings dump from disk
pub fn read_rankings(path: &Path, fallback_year: i32) -> Result<Vec<CandidateGame>, StoreError> {
    let file = File::open(path).map_err(|e| StoreError::io(path, e))?;
    let pool = parse_pool(file, fallback_year).map_err(|e| StoreError::csv(path, e))?;
    tracing::info!(path = %path.display(), candidates = pool.len(), "Loaded candidate pool");
    Ok(pool)
}
