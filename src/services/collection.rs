use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::models::{
    rows::{parse_f64, parse_i32, parse_u32},
    AttributeRecord, CollectionRow, ExclusionSet, GameRecord, RatingRecord,
};
use crate::services::store::StoreError;

/// The user's collection export
#[derive(Debug, Clone, Default)]
pub struct Collection {
    rows: Vec<CollectionRow>,
}

impl Collection {
    pub fn new(rows: Vec<CollectionRow>) -> Self {
        Self { rows }
    }

    /// Parse a collection export from CSV with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let rows = csv_reader
            .deserialize::<CollectionRow>()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[CollectionRow] {
        &self.rows
    }

    /// Rating history: every row carrying a non-zero rating
    pub fn rating_records(&self) -> Vec<RatingRecord> {
        self.rows
            .iter()
            .filter_map(|row| {
                let rating = parse_f64(&row.rating).filter(|r| *r != 0.0)?;
                Some(RatingRecord {
                    rating,
                    complexity_weight: parse_f64(&row.avgweight).unwrap_or(0.0),
                    community_average: parse_f64(&row.average).unwrap_or(0.0),
                    publication_year: parse_i32(&row.yearpublished).unwrap_or(0),
                })
            })
            .collect()
    }

    /// Ids of owned or previously owned games
    pub fn exclusion_set(&self) -> ExclusionSet {
        self.rows
            .iter()
            .filter(|row| row.owned() || row.previously_owned())
            .map(|row| row.objectid.trim())
            .filter(|id| !id.is_empty())
            .collect()
    }

    /// Attribute records keyed by id; the first row wins for repeated ids
    pub fn authoritative_records(&self) -> HashMap<String, AttributeRecord> {
        let mut records = HashMap::with_capacity(self.rows.len());
        for row in &self.rows {
            let id = row.objectid.trim();
            if id.is_empty() {
                continue;
            }
            records.entry(id.to_string()).or_insert(AttributeRecord {
                complexity_weight: parse_f64(&row.avgweight),
                playing_time: parse_u32(&row.playingtime),
                min_players: parse_u32(&row.minplayers),
                max_players: parse_u32(&row.maxplayers),
            });
        }
        records
    }

    /// Currently owned games, with play counts
    pub fn owned_games(&self) -> Vec<GameRecord> {
        self.rows
            .iter()
            .filter(|row| row.owned())
            .map(|row| GameRecord {
                numplays: Some(parse_u32(&row.numplays).unwrap_or(0)),
                ..game_record(row)
            })
            .collect()
    }

    /// Games the user does not own and never owned
    ///
    /// Wanted games come first, then (optionally) other tracked games; the
    /// combined list is stably sorted by community average, highest first.
    pub fn wishlist_recommendations(&self, include_tracked: bool) -> Vec<GameRecord> {
        let (wanted, tracked): (Vec<&CollectionRow>, Vec<&CollectionRow>) = self
            .rows
            .iter()
            .filter(|row| !row.owned() && !row.previously_owned())
            .partition(|row| row.wanted());

        let mut games: Vec<GameRecord> = wanted.into_iter().map(game_record).collect();
        if include_tracked {
            games.extend(tracked.into_iter().map(game_record));
        }

        games.sort_by(|a, b| b.average.total_cmp(&a.average));
        games
    }
}

fn game_record(row: &CollectionRow) -> GameRecord {
    GameRecord {
        id: row.objectid.trim().to_string(),
        name: row.objectname.clone(),
        rating: row.rating(),
        numplays: None,
        avgweight: parse_f64(&row.avgweight).unwrap_or(0.0),
        minplayers: parse_u32(&row.minplayers).unwrap_or(0),
        maxplayers: parse_u32(&row.maxplayers).unwrap_or(0),
        playingtime: parse_u32(&row.playingtime).unwrap_or(0),
        yearpublished: row.yearpublished.clone(),
        average: parse_f64(&row.average).unwrap_or(0.0),
        itemtype: row.itemtype.clone(),
        bggbestplayers: row.bggbestplayers.clone(),
        bggrecplayers: row.bggrecplayers.clone(),
    }
}

/// Read the collection export from disk
pub fn read_collection(path: &Path) -> Result<Collection, StoreError> {
    let file = File::open(path).map_err(|e| StoreError::io(path, e))?;
    let collection = Collection::from_reader(file).map_err(|e| StoreError::csv(path, e))?;
    tracing::info!(path = %path.display(), rows = collection.rows.len(), "Loaded collection");
    Ok(collection)
}
