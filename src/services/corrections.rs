use std::collections::HashMap;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use crate::models::{CorrectionRow, GameRecord};
use crate::services::store::StoreError;

/// Corrected ids keyed by exact game name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdCorrections {
    by_name: HashMap<String, String>,
}

impl IdCorrections {
    /// Parse the corrections sheet; rows with a blank id are skipped
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let mut by_name = HashMap::new();

        for row in csv_reader.deserialize::<CorrectionRow>() {
            let row = row?;
            let correct_id = row.correct_id.trim();
            if !correct_id.is_empty() {
                by_name.insert(row.name, correct_id.to_string());
            }
        }
        Ok(Self { by_name })
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(String::as_str)
    }

    /// Rewrite ids in place and return how many records changed
    ///
    /// Records whose id already matches the correction are left alone and
    /// not counted.
    pub fn apply(&self, records: &mut [GameRecord]) -> usize {
        let mut updated = 0;
        for record in records.iter_mut() {
            let Some(correct_id) = self.get(&record.name) else {
                continue;
            };
            if record.id == correct_id {
                tracing::debug!(name = %record.name, id = %record.id, "Id already correct");
                continue;
            }
            tracing::info!(name = %record.name, old_id = %record.id, new_id = correct_id, "Corrected game id");
            record.id = correct_id.to_string();
            updated += 1;
        }
        updated
    }
}

/// Read the corrections sheet from disk
pub fn read_corrections(path: &Path) -> Result<IdCorrections, StoreError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(StoreError::Missing(path.to_path_buf()))
        }
        Err(e) => return Err(StoreError::io(path, e)),
    };
    let corrections = IdCorrections::from_reader(file).map_err(|e| StoreError::csv(path, e))?;
    tracing::info!(path = %path.display(), corrections = corrections.len(), "Loaded id corrections");
    Ok(corrections)
}
