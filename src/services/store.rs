use serde::{de::DeserializeOwned, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{ExclusionSet, GameRecord, PreferenceProfile};

/// Errors that can occur reading or writing data files
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Required file not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn csv(path: &Path, source: csv::Error) -> Self {
        StoreError::Csv {
            path: path.to_path_buf(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        StoreError::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Load a JSON document, returning `Ok(None)` when the file does not exist
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::io(path, e)),
    };

    let value = serde_json::from_reader(BufReader::new(file)).map_err(|e| StoreError::json(path, e))?;
    tracing::debug!(path = %path.display(), "Loaded JSON document");
    Ok(Some(value))
}

/// Write a value as pretty JSON, creating parent directories as needed
pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let file = File::create(path).map_err(|e| StoreError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|e| StoreError::json(path, e))?;
    writer.write_all(b"\n").map_err(|e| StoreError::io(path, e))?;
    writer.flush().map_err(|e| StoreError::io(path, e))?;

    tracing::debug!(path = %path.display(), "Wrote JSON document");
    Ok(())
}

pub fn load_profile(path: &Path) -> Result<Option<PreferenceProfile>, StoreError> {
    load_json(path)
}

pub fn save_profile(path: &Path, profile: &PreferenceProfile) -> Result<(), StoreError> {
    save_json(path, profile)
}

pub fn load_exclusions(path: &Path) -> Result<Option<ExclusionSet>, StoreError> {
    load_json(path)
}

/// Persist exclusions as a sorted JSON array of ids
pub fn save_exclusions(path: &Path, exclusions: &ExclusionSet) -> Result<(), StoreError> {
    save_json(path, &exclusions.sorted_ids())
}

pub fn load_records(path: &Path) -> Result<Option<Vec<GameRecord>>, StoreError> {
    load_json(path)
}

pub fn save_records(path: &Path, records: &[GameRecord]) -> Result<(), StoreError> {
    save_json(path, records)
}
