use chrono::Datelike;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::core::{
    AttributeCatalog, AttributeResolver, BucketTables, PoolOptions, PreferenceModel, RankBoost,
    Recommender, ScoreEngine,
};
use crate::models::ScoringWeights;

/// Errors that can occur loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationErrors),
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Settings {
    pub paths: PathSettings,
    #[validate(nested)]
    pub scoring: ScoringSettings,
    #[validate(nested)]
    pub buckets: BucketTables,
    #[validate(nested)]
    pub attributes: AttributeCatalog,
    pub pipeline: PipelineSettings,
    pub logging: LoggingSettings,
}

/// Input and output file locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    pub collection: PathBuf,
    pub rankings: PathBuf,
    pub profile: PathBuf,
    pub exclusions: PathBuf,
    pub owned_games: PathBuf,
    pub output: PathBuf,
    /// Name to corrected id sheet applied to the published output
    pub corrections: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            collection: PathBuf::from("data/collection.csv"),
            rankings: PathBuf::from("data/boardgames_ranks.csv"),
            profile: PathBuf::from("data/preference_profile.json"),
            exclusions: PathBuf::from("data/excluded-game-ids.json"),
            owned_games: PathBuf::from("data/owned-games.json"),
            output: PathBuf::from("data/bgg-recommendations.json"),
            corrections: PathBuf::from("data/bgg-id-corrections.csv"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScoringSettings {
    #[serde(default)]
    #[validate(nested)]
    pub weights: WeightsConfig,
    #[serde(default = "default_max_rank")]
    #[validate(range(min = 1))]
    pub max_rank: u32,
    #[serde(default = "default_max_rank_boost")]
    #[validate(range(min = 0.0))]
    pub max_rank_boost: f64,
    #[serde(default = "default_score_precision")]
    #[validate(range(max = 12))]
    pub score_precision: u32,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            weights: WeightsConfig::default(),
            max_rank: default_max_rank(),
            max_rank_boost: default_max_rank_boost(),
            score_precision: default_score_precision(),
        }
    }
}

fn default_max_rank() -> u32 { 5000 }
fn default_max_rank_boost() -> f64 { 0.5 }
fn default_score_precision() -> u32 { 3 }

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WeightsConfig {
    #[serde(default = "default_consensus_weight")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub consensus: f64,
    #[serde(default = "default_complexity_weight")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub complexity: f64,
    #[serde(default = "default_recency_weight")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub recency: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            consensus: default_consensus_weight(),
            complexity: default_complexity_weight(),
            recency: default_recency_weight(),
        }
    }
}

fn default_consensus_weight() -> f64 { 0.5 }
fn default_complexity_weight() -> f64 { 0.3 }
fn default_recency_weight() -> f64 { 0.2 }

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            consensus: config.consensus,
            complexity: config.complexity,
            recency: config.recency,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSettings {
    #[serde(default = "default_true")]
    pub deduplicate: bool,
    #[serde(default)]
    pub limit: Option<usize>,
    /// Year assigned to pool entries without a usable publication year.
    /// Defaults to the current calendar year.
    #[serde(default)]
    pub fallback_year: Option<i32>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            deduplicate: true,
            limit: None,
            fallback_year: None,
        }
    }
}

fn default_true() -> bool { true }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with BGREC__)
    pub fn load() -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., BGREC__SCORING__MAX_RANK -> scoring.max_rank
            .add_source(environment())
            .build()?;

        Self::finish(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        Self::finish(settings)
    }

    fn finish(config: Config) -> Result<Self, SettingsError> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn fallback_year(&self) -> i32 {
        self.pipeline
            .fallback_year
            .unwrap_or_else(|| chrono::Utc::now().year())
    }

    pub fn preference_model(&self) -> PreferenceModel {
        PreferenceModel::new(self.buckets.clone())
    }

    pub fn score_engine(&self) -> ScoreEngine {
        ScoreEngine::new(
            ScoringWeights::from(&self.scoring.weights),
            RankBoost {
                max_rank: self.scoring.max_rank,
                max_boost: self.scoring.max_rank_boost,
            },
            self.scoring.score_precision,
        )
    }

    pub fn recommender(&self) -> Recommender {
        Recommender::new(
            AttributeResolver::new(self.attributes.clone()),
            self.score_engine(),
            PoolOptions {
                max_rank: self.scoring.max_rank,
                deduplicate: self.pipeline.deduplicate,
                limit: self.pipeline.limit,
            },
        )
    }
}

fn environment() -> Environment {
    Environment::with_prefix("BGREC")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
