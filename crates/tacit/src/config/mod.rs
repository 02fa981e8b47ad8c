use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, TacitError};

/// Main configuration structure for Tacit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Decay, promotion and eviction policy
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Observation weighting
    #[serde(default)]
    pub weight: WeightConfig,
    /// Relevance ranking
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Embedding model configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    /// Where the memory state lives
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Parse a TOML document. Missing sections and keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| TacitError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::info!("Loading config from: {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| {
            TacitError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load the config from `path`, or from the first default location that
    /// exists, or fall back to defaults.
    ///
    /// Default locations, in order: `~/.tacit/config.toml`,
    /// `<config dir>/tacit/config.toml`, `./config.toml`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        for candidate in default_config_paths() {
            if candidate.exists() {
                return Self::from_file(&candidate);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Reject values the memory cannot operate with
    pub fn validate(&self) -> Result<()> {
        let m = &self.memory;
        if !(m.decay_rate > 0.0 && m.decay_rate <= 1.0) {
            return Err(TacitError::Config(format!(
                "memory.decay_rate must be in (0, 1], got {}",
                m.decay_rate
            )));
        }
        if m.demote_threshold < 0.0 {
            return Err(TacitError::Config(format!(
                "memory.demote_threshold must be non-negative, got {}",
                m.demote_threshold
            )));
        }
        if m.promotion_threshold <= m.demote_threshold {
            return Err(TacitError::Config(format!(
                "memory.promotion_threshold ({}) must exceed memory.demote_threshold ({})",
                m.promotion_threshold, m.demote_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.weight.alpha) {
            return Err(TacitError::Config(format!(
                "weight.alpha must be in [0, 1], got {}",
                self.weight.alpha
            )));
        }
        if !(-1.0..=1.0).contains(&self.retrieval.threshold) {
            return Err(TacitError::Config(format!(
                "retrieval.threshold must be in [-1, 1], got {}",
                self.retrieval.threshold
            )));
        }
        if self.retrieval.max_results == 0 {
            return Err(TacitError::Config(
                "retrieval.max_results must be at least 1".to_string(),
            ));
        }
        if self.embedding.dimension == 0 {
            return Err(TacitError::Config(
                "embedding.dimension must be at least 1".to_string(),
            ));
        }
        match self.embedding.provider.as_str() {
            "static" | "fastembed" => Ok(()),
            other => Err(TacitError::Config(format!(
                "Unknown embedding provider: {other}. Use static or fastembed."
            ))),
        }
    }

    /// Full path of the persisted memory state
    pub fn state_path(&self) -> PathBuf {
        self.storage.data_dir.join(&self.storage.state_file)
    }
}

fn default_config_paths() -> Vec<PathBuf> {
    [
        dirs::home_dir().map(|h| h.join(".tacit").join("config.toml")),
        dirs::config_dir().map(|c| c.join("tacit").join("config.toml")),
        Some(PathBuf::from("config.toml")),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Memory store policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Multiplier applied to every weight once per observation
    #[serde(default = "default_decay_rate")]
    pub decay_rate: f32,
    /// Weight at which an entry becomes long-term
    #[serde(default = "default_promotion_threshold")]
    pub promotion_threshold: f32,
    /// Updated entries below this weight are removed
    #[serde(default = "default_demote_threshold")]
    pub demote_threshold: f32,
    /// Number of past observations novelty looks back over (unbounded if unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_horizon: Option<usize>,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            decay_rate: default_decay_rate(),
            promotion_threshold: default_promotion_threshold(),
            demote_threshold: default_demote_threshold(),
            history_horizon: None,
        }
    }
}

fn default_decay_rate() -> f32 {
    0.95
}

fn default_promotion_threshold() -> f32 {
    2.0
}

fn default_demote_threshold() -> f32 {
    0.3
}

/// Observation weighting parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    /// Share of the weight given to in-observation frequency; the rest goes to novelty
    #[serde(default = "default_alpha")]
    pub alpha: f32,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
        }
    }
}

fn default_alpha() -> f32 {
    0.7
}

/// Relevance ranking configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Minimum cosine similarity for a match
    #[serde(default = "default_relevance_threshold")]
    pub threshold: f32,
    /// Maximum number of matches returned
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Keep only the best match per entry before truncating
    #[serde(default)]
    pub deduplicate: bool,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            threshold: default_relevance_threshold(),
            max_results: default_max_results(),
            deduplicate: false,
        }
    }
}

fn default_relevance_threshold() -> f32 {
    0.75
}

fn default_max_results() -> usize {
    5
}

/// Embedding model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Embedding provider: static (vector table) or fastembed
    #[serde(default = "default_embedding_provider")]
    pub provider: String,
    /// Vector table for the static provider (JSON object or GloVe text)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Dimension of the static provider when no table is loaded
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            path: None,
            dimension: default_embedding_dimension(),
        }
    }
}

fn default_embedding_provider() -> String {
    "static".to_string()
}

fn default_embedding_dimension() -> usize {
    crate::embedding::DEFAULT_EMBEDDING_DIMENSION
}

/// Memory state storage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base directory for all state
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// File name of the memory snapshot inside `data_dir`
    #[serde(default = "default_state_file")]
    pub state_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            state_file: default_state_file(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".tacit"))
        .unwrap_or_else(|| PathBuf::from(".tacit"))
}

fn default_state_file() -> String {
    "preferences.json".to_string()
}
