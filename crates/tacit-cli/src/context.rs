//! Resolving configuration, embedding model and state store from CLI flags

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tacit::PreferenceMemory;
use tacit::config::Config;
use tacit::embedding::{EmbeddingModel, StaticEmbeddings};
use tacit::storage::{JsonFileStore, StateStore};

use crate::error::CliResult;

/// Load the config (explicit path, default locations, or defaults) and apply
/// the `--data-dir` override.
pub fn load_config(config_path: Option<&Path>, data_dir: Option<PathBuf>) -> CliResult<Config> {
    let mut config = Config::load(config_path)?;
    if let Some(dir) = data_dir {
        config.storage.data_dir = dir;
    }
    Ok(config)
}

/// Build the embedding model named by the config.
///
/// `--embeddings` always selects the static provider with that vector table.
/// A static provider without vectors gets `empty_dimension`.
pub fn build_model(
    config: &Config,
    embeddings: Option<&Path>,
    empty_dimension: usize,
) -> CliResult<Arc<dyn EmbeddingModel>> {
    if let Some(path) = embeddings {
        return Ok(Arc::new(StaticEmbeddings::from_path(path, empty_dimension)?));
    }

    match config.embedding.provider.as_str() {
        "fastembed" => fastembed_model(),
        _ => match &config.embedding.path {
            Some(path) => Ok(Arc::new(StaticEmbeddings::from_path(path, empty_dimension)?)),
            None => {
                tracing::warn!(
                    "No embedding table configured; every term embeds to the zero vector"
                );
                Ok(Arc::new(StaticEmbeddings::empty(empty_dimension)))
            }
        },
    }
}

#[cfg(feature = "fastembed")]
fn fastembed_model() -> CliResult<Arc<dyn EmbeddingModel>> {
    Ok(Arc::new(tacit::embedding::FastEmbedModel::new()?))
}

#[cfg(not(feature = "fastembed"))]
fn fastembed_model() -> CliResult<Arc<dyn EmbeddingModel>> {
    Err("The fastembed provider requires building with --features fastembed".into())
}

/// Open the preference memory backed by the JSON state file.
///
/// Without a vector table the memory adopts the dimension of the stored
/// embeddings, so `list`, `stats` and `forget` work on a memory built with
/// another table.
pub fn open_memory(config: &Config, embeddings: Option<&Path>) -> CliResult<PreferenceMemory> {
    let state = JsonFileStore::new(config.state_path());
    let empty_dimension = stored_dimension(&state)?.unwrap_or(config.embedding.dimension);
    let model = build_model(config, embeddings, empty_dimension)?;
    Ok(PreferenceMemory::open(
        config.clone(),
        model,
        Box::new(state),
    )?)
}

fn stored_dimension(state: &JsonFileStore) -> CliResult<Option<usize>> {
    let snapshot = state.load_snapshot()?;
    let dimension = snapshot
        .values()
        .map(|entry| entry.embedding.len())
        .find(|len| *len > 0);
    if let Some(dimension) = dimension {
        tracing::debug!(dimension, "Stored embedding dimension");
    }
    Ok(dimension)
}
