//! JSON file state store
//!
//! The whole memory is rewritten on every save: the blob goes to a temporary
//! sibling file which is then renamed over the state file. The interaction
//! history lives beside it in `<stem>.history.json`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::StateStore;
use crate::error::{Result, TacitError};

/// Persists the memory as a single JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    history_path: PathBuf,
}

impl JsonFileStore {
    /// Use `path` as the state file. Parent directories are created on save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let history_path = history_path_for(&path);
        Self { path, history_path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn history_path(&self) -> &Path {
        &self.history_path
    }
}

fn history_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_stem()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".history.json");
    path.with_file_name(name)
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => {
            tracing::debug!("Read {}", path.display());
            Ok(Some(content))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!("No state at {}, starting empty", path.display());
            Ok(None)
        }
        Err(e) => Err(TacitError::Storage(format!(
            "Failed to read state file {}: {}",
            path.display(),
            e
        ))),
    }
}

fn write_replacing(path: &Path, blob: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            TacitError::Storage(format!(
                "Failed to create data directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let mut temp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    temp_name.push(".tmp");
    let temp = path.with_file_name(temp_name);

    fs::write(&temp, blob).map_err(|e| {
        TacitError::Storage(format!("Failed to write {}: {}", temp.display(), e))
    })?;
    fs::rename(&temp, path).map_err(|e| {
        TacitError::Storage(format!(
            "Failed to replace state file {}: {}",
            path.display(),
            e
        ))
    })?;

    tracing::debug!("Saved {}", path.display());
    Ok(())
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<Option<String>> {
        read_optional(&self.path)
    }

    fn save(&mut self, blob: &str) -> Result<()> {
        write_replacing(&self.path, blob)
    }

    fn load_history(&self) -> Result<Option<String>> {
        read_optional(&self.history_path)
    }

    fn save_history(&mut self, blob: &str) -> Result<()> {
        write_replacing(&self.history_path, blob)
    }

    fn name(&self) -> &'static str {
        "json-file"
    }
}
