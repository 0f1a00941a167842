//! Per-story player progress
//!
//! All stories share one `progress.json`: `{ story_id: { key: value, ... } }`.
//! Saves merge one level deep only; nested objects are replaced whole.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info};

use crate::error::Result;

/// Flat key-value state: choice flags and story variables
pub type StateMap = Map<String, Value>;

/// Story ids in the order they were first saved
type ProgressFile = Map<String, Value>;

/// Overwrite `base` with every key of `update`. Keys missing from `update` are kept.
pub fn merge_shallow(base: &mut StateMap, update: StateMap) {
    for (key, value) in update {
        base.insert(key, value);
    }
}

pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    async fn load_all(&self) -> Result<ProgressFile> {
        if !fs::try_exists(&self.path).await? {
            return Ok(ProgressFile::new());
        }
        let bytes = fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn store_all(&self, all: &ProgressFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(all)?).await?;
        Ok(())
    }

    fn story_state(all: &ProgressFile, story_id: &str) -> Result<StateMap> {
        match all.get(story_id) {
            Some(state) => Ok(StateMap::deserialize(state)?),
            None => Ok(StateMap::new()),
        }
    }

    /// Saved state for a story, empty if nothing was saved yet
    pub async fn get_progress(&self, story_id: &str) -> Result<StateMap> {
        let all = self.load_all().await?;
        Self::story_state(&all, story_id)
    }

    /// Merge `update` into the story's saved state and return the result
    pub async fn save_progress(&self, story_id: &str, update: StateMap) -> Result<StateMap> {
        let mut all = self.load_all().await?;
        let mut merged = Self::story_state(&all, story_id)?;
        merge_shallow(&mut merged, update);

        // Replacing an existing key keeps its position in the file
        all.insert(story_id.to_string(), Value::Object(merged.clone()));
        self.store_all(&all).await?;
        debug!(story_id, keys = merged.len(), "Saved progress");
        Ok(merged)
    }

    /// Drop progress for every story
    pub async fn reset_all(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                info!(path = %self.path.display(), "Removed all story progress");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
