//! Story repository
//!
//! Story content is authored on disk, one folder per story:
//!
//! ```text
//! stories/
//! ├── night-train/
//! │   ├── manifest.json      # id, title, cover, seasons[].episodes[]
//! │   └── episodes/
//! │       ├── ep1.json       # initial_state + episode payload
//! │       └── ep2.json
//! └── ...
//! ```
//!
//! Folders are matched by the manifest `id`, not by folder name. The folder
//! scan is sorted so "first match wins" does not depend on directory order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::error::{Result, StoryError};
use crate::progress::StateMap;

pub const MANIFEST_FILE: &str = "manifest.json";
pub const EPISODES_DIR: &str = "episodes";

/// Per-story metadata document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,

    #[serde(default)]
    pub seasons: Vec<Season>,

    /// Any other author fields, served back untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    #[serde(default)]
    pub episodes: Vec<EpisodeRef>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeRef {
    pub id: String,

    /// File name under the story's episodes/ folder
    pub file: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StoryManifest {
    /// Resolve an episode id to its file name. First match across seasons wins.
    pub fn episode_file(&self, episode_id: &str) -> Result<&str> {
        self.seasons
            .iter()
            .flat_map(|season| season.episodes.iter())
            .find(|episode| episode.id == episode_id)
            .map(|episode| episode.file.as_str())
            .ok_or_else(|| StoryError::not_found("Episode not found"))
    }

    fn library_entry(&self) -> LibraryEntry {
        LibraryEntry {
            id: self.id.clone(),
            title: self.title.clone(),
            cover: self.cover.clone(),
        }
    }
}

/// Episode document: the starting state plus whatever the client renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeData {
    #[serde(default)]
    pub initial_state: StateMap,

    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

/// One row of the library listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibraryEntry {
    pub id: Option<String>,
    pub title: Option<String>,
    pub cover: Option<String>,
}

/// Result of scanning the stories directory
#[derive(Debug, Clone, Default)]
pub struct LibraryScan {
    pub entries: Vec<LibraryEntry>,
    /// Story folders whose manifest could not be read or parsed
    pub skipped: usize,
}

/// Read-only access to authored story content
pub struct StoryRepository {
    stories_dir: PathBuf,
}

impl StoryRepository {
    pub fn new<P: Into<PathBuf>>(stories_dir: P) -> Self {
        Self {
            stories_dir: stories_dir.into(),
        }
    }

    pub fn stories_dir(&self) -> &Path {
        &self.stories_dir
    }

    /// Story folders that contain a manifest, sorted by folder name
    async fn story_dirs(&self) -> Result<Vec<PathBuf>> {
        if !fs::try_exists(&self.stories_dir).await? {
            debug!(path = %self.stories_dir.display(), "Stories directory missing");
            return Ok(Vec::new());
        }

        let mut dirs = Vec::new();
        let mut entries = fs::read_dir(&self.stories_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_dir = fs::metadata(&path).await.map(|m| m.is_dir()).unwrap_or(false);
            if is_dir && fs::try_exists(path.join(MANIFEST_FILE)).await.unwrap_or(false) {
                dirs.push(path);
            }
        }
        dirs.sort();
        Ok(dirs)
    }

    async fn read_manifest(story_path: &Path) -> Result<StoryManifest> {
        let bytes = fs::read(story_path.join(MANIFEST_FILE)).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// List every story whose manifest parses. Broken folders are skipped and counted.
    pub async fn list_library(&self) -> Result<LibraryScan> {
        let mut scan = LibraryScan::default();

        for dir in self.story_dirs().await? {
            match Self::read_manifest(&dir).await {
                Ok(manifest) => scan.entries.push(manifest.library_entry()),
                Err(e) => {
                    warn!(path = %dir.display(), error = %e, "Skipping story with unreadable manifest");
                    scan.skipped += 1;
                }
            }
        }

        debug!(stories = scan.entries.len(), skipped = scan.skipped, "Scanned library");
        Ok(scan)
    }

    /// Locate the folder whose manifest carries `story_id`
    pub async fn find_story_path(&self, story_id: &str) -> Result<Option<PathBuf>> {
        Ok(self.find_story(story_id).await?.map(|(path, _)| path))
    }

    async fn find_story(&self, story_id: &str) -> Result<Option<(PathBuf, StoryManifest)>> {
        for dir in self.story_dirs().await? {
            match Self::read_manifest(&dir).await {
                Ok(manifest) if manifest.id.as_deref() == Some(story_id) => {
                    return Ok(Some((dir, manifest)));
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(path = %dir.display(), error = %e, "Ignoring unreadable manifest during lookup");
                }
            }
        }
        Ok(None)
    }

    /// Manifest for `story_id`
    pub async fn get_manifest(&self, story_id: &str) -> Result<StoryManifest> {
        self.find_story(story_id)
            .await?
            .map(|(_, manifest)| manifest)
            .ok_or_else(|| StoryError::not_found("Not found"))
    }

    /// Folder and manifest for `story_id`, for episode loading
    pub async fn load_story(&self, story_id: &str) -> Result<(PathBuf, StoryManifest)> {
        self.find_story(story_id)
            .await?
            .ok_or_else(|| StoryError::not_found("Story not found"))
    }

    /// Read an episode template from a story folder
    pub async fn load_episode(&self, story_path: &Path, file: &str) -> Result<EpisodeData> {
        let path = story_path.join(EPISODES_DIR).join(file);
        debug!(path = %path.display(), "Loading episode");
        let bytes = fs::read(&path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
