//! Episode sessions
//!
//! Starting an episode costs a heart before anything else is checked, so a
//! request for a story or episode that does not exist still spends it.

use std::sync::Arc;
use tracing::info;

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::Result;
use crate::library::{EpisodeData, StoryRepository};
use crate::profile::{ProfileStatus, ProfileStore, UserProfile};
use crate::progress::{merge_shallow, ProgressStore, StateMap};

pub struct EpisodeSessionService {
    library: StoryRepository,
    profiles: ProfileStore,
    progress: ProgressStore,
}

impl EpisodeSessionService {
    pub fn new(config: &Config) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            library: StoryRepository::new(config.stories_dir()),
            profiles: ProfileStore::new(config, clock),
            progress: ProgressStore::new(config.progress_file()),
        }
    }

    pub fn library(&self) -> &StoryRepository {
        &self.library
    }

    pub fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }

    /// Spend a heart and return the episode with saved progress laid over its initial state
    pub async fn start_episode(&self, story_id: &str, episode_id: &str) -> Result<EpisodeData> {
        let profile = self.profiles.debit_heart().await?;

        let (story_path, manifest) = self.library.load_story(story_id).await?;
        let file = manifest.episode_file(episode_id)?;
        let mut episode = self.library.load_episode(&story_path, file).await?;

        let saved = self.progress.get_progress(story_id).await?;
        merge_shallow(&mut episode.initial_state, saved);

        info!(story_id, episode_id, hearts = profile.hearts, "Episode started");
        Ok(episode)
    }

    /// Merge a state snapshot from the client into the story's progress
    pub async fn save_progress(&self, story_id: &str, state: StateMap) -> Result<StateMap> {
        self.progress.save_progress(story_id, state).await
    }

    pub async fn story_progress(&self, story_id: &str) -> Result<StateMap> {
        self.progress.get_progress(story_id).await
    }

    pub async fn user_status(&self) -> Result<ProfileStatus> {
        self.profiles.status().await
    }

    /// Full hearts and no progress for any story
    pub async fn full_reset(&self) -> Result<UserProfile> {
        let profile = self.profiles.reset().await?;
        self.progress.reset_all().await?;
        info!("Full reset completed");
        Ok(profile)
    }
}
